/*!
    Playback flags shared by the ticker thread and the event loop.
*/

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;

use parking_lot::{Condvar, Mutex};

/// Upper bound for the refresh delay; frames reporting longer durations are clamped.
pub const MAX_DELAY_MS: u32 = 1000;

/**
    Exit, pause and refresh-delay flags.

    Each flag is an independent atomic, so a reader may observe a
    combination that was never set at once. The mutex and condition
    variable carry no data; they only wake a sleeping ticker when a flag
    changes.
*/
pub struct PlaybackState {
    exit: AtomicBool,
    pause: AtomicBool,
    delay_ms: AtomicU32,
    lock: Mutex<()>,
    changed: Condvar,
}

impl PlaybackState {
    pub fn new(delay: Duration) -> Self {
        Self {
            exit: AtomicBool::new(false),
            pause: AtomicBool::new(false),
            delay_ms: AtomicU32::new(clamp_delay(delay)),
            lock: Mutex::new(()),
            changed: Condvar::new(),
        }
    }

    pub fn exit_requested(&self) -> bool {
        self.exit.load(Ordering::Acquire)
    }

    pub fn request_exit(&self) {
        self.exit.store(true, Ordering::Release);
        self.notify();
    }

    pub fn is_paused(&self) -> bool {
        self.pause.load(Ordering::Acquire)
    }

    pub fn set_paused(&self, paused: bool) {
        self.pause.store(paused, Ordering::Release);
        self.notify();
    }

    /**
        Flip the pause flag and return the new value.
    */
    pub fn toggle_pause(&self) -> bool {
        let paused = !self.pause.fetch_xor(true, Ordering::AcqRel);
        self.notify();
        paused
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms.load(Ordering::Relaxed) as u64)
    }

    /**
        Set the interval between refresh ticks, clamped to 1..=1000 ms.
    */
    pub fn set_delay(&self, delay: Duration) {
        self.delay_ms.store(clamp_delay(delay), Ordering::Relaxed);
    }

    /**
        Block the calling thread for one refresh interval, returning early
        when any flag changes or exit has been requested.
    */
    pub fn wait_tick(&self) {
        let mut guard = self.lock.lock();
        if self.exit_requested() {
            return;
        }
        let timeout = self.delay();
        self.changed.wait_for(&mut guard, timeout);
    }

    fn notify(&self) {
        let _guard = self.lock.lock();
        self.changed.notify_all();
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new(Duration::from_millis(crate::config::DEFAULT_DELAY_MS as u64))
    }
}

impl std::fmt::Debug for PlaybackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackState")
            .field("exit", &self.exit_requested())
            .field("pause", &self.is_paused())
            .field("delay", &self.delay())
            .finish()
    }
}

fn clamp_delay(delay: Duration) -> u32 {
    (delay.as_millis().min(MAX_DELAY_MS as u128) as u32).max(1)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;
    use std::time::Instant;

    use super::*;

    #[test]
    fn toggle_pause_returns_new_value() {
        let state = PlaybackState::default();
        assert!(!state.is_paused());
        assert!(state.toggle_pause());
        assert!(state.is_paused());
        assert!(!state.toggle_pause());
        assert!(!state.is_paused());
    }

    #[test]
    fn delay_is_clamped() {
        let state = PlaybackState::new(Duration::ZERO);
        assert_eq!(state.delay(), Duration::from_millis(1));
        state.set_delay(Duration::from_secs(10));
        assert_eq!(state.delay(), Duration::from_millis(MAX_DELAY_MS as u64));
        state.set_delay(Duration::from_micros(41_700));
        assert_eq!(state.delay(), Duration::from_millis(41));
    }

    #[test]
    fn wait_tick_returns_immediately_after_exit() {
        let state = PlaybackState::new(Duration::from_secs(1));
        state.request_exit();
        let start = Instant::now();
        state.wait_tick();
        assert!(start.elapsed() < Duration::from_millis(500));
    }

    #[test]
    fn exit_wakes_waiting_thread() {
        let state = Arc::new(PlaybackState::new(Duration::from_secs(1)));
        let waiter = {
            let state = Arc::clone(&state);
            thread::spawn(move || {
                let start = Instant::now();
                while !state.exit_requested() {
                    state.wait_tick();
                }
                start.elapsed()
            })
        };

        thread::sleep(Duration::from_millis(20));
        state.request_exit();
        let waited = waiter.join().unwrap();
        assert!(waited < Duration::from_millis(900));
    }
}
