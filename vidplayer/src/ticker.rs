/*!
    Refresh ticker thread.
*/

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::error::{PlayerError, PlayerResult};
use crate::event::{PlayerEvent, TickSink};
use crate::state::PlaybackState;

/**
    Background thread posting [`PlayerEvent::Refresh`] once per refresh
    interval while playback is not paused.

    When exit is requested the thread posts [`PlayerEvent::Stop`] and ends.
    Dropping the ticker requests exit and joins the thread.
*/
pub struct Ticker {
    state: Arc<PlaybackState>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn spawn<T>(state: Arc<PlaybackState>, sink: T) -> PlayerResult<Self>
    where
        T: TickSink + Send + 'static,
    {
        let thread_state = Arc::clone(&state);
        let handle = thread::Builder::new()
            .name(String::from("vidplayer-ticker"))
            .spawn(move || run(&thread_state, &sink))
            .map_err(|source| PlayerError::ThreadSpawn {
                name: "ticker",
                source,
            })?;

        Ok(Self {
            state,
            handle: Some(handle),
        })
    }

    /**
        Request exit and wait for the thread to finish.
    */
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.state.request_exit();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("ticker thread panicked");
            }
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run(state: &PlaybackState, sink: &impl TickSink) {
    tracing::debug!(delay = ?state.delay(), "ticker started");
    while !state.exit_requested() {
        if !state.is_paused() && !sink.post(PlayerEvent::Refresh) {
            tracing::debug!("event receiver gone, stopping ticker");
            break;
        }
        state.wait_tick();
    }
    sink.post(PlayerEvent::Stop);
    tracing::debug!("ticker stopped");
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

    use super::*;

    const TICK: Duration = Duration::from_millis(5);
    const PATIENCE: Duration = Duration::from_secs(2);

    fn start() -> (Arc<PlaybackState>, Ticker, Receiver<PlayerEvent>) {
        let state = Arc::new(PlaybackState::new(TICK));
        let (tx, rx) = crossbeam_channel::unbounded();
        let ticker = Ticker::spawn(Arc::clone(&state), tx).unwrap();
        (state, ticker, rx)
    }

    fn drain(rx: &Receiver<PlayerEvent>) {
        while rx.try_recv().is_ok() {}
    }

    #[test]
    fn posts_refresh_ticks() {
        let (_state, _ticker, rx) = start();
        for _ in 0..3 {
            assert_eq!(rx.recv_timeout(PATIENCE), Ok(PlayerEvent::Refresh));
        }
    }

    #[test]
    fn pause_stops_and_resume_restarts_ticks() {
        let (state, _ticker, rx) = start();
        assert_eq!(rx.recv_timeout(PATIENCE), Ok(PlayerEvent::Refresh));

        state.set_paused(true);
        // A tick already in flight may still land; wait it out.
        std::thread::sleep(TICK * 4);
        drain(&rx);
        assert_eq!(
            rx.recv_timeout(TICK * 10),
            Err(RecvTimeoutError::Timeout)
        );

        state.set_paused(false);
        assert_eq!(rx.recv_timeout(PATIENCE), Ok(PlayerEvent::Refresh));
    }

    #[test]
    fn resume_wakes_ticker_before_long_delay_expires() {
        let state = Arc::new(PlaybackState::new(Duration::from_secs(1)));
        state.set_paused(true);
        let (tx, rx) = crossbeam_channel::unbounded();
        let _ticker = Ticker::spawn(Arc::clone(&state), tx).unwrap();

        std::thread::sleep(Duration::from_millis(20));
        let resumed = Instant::now();
        state.set_paused(false);
        assert_eq!(rx.recv_timeout(PATIENCE), Ok(PlayerEvent::Refresh));
        assert!(resumed.elapsed() < Duration::from_millis(500));
    }

    #[test]
    fn exit_posts_stop_and_ends_thread() {
        let (state, ticker, rx) = start();
        state.request_exit();

        let deadline = Instant::now() + PATIENCE;
        loop {
            match rx.recv_deadline(deadline) {
                Ok(PlayerEvent::Stop) => break,
                Ok(PlayerEvent::Refresh) => continue,
                other => panic!("unexpected {other:?}"),
            }
        }
        ticker.stop();
        assert!(rx.try_recv().is_err());
    }

    /// Forwards ticks; `finished` disconnects once the thread drops the sink.
    struct TrackedSink {
        events: Sender<PlayerEvent>,
        _finished: Sender<()>,
    }

    impl TickSink for TrackedSink {
        fn post(&self, event: PlayerEvent) -> bool {
            self.events.post(event)
        }
    }

    #[test]
    fn stops_when_receiver_is_dropped() {
        let state = Arc::new(PlaybackState::new(TICK));
        let (events, rx) = crossbeam_channel::unbounded();
        let (finished, thread_done) = crossbeam_channel::bounded::<()>(0);
        let sink = TrackedSink {
            events,
            _finished: finished,
        };
        let ticker = Ticker::spawn(Arc::clone(&state), sink).unwrap();

        drop(rx);
        assert_eq!(
            thread_done.recv_timeout(PATIENCE),
            Err(RecvTimeoutError::Disconnected)
        );
        assert!(!state.exit_requested());
        ticker.stop();
    }
}
