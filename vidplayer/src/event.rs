/*!
    Player events and the seams they travel through.
*/

use crossbeam_channel::{Receiver, Sender};

/// Change in volume applied by one volume key press.
pub const VOLUME_STEP: f32 = 0.1;

/**
    Events consumed by the player's event loop.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerEvent {
    /// Time to present the next frame (posted by the ticker).
    Refresh,
    /// The ticker has stopped; the loop should end.
    Stop,
    /// Pause or resume playback.
    TogglePause,
    /// The user asked to close the player.
    Quit,
    VolumeUp,
    VolumeDown,
}

/**
    Where the event loop reads events from.
*/
pub trait EventSource {
    /**
        Block until the next event. `None` means no more events will arrive.
    */
    fn wait_event(&mut self) -> Option<PlayerEvent>;
}

/**
    Where the ticker thread posts events to.
*/
pub trait TickSink {
    /**
        Post an event. Returns false if the receiving side is gone.
    */
    fn post(&self, event: PlayerEvent) -> bool;
}

impl EventSource for Receiver<PlayerEvent> {
    fn wait_event(&mut self) -> Option<PlayerEvent> {
        self.recv().ok()
    }
}

impl TickSink for Sender<PlayerEvent> {
    fn post(&self, event: PlayerEvent) -> bool {
        self.send(event).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_round_trip() {
        let (tx, mut rx) = crossbeam_channel::unbounded();
        assert!(tx.post(PlayerEvent::Refresh));
        assert!(tx.post(PlayerEvent::Stop));
        drop(tx);

        assert_eq!(rx.wait_event(), Some(PlayerEvent::Refresh));
        assert_eq!(rx.wait_event(), Some(PlayerEvent::Stop));
        assert_eq!(rx.wait_event(), None);
    }

    #[test]
    fn post_fails_without_receiver() {
        let (tx, rx) = crossbeam_channel::unbounded::<PlayerEvent>();
        drop(rx);
        assert!(!tx.post(PlayerEvent::Refresh));
    }
}
