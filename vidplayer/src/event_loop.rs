/*!
    The player's single-threaded event loop.
*/

use std::time::Duration;

use media_types::Result;

use crate::event::{EventSource, PlayerEvent, VOLUME_STEP};
use crate::state::PlaybackState;

/**
    Result of handling one refresh tick.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A frame was presented; `delay` is its reported display duration.
    Presented { delay: Option<Duration> },
    /// Nothing was presented this tick (pull or conversion failed).
    Skipped,
    /// The stream has no more frames.
    EndOfStream,
}

/**
    Pulls, converts and presents frames on behalf of the event loop.
*/
pub trait RefreshHandler {
    fn refresh(&mut self) -> RefreshOutcome;

    /**
        Seek back to the first frame, for looped playback.
    */
    fn rewind(&mut self) -> Result<()>;

    /**
        Change the output volume by `delta`. Handlers without audio ignore it.
    */
    fn adjust_volume(&mut self, _delta: f32) {}

    /**
        Called after the user toggles pause, with the new value.
    */
    fn set_paused(&mut self, _paused: bool) {}
}

/**
    Why the event loop returned.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopExit {
    /// The user quit.
    Quit,
    /// The ticker stopped after exit was requested (end of stream or rewind failure).
    Stopped,
    /// The event source closed.
    Disconnected,
}

/**
    Counters collected while the loop runs.
*/
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub presented: u64,
    pub skipped: u64,
    pub rewinds: u64,
}

/**
    Run until the user quits or the ticker stops.

    Refresh ticks that arrive while paused or after exit was requested are
    ignored. At end of stream the loop rewinds when `looping` is set, and
    otherwise requests exit and waits for the ticker's final
    [`PlayerEvent::Stop`].
*/
pub fn run_event_loop(
    events: &mut impl EventSource,
    state: &PlaybackState,
    handler: &mut impl RefreshHandler,
    looping: bool,
) -> (LoopExit, LoopStats) {
    let mut stats = LoopStats::default();

    let exit = loop {
        let Some(event) = events.wait_event() else {
            break LoopExit::Disconnected;
        };

        match event {
            PlayerEvent::Refresh => {
                if state.is_paused() || state.exit_requested() {
                    continue;
                }
                match handler.refresh() {
                    RefreshOutcome::Presented { delay } => {
                        stats.presented += 1;
                        if let Some(delay) = delay {
                            state.set_delay(delay);
                        }
                    }
                    RefreshOutcome::Skipped => {
                        stats.skipped += 1;
                    }
                    RefreshOutcome::EndOfStream if looping => match handler.rewind() {
                        Ok(()) => {
                            stats.rewinds += 1;
                            tracing::debug!("end of stream, looping");
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "failed to rewind, stopping playback");
                            state.request_exit();
                        }
                    },
                    RefreshOutcome::EndOfStream => {
                        tracing::info!(frames = stats.presented, "end of stream");
                        state.request_exit();
                    }
                }
            }
            PlayerEvent::TogglePause => {
                let paused = state.toggle_pause();
                tracing::info!(paused, "toggled pause");
                handler.set_paused(paused);
            }
            PlayerEvent::VolumeUp => handler.adjust_volume(VOLUME_STEP),
            PlayerEvent::VolumeDown => handler.adjust_volume(-VOLUME_STEP),
            PlayerEvent::Quit => {
                state.request_exit();
                break LoopExit::Quit;
            }
            PlayerEvent::Stop => break LoopExit::Stopped,
        }
    };

    tracing::debug!(?exit, ?stats, "event loop finished");
    (exit, stats)
}
