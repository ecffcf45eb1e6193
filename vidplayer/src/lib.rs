/*!
    SDL2 video player built on the media crates.

    A [`Player`] owns a [`MediaDecoder`](media_decode::MediaDecoder), an SDL
    window and, when the file has audio, a cpal output stream. Three threads
    take part in playback:

    - The calling thread runs the event loop: it blocks on SDL events,
      pulls frames on refresh ticks and talks to the display.
    - A ticker thread posts refresh ticks at an interval taken from the
      duration of the last presented frame.
    - The audio device's callback thread drains the single-slot
      [`AudioHandoff`](audio::AudioHandoff).

    The event loop itself is independent of SDL (see [`run_event_loop`]),
    so it can be driven by any [`EventSource`].
*/

pub mod audio;
mod config;
mod display;
mod error;
mod event;
mod event_loop;
mod input;
mod player;
mod presenter;
mod state;
mod ticker;

pub use config::{DEFAULT_DELAY_MS, PlayerConfig};
pub use display::{SdlDisplay, SdlPresenter, display_size};
pub use error::{PlayerError, PlayerResult};
pub use event::{EventSource, PlayerEvent, TickSink, VOLUME_STEP};
pub use event_loop::{LoopExit, LoopStats, RefreshHandler, RefreshOutcome, run_event_loop};
pub use input::{SdlEvents, SdlTickSink};
pub use player::{Player, PlayerState};
pub use presenter::{AudioSink, FramePresenter};
pub use state::{MAX_DELAY_MS, PlaybackState};
pub use ticker::Ticker;
