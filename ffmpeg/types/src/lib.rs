/*!
    Shared vocabulary for the vidplayer media crates.

    Everything here crosses a crate boundary between the decoder, the
    converters, the exporters and the player. Nothing links FFmpeg, so
    buffer sizing, time-base math and the error taxonomy are testable
    without native libraries.

    - [`Error`] / [`Result`]: failures of every pipeline stage
    - [`PixelFormat`] / [`PlaneLayout`]: packed picture layout
    - [`SampleFormat`] / [`ChannelLayout`]: playback audio formats
    - [`Rational`] / [`MediaDuration`]: time bases, frame rates, frame durations
    - [`StreamKind`]: video or audio
*/

mod error;
mod format;
mod rational;
mod stream;
mod timestamp;

pub use error::{Error, Result};
pub use format::{ChannelLayout, PixelFormat, PlaneLayout, SampleFormat};
pub use rational::Rational;
pub use stream::StreamKind;
pub use timestamp::MediaDuration;
