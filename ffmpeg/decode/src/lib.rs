/*!
    Media decoding for the vidplayer crates.

    This crate opens a container, selects its best video stream (and
    optionally its best audio stream) and turns encoded packets into raw
    frames on demand.

    # Example

    ```ignore
    use media_decode::{DecoderConfig, MediaDecoder, Pulled};

    let config = DecoderConfig::new().with_audio(true);
    let mut decoder = MediaDecoder::open("video.mp4", &config)?;

    while let Some(frame) = decoder.next_frame()? {
        match frame {
            Pulled::Video(video) => { /* convert and present */ }
            Pulled::Audio(audio) => { /* resample and play */ }
        }
    }

    // Start over from the first frame
    decoder.rewind()?;
    ```

    Corrupt packets are logged and skipped; only failures to read the
    container end the stream early.
*/

pub use media_types::{Error, Result, StreamKind};

mod config;
mod decoder;
mod params;
mod pump;
mod session;
mod source;

pub use config::DecoderConfig;
pub use decoder::{AudioStreamDecoder, VideoStreamDecoder};
pub use params::{AudioParams, VideoParams, frame_duration};
pub use pump::{FrameDecoder, FramePump, PacketSource, Pulled, Receive, Submit};
pub use session::{MediaDecoder, PulledFrame};
pub use source::{InputSource, StreamDesc};

pub use ffmpeg_next as ffmpeg;
