/*!
    Frame conversion for the vidplayer media crates.

    This crate converts decoded frames into the fixed formats downstream
    consumers need:
    - **Video**: pixel format conversion into a tightly packed buffer
      (YUV 4:2:0 for display and raw dumps, RGB for images)
    - **Audio**: resampling, channel layout and sample format conversion
      into interleaved playback samples

    Decoders output frames in whatever format the codec specifies; this
    crate is the adapter layer between them and the outputs.

    # Video

    ```ignore
    use media_transform::{ScalingAlgorithm, VideoConverter};
    use media_types::PixelFormat;

    let params = decoder.video();
    let mut converter = VideoConverter::new(
        params.format,
        params.width,
        params.height,
        PixelFormat::Yuv420p,
        ScalingAlgorithm::default(),
    )?;

    while let Some(frame) = decoder.next_video_frame()? {
        let picture = converter.convert(frame)?;
        // Same length on every call
    }
    ```

    # Audio

    ```ignore
    use media_transform::{AudioResampler, AudioSpec};
    use media_types::{ChannelLayout, SampleFormat};

    let target = AudioSpec::packed(SampleFormat::F32, ChannelLayout::Stereo, 48000);
    let mut resampler = AudioResampler::new(source, target, frame_size)?;
    let samples = resampler.resample(&frame)?;
    ```

    # Fixed Buffers

    Both converters allocate their output buffer once, from the source
    parameters and target format they were created with. The target format
    cannot change for the lifetime of a converter.

    Video conversion is stateless: each frame converts independently.
    Audio resampling is stateful: the resampler keeps filter history, so
    frames should be fed in order.
*/

pub use media_types::{ChannelLayout, Error, PixelFormat, PlaneLayout, Result, SampleFormat};

mod audio;
mod format;
mod video;

pub use audio::{AudioResampler, AudioSpec, output_capacity};
pub use format::{layout_to_ffmpeg, pixel_to_ffmpeg, sample_to_ffmpeg};
pub use video::{ScalingAlgorithm, VideoConverter};
