/*!
    Frame and stream export for the vidplayer media crates.

    Every export starts by rewinding the decoder, then walks the whole
    video stream once:

    - [`export_jpeg`]: every Nth decoded frame as a JPEG image
    - [`export_yuv420`]: every decoded frame as raw planar YUV 4:2:0
    - [`export_stream_copy`]: the compressed video packets, copied into
      a new container without re-encoding

    # Example

    ```ignore
    use media_decode::{DecoderConfig, MediaDecoder};
    use media_export::{JpegExportConfig, export_jpeg};

    let mut decoder = MediaDecoder::open("video.mp4", &DecoderConfig::new())?;
    let config = JpegExportConfig::new("frames").with_every(100).with_quality(80);
    let summary = export_jpeg(&mut decoder, &config)?;
    println!("wrote {} images", summary.frames_written);
    ```

    Per-frame failures are logged and counted in [`ExportSummary`];
    failures to rewind, create outputs or write to them abort the export.
*/

pub use media_types::{Error, Result};

mod config;
mod jpeg;
mod remux;
mod yuv;

pub use config::{ExportSummary, JpegExportConfig};
pub use jpeg::{export_jpeg, write_jpeg};
pub use remux::export_stream_copy;
pub use yuv::export_yuv420;
