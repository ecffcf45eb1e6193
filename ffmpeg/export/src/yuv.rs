/*!
    Raw planar YUV 4:2:0 dump.
*/

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use media_decode::MediaDecoder;
use media_transform::{ScalingAlgorithm, VideoConverter};
use media_types::{PixelFormat, Result};

use crate::config::ExportSummary;

/**
    Decode the whole video stream from the start and write every frame to
    `path` as raw planar YUV 4:2:0: the Y plane, then U, then V, with no
    header and no row padding. Existing files are truncated.

    Frames that fail to convert are logged and skipped.
*/
pub fn export_yuv420(decoder: &mut MediaDecoder, path: &Path) -> Result<ExportSummary> {
    decoder.rewind()?;

    let params = decoder.video().clone();
    let mut converter = VideoConverter::new(
        params.format,
        params.width,
        params.height,
        PixelFormat::Yuv420p,
        ScalingAlgorithm::Point,
    )?;

    let mut out = BufWriter::new(File::create(path)?);
    let mut summary = ExportSummary::default();

    while let Some(frame) = decoder.next_video_frame()? {
        summary.frames_read += 1;
        match converter.convert(frame) {
            Ok(picture) => {
                out.write_all(picture)?;
                summary.frames_written += 1;
                summary.bytes_written += picture.len() as u64;
            }
            Err(e) => {
                tracing::warn!(frame = summary.frames_read - 1, error = %e, "skipping frame");
                summary.frames_skipped += 1;
            }
        }
    }
    out.flush()?;

    tracing::info!(
        path = %path.display(),
        width = params.width,
        height = params.height,
        frames = summary.frames_written,
        bytes = summary.bytes_written,
        "yuv export finished"
    );
    Ok(summary)
}
