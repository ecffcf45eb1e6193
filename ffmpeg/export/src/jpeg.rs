/*!
    JPEG image sequence export.
*/

use std::fs;
use std::io::BufWriter;
use std::path::Path;

use image::{ExtendedColorType, ImageEncoder, codecs::jpeg::JpegEncoder};

use media_decode::MediaDecoder;
use media_transform::{ScalingAlgorithm, VideoConverter};
use media_types::{Error, PixelFormat, Result};

use crate::config::{ExportSummary, JpegExportConfig};

/**
    Decode the whole video stream from the start and write every
    `config.every`-th frame as a JPEG image.

    Frames that fail to convert or encode are logged and skipped.
*/
pub fn export_jpeg(decoder: &mut MediaDecoder, config: &JpegExportConfig) -> Result<ExportSummary> {
    decoder.rewind()?;
    fs::create_dir_all(config.dir())?;

    let params = decoder.video().clone();
    let mut converter = VideoConverter::new(
        params.format,
        params.width,
        params.height,
        PixelFormat::Rgb24,
        ScalingAlgorithm::Bicubic,
    )?;

    let mut summary = ExportSummary::default();
    while let Some(frame) = decoder.next_video_frame()? {
        let index = summary.frames_read;
        summary.frames_read += 1;
        if !config.selects(index) {
            continue;
        }

        let rgb = match converter.convert(frame) {
            Ok(rgb) => rgb,
            Err(e) => {
                tracing::warn!(frame = index, error = %e, "skipping frame");
                summary.frames_skipped += 1;
                continue;
            }
        };

        let path = config.image_path(index);
        match write_jpeg(&path, rgb, params.width, params.height, config.quality) {
            Ok(bytes) => {
                tracing::debug!(frame = index, path = %path.display(), bytes, "wrote image");
                summary.frames_written += 1;
                summary.bytes_written += bytes;
            }
            Err(e) => {
                tracing::warn!(frame = index, path = %path.display(), error = %e, "failed to write image");
                summary.frames_skipped += 1;
            }
        }
    }

    tracing::info!(
        dir = %config.dir().display(),
        frames = summary.frames_read,
        images = summary.frames_written,
        skipped = summary.frames_skipped,
        "jpeg export finished"
    );
    Ok(summary)
}

/**
    Encode a packed RGB24 picture to `path`. Returns the file size.
*/
pub fn write_jpeg(path: &Path, rgb: &[u8], width: u32, height: u32, quality: u8) -> Result<u64> {
    let expected = PixelFormat::Rgb24.buffer_size(width, height);
    if rgb.len() != expected {
        return Err(Error::export(format!(
            "picture is {} bytes, expected {expected} for {width}x{height}",
            rgb.len()
        )));
    }

    let file = fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    JpegEncoder::new_with_quality(&mut writer, quality)
        .write_image(rgb, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| Error::export(format!("failed to encode {}: {e}", path.display())))?;

    let file = writer
        .into_inner()
        .map_err(|e| Error::Io(e.into_error()))?;
    Ok(file.metadata()?.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkerboard(width: u32, height: u32) -> Vec<u8> {
        let mut rgb = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = if (x / 8 + y / 8) % 2 == 0 { 255 } else { 0 };
                rgb.extend_from_slice(&[v, v / 2, 255 - v]);
            }
        }
        rgb
    }

    #[test]
    fn writes_decodable_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame_0.jpg");

        let bytes = write_jpeg(&path, &checkerboard(64, 32), 64, 32, 80).unwrap();
        assert!(bytes > 0);

        let data = fs::read(&path).unwrap();
        assert_eq!(&data[..2], &[0xFF, 0xD8]);
        assert_eq!(data.len() as u64, bytes);
    }

    #[test]
    fn rejects_wrong_buffer_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.jpg");

        let err = write_jpeg(&path, &[0u8; 10], 64, 32, 80).unwrap_err();
        assert!(matches!(err, Error::Export { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("frame_0.jpg");

        let err = write_jpeg(&path, &checkerboard(8, 8), 8, 8, 80).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
