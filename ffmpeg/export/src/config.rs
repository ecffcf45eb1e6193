/*!
    Export configuration types.
*/

use std::path::{Path, PathBuf};

/**
    Configuration for exporting a JPEG image sequence.
*/
#[derive(Clone, Debug)]
pub struct JpegExportConfig {
    /// Directory the images are written to (created if missing).
    pub dir: PathBuf,
    /// Write one image every this many decoded frames, starting with the first.
    pub every: u64,
    /// JPEG quality, 1-100.
    pub quality: u8,
    /// File name prefix, images are named `{prefix}_{frame}.jpg`.
    pub prefix: String,
}

impl JpegExportConfig {
    pub const DEFAULT_EVERY: u64 = 100;
    pub const DEFAULT_QUALITY: u8 = 80;

    /**
        Create a config writing to `dir` with default interval and quality.
    */
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            every: Self::DEFAULT_EVERY,
            quality: Self::DEFAULT_QUALITY,
            prefix: String::from("frame"),
        }
    }

    /**
        Set the frame interval. Zero is treated as one.
    */
    pub fn with_every(mut self, every: u64) -> Self {
        self.every = every.max(1);
        self
    }

    /**
        Set the JPEG quality, clamped to 1-100.
    */
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality.clamp(1, 100);
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /**
        Returns true if the frame with zero-based `index` should be written.
    */
    pub fn selects(&self, index: u64) -> bool {
        index % self.every.max(1) == 0
    }

    /**
        Path of the image for the frame with zero-based `index`.
    */
    pub fn image_path(&self, index: u64) -> PathBuf {
        self.dir.join(format!("{}_{index}.jpg", self.prefix))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/**
    Counters reported by an export run.
*/
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Video frames decoded (or packets copied, for stream copy).
    pub frames_read: u64,
    /// Frames or packets written to the output.
    pub frames_written: u64,
    /// Frames skipped because they failed to convert or encode.
    pub frames_skipped: u64,
    /// Bytes written to the output.
    pub bytes_written: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = JpegExportConfig::new("/tmp/out");
        assert_eq!(config.every, 100);
        assert_eq!(config.quality, 80);
        assert_eq!(config.image_path(200), PathBuf::from("/tmp/out/frame_200.jpg"));
    }

    #[test]
    fn selects_every_nth_frame_from_first() {
        let config = JpegExportConfig::new("out").with_every(100);
        let selected: Vec<u64> = (0..350).filter(|&i| config.selects(i)).collect();
        assert_eq!(selected, vec![0, 100, 200, 300]);
    }

    #[test]
    fn builder_clamps() {
        let config = JpegExportConfig::new("out")
            .with_every(0)
            .with_quality(0)
            .with_prefix("demo");
        assert_eq!(config.every, 1);
        assert_eq!(config.quality, 1);
        assert!(config.selects(7));
        assert_eq!(config.image_path(3), PathBuf::from("out/demo_3.jpg"));
        assert_eq!(JpegExportConfig::new("out").with_quality(255).quality, 100);
    }
}
