/*!
    Video pixel format conversion.
*/

use ffmpeg_next::{format, frame, software::scaling};

use media_types::{Error, PixelFormat, PlaneLayout, Result};

use crate::format::pixel_to_ffmpeg;

/**
    Scaling algorithm used by swscale.
*/
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScalingAlgorithm {
    /// Nearest neighbor (fastest, lowest quality)
    Point,
    /// Fast bilinear
    FastBilinear,
    /// Bilinear
    Bilinear,
    /// Bicubic (good quality)
    #[default]
    Bicubic,
    /// Area averaging
    Area,
    /// Lanczos (best quality, slowest)
    Lanczos,
}

impl ScalingAlgorithm {
    fn flags(self) -> scaling::Flags {
        match self {
            Self::Point => scaling::Flags::POINT,
            Self::FastBilinear => scaling::Flags::FAST_BILINEAR,
            Self::Bilinear => scaling::Flags::BILINEAR,
            Self::Bicubic => scaling::Flags::BICUBIC,
            Self::Area => scaling::Flags::AREA,
            Self::Lanczos => scaling::Flags::LANCZOS,
        }
    }
}

/**
    Converts decoded pictures of one source format and size into a fixed
    target pixel format.

    The output buffer is allocated once, tightly packed (no row padding),
    and every successful [`convert`](Self::convert) fills it completely, so
    the returned slice always has the same length.
*/
pub struct VideoConverter {
    scaler: scaling::Context,
    scaled: frame::Video,
    buffer: Vec<u8>,
    planes: Vec<PlaneLayout>,
    target: PixelFormat,
    width: u32,
    height: u32,
}

impl VideoConverter {
    /**
        Create a converter from `source` at `width`x`height` to `target`
        at the same size.
    */
    pub fn new(
        source: format::Pixel,
        width: u32,
        height: u32,
        target: PixelFormat,
        algorithm: ScalingAlgorithm,
    ) -> Result<Self> {
        Self::scaled(source, (width, height), target, (width, height), algorithm)
    }

    /**
        Create a converter from `source` pictures of `input` size to
        `target` pictures of `output` size.
    */
    pub fn scaled(
        source: format::Pixel,
        input: (u32, u32),
        target: PixelFormat,
        output: (u32, u32),
        algorithm: ScalingAlgorithm,
    ) -> Result<Self> {
        let (src_width, src_height) = input;
        let (width, height) = output;
        if src_width == 0 || src_height == 0 || width == 0 || height == 0 {
            return Err(Error::conversion(format!(
                "invalid picture size {src_width}x{src_height} -> {width}x{height}"
            )));
        }

        let target_pixel = pixel_to_ffmpeg(target);
        let scaler = scaling::Context::get(
            source,
            src_width,
            src_height,
            target_pixel,
            width,
            height,
            algorithm.flags(),
        )
        .map_err(|e| Error::conversion(format!("failed to create scaler: {e}")))?;

        let planes = target.planes(width, height);
        let buffer = vec![0u8; target.buffer_size(width, height)];

        tracing::debug!(
            ?source,
            ?target,
            src_width,
            src_height,
            width,
            height,
            ?algorithm,
            bytes = buffer.len(),
            "created video converter"
        );

        Ok(Self {
            scaler,
            scaled: frame::Video::new(target_pixel, width, height),
            buffer,
            planes,
            target,
            width,
            height,
        })
    }

    /**
        Convert one frame and return the packed picture.

        Fails if the frame does not match the source format and size the
        converter was created for, or if swscale rejects it.
    */
    pub fn convert(&mut self, frame: &frame::Video) -> Result<&[u8]> {
        self.scaler
            .run(frame, &mut self.scaled)
            .map_err(|e| Error::conversion(format!("scaling failed: {e}")))?;

        for (index, plane) in self.planes.iter().enumerate() {
            let stride = self.scaled.stride(index);
            let data = self.scaled.data(index);
            let dst = &mut self.buffer[plane.range()];

            for (row, out) in dst.chunks_exact_mut(plane.row_bytes).enumerate() {
                let start = row * stride;
                let src = data.get(start..start + plane.row_bytes).ok_or_else(|| {
                    Error::conversion(format!("plane {index} is shorter than expected"))
                })?;
                out.copy_from_slice(src);
            }
        }

        Ok(&self.buffer)
    }

    /**
        Layout of each plane inside the buffer returned by [`convert`](Self::convert).
    */
    pub fn planes(&self) -> &[PlaneLayout] {
        &self.planes
    }

    pub fn target(&self) -> PixelFormat {
        self.target
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /**
        Length of every converted picture in bytes.
    */
    pub fn output_len(&self) -> usize {
        self.buffer.len()
    }
}

impl std::fmt::Debug for VideoConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoConverter")
            .field("target", &self.target)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("output_len", &self.buffer.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32, seed: u8) -> frame::Video {
        let mut frame = frame::Video::new(format::Pixel::YUV420P, width, height);
        for plane in 0..3 {
            let stride = frame.stride(plane);
            for (i, byte) in frame.data_mut(plane).iter_mut().enumerate() {
                *byte = ((i % stride) as u8).wrapping_add(seed);
            }
        }
        frame
    }

    #[test]
    fn output_length_is_constant() {
        for target in [PixelFormat::Yuv420p, PixelFormat::Rgb24, PixelFormat::Bgra] {
            let mut converter = VideoConverter::new(
                format::Pixel::YUV420P,
                64,
                48,
                target,
                ScalingAlgorithm::default(),
            )
            .unwrap();

            for seed in 0..5 {
                let len = converter.convert(&gradient(64, 48, seed)).unwrap().len();
                assert_eq!(len, target.buffer_size(64, 48));
            }
        }
    }

    #[test]
    fn yuv_passthrough_keeps_luma() {
        let source = gradient(32, 16, 7);
        let mut converter = VideoConverter::new(
            format::Pixel::YUV420P,
            32,
            16,
            PixelFormat::Yuv420p,
            ScalingAlgorithm::Point,
        )
        .unwrap();

        let out = converter.convert(&source).unwrap();
        let luma = &out[PixelFormat::Yuv420p.planes(32, 16)[0].range()];
        let stride = source.stride(0);
        for (row, chunk) in luma.chunks_exact(32).enumerate() {
            assert_eq!(chunk, &source.data(0)[row * stride..row * stride + 32]);
        }
    }

    #[test]
    fn mismatched_frame_is_an_error() {
        let mut converter = VideoConverter::new(
            format::Pixel::YUV420P,
            64,
            48,
            PixelFormat::Rgb24,
            ScalingAlgorithm::Bilinear,
        )
        .unwrap();

        let err = converter.convert(&gradient(32, 32, 0)).unwrap_err();
        assert!(matches!(err, Error::Conversion { .. }));
    }

    #[test]
    fn scaled_output_uses_target_size() {
        let mut converter = VideoConverter::scaled(
            format::Pixel::YUV420P,
            (64, 48),
            PixelFormat::Yuv420p,
            (32, 24),
            ScalingAlgorithm::Area,
        )
        .unwrap();

        assert_eq!((converter.width(), converter.height()), (32, 24));
        let len = converter.convert(&gradient(64, 48, 3)).unwrap().len();
        assert_eq!(len, PixelFormat::Yuv420p.buffer_size(32, 24));
    }

    #[test]
    fn zero_size_is_rejected() {
        let result = VideoConverter::new(
            format::Pixel::YUV420P,
            0,
            48,
            PixelFormat::Rgb24,
            ScalingAlgorithm::default(),
        );
        assert!(result.is_err());
    }
}
