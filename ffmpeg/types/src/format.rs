/*!
    Conversion target formats and packed buffer layout.
*/

use std::ops::Range;

/**
    Pixel formats the converters can produce.

    Decoders may hand out any format; only targets are listed here.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// Planar Y, U, V with 2x2 chroma subsampling. Display upload and raw dumps.
    Yuv420p,
    /// Interleaved R, G, B bytes. Image export.
    Rgb24,
    /// Interleaved B, G, R, A bytes.
    Bgra,
}

/**
    Where one plane sits inside a packed picture: rows of `row_bytes`
    with no padding, starting at `offset`.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaneLayout {
    pub offset: usize,
    pub row_bytes: usize,
    pub rows: usize,
}

impl PlaneLayout {
    pub const fn len(&self) -> usize {
        self.row_bytes * self.rows
    }

    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub const fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.len()
    }
}

impl PixelFormat {
    /**
        Plane layouts of a `width`x`height` picture, in plane order.
        Odd sizes round chroma up, as FFmpeg does with alignment 1.
    */
    pub fn planes(self, width: u32, height: u32) -> Vec<PlaneLayout> {
        let (w, h) = (width as usize, height as usize);
        let (cw, ch) = (w.div_ceil(2), h.div_ceil(2));

        let shape: &[(usize, usize)] = match self {
            Self::Yuv420p => &[(w, h), (cw, ch), (cw, ch)],
            Self::Rgb24 => &[(w * 3, h)],
            Self::Bgra => &[(w * 4, h)],
        };

        let mut offset = 0;
        shape
            .iter()
            .map(|&(row_bytes, rows)| {
                let plane = PlaneLayout {
                    offset,
                    row_bytes,
                    rows,
                };
                offset += plane.len();
                plane
            })
            .collect()
    }

    /**
        Bytes in a packed `width`x`height` picture
        (`av_image_get_buffer_size` with alignment 1).
    */
    pub fn buffer_size(self, width: u32, height: u32) -> usize {
        self.planes(width, height).iter().map(PlaneLayout::len).sum()
    }
}

/**
    Interleaved sample formats for audio output.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SampleFormat {
    /// 32-bit float in [-1.0, 1.0], what audio devices take natively
    F32,
    S16,
    S32,
    U8,
}

impl SampleFormat {
    pub const fn bytes_per_sample(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::S16 => 2,
            Self::S32 | Self::F32 => 4,
        }
    }
}

/**
    Output channel layouts.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChannelLayout {
    Mono,
    Stereo,
}

impl ChannelLayout {
    pub const fn channels(self) -> u16 {
        match self {
            Self::Mono => 1,
            Self::Stereo => 2,
        }
    }

    /**
        Layout used to drive a device with `channels` outputs; anything
        wider than stereo gets stereo.
    */
    pub const fn for_channels(channels: u16) -> Self {
        if channels <= 1 { Self::Mono } else { Self::Stereo }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yuv420p_1080p() {
        let planes = PixelFormat::Yuv420p.planes(1920, 1080);
        assert_eq!(planes.len(), 3);
        assert_eq!(
            planes[0],
            PlaneLayout {
                offset: 0,
                row_bytes: 1920,
                rows: 1080
            }
        );
        assert_eq!(planes[1].offset, 1920 * 1080);
        assert_eq!(planes[1].row_bytes, 960);
        assert_eq!(planes[2].offset, 1920 * 1080 + 960 * 540);
        assert_eq!(planes[2].range().end, 1920 * 1080 * 3 / 2);
    }

    #[test]
    fn odd_sizes_round_chroma_up() {
        // 5x3: 15 luma bytes, two 3x2 chroma planes
        assert_eq!(PixelFormat::Yuv420p.buffer_size(5, 3), 15 + 6 + 6);
    }

    #[test]
    fn packed_formats_have_one_plane() {
        assert_eq!(PixelFormat::Rgb24.planes(640, 480).len(), 1);
        assert_eq!(PixelFormat::Rgb24.buffer_size(640, 480), 640 * 480 * 3);
        assert_eq!(PixelFormat::Bgra.buffer_size(640, 480), 640 * 480 * 4);
    }

    #[test]
    fn empty_plane() {
        let plane = PixelFormat::Yuv420p.planes(0, 0)[1];
        assert!(plane.is_empty());
        assert_eq!(plane.range(), 0..0);
    }

    #[test]
    fn sample_sizes() {
        assert_eq!(SampleFormat::U8.bytes_per_sample(), 1);
        assert_eq!(SampleFormat::S16.bytes_per_sample(), 2);
        assert_eq!(SampleFormat::F32.bytes_per_sample(), 4);
    }

    #[test]
    fn device_layouts() {
        assert_eq!(ChannelLayout::for_channels(1), ChannelLayout::Mono);
        assert_eq!(ChannelLayout::for_channels(2), ChannelLayout::Stereo);
        assert_eq!(ChannelLayout::for_channels(6), ChannelLayout::Stereo);
        assert_eq!(ChannelLayout::Stereo.channels(), 2);
    }
}
