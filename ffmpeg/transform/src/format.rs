/*!
    Mapping between the media vocabulary and FFmpeg's format types.
*/

use ffmpeg_next::{self as ffmpeg, format};

use media_types::{ChannelLayout, PixelFormat, SampleFormat};

/**
    FFmpeg pixel format for a conversion target.
*/
pub fn pixel_to_ffmpeg(format: PixelFormat) -> format::Pixel {
    match format {
        PixelFormat::Yuv420p => format::Pixel::YUV420P,
        PixelFormat::Rgb24 => format::Pixel::RGB24,
        PixelFormat::Bgra => format::Pixel::BGRA,
    }
}

/**
    FFmpeg sample format for an interleaved conversion target.
*/
pub fn sample_to_ffmpeg(format: SampleFormat) -> format::Sample {
    use format::sample::Type::Packed;

    match format {
        SampleFormat::F32 => format::Sample::F32(Packed),
        SampleFormat::S16 => format::Sample::I16(Packed),
        SampleFormat::S32 => format::Sample::I32(Packed),
        SampleFormat::U8 => format::Sample::U8(Packed),
    }
}

pub fn layout_to_ffmpeg(layout: ChannelLayout) -> ffmpeg::ChannelLayout {
    match layout {
        ChannelLayout::Mono => ffmpeg::ChannelLayout::MONO,
        ChannelLayout::Stereo => ffmpeg::ChannelLayout::STEREO,
    }
}
