/*!
    Stream parameters exposed to consumers of a decoding session.
*/

use std::time::Duration;

use ffmpeg_next::{self as ffmpeg, codec, format, frame};

use media_types::{MediaDuration, Rational};

/**
    Parameters of the selected video stream, taken from the opened decoder.
*/
#[derive(Clone)]
pub struct VideoParams {
    pub stream_index: usize,
    pub width: u32,
    pub height: u32,
    pub format: format::Pixel,
    pub time_base: Option<Rational>,
    pub frame_rate: Option<Rational>,
    /// Frame count reported by the container, zero when unknown.
    pub frame_count: i64,
    pub codec_name: String,
    /// Codec parameters of the stream, used by stream-copy exports.
    pub parameters: codec::Parameters,
}

impl VideoParams {
    /**
        Display duration of a decoded frame of this stream.

        Uses the duration carried by the frame, falling back to the stream's
        average frame rate. Returns `None` when neither is usable.
    */
    pub fn frame_duration(&self, frame: &frame::Video) -> Option<Duration> {
        // SAFETY: reading a plain integer field of a valid frame.
        let ticks = unsafe { (*frame.as_ptr()).duration };
        frame_duration(MediaDuration(ticks), self.time_base, self.frame_rate)
    }
}

impl std::fmt::Debug for VideoParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoParams")
            .field("stream_index", &self.stream_index)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("format", &self.format)
            .field("time_base", &self.time_base)
            .field("frame_rate", &self.frame_rate)
            .field("frame_count", &self.frame_count)
            .field("codec_name", &self.codec_name)
            .finish_non_exhaustive()
    }
}

/**
    Parameters of the selected audio stream, taken from the opened decoder.
*/
#[derive(Clone, Debug)]
pub struct AudioParams {
    pub stream_index: usize,
    pub format: format::Sample,
    pub channel_layout: ffmpeg::ChannelLayout,
    pub channels: u16,
    pub rate: u32,
    /// Samples per frame, zero for codecs with variable frame size.
    pub frame_size: u32,
    pub time_base: Option<Rational>,
}

/**
    Resolve how long a frame should stay on screen.

    A positive `duration` in `time_base` units wins; otherwise the interval
    implied by `frame_rate` is used.
*/
pub fn frame_duration(
    duration: MediaDuration,
    time_base: Option<Rational>,
    frame_rate: Option<Rational>,
) -> Option<Duration> {
    if !duration.is_unknown() {
        if let Some(tb) = time_base {
            let d = duration.to_duration(tb);
            if !d.is_zero() {
                return Some(d);
            }
        }
    }
    frame_rate.and_then(Rational::frame_interval)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uses_frame_duration_when_known() {
        let d = frame_duration(
            MediaDuration(3600),
            Some(Rational::new(1, 90000)),
            Some(Rational::new(30, 1)),
        );
        assert_eq!(d, Some(Duration::from_millis(40)));
    }

    #[test]
    fn falls_back_to_frame_rate() {
        let d = frame_duration(
            MediaDuration(0),
            Some(Rational::new(1, 90000)),
            Some(Rational::new(25, 1)),
        );
        assert_eq!(d, Some(Duration::from_millis(40)));

        let d = frame_duration(MediaDuration(512), None, Some(Rational::new(50, 1)));
        assert_eq!(d, Some(Duration::from_millis(20)));
    }

    #[test]
    fn unknown_everything() {
        assert_eq!(frame_duration(MediaDuration(-1), None, None), None);
        assert_eq!(
            frame_duration(MediaDuration(0), None, Some(Rational::new(0, 1))),
            None
        );
    }
}
