/*!
    Audio resampling.
*/

use ffmpeg_next::{self as ffmpeg, format, frame, software::resampling};

use media_types::{ChannelLayout, Error, Result, SampleFormat};

use crate::format::{layout_to_ffmpeg, sample_to_ffmpeg};

/// Samples per frame assumed for codecs that do not report a fixed frame size.
const FALLBACK_FRAME_SIZE: usize = 8192;

/**
    Format, layout and rate of an audio stream.
*/
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AudioSpec {
    pub format: format::Sample,
    pub channel_layout: ffmpeg::ChannelLayout,
    pub channels: u16,
    pub rate: u32,
}

impl AudioSpec {
    /**
        An interleaved playback format, e.g. stereo f32 at the device rate.
    */
    pub fn packed(format: SampleFormat, layout: ChannelLayout, rate: u32) -> Self {
        Self {
            format: sample_to_ffmpeg(format),
            channel_layout: layout_to_ffmpeg(layout),
            channels: layout.channels(),
            rate,
        }
    }

    /**
        Bytes of one interleaved sample frame (all channels).
    */
    pub fn bytes_per_frame(&self) -> usize {
        self.format.bytes() * self.channels as usize
    }
}

/**
    Number of output samples that must fit for one input frame of
    `frame_size` samples, including headroom for samples the resampler
    carries over between calls.
*/
pub fn output_capacity(frame_size: usize, source_rate: u32, target_rate: u32) -> usize {
    let frame_size = if frame_size == 0 {
        FALLBACK_FRAME_SIZE
    } else {
        frame_size
    };
    if source_rate == 0 {
        return frame_size * 2;
    }
    scaled_samples(frame_size, source_rate, target_rate) * 2 + 256
}

fn scaled_samples(samples: usize, source_rate: u32, target_rate: u32) -> usize {
    if source_rate == 0 {
        return samples;
    }
    (samples as u64 * target_rate as u64).div_ceil(source_rate as u64) as usize
}

/**
    Resamples decoded audio frames into a fixed interleaved target format.

    The output frame and buffer are sized once at construction. A frame whose
    converted size would exceed them is rejected rather than growing either.
*/
pub struct AudioResampler {
    context: resampling::Context,
    source: AudioSpec,
    target: AudioSpec,
    output: frame::Audio,
    samples: usize,
    buffer: Vec<u8>,
}

impl AudioResampler {
    /**
        Create a resampler from `source` to `target`.

        `frame_size` is the stream's samples per frame; zero means unknown.
    */
    pub fn new(source: AudioSpec, target: AudioSpec, frame_size: usize) -> Result<Self> {
        let context = resampling::Context::get(
            source.format,
            source.channel_layout,
            source.rate,
            target.format,
            target.channel_layout,
            target.rate,
        )
        .map_err(|e| Error::conversion(format!("failed to create resampler: {e}")))?;

        let samples = output_capacity(frame_size, source.rate, target.rate);
        let mut output = frame::Audio::new(target.format, samples, target.channel_layout);
        output.set_rate(target.rate);
        let buffer = vec![0u8; samples * target.bytes_per_frame()];

        tracing::debug!(
            source_format = ?source.format,
            source_rate = source.rate,
            source_channels = source.channels,
            target_format = ?target.format,
            target_rate = target.rate,
            target_channels = target.channels,
            bytes = buffer.len(),
            "created audio resampler"
        );

        Ok(Self {
            context,
            source,
            target,
            output,
            samples,
            buffer,
        })
    }

    /**
        Resample one frame and return the interleaved bytes written.

        The returned slice may be empty while the resampler primes its
        filter.
    */
    pub fn resample(&mut self, frame: &frame::Audio) -> Result<&[u8]> {
        let needed = scaled_samples(frame.samples(), self.source.rate, self.target.rate);
        if needed > self.samples {
            return Err(Error::conversion(format!(
                "resampled frame of {needed} samples exceeds buffer of {} samples",
                self.samples
            )));
        }

        // swr writes at most nb_samples and then shrinks it to the count
        // produced, so the full capacity is restored before every call.
        self.output.set_samples(self.samples);
        self.context
            .run(frame, &mut self.output)
            .map_err(|e| Error::conversion(format!("resampling failed: {e}")))?;

        let output = &self.output;
        let len = output.samples() * self.target.bytes_per_frame();
        if len > self.buffer.len() {
            return Err(Error::conversion(format!(
                "resampled frame of {len} bytes exceeds buffer of {} bytes",
                self.buffer.len()
            )));
        }
        if len == 0 {
            return Ok(&[]);
        }

        let data = output
            .data(0)
            .get(..len)
            .ok_or_else(|| Error::conversion("resampled frame is shorter than reported"))?;
        self.buffer[..len].copy_from_slice(data);
        Ok(&self.buffer[..len])
    }

    pub fn source(&self) -> &AudioSpec {
        &self.source
    }

    pub fn target(&self) -> &AudioSpec {
        &self.target
    }

    /**
        Size of the output buffer in bytes.
    */
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }
}

impl std::fmt::Debug for AudioResampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioResampler")
            .field("source", &self.source)
            .field("target", &self.target)
            .field("capacity", &self.buffer.len())
            .finish_non_exhaustive()
    }
}
