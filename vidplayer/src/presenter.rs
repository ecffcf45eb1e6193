/*!
    Refresh handling: pull, convert and present one video frame.
*/

use std::sync::Arc;
use std::time::Duration;

use media_decode::{MediaDecoder, Pulled, VideoParams};
use media_decode::ffmpeg::frame;
use media_transform::{AudioResampler, VideoConverter};
use media_types::Result;

use crate::audio::AudioHandoff;
use crate::display::SdlPresenter;
use crate::error::PlayerError;
use crate::event_loop::{RefreshHandler, RefreshOutcome};

/**
    Audio path of a presenter: resampler plus the slot feeding the device.
*/
pub struct AudioSink {
    pub resampler: AudioResampler,
    pub handoff: Arc<AudioHandoff>,
    pub timeout: Duration,
}

impl AudioSink {
    fn push(&mut self, frame: &frame::Audio) {
        let samples = match self.resampler.resample(frame) {
            Ok(samples) => samples,
            Err(e) => {
                tracing::warn!(error = %e, "dropping audio frame");
                return;
            }
        };
        if samples.is_empty() {
            return;
        }
        match self.handoff.publish(samples, self.timeout) {
            Ok(()) => {}
            Err(PlayerError::HandoffTimeout) => {
                tracing::warn!(bytes = samples.len(), "audio device stalled, dropping chunk");
            }
            Err(e) => tracing::debug!(error = %e, "audio chunk not delivered"),
        }
    }
}

/**
    Pulls frames from the decoder on each refresh tick.

    Audio frames met on the way are resampled and handed to the audio
    device; the first video frame is converted to YUV 4:2:0 and presented.
*/
pub struct FramePresenter<'a> {
    decoder: &'a mut MediaDecoder,
    video: VideoParams,
    converter: VideoConverter,
    output: SdlPresenter<'a>,
    audio: Option<AudioSink>,
}

impl<'a> FramePresenter<'a> {
    pub fn new(
        decoder: &'a mut MediaDecoder,
        converter: VideoConverter,
        output: SdlPresenter<'a>,
        audio: Option<AudioSink>,
    ) -> Self {
        let video = decoder.video().clone();
        Self {
            decoder,
            video,
            converter,
            output,
            audio,
        }
    }
}

impl RefreshHandler for FramePresenter<'_> {
    fn refresh(&mut self) -> RefreshOutcome {
        loop {
            let pulled = match self.decoder.next_frame() {
                Ok(Some(pulled)) => pulled,
                Ok(None) => return RefreshOutcome::EndOfStream,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to pull frame, skipping tick");
                    return RefreshOutcome::Skipped;
                }
            };

            let frame = match pulled {
                Pulled::Audio(frame) => {
                    if let Some(audio) = self.audio.as_mut() {
                        audio.push(frame);
                    }
                    continue;
                }
                Pulled::Video(frame) => frame,
            };

            let delay = self.video.frame_duration(frame);
            let picture = match self.converter.convert(frame) {
                Ok(picture) => picture,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to convert frame, skipping tick");
                    return RefreshOutcome::Skipped;
                }
            };
            if let Err(e) = self.output.present(picture) {
                tracing::warn!(error = %e, "skipping tick");
                return RefreshOutcome::Skipped;
            }

            tracing::trace!(frame = self.decoder.frames_decoded(), ?delay, "presented");
            return RefreshOutcome::Presented { delay };
        }
    }

    fn rewind(&mut self) -> Result<()> {
        self.decoder.rewind()?;
        if let Some(audio) = &self.audio {
            audio.handoff.clear();
        }
        Ok(())
    }

    fn adjust_volume(&mut self, delta: f32) {
        if let Some(audio) = &self.audio {
            let volume = (audio.handoff.volume() + delta).clamp(0.0, 1.0);
            audio.handoff.set_volume(volume);
            tracing::info!(volume, "volume changed");
        }
    }
}
