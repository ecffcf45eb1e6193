use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use crate::error::{PlayerError, PlayerResult};

use super::AudioHandoff;

/// Channel count of the output stream
pub const OUTPUT_CHANNELS: u16 = 2;

/// Audio output on the default device, pulling interleaved stereo f32
/// samples from an [`AudioHandoff`].
///
/// The stream is created paused; call [`play`](Self::play) to start it.
pub struct AudioOutput {
    stream: cpal::Stream,
    sample_rate: u32,
    device_name: String,
}

impl AudioOutput {
    pub fn open(handoff: Arc<AudioHandoff>) -> PlayerResult<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| PlayerError::AudioInit("no output device available".into()))?;
        let device_name = device.name().unwrap_or_else(|_| "unknown".into());

        let supported = device
            .default_output_config()
            .map_err(|e| PlayerError::AudioInit(format!("no default output config: {e}")))?;
        let sample_rate = supported.sample_rate().0;

        let config = cpal::StreamConfig {
            channels: OUTPUT_CHANNELS,
            sample_rate: cpal::SampleRate(sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    handoff.fill(bytemuck::cast_slice_mut(data));
                    let volume = handoff.volume();
                    if volume < 1.0 {
                        for sample in data.iter_mut() {
                            *sample *= volume;
                        }
                    }
                },
                |err| tracing::error!(error = %err, "audio stream error"),
                None,
            )
            .map_err(|e| PlayerError::AudioInit(format!("failed to build output stream: {e}")))?;

        tracing::info!(
            device = %device_name,
            sample_rate,
            channels = OUTPUT_CHANNELS,
            "opened audio output"
        );

        Ok(Self {
            stream,
            sample_rate,
            device_name,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    pub fn play(&self) -> PlayerResult<()> {
        self.stream
            .play()
            .map_err(|e| PlayerError::AudioInit(format!("failed to start output stream: {e}")))
    }

    pub fn pause(&self) {
        // Not every backend can pause; the stream is dropped shortly after anyway.
        if let Err(e) = self.stream.pause() {
            tracing::debug!(error = %e, "failed to pause output stream");
        }
    }
}
