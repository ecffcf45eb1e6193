/*!
    Player configuration.
*/

use std::time::Duration;

use media_transform::ScalingAlgorithm;

/// Refresh interval used until the first frame reports its duration (about 24 fps).
pub const DEFAULT_DELAY_MS: u32 = 41;

/**
    Configuration for a [`Player`](crate::Player).
*/
#[derive(Clone, Debug)]
pub struct PlayerConfig {
    /// Window title.
    pub title: String,
    /// Play the audio stream, if the decoder has one.
    pub audio: bool,
    /// Rewind and keep playing at end of stream instead of stopping.
    pub looping: bool,
    /// How long a refresh may wait for the audio device to take a chunk.
    pub handoff_timeout: Duration,
    /// Refresh interval before the first frame duration is known.
    pub initial_delay: Duration,
    /// Scaling algorithm for the display conversion.
    pub scaling: ScalingAlgorithm,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            title: String::from("vidplayer"),
            audio: true,
            looping: false,
            handoff_timeout: Duration::from_millis(500),
            initial_delay: Duration::from_millis(DEFAULT_DELAY_MS as u64),
            scaling: ScalingAlgorithm::Bicubic,
        }
    }
}

impl PlayerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_audio(mut self, audio: bool) -> Self {
        self.audio = audio;
        self
    }

    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn with_handoff_timeout(mut self, timeout: Duration) -> Self {
        self.handoff_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder() {
        let config = PlayerConfig::new()
            .with_title("clip.mp4")
            .with_audio(false)
            .with_looping(true)
            .with_handoff_timeout(Duration::from_millis(100));
        assert_eq!(config.title, "clip.mp4");
        assert!(!config.audio);
        assert!(config.looping);
        assert_eq!(config.handoff_timeout, Duration::from_millis(100));
        assert_eq!(config.initial_delay, Duration::from_millis(41));
    }
}
