/*!
    Decoder configuration types.
*/

/**
    Configuration for a decoding session.
*/
#[derive(Clone, Debug, Default)]
pub struct DecoderConfig {
    /// Also decode the best audio stream, if the container has one.
    pub audio: bool,
    /// Decoder worker threads (None = one per available core).
    pub threads: Option<usize>,
    /// Print libavformat's container description when opening.
    pub dump_format: bool,
}

impl DecoderConfig {
    /**
        Create a new config with default settings (video only, automatic threads).
    */
    pub fn new() -> Self {
        Self::default()
    }

    /**
        Enable or disable audio decoding.
    */
    pub fn with_audio(mut self, audio: bool) -> Self {
        self.audio = audio;
        self
    }

    /**
        Use a fixed number of decoder threads.
    */
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /**
        Print the container description when opening.
    */
    pub fn with_format_dump(mut self, dump: bool) -> Self {
        self.dump_format = dump;
        self
    }

    /**
        Number of decoder threads to use, resolving the automatic default.
    */
    pub fn resolved_threads(&self) -> usize {
        self.threads
            .filter(|&n| n > 0)
            .unwrap_or_else(|| {
                std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(1)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder() {
        let config = DecoderConfig::new()
            .with_audio(true)
            .with_threads(4)
            .with_format_dump(true);
        assert!(config.audio);
        assert!(config.dump_format);
        assert_eq!(config.resolved_threads(), 4);
    }

    #[test]
    fn automatic_threads_is_at_least_one() {
        assert!(DecoderConfig::new().resolved_threads() >= 1);
        assert!(DecoderConfig::new().with_threads(0).resolved_threads() >= 1);
    }
}
