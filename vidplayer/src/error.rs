use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("failed to initialize display: {0}")]
    DisplayInit(String),

    #[error("failed to initialize audio output: {0}")]
    AudioInit(String),

    #[error("failed to spawn {name} thread: {source}")]
    ThreadSpawn {
        name: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("timed out waiting for the audio device to drain the previous chunk")]
    HandoffTimeout,

    #[error("audio handoff is closed")]
    HandoffClosed,

    #[error("failed to present frame: {0}")]
    Present(String),

    #[error("player is {0:?}, expected it to be initialized")]
    InvalidState(crate::player::PlayerState),

    #[error(transparent)]
    Media(#[from] media_types::Error),
}

pub type PlayerResult<T> = Result<T, PlayerError>;

#[cfg(test)]
mod tests {
    use super::*;

    static_assertions::assert_impl_all!(PlayerError: Send, Sync);

    #[test]
    fn media_errors_convert() {
        let err: PlayerError = media_types::Error::seek("no index").into();
        assert!(matches!(err, PlayerError::Media(_)));
        assert_eq!(err.to_string(), "seek error: no index");
    }

    #[test]
    fn thread_spawn_names_thread() {
        let err = PlayerError::ThreadSpawn {
            name: "ticker",
            source: std::io::Error::other("out of threads"),
        };
        assert_eq!(
            err.to_string(),
            "failed to spawn ticker thread: out of threads"
        );
    }
}
