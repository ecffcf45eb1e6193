/*!
    Error types shared by the media crates.
*/

use std::fmt;
use std::path::PathBuf;

use crate::StreamKind;

/**
    Error type shared by the media crates.

    Variants fall in two groups. Setup errors (`Open`, `StreamNotFound`,
    `CodecNotFound`, `CodecOpen`) are fatal to the operation that raised them.
    Per-unit errors (`Decode`, `Conversion`) concern a single packet or frame
    and are expected to be logged and skipped by the caller.
*/
#[derive(Debug)]
pub enum Error {
    /// I/O error (output file could not be created, write failed, etc.)
    Io(std::io::Error),
    /// The container could not be opened or probed.
    Open { path: PathBuf, message: String },
    /// The container has no stream of the requested kind.
    StreamNotFound { kind: StreamKind },
    /// No decoder is available for the stream's codec.
    CodecNotFound { kind: StreamKind, codec: String },
    /// The decoder exists but failed to initialize.
    CodecOpen { kind: StreamKind, message: String },
    /// A single packet or frame failed to decode.
    Decode { message: String },
    /// A single scale or resample call failed.
    Conversion { message: String },
    /// Repositioning the container failed.
    Seek { message: String },
    /// Reading the next packet from the container failed.
    Demux { message: String },
    /// Writing an export (image, raw dump, remuxed stream) failed.
    Export { message: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Open { path, message } => {
                write!(f, "failed to open {}: {message}", path.display())
            }
            Self::StreamNotFound { kind } => write!(f, "no {kind} stream found"),
            Self::CodecNotFound { kind, codec } => {
                write!(f, "no decoder found for {kind} codec {codec}")
            }
            Self::CodecOpen { kind, message } => {
                write!(f, "failed to open {kind} decoder: {message}")
            }
            Self::Decode { message } => write!(f, "decode error: {message}"),
            Self::Conversion { message } => write!(f, "conversion error: {message}"),
            Self::Seek { message } => write!(f, "seek error: {message}"),
            Self::Demux { message } => write!(f, "demux error: {message}"),
            Self::Export { message } => write!(f, "export error: {message}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl Error {
    /**
        Create an open error for the given path.
    */
    pub fn open(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Open {
            path: path.into(),
            message: message.into(),
        }
    }

    /**
        Create a decode error with the given message.
    */
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /**
        Create a conversion error with the given message.
    */
    pub fn conversion(message: impl Into<String>) -> Self {
        Self::Conversion {
            message: message.into(),
        }
    }

    /**
        Create a seek error with the given message.
    */
    pub fn seek(message: impl Into<String>) -> Self {
        Self::Seek {
            message: message.into(),
        }
    }

    /**
        Create a demux error with the given message.
    */
    pub fn demux(message: impl Into<String>) -> Self {
        Self::Demux {
            message: message.into(),
        }
    }

    /**
        Create an export error with the given message.
    */
    pub fn export(message: impl Into<String>) -> Self {
        Self::Export {
            message: message.into(),
        }
    }

    /**
        Returns true if this error concerns a single unit of work
        (one packet or one frame) and the pipeline may continue.
    */
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Decode { .. } | Self::Conversion { .. })
    }
}

/**
    Result type alias for the media crates.
*/
pub type Result<T> = std::result::Result<T, Error>;

static_assertions::assert_impl_all!(Error: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    #[test]
    fn error_display() {
        let e = Error::decode("invalid data found");
        assert_eq!(format!("{e}"), "decode error: invalid data found");

        let e = Error::conversion("input changed");
        assert_eq!(format!("{e}"), "conversion error: input changed");

        let e = Error::StreamNotFound {
            kind: StreamKind::Video,
        };
        assert_eq!(format!("{e}"), "no video stream found");

        let e = Error::CodecNotFound {
            kind: StreamKind::Audio,
            codec: "opus".into(),
        };
        assert_eq!(format!("{e}"), "no decoder found for audio codec opus");
    }

    #[test]
    fn open_error_mentions_path() {
        let e = Error::open("/tmp/missing.mkv", "No such file or directory");
        let text = format!("{e}");
        assert!(text.contains("/tmp/missing.mkv"));
        assert!(text.contains("No such file"));
    }

    #[test]
    fn error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let e: Error = io_err.into();
        assert!(matches!(e, Error::Io(_)));
        assert!(format!("{e}").contains("file not found"));
    }

    #[test]
    fn transient_errors() {
        assert!(Error::decode("bad packet").is_transient());
        assert!(Error::conversion("bad scale").is_transient());
        assert!(!Error::seek("no index").is_transient());
        assert!(
            !Error::StreamNotFound {
                kind: StreamKind::Video
            }
            .is_transient()
        );
    }

    #[test]
    fn error_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let e = Error::Io(io_err);
        assert!(StdError::source(&e).is_some());

        let e = Error::seek("test");
        assert!(StdError::source(&e).is_none());
    }
}
