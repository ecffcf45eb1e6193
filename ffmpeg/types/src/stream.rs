/*!
    Stream classification.
*/

use std::fmt;

/**
    Kind of media stream selected from a container.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StreamKind {
    /// Video stream
    Video,
    /// Audio stream
    Audio,
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Video => f.write_str("video"),
            Self::Audio => f.write_str("audio"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(StreamKind::Video.to_string(), "video");
        assert_eq!(StreamKind::Audio.to_string(), "audio");
    }
}
