/*!
    Container input backed by libavformat.
*/

use std::path::{Path, PathBuf};

use ffmpeg_next::{self as ffmpeg, codec, ffi, format, media};

use media_types::{Error, Rational, Result, StreamKind};

use crate::pump::PacketSource;

/**
    Description of one stream selected from the container.
*/
#[derive(Clone)]
pub struct StreamDesc {
    pub index: usize,
    pub parameters: codec::Parameters,
    pub time_base: Option<Rational>,
    pub avg_frame_rate: Option<Rational>,
    /// Frame count reported by the container, zero when unknown.
    pub frames: i64,
}

/**
    An opened and probed media container.
*/
pub struct InputSource {
    input: format::context::Input,
    path: PathBuf,
}

impl InputSource {
    /**
        Open and probe the container at `path`.
    */
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        ffmpeg::init().map_err(|e| Error::open(path, e.to_string()))?;

        let input = format::input(&path).map_err(|e| Error::open(path, e.to_string()))?;
        tracing::debug!(
            path = %path.display(),
            format = input.format().name(),
            streams = input.streams().count(),
            "opened container"
        );

        Ok(Self {
            input,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /**
        Pick the best stream of the given kind, as ranked by libavformat.
    */
    pub fn best_stream(&self, kind: StreamKind) -> Option<StreamDesc> {
        let media_type = match kind {
            StreamKind::Video => media::Type::Video,
            StreamKind::Audio => media::Type::Audio,
        };
        let stream = self.input.streams().best(media_type)?;
        Some(StreamDesc {
            index: stream.index(),
            parameters: stream.parameters(),
            time_base: from_ffmpeg_rational(stream.time_base()),
            avg_frame_rate: from_ffmpeg_rational(stream.avg_frame_rate()),
            frames: stream.frames(),
        })
    }

    /**
        Container duration, if the container reports one.
    */
    pub fn duration(&self) -> Option<std::time::Duration> {
        let micros = self.input.duration();
        (micros > 0).then(|| std::time::Duration::from_micros(micros as u64))
    }

    /**
        Print libavformat's description of the container to stderr.
    */
    pub fn dump(&self) {
        let path = self.path.to_string_lossy();
        format::context::input::dump(&self.input, 0, Some(&*path));
    }

    pub(crate) fn context(&self) -> &format::context::Input {
        &self.input
    }
}

impl PacketSource for InputSource {
    type Packet = ffmpeg::Packet;

    fn read_packet(&mut self) -> Result<Option<ffmpeg::Packet>> {
        let mut packet = ffmpeg::Packet::empty();
        match packet.read(&mut self.input) {
            Ok(()) => Ok(Some(packet)),
            Err(ffmpeg::Error::Eof) => Ok(None),
            Err(e) => Err(Error::demux(e.to_string())),
        }
    }

    fn stream_index(packet: &ffmpeg::Packet) -> usize {
        packet.stream()
    }

    fn seek_to_start(&mut self, stream_index: usize) -> Result<()> {
        // Backward seek on the given stream to the first keyframe at or before zero.
        let ret = unsafe {
            ffi::avformat_seek_file(
                self.input.as_mut_ptr(),
                stream_index as i32,
                0,
                0,
                i64::MAX,
                ffi::AVSEEK_FLAG_BACKWARD as i32,
            )
        };
        if ret < 0 {
            return Err(Error::seek(ffmpeg::Error::from(ret).to_string()));
        }
        tracing::debug!(stream = stream_index, "rewound to start");
        Ok(())
    }
}

pub(crate) fn from_ffmpeg_rational(r: ffmpeg::Rational) -> Option<Rational> {
    Rational::checked(r.numerator(), r.denominator())
}

impl std::fmt::Debug for InputSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputSource")
            .field("path", &self.path)
            .field("format", &self.input.format().name())
            .finish_non_exhaustive()
    }
}
