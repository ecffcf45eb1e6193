/*!
    Stream decoders backed by libavcodec.
*/

use ffmpeg_next::codec::threading;
use ffmpeg_next::{self as ffmpeg, codec, decoder, frame};

use media_types::{Error, Result, StreamKind};

use crate::pump::{FrameDecoder, Receive, Submit};
use crate::source::StreamDesc;

/**
    Create and configure a codec context for the given stream.
*/
fn open_context(kind: StreamKind, stream: &StreamDesc, threads: usize) -> Result<decoder::Decoder> {
    let id = stream.parameters.id();
    if ffmpeg::decoder::find(id).is_none() {
        return Err(Error::CodecNotFound {
            kind,
            codec: id.name().to_string(),
        });
    }

    let mut context = codec::context::Context::from_parameters(stream.parameters.clone())
        .map_err(|e| Error::CodecOpen {
            kind,
            message: e.to_string(),
        })?;

    context.set_threading(threading::Config {
        kind: threading::Type::Frame,
        count: threads,
        ..Default::default()
    });

    Ok(context.decoder())
}

fn submit(kind: StreamKind, result: std::result::Result<(), ffmpeg::Error>) -> Result<Submit> {
    match result {
        Ok(()) => Ok(Submit::Accepted),
        Err(ffmpeg::Error::Other { errno }) if errno == ffmpeg::util::error::EAGAIN => {
            Ok(Submit::Full)
        }
        Err(e) => Err(Error::decode(format!("{kind}: {e}"))),
    }
}

fn receive(kind: StreamKind, result: std::result::Result<(), ffmpeg::Error>) -> Result<Receive> {
    match result {
        Ok(()) => Ok(Receive::Frame),
        Err(ffmpeg::Error::Other { errno }) if errno == ffmpeg::util::error::EAGAIN => {
            Ok(Receive::NeedsInput)
        }
        Err(ffmpeg::Error::Eof) => Ok(Receive::Drained),
        Err(e) => Err(Error::decode(format!("{kind}: {e}"))),
    }
}

/**
    Video stream decoder.
*/
pub struct VideoStreamDecoder {
    decoder: decoder::Video,
}

impl VideoStreamDecoder {
    /**
        Open a decoder for the given video stream using `threads` worker threads.
    */
    pub fn open(stream: &StreamDesc, threads: usize) -> Result<Self> {
        let decoder = open_context(StreamKind::Video, stream, threads)?
            .video()
            .map_err(|e| Error::CodecOpen {
                kind: StreamKind::Video,
                message: e.to_string(),
            })?;
        Ok(Self { decoder })
    }

    pub fn inner(&self) -> &decoder::Video {
        &self.decoder
    }
}

impl FrameDecoder<ffmpeg::Packet> for VideoStreamDecoder {
    type Frame = frame::Video;

    fn empty_frame() -> frame::Video {
        frame::Video::empty()
    }

    fn send_packet(&mut self, packet: &ffmpeg::Packet) -> Result<Submit> {
        submit(StreamKind::Video, self.decoder.send_packet(packet))
    }

    fn send_eof(&mut self) -> Result<()> {
        self.decoder
            .send_eof()
            .map_err(|e| Error::decode(e.to_string()))
    }

    fn receive_frame(&mut self, frame: &mut frame::Video) -> Result<Receive> {
        receive(StreamKind::Video, self.decoder.receive_frame(frame))
    }

    fn flush(&mut self) {
        self.decoder.flush();
    }
}

/**
    Audio stream decoder.
*/
pub struct AudioStreamDecoder {
    decoder: decoder::Audio,
}

impl AudioStreamDecoder {
    /**
        Open a decoder for the given audio stream using `threads` worker threads.
    */
    pub fn open(stream: &StreamDesc, threads: usize) -> Result<Self> {
        let decoder = open_context(StreamKind::Audio, stream, threads)?
            .audio()
            .map_err(|e| Error::CodecOpen {
                kind: StreamKind::Audio,
                message: e.to_string(),
            })?;
        Ok(Self { decoder })
    }

    pub fn inner(&self) -> &decoder::Audio {
        &self.decoder
    }
}

impl FrameDecoder<ffmpeg::Packet> for AudioStreamDecoder {
    type Frame = frame::Audio;

    fn empty_frame() -> frame::Audio {
        frame::Audio::empty()
    }

    fn send_packet(&mut self, packet: &ffmpeg::Packet) -> Result<Submit> {
        submit(StreamKind::Audio, self.decoder.send_packet(packet))
    }

    fn send_eof(&mut self) -> Result<()> {
        self.decoder
            .send_eof()
            .map_err(|e| Error::decode(e.to_string()))
    }

    fn receive_frame(&mut self, frame: &mut frame::Audio) -> Result<Receive> {
        receive(StreamKind::Audio, self.decoder.receive_frame(frame))
    }

    fn flush(&mut self) {
        self.decoder.flush();
    }
}

impl std::fmt::Debug for VideoStreamDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoStreamDecoder")
            .field("width", &self.decoder.width())
            .field("height", &self.decoder.height())
            .field("format", &self.decoder.format())
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for AudioStreamDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioStreamDecoder")
            .field("rate", &self.decoder.rate())
            .field("channels", &self.decoder.channels())
            .field("format", &self.decoder.format())
            .finish_non_exhaustive()
    }
}
