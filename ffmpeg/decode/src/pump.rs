/*!
    The packet-to-frame pull loop.

    [`FramePump`] owns a packet source and one decoder per selected stream
    and turns "give me the next frame" into the read/route/send/receive cycle.
    The loop is written against two small traits so it can run on FFmpeg
    handles in production and on synthetic packets in tests.
*/

use media_types::{Result, StreamKind};

/**
    A demultiplexer that yields packets in container order.
*/
pub trait PacketSource {
    type Packet;

    /**
        Read the next packet. Returns `Ok(None)` at end of input.
    */
    fn read_packet(&mut self) -> Result<Option<Self::Packet>>;

    /**
        Index of the stream a packet belongs to.
    */
    fn stream_index(packet: &Self::Packet) -> usize;

    /**
        Reposition the read cursor at the start of the container, using the
        given stream as the seek reference.
    */
    fn seek_to_start(&mut self, stream_index: usize) -> Result<()>;
}

/**
    Outcome of asking a decoder for a frame.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Receive {
    /// A frame was written into the caller's buffer.
    Frame,
    /// The decoder needs another packet before it can produce a frame.
    NeedsInput,
    /// The decoder has been sent EOF and has no frames left.
    Drained,
}

/**
    Outcome of handing a packet to a decoder.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Submit {
    Accepted,
    /// Output must be read before the decoder takes this packet.
    Full,
}

/**
    A send/receive style decoder for one stream.
*/
pub trait FrameDecoder<P> {
    type Frame;

    /**
        Allocate the frame buffer this decoder writes into.
    */
    fn empty_frame() -> Self::Frame;

    fn send_packet(&mut self, packet: &P) -> Result<Submit>;

    /**
        Signal end of input so buffered frames can be drained.
    */
    fn send_eof(&mut self) -> Result<()>;

    fn receive_frame(&mut self, frame: &mut Self::Frame) -> Result<Receive>;

    /**
        Drop buffered state after a seek.
    */
    fn flush(&mut self);
}

/**
    A frame borrowed from the pump.

    The borrow ends before the next pull, which is when the pump reuses the
    underlying buffer.
*/
#[derive(Debug)]
pub enum Pulled<'a, V, A> {
    Video(&'a V),
    Audio(&'a A),
}

impl<V, A> Pulled<'_, V, A> {
    pub fn kind(&self) -> StreamKind {
        match self {
            Self::Video(_) => StreamKind::Video,
            Self::Audio(_) => StreamKind::Audio,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PumpState {
    Reading,
    Draining,
    Finished,
}

/// Consecutive receive errors tolerated before the lane goes back to
/// feeding packets.
const MAX_RECEIVE_ERRORS: usize = 8;

struct Lane<P, D: FrameDecoder<P>> {
    stream_index: usize,
    decoder: D,
    frame: D::Frame,
    /// The decoder may have output to read.
    pending: bool,
    /// A packet refused with [`Submit::Full`], resent once output is read.
    held: Option<P>,
    frames: u64,
}

impl<P, D: FrameDecoder<P>> Lane<P, D> {
    fn new(stream_index: usize, decoder: D) -> Self {
        Self {
            stream_index,
            decoder,
            frame: D::empty_frame(),
            pending: false,
            held: None,
            frames: 0,
        }
    }

    /**
        Read one frame. A failed receive can leave frames buffered behind
        it, so errors are retried until the decoder asks for input.
    */
    fn try_receive(&mut self, kind: StreamKind) -> bool {
        for _ in 0..MAX_RECEIVE_ERRORS {
            match self.decoder.receive_frame(&mut self.frame) {
                Ok(Receive::Frame) => {
                    self.frames += 1;
                    return true;
                }
                Ok(Receive::NeedsInput | Receive::Drained) => {
                    self.pending = false;
                    return false;
                }
                Err(e) => {
                    tracing::warn!(%kind, stream = self.stream_index, error = %e, "failed to receive frame");
                }
            }
        }
        false
    }

    fn send(&mut self, packet: P, kind: StreamKind) {
        self.pending = true;
        match self.decoder.send_packet(&packet) {
            Ok(Submit::Accepted) => {}
            Ok(Submit::Full) => self.held = Some(packet),
            Err(e) => {
                tracing::warn!(%kind, stream = self.stream_index, error = %e, "dropping packet the decoder rejected");
            }
        }
    }

    /**
        Resend a held packet after output was read. Returns `false` if
        there was nothing to resend.
    */
    fn resend(&mut self, kind: StreamKind) -> bool {
        let Some(packet) = self.held.take() else {
            return false;
        };
        self.pending = true;
        match self.decoder.send_packet(&packet) {
            Ok(Submit::Accepted) => {}
            Ok(Submit::Full) => {
                tracing::warn!(%kind, stream = self.stream_index, "dropping packet the decoder still refuses");
            }
            Err(e) => {
                tracing::warn!(%kind, stream = self.stream_index, error = %e, "dropping packet the decoder rejected");
            }
        }
        true
    }

    fn finish_input(&mut self, kind: StreamKind) {
        match self.decoder.send_eof() {
            Ok(()) => self.pending = true,
            Err(e) => {
                tracing::warn!(%kind, stream = self.stream_index, error = %e, "failed to signal end of input");
            }
        }
    }

    fn reset(&mut self) {
        self.decoder.flush();
        self.pending = false;
        self.held = None;
        self.frames = 0;
    }
}

/**
    Pull-based frame pump over one video stream and an optional audio stream.

    Packets of any other stream are discarded. A packet the decoder rejects,
    or a frame it fails to produce, is logged and skipped so one corrupt unit
    never ends the stream.
*/
pub struct FramePump<S, V, A>
where
    S: PacketSource,
    V: FrameDecoder<S::Packet>,
    A: FrameDecoder<S::Packet>,
{
    // Decoders are declared before the source so they are released first.
    video: Lane<S::Packet, V>,
    audio: Option<Lane<S::Packet, A>>,
    source: S,
    state: PumpState,
}

impl<S, V, A> FramePump<S, V, A>
where
    S: PacketSource,
    V: FrameDecoder<S::Packet>,
    A: FrameDecoder<S::Packet>,
{
    /**
        Create a pump decoding `video_stream` with `video`, and
        optionally an audio stream with its decoder.
    */
    pub fn new(source: S, video_stream: usize, video: V, audio: Option<(usize, A)>) -> Self {
        Self {
            video: Lane::new(video_stream, video),
            audio: audio.map(|(index, decoder)| Lane::new(index, decoder)),
            source,
            state: PumpState::Reading,
        }
    }

    /**
        Pull the next decoded frame, video or audio.

        Returns `Ok(None)` once the input is exhausted and every decoder has
        been drained; this repeats until [`rewind`](Self::rewind). Errors are
        only returned when the source itself fails to read.
    */
    pub fn next_frame(&mut self) -> Result<Option<Pulled<'_, V::Frame, A::Frame>>> {
        Ok(match self.advance()? {
            Some(StreamKind::Video) => Some(Pulled::Video(&self.video.frame)),
            Some(StreamKind::Audio) => self
                .audio
                .as_ref()
                .map(|lane| Pulled::Audio(&lane.frame)),
            None => None,
        })
    }

    /**
        Pull frames until a video frame is produced, discarding audio frames.
    */
    pub fn next_video_frame(&mut self) -> Result<Option<&V::Frame>> {
        loop {
            match self.advance()? {
                Some(StreamKind::Video) => return Ok(Some(&self.video.frame)),
                Some(StreamKind::Audio) => continue,
                None => return Ok(None),
            }
        }
    }

    fn advance(&mut self) -> Result<Option<StreamKind>> {
        loop {
            if self.video.pending && self.video.try_receive(StreamKind::Video) {
                return Ok(Some(StreamKind::Video));
            }
            if let Some(audio) = self.audio.as_mut() {
                if audio.pending && audio.try_receive(StreamKind::Audio) {
                    return Ok(Some(StreamKind::Audio));
                }
            }

            let resent = self.video.resend(StreamKind::Video);
            let resent_audio = self
                .audio
                .as_mut()
                .is_some_and(|audio| audio.resend(StreamKind::Audio));
            if resent || resent_audio {
                continue;
            }

            match self.state {
                PumpState::Finished => return Ok(None),
                PumpState::Draining => {
                    tracing::debug!(frames = self.video.frames, "end of stream");
                    self.state = PumpState::Finished;
                    return Ok(None);
                }
                PumpState::Reading => {}
            }

            let Some(packet) = self.source.read_packet()? else {
                self.video.finish_input(StreamKind::Video);
                if let Some(audio) = self.audio.as_mut() {
                    audio.finish_input(StreamKind::Audio);
                }
                self.state = PumpState::Draining;
                continue;
            };

            let index = S::stream_index(&packet);
            if index == self.video.stream_index {
                self.video.send(packet, StreamKind::Video);
            } else if let Some(audio) = self
                .audio
                .as_mut()
                .filter(|lane| lane.stream_index == index)
            {
                audio.send(packet, StreamKind::Audio);
            }
        }
    }

    /**
        Seek back to the start of the container and reset decoder state and
        frame counters.

        On failure the read position is unspecified and the pump should not
        be used for further playback.
    */
    pub fn rewind(&mut self) -> Result<()> {
        self.source.seek_to_start(self.video.stream_index)?;
        self.video.reset();
        if let Some(audio) = self.audio.as_mut() {
            audio.reset();
        }
        self.state = PumpState::Reading;
        Ok(())
    }

    /**
        Number of video frames produced since opening or the last rewind.
    */
    pub fn frames_decoded(&self) -> u64 {
        self.video.frames
    }

    /**
        Number of audio frames produced since opening or the last rewind.
    */
    pub fn audio_frames_decoded(&self) -> u64 {
        self.audio.as_ref().map(|lane| lane.frames).unwrap_or(0)
    }

    pub fn video_stream_index(&self) -> usize {
        self.video.stream_index
    }

    pub fn audio_stream_index(&self) -> Option<usize> {
        self.audio.as_ref().map(|lane| lane.stream_index)
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /**
        Direct access to the packet source, bypassing the decoders.
    */
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}
