/*!
    A decoding session over one media file.
*/

use std::path::Path;

use ffmpeg_next::{self as ffmpeg, frame};

use media_types::{Error, Result, StreamKind};

use crate::config::DecoderConfig;
use crate::decoder::{AudioStreamDecoder, VideoStreamDecoder};
use crate::params::{AudioParams, VideoParams};
use crate::pump::{FramePump, Pulled};
use crate::source::InputSource;

/**
    A frame pulled from a [`MediaDecoder`].
*/
pub type PulledFrame<'a> = Pulled<'a, frame::Video, frame::Audio>;

type Pump = FramePump<InputSource, VideoStreamDecoder, AudioStreamDecoder>;

/**
    Opened container plus decoders for its best video stream and,
    optionally, its best audio stream.

    Frames are pulled one at a time with [`next_frame`](Self::next_frame)
    and borrowed until the next pull.
*/
pub struct MediaDecoder {
    pump: Pump,
    video: VideoParams,
    audio: Option<AudioParams>,
}

impl MediaDecoder {
    /**
        Open `path`, select its streams and open their decoders.

        Fails when the file cannot be opened, has no video stream, or its
        video codec cannot be decoded. A missing or undecodable audio stream
        only disables audio.
    */
    pub fn open(path: impl AsRef<Path>, config: &DecoderConfig) -> Result<Self> {
        let source = InputSource::open(path)?;
        if config.dump_format {
            source.dump();
        }
        let threads = config.resolved_threads();

        let video_stream = source
            .best_stream(StreamKind::Video)
            .ok_or(Error::StreamNotFound {
                kind: StreamKind::Video,
            })?;
        let video_decoder = VideoStreamDecoder::open(&video_stream, threads)?;
        let video = {
            let inner = video_decoder.inner();
            VideoParams {
                stream_index: video_stream.index,
                width: inner.width(),
                height: inner.height(),
                format: inner.format(),
                time_base: video_stream.time_base,
                frame_rate: video_stream.avg_frame_rate,
                frame_count: video_stream.frames,
                codec_name: video_stream.parameters.id().name().to_string(),
                parameters: video_stream.parameters.clone(),
            }
        };

        let audio_lane = if config.audio {
            open_audio(&source, threads)
        } else {
            None
        };
        let audio = audio_lane.as_ref().map(|(params, _)| params.clone());

        tracing::info!(
            path = %source.path().display(),
            codec = %video.codec_name,
            width = video.width,
            height = video.height,
            format = ?video.format,
            frame_rate = ?video.frame_rate,
            frames = video.frame_count,
            audio = audio.is_some(),
            threads,
            "opened media"
        );

        let pump = FramePump::new(
            source,
            video.stream_index,
            video_decoder,
            audio_lane.map(|(params, decoder)| (params.stream_index, decoder)),
        );

        Ok(Self { pump, video, audio })
    }

    pub fn video(&self) -> &VideoParams {
        &self.video
    }

    /**
        Parameters of the decoded audio stream, if audio is enabled and present.
    */
    pub fn audio(&self) -> Option<&AudioParams> {
        self.audio.as_ref()
    }

    pub fn path(&self) -> &Path {
        self.pump_source().path()
    }

    /**
        Container duration, if known.
    */
    pub fn duration(&self) -> Option<std::time::Duration> {
        self.pump_source().duration()
    }

    /**
        Number of video frames decoded since opening or the last rewind.
    */
    pub fn frames_decoded(&self) -> u64 {
        self.pump.frames_decoded()
    }

    /**
        Pull the next decoded frame. `Ok(None)` marks end of stream.
    */
    pub fn next_frame(&mut self) -> Result<Option<PulledFrame<'_>>> {
        self.pump.next_frame()
    }

    /**
        Pull the next decoded video frame, discarding any audio in between.
    */
    pub fn next_video_frame(&mut self) -> Result<Option<&frame::Video>> {
        self.pump.next_video_frame()
    }

    /**
        Seek back to the first frame and reset the frame counter.
    */
    pub fn rewind(&mut self) -> Result<()> {
        self.pump.rewind()
    }

    /**
        Read raw packets, bypassing the decoders. Used for stream copy.
    */
    pub fn source_mut(&mut self) -> &mut InputSource {
        self.pump.source_mut()
    }

    /**
        Input stream descriptor for the video stream, used to set up outputs.
    */
    pub fn video_stream(&self) -> Option<ffmpeg::format::stream::Stream<'_>> {
        self.pump_source().context().stream(self.video.stream_index)
    }

    fn pump_source(&self) -> &InputSource {
        self.pump.source()
    }
}

fn open_audio(source: &InputSource, threads: usize) -> Option<(AudioParams, AudioStreamDecoder)> {
    let stream = source.best_stream(StreamKind::Audio)?;
    let decoder = match AudioStreamDecoder::open(&stream, threads) {
        Ok(decoder) => decoder,
        Err(e) => {
            tracing::warn!(error = %e, "audio disabled");
            return None;
        }
    };
    let inner = decoder.inner();
    let params = AudioParams {
        stream_index: stream.index,
        format: inner.format(),
        channel_layout: inner.channel_layout(),
        channels: inner.channels(),
        rate: inner.rate(),
        frame_size: inner.frame_size(),
        time_base: stream.time_base,
    };
    Some((params, decoder))
}

impl std::fmt::Debug for MediaDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaDecoder")
            .field("path", &self.path())
            .field("video", &self.video)
            .field("audio", &self.audio)
            .field("frames_decoded", &self.frames_decoded())
            .finish()
    }
}
