/*!
    The player: owns the decoder, display, audio output and ticker.
*/

use std::sync::Arc;

use sdl2::{Sdl, VideoSubsystem};

use media_decode::ffmpeg;
use media_decode::{AudioParams, MediaDecoder};
use media_transform::{AudioResampler, AudioSpec, VideoConverter};
use media_types::{ChannelLayout, PixelFormat, SampleFormat};

use crate::audio::{AudioHandoff, AudioOutput, OUTPUT_CHANNELS};
use crate::config::PlayerConfig;
use crate::display::{SdlDisplay, display_size};
use crate::error::{PlayerError, PlayerResult};
use crate::event_loop::{LoopExit, LoopStats, RefreshHandler, RefreshOutcome, run_event_loop};
use crate::input::SdlEvents;
use crate::presenter::{AudioSink, FramePresenter};
use crate::state::PlaybackState;
use crate::ticker::Ticker;

/**
    Lifecycle of a [`Player`].

    `Uninitialized -> Initialized -> Playing <-> Paused -> Stopped`
*/
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlayerState {
    #[default]
    Uninitialized,
    Initialized,
    Playing,
    Paused,
    Stopped,
}

impl PlayerState {
    pub fn can_transition_to(self, next: PlayerState) -> bool {
        use PlayerState::*;
        matches!(
            (self, next),
            (Uninitialized, Initialized)
                | (Initialized, Playing)
                | (Initialized, Stopped)
                | (Playing, Paused)
                | (Paused, Playing)
                | (Playing, Stopped)
                | (Paused, Stopped)
        )
    }

    fn transition(&mut self, next: PlayerState) {
        if !self.can_transition_to(next) {
            tracing::warn!(from = ?self, to = ?next, "unexpected player transition");
        }
        tracing::debug!(from = ?self, to = ?next, "player state");
        *self = next;
    }
}

/**
    Passes refresh work through to the presenter and mirrors pause toggles
    into the player's lifecycle state.
*/
struct Lifecycle<'s, H> {
    handler: H,
    state: &'s mut PlayerState,
}

impl<H: RefreshHandler> RefreshHandler for Lifecycle<'_, H> {
    fn refresh(&mut self) -> RefreshOutcome {
        self.handler.refresh()
    }

    fn rewind(&mut self) -> media_types::Result<()> {
        self.handler.rewind()
    }

    fn adjust_volume(&mut self, delta: f32) {
        self.handler.adjust_volume(delta);
    }

    fn set_paused(&mut self, paused: bool) {
        let next = if paused {
            PlayerState::Paused
        } else {
            PlayerState::Playing
        };
        self.state.transition(next);
        self.handler.set_paused(paused);
    }
}

struct PlayerAudio {
    output: AudioOutput,
    handoff: Arc<AudioHandoff>,
    resampler: Option<AudioResampler>,
}

/**
    An SDL2 video player with optional cpal audio output.

    Fields are dropped in declaration order: the ticker is joined first,
    then the audio stream is stopped, then the SDL texture, renderer and
    window are released before SDL itself shuts down.
*/
pub struct Player {
    ticker: Option<Ticker>,
    audio: Option<PlayerAudio>,
    events: SdlEvents,
    display: SdlDisplay,
    _video: VideoSubsystem,
    _sdl: Sdl,
    playback: Arc<PlaybackState>,
    decoder: MediaDecoder,
    config: PlayerConfig,
    state: PlayerState,
}

impl Player {
    /**
        Open the window, the audio device (when the decoder has audio and
        it is enabled) and start the ticker thread.

        Playback starts paused; call [`play`](Self::play) to run it.
    */
    pub fn initialize(decoder: MediaDecoder, config: PlayerConfig) -> PlayerResult<Self> {
        let sdl = sdl2::init().map_err(PlayerError::DisplayInit)?;
        let video = sdl.video().map_err(PlayerError::DisplayInit)?;

        let params = decoder.video();
        let (width, height) = display_size(params.width, params.height);
        let display = SdlDisplay::open(&video, &config.title, width, height)?;
        let events = SdlEvents::new(&sdl)?;

        let audio = match decoder.audio() {
            Some(params) if config.audio => Some(open_audio(params)?),
            Some(_) => {
                tracing::info!("audio disabled by configuration");
                None
            }
            None => None,
        };

        let playback = Arc::new(PlaybackState::new(config.initial_delay));
        playback.set_paused(true);
        let ticker = Ticker::spawn(Arc::clone(&playback), events.tick_sink())?;

        let mut player = Self {
            ticker: Some(ticker),
            audio,
            events,
            display,
            _video: video,
            _sdl: sdl,
            playback,
            decoder,
            config,
            state: PlayerState::Uninitialized,
        };
        player.state.transition(PlayerState::Initialized);
        Ok(player)
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn decoder(&self) -> &MediaDecoder {
        &self.decoder
    }

    /**
        Run the event loop until the user quits or the stream ends.

        A player plays once; afterwards it is stopped.
    */
    pub fn play(&mut self) -> PlayerResult<LoopStats> {
        if self.state != PlayerState::Initialized {
            return Err(PlayerError::InvalidState(self.state));
        }

        let params = self.decoder.video();
        let converter = VideoConverter::scaled(
            params.format,
            (params.width, params.height),
            PixelFormat::Yuv420p,
            (self.display.width(), self.display.height()),
            self.config.scaling,
        )?;

        let timeout = self.config.handoff_timeout;
        let sink = self.audio.as_mut().and_then(|audio| {
            audio.resampler.take().map(|resampler| AudioSink {
                resampler,
                handoff: Arc::clone(&audio.handoff),
                timeout,
            })
        });
        if let Some(audio) = &self.audio {
            audio.output.play()?;
        }

        self.state.transition(PlayerState::Playing);
        self.playback.set_paused(false);

        let output = self.display.presenter()?;
        let mut lifecycle = Lifecycle {
            handler: FramePresenter::new(&mut self.decoder, converter, output, sink),
            state: &mut self.state,
        };
        let (exit, stats) = run_event_loop(
            &mut self.events,
            &self.playback,
            &mut lifecycle,
            self.config.looping,
        );
        drop(lifecycle);

        if exit == LoopExit::Disconnected {
            tracing::warn!("event queue closed unexpectedly");
        }
        tracing::info!(
            ?exit,
            presented = stats.presented,
            skipped = stats.skipped,
            rewinds = stats.rewinds,
            "playback finished"
        );

        self.stop();
        Ok(stats)
    }

    /**
        Stop the ticker and the audio output. Idempotent.
    */
    pub fn stop(&mut self) {
        if self.state == PlayerState::Stopped {
            return;
        }
        self.playback.request_exit();
        if let Some(ticker) = self.ticker.take() {
            ticker.stop();
        }
        if let Some(audio) = &self.audio {
            audio.handoff.close();
            audio.output.pause();
        }
        self.state.transition(PlayerState::Stopped);
    }
}

fn open_audio(params: &AudioParams) -> PlayerResult<PlayerAudio> {
    let handoff = Arc::new(AudioHandoff::new());
    let output = AudioOutput::open(Arc::clone(&handoff))?;

    let channel_layout = if params.channel_layout.is_empty() {
        ffmpeg::ChannelLayout::default(i32::from(params.channels))
    } else {
        params.channel_layout
    };
    let source = AudioSpec {
        format: params.format,
        channel_layout,
        channels: params.channels,
        rate: params.rate,
    };
    let target = AudioSpec::packed(
        SampleFormat::F32,
        ChannelLayout::for_channels(OUTPUT_CHANNELS),
        output.sample_rate(),
    );
    let resampler = AudioResampler::new(source, target, params.frame_size as usize)
        .map_err(|e| PlayerError::AudioInit(e.to_string()))?;

    Ok(PlayerAudio {
        output,
        handoff,
        resampler: Some(resampler),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use crate::event::PlayerEvent;

    use super::*;

    struct Idle;

    impl RefreshHandler for Idle {
        fn refresh(&mut self) -> RefreshOutcome {
            RefreshOutcome::Skipped
        }

        fn rewind(&mut self) -> media_types::Result<()> {
            Ok(())
        }
    }

    fn run_with(events: &[PlayerEvent]) -> PlayerState {
        let playback = PlaybackState::default();
        let mut state = PlayerState::Playing;
        let mut lifecycle = Lifecycle {
            handler: Idle,
            state: &mut state,
        };
        let mut events: VecDeque<_> = events.iter().copied().collect();
        run_event_loop(&mut events, &playback, &mut lifecycle, false);
        state
    }

    #[test]
    fn pause_toggles_reach_player_state() {
        use PlayerEvent::*;
        assert_eq!(run_with(&[TogglePause, Quit]), PlayerState::Paused);
        assert_eq!(
            run_with(&[TogglePause, Refresh, TogglePause, Quit]),
            PlayerState::Playing
        );
        assert_eq!(run_with(&[Refresh, Quit]), PlayerState::Playing);
    }

    static_assertions::assert_impl_all!(PlayerState: Send, Sync, Copy);

    #[test]
    fn lifecycle_transitions() {
        use PlayerState::*;
        let path = [Uninitialized, Initialized, Playing, Paused, Playing, Stopped];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{pair:?}");
        }
        assert!(Initialized.can_transition_to(Stopped));
        assert!(Paused.can_transition_to(Stopped));
    }

    #[test]
    fn rejected_transitions() {
        use PlayerState::*;
        assert!(!Uninitialized.can_transition_to(Playing));
        assert!(!Stopped.can_transition_to(Playing));
        assert!(!Stopped.can_transition_to(Initialized));
        assert!(!Initialized.can_transition_to(Paused));
        assert_eq!(PlayerState::default(), Uninitialized);
    }

    #[test]
    fn invalid_state_error_names_state() {
        let err = PlayerError::InvalidState(PlayerState::Stopped);
        assert_eq!(
            err.to_string(),
            "player is Stopped, expected it to be initialized"
        );
    }
}
