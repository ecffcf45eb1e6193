/*!
    SDL event pump adapter.

    Ticks from the ticker thread are pushed into SDL's queue as custom
    user events, so the event loop blocks on a single queue for both
    input and refresh ticks.
*/

use sdl2::event::{Event, EventSender};
use sdl2::keyboard::Scancode;
use sdl2::{EventPump, EventSubsystem, Sdl};

use crate::error::{PlayerError, PlayerResult};
use crate::event::{EventSource, PlayerEvent, TickSink};

#[derive(Clone, Copy, Debug)]
struct TickEvent(PlayerEvent);

/**
    Reads player events from the SDL queue.
*/
pub struct SdlEvents {
    subsystem: EventSubsystem,
    pump: EventPump,
}

impl SdlEvents {
    pub fn new(sdl: &Sdl) -> PlayerResult<Self> {
        let subsystem = sdl.event().map_err(PlayerError::DisplayInit)?;
        subsystem
            .register_custom_event::<TickEvent>()
            .map_err(PlayerError::DisplayInit)?;
        let pump = sdl.event_pump().map_err(PlayerError::DisplayInit)?;
        Ok(Self { subsystem, pump })
    }

    /**
        A sink the ticker thread can post into this queue from.
    */
    pub fn tick_sink(&self) -> SdlTickSink {
        SdlTickSink {
            sender: self.subsystem.event_sender(),
        }
    }
}

impl EventSource for SdlEvents {
    fn wait_event(&mut self) -> Option<PlayerEvent> {
        loop {
            let event = self.pump.wait_event();
            if let Some(mapped) = map_event(&event) {
                return Some(mapped);
            }
        }
    }
}

fn map_event(event: &Event) -> Option<PlayerEvent> {
    if event.is_user_event() {
        return event.as_user_event_type::<TickEvent>().map(|tick| tick.0);
    }
    match event {
        Event::Quit { .. } => Some(PlayerEvent::Quit),
        Event::KeyDown {
            scancode: Some(scancode),
            repeat: false,
            ..
        } => map_key(*scancode),
        _ => None,
    }
}

fn map_key(scancode: Scancode) -> Option<PlayerEvent> {
    match scancode {
        Scancode::Space => Some(PlayerEvent::TogglePause),
        Scancode::Escape | Scancode::Q => Some(PlayerEvent::Quit),
        Scancode::Up => Some(PlayerEvent::VolumeUp),
        Scancode::Down => Some(PlayerEvent::VolumeDown),
        _ => None,
    }
}

/**
    Posts ticker events into the SDL queue. Safe to use from any thread.
*/
pub struct SdlTickSink {
    sender: EventSender,
}

impl TickSink for SdlTickSink {
    fn post(&self, event: PlayerEvent) -> bool {
        match self.sender.push_custom_event(TickEvent(event)) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, ?event, "failed to post event");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_bindings() {
        assert_eq!(map_key(Scancode::Space), Some(PlayerEvent::TogglePause));
        assert_eq!(map_key(Scancode::Escape), Some(PlayerEvent::Quit));
        assert_eq!(map_key(Scancode::Q), Some(PlayerEvent::Quit));
        assert_eq!(map_key(Scancode::Up), Some(PlayerEvent::VolumeUp));
        assert_eq!(map_key(Scancode::Down), Some(PlayerEvent::VolumeDown));
        assert_eq!(map_key(Scancode::A), None);
    }

    #[test]
    fn quit_event_maps_to_quit() {
        assert_eq!(
            map_event(&Event::Quit { timestamp: 0 }),
            Some(PlayerEvent::Quit)
        );
    }
}
