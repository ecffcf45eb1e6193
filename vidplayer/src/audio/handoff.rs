use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::error::{PlayerError, PlayerResult};

/// Atomic f32 wrapper for thread-safe volume control
pub struct AtomicF32 {
    inner: AtomicU32,
}

impl AtomicF32 {
    pub fn new(value: f32) -> Self {
        Self {
            inner: AtomicU32::new(value.to_bits()),
        }
    }

    pub fn load(&self, ordering: Ordering) -> f32 {
        f32::from_bits(self.inner.load(ordering))
    }

    pub fn store(&self, value: f32, ordering: Ordering) {
        self.inner.store(value.to_bits(), ordering);
    }
}

#[derive(Default)]
struct Slot {
    chunk: Vec<u8>,
    cursor: usize,
    closed: bool,
}

impl Slot {
    fn remaining(&self) -> usize {
        self.chunk.len() - self.cursor
    }
}

/// Single-slot audio handoff between the event loop and the audio callback.
///
/// At most one chunk is in flight. [`publish`](Self::publish) waits until
/// the callback has consumed the previous chunk completely before
/// installing the next one, so chunks are never interleaved or overwritten.
pub struct AudioHandoff {
    slot: Mutex<Slot>,
    drained: Condvar,
    volume: AtomicF32,
}

impl AudioHandoff {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(Slot::default()),
            drained: Condvar::new(),
            volume: AtomicF32::new(1.0),
        }
    }

    /// Hand a chunk of interleaved sample bytes to the audio callback.
    ///
    /// Blocks until the previous chunk is drained or `timeout` passes.
    /// On timeout the new chunk is not installed.
    pub fn publish(&self, chunk: &[u8], timeout: Duration) -> PlayerResult<()> {
        let deadline = Instant::now() + timeout;
        let mut slot = self.slot.lock();

        while !slot.closed && slot.remaining() > 0 {
            if self.drained.wait_until(&mut slot, deadline).timed_out()
                && !slot.closed
                && slot.remaining() > 0
            {
                return Err(PlayerError::HandoffTimeout);
            }
        }
        if slot.closed {
            return Err(PlayerError::HandoffClosed);
        }

        slot.chunk.clear();
        slot.chunk.extend_from_slice(chunk);
        slot.cursor = 0;
        Ok(())
    }

    /// Copy pending bytes into `out`, zero-filling whatever is left.
    ///
    /// Called from the audio device thread. Returns the number of chunk
    /// bytes copied.
    pub fn fill(&self, out: &mut [u8]) -> usize {
        let mut slot = self.slot.lock();
        let count = out.len().min(slot.remaining());

        if count > 0 {
            let start = slot.cursor;
            out[..count].copy_from_slice(&slot.chunk[start..start + count]);
            slot.cursor += count;
        }
        out[count..].fill(0);

        if slot.remaining() == 0 {
            self.drained.notify_all();
        }
        count
    }

    /// Bytes of the current chunk not yet consumed.
    pub fn pending(&self) -> usize {
        self.slot.lock().remaining()
    }

    /// Drop any pending bytes, e.g. after a rewind.
    pub fn clear(&self) {
        let mut slot = self.slot.lock();
        slot.cursor = slot.chunk.len();
        self.drained.notify_all();
    }

    /// Reject all current and future producers.
    pub fn close(&self) {
        let mut slot = self.slot.lock();
        slot.closed = true;
        self.drained.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.slot.lock().closed
    }

    /// Get current volume (0.0 to 1.0)
    pub fn volume(&self) -> f32 {
        self.volume.load(Ordering::Relaxed)
    }

    /// Set volume (0.0 to 1.0)
    pub fn set_volume(&self, volume: f32) {
        self.volume.store(volume.clamp(0.0, 1.0), Ordering::Relaxed);
    }
}

impl Default for AudioHandoff {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    static_assertions::assert_impl_all!(AudioHandoff: Send, Sync);

    #[test]
    fn fill_copies_then_zero_fills() {
        let handoff = AudioHandoff::new();
        handoff.publish(&[1, 2, 3, 4, 5], Duration::ZERO).unwrap();

        let mut out = [9u8; 3];
        assert_eq!(handoff.fill(&mut out), 3);
        assert_eq!(out, [1, 2, 3]);

        let mut out = [9u8; 4];
        assert_eq!(handoff.fill(&mut out), 2);
        assert_eq!(out, [4, 5, 0, 0]);

        assert_eq!(handoff.fill(&mut out), 0);
        assert_eq!(out, [0, 0, 0, 0]);
    }

    #[test]
    fn publish_times_out_while_previous_chunk_pending() {
        let handoff = AudioHandoff::new();
        handoff.publish(&[1; 16], Duration::ZERO).unwrap();

        let err = handoff
            .publish(&[2; 16], Duration::from_millis(20))
            .unwrap_err();
        assert!(matches!(err, PlayerError::HandoffTimeout));

        // The pending chunk is untouched.
        let mut out = [0u8; 16];
        handoff.fill(&mut out);
        assert_eq!(out, [1; 16]);
    }

    #[test]
    fn close_rejects_producers() {
        let handoff = Arc::new(AudioHandoff::new());
        handoff.publish(&[1; 8], Duration::ZERO).unwrap();

        let waiting = {
            let handoff = Arc::clone(&handoff);
            thread::spawn(move || handoff.publish(&[2; 8], Duration::from_secs(5)))
        };
        thread::sleep(Duration::from_millis(20));
        handoff.close();

        assert!(matches!(
            waiting.join().unwrap(),
            Err(PlayerError::HandoffClosed)
        ));
        assert!(handoff.is_closed());
    }

    #[test]
    fn clear_drops_pending_bytes() {
        let handoff = AudioHandoff::new();
        handoff.publish(&[1; 8], Duration::ZERO).unwrap();
        handoff.clear();
        assert_eq!(handoff.pending(), 0);
        handoff.publish(&[2; 8], Duration::ZERO).unwrap();
        assert_eq!(handoff.pending(), 8);
    }

    #[test]
    fn back_to_back_producers_never_interleave() {
        const CHUNK: usize = 64;
        const CHUNKS_PER_PRODUCER: usize = 50;

        let handoff = Arc::new(AudioHandoff::new());
        let producers: Vec<_> = [1u8, 2u8]
            .into_iter()
            .map(|tag| {
                let handoff = Arc::clone(&handoff);
                thread::spawn(move || {
                    for _ in 0..CHUNKS_PER_PRODUCER {
                        handoff
                            .publish(&[tag; CHUNK], Duration::from_secs(5))
                            .unwrap();
                    }
                })
            })
            .collect();

        let total = CHUNK * CHUNKS_PER_PRODUCER * 2;
        let mut received = Vec::with_capacity(total);
        let mut out = [0u8; 7];
        let deadline = Instant::now() + Duration::from_secs(10);
        while received.len() < total && Instant::now() < deadline {
            let n = handoff.fill(&mut out);
            if n == 0 {
                thread::yield_now();
            }
            received.extend_from_slice(&out[..n]);
        }
        for producer in producers {
            producer.join().unwrap();
        }

        assert_eq!(received.len(), total);
        for chunk in received.chunks(CHUNK) {
            assert!(
                chunk.iter().all(|&b| b == chunk[0]),
                "chunk mixes producers: {chunk:?}"
            );
        }
    }

    #[test]
    fn volume_is_clamped() {
        let handoff = AudioHandoff::new();
        assert_eq!(handoff.volume(), 1.0);
        handoff.set_volume(1.5);
        assert_eq!(handoff.volume(), 1.0);
        handoff.set_volume(-0.5);
        assert_eq!(handoff.volume(), 0.0);
    }
}
