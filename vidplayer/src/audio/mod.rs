mod handoff;
mod output;

pub use handoff::{AtomicF32, AudioHandoff};
pub use output::{AudioOutput, OUTPUT_CHANNELS};
