pub mod config;
pub mod error;
pub mod generator;
pub mod playback;
pub mod random;
pub mod transcribe;

pub use config::{load, Alphabet, Category, Mark, Metadata, Timing};
pub use error::*;
pub use generator::{generate, generate_named};
pub use playback::{Continuation, Pulse, Ticket, Timeline, TimerQueue, Trainer};
pub use random::{RandomSource, SeededRandom, SequenceRandom, ThreadRandom};
pub use transcribe::{AnnotatedMorse, LetterCode, Transcriber};

/// Transcribe `word` with the alphabet and timing of `metadata`.
/// This is the main entry point for one-off conversions.
pub fn transcribe(metadata: &Metadata, word: &str) -> Result<Timeline, TrainerError> {
    Transcriber::for_metadata(metadata).transcribe_word(word)
}
