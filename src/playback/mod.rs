//! # Playback Module
//!
//! Plays a target string as an endless loop of lamp pulses.
//!
//! ## Sub-modules
//! - `types` - [`Pulse`] and [`Timeline`] definitions
//! - `schedule` - [`Ticket`], [`Continuation`] and the [`TimerQueue`]
//! - `engine` - the [`Trainer`] state machine and its [`Controls`] / [`Presenter`] seams
//!
//! ## Loop
//!
//! A restart picks a new target, transcribes it and places the cursor on a
//! random pulse, so the learner cannot rely on hearing the word from its first
//! letter. Each step then emits one pulse:
//!
//! ```text
//! cursor < len   -> timeline[cursor], cursor += 1
//! cursor >= len  -> word gap ("Start"), cursor = 0
//! ```
//!
//! The same timeline repeats until the next restart.
//!
//! ## Speed
//!
//! The delay after each pulse is its duration times the speed factor, read
//! from [`Controls::speed_reading`] at that step. A change of speed therefore
//! shows up at the next pulse boundary.
//!
//! ## Example
//! ```rust
//! use morsetrain::playback::{PresenterState, StaticControls, TimerQueue, Trainer};
//! use morsetrain::{Metadata, SequenceRandom};
//!
//! let metadata = Metadata::from_json_str(r#"{
//!     "words": { "e": ["E"] },
//!     "alphabet": { "E": "." },
//!     "display": { "short": 1, "long": 3, "symbol_gap": 1, "letter_gap": 3, "word_gap": 7 }
//! }"#).unwrap();
//! let mut trainer = Trainer::with_random(
//!     metadata,
//!     StaticControls::new("e"),
//!     PresenterState::default(),
//!     SequenceRandom::new(vec![0.0]),
//! );
//!
//! let mut queue = TimerQueue::new();
//! queue.schedule(trainer.restart().unwrap());
//! let mut labels = Vec::new();
//! for _ in 0..4 {
//!     let ticket = queue.advance().unwrap();
//!     queue.schedule(trainer.step(ticket).unwrap());
//!     labels.push(trainer.presenter().label.clone());
//! }
//! assert_eq!(labels, ["E", "", "", "Start"]);
//! assert_eq!(queue.now().as_secs(), 5);
//! ```

mod engine;
mod schedule;
mod types;

#[cfg(test)]
mod tests;

pub use engine::{
    effective_speed, Controls, EngineState, Phase, Playback, Presenter, PresenterState, Solution,
    StaticControls, Trainer, MAX_SPEED, MIN_SPEED,
};
pub use schedule::{Continuation, Ticket, TimerQueue};
pub use types::{Pulse, Timeline, START_LABEL};
