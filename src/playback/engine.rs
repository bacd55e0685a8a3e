//! Playback engine
//!
//! Owns the current target and its timeline, and walks a cursor over it one
//! pulse per step. The engine is single-threaded and never blocks: every step
//! emits exactly one pulse to the [`Presenter`] and returns the
//! [`Continuation`] the caller must honour to keep playback going.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, trace, warn};

use super::schedule::{Continuation, Ticket};
use super::types::{Pulse, Timeline};
use crate::config::Metadata;
use crate::error::TrainerError;
use crate::generator::generate_named;
use crate::random::{RandomSource, ThreadRandom};
use crate::transcribe::{AnnotatedMorse, Transcriber};

pub const MIN_SPEED: f64 = 0.01;
pub const MAX_SPEED: f64 = 100.0;

/// Turn a raw speed-control reading into a delay multiplier.
///
/// Anything that does not parse as a number counts as `1.0`; numbers are
/// clamped to `[MIN_SPEED, MAX_SPEED]`.
///
/// ```
/// use morsetrain::playback::effective_speed;
///
/// assert_eq!(effective_speed("abc"), 1.0);
/// assert_eq!(effective_speed("-5"), 0.01);
/// assert_eq!(effective_speed("0"), 0.01);
/// assert_eq!(effective_speed("500"), 100.0);
/// assert_eq!(effective_speed(" 2.5 "), 2.5);
/// ```
pub fn effective_speed(reading: &str) -> f64 {
    match reading.trim().parse::<f64>() {
        Ok(factor) if !factor.is_nan() => factor.clamp(MIN_SPEED, MAX_SPEED),
        _ => 1.0,
    }
}

/// Inputs the engine reads from the user interface.
pub trait Controls {
    /// Name of the selected vocabulary category; read on every restart.
    fn category(&self) -> String;

    /// Raw contents of the speed input; read on every step.
    fn speed_reading(&self) -> String;
}

/// Outputs the engine drives.
pub trait Presenter {
    fn set_indicator(&mut self, on: bool);

    fn set_current_label(&mut self, label: &str);

    /// Called on every restart with the new answer.
    fn show_solution(&mut self, solution: &Solution);

    fn set_solution_visible(&mut self, visible: bool);
}

/// Controls backed by plain stored values.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticControls {
    pub category: String,
    pub speed: String,
}

impl StaticControls {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            speed: "1".to_string(),
        }
    }

    pub fn with_speed(mut self, speed: impl Into<String>) -> Self {
        self.speed = speed.into();
        self
    }
}

impl Controls for StaticControls {
    fn category(&self) -> String {
        self.category.clone()
    }

    fn speed_reading(&self) -> String {
        self.speed.clone()
    }
}

/// Presenter that just remembers what it was last told to show.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenterState {
    pub indicator: bool,
    pub label: String,
    pub solution: Option<Solution>,
    pub solution_visible: bool,
}

impl Presenter for PresenterState {
    fn set_indicator(&mut self, on: bool) {
        self.indicator = on;
    }

    fn set_current_label(&mut self, label: &str) {
        self.label.clear();
        self.label.push_str(label);
    }

    fn show_solution(&mut self, solution: &Solution) {
        self.solution = Some(solution.clone());
    }

    fn set_solution_visible(&mut self, visible: bool) {
        self.solution_visible = visible;
    }
}

/// The answer for the current target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Solution {
    pub word: String,
    pub morse: AnnotatedMorse,
}

/// A target being played.
#[derive(Debug, Clone, PartialEq)]
pub struct Playback {
    pub target: String,
    pub timeline: Timeline,
    /// Index of the next pulse; `timeline.len()` means the word gap is next.
    pub cursor: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Idle,
    Running(Playback),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineState {
    pub phase: Phase,
    /// Bumped on every successful restart; continuations carry it as their ticket.
    pub generation: u64,
    pub revealed: bool,
}

impl Default for EngineState {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            generation: 0,
            revealed: false,
        }
    }
}

/// The Morse trainer.
///
/// # Example
/// ```
/// use morsetrain::playback::{PresenterState, StaticControls, Trainer};
/// use morsetrain::{Metadata, SequenceRandom};
///
/// let metadata = Metadata::from_json_str(r#"{
///     "words": { "sos": ["SOS"] },
///     "alphabet": { "S": "...", "O": "---" },
///     "display": { "short": 0.2, "long": 0.6, "symbol_gap": 0.2, "letter_gap": 0.6, "word_gap": 1.4 }
/// }"#).unwrap();
///
/// let mut trainer = Trainer::with_random(
///     metadata,
///     StaticControls::new("sos"),
///     PresenterState::default(),
///     SequenceRandom::new(vec![0.0]),
/// );
///
/// let first = trainer.restart().unwrap();
/// let next = trainer.step(first.ticket).unwrap();
/// assert!(trainer.presenter().indicator);
/// assert_eq!(trainer.presenter().label, "S");
/// assert_eq!(next.delay.as_secs_f64(), 0.2);
/// ```
pub struct Trainer<C, P, R = ThreadRandom> {
    metadata: Metadata,
    controls: C,
    presenter: P,
    random: R,
    state: EngineState,
}

impl<C: Controls, P: Presenter> Trainer<C, P> {
    pub fn new(metadata: Metadata, controls: C, presenter: P) -> Self {
        Self::with_random(metadata, controls, presenter, ThreadRandom)
    }
}

impl<C: Controls, P: Presenter, R: RandomSource> Trainer<C, P, R> {
    pub fn with_random(metadata: Metadata, controls: C, presenter: P, random: R) -> Self {
        Self {
            metadata,
            controls,
            presenter,
            random,
            state: EngineState::default(),
        }
    }

    /// Pick a new target from the selected category and start playing it.
    ///
    /// Playback starts at a random pulse. Continuations issued before this
    /// call become stale. On error nothing changes, including any playback
    /// already running.
    pub fn restart(&mut self) -> Result<Continuation, TrainerError> {
        let category = self.controls.category();
        let (playback, morse) = match self.prepare(&category) {
            Ok(prepared) => prepared,
            Err(e) => {
                warn!(category = %category, error = %e, "restart failed");
                return Err(e);
            }
        };

        self.state.generation += 1;
        self.state.revealed = false;
        self.presenter.set_indicator(false);
        self.presenter.set_solution_visible(false);
        self.presenter.show_solution(&Solution {
            word: playback.target.clone(),
            morse,
        });
        debug!(
            category = %category,
            target = %playback.target,
            pulses = playback.timeline.len(),
            cursor = playback.cursor,
            generation = self.state.generation,
            "restarted"
        );
        self.state.phase = Phase::Running(playback);

        Ok(Continuation {
            delay: Duration::ZERO,
            ticket: self.ticket(),
        })
    }

    fn prepare(&mut self, category: &str) -> Result<(Playback, AnnotatedMorse), TrainerError> {
        let target = generate_named(&self.metadata, category, &mut self.random)?;
        let transcriber = Transcriber::for_metadata(&self.metadata);
        let timeline = transcriber.transcribe_word(&target)?;
        let morse = transcriber.annotate(&target)?;
        let cursor = self.random.next_index(timeline.len());
        Ok((
            Playback {
                target,
                timeline,
                cursor,
            },
            morse,
        ))
    }

    /// Emit the pulse under the cursor and advance.
    ///
    /// Returns `None` without touching anything if `ticket` is stale or
    /// nothing is playing.
    pub fn step(&mut self, ticket: Ticket) -> Option<Continuation> {
        if ticket != self.ticket() {
            debug!(
                ticket = ticket.generation(),
                current = self.state.generation,
                "ignoring stale continuation"
            );
            return None;
        }
        let Phase::Running(playback) = &mut self.state.phase else {
            return None;
        };

        let pulse = if playback.cursor >= playback.timeline.len() {
            playback.cursor = 0;
            Pulse::word_gap(self.metadata.timing.word_gap)
        } else {
            let pulse = playback.timeline.pulses()[playback.cursor].clone();
            playback.cursor += 1;
            pulse
        };

        self.presenter.set_indicator(pulse.on);
        self.presenter.set_current_label(&pulse.label);

        let speed = effective_speed(&self.controls.speed_reading());
        let delay = pulse.scaled_delay(speed);
        trace!(on = pulse.on, label = %pulse.label, ?delay, speed, "pulse");

        Some(Continuation { delay, ticket })
    }

    /// Show the answer. Has no effect on playback.
    pub fn reveal(&mut self) {
        self.set_revealed(true);
    }

    pub fn set_revealed(&mut self, revealed: bool) {
        self.state.revealed = revealed;
        self.presenter.set_solution_visible(revealed);
    }

    /// The ticket a continuation must carry to be honoured.
    pub fn ticket(&self) -> Ticket {
        Ticket::from_generation(self.state.generation)
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn playback(&self) -> Option<&Playback> {
        match &self.state.phase {
            Phase::Running(playback) => Some(playback),
            Phase::Idle => None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.playback().is_some()
    }

    pub fn is_revealed(&self) -> bool {
        self.state.revealed
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn controls(&self) -> &C {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut C {
        &mut self.controls
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }
}
