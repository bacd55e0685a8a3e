//! Pulse and timeline type definitions
//!
//! These are the values the engine plays back and hands to the presenter.

use std::time::Duration;

use serde::Serialize;

/// Label carried by the pause that separates two repetitions of the word.
pub const START_LABEL: &str = "Start";

/// One timed lamp state.
///
/// # Fields
/// - `on`: whether the lamp is lit
/// - `duration`: how long the state lasts, in seconds at speed 1.0
/// - `label`: the letter being sent while lit, empty during gaps,
///   [`START_LABEL`] on the word gap
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pulse {
    pub on: bool,
    pub duration: f64,
    pub label: String,
}

impl Pulse {
    pub fn on(duration: f64, label: impl Into<String>) -> Self {
        Self {
            on: true,
            duration,
            label: label.into(),
        }
    }

    pub fn off(duration: f64) -> Self {
        Self {
            on: false,
            duration,
            label: String::new(),
        }
    }

    /// The pause inserted before the timeline starts over.
    pub fn word_gap(duration: f64) -> Self {
        Self {
            on: false,
            duration,
            label: START_LABEL.to_string(),
        }
    }

    /// Wall-clock delay for this pulse at `speed`.
    ///
    /// Negative or NaN products become zero; products too large for a
    /// `Duration` saturate.
    pub fn scaled_delay(&self, speed: f64) -> Duration {
        let seconds = (self.duration * speed).max(0.0);
        Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX)
    }
}

/// The pulse sequence for one target string.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Timeline(Vec<Pulse>);

impl Timeline {
    pub fn new(pulses: Vec<Pulse>) -> Self {
        Self(pulses)
    }

    pub fn pulses(&self) -> &[Pulse] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<&Pulse> {
        self.0.get(index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Pulse> {
        self.0.iter()
    }

    /// Sum of all pulse durations, in seconds at speed 1.0.
    pub fn total_duration(&self) -> f64 {
        self.0.iter().map(|pulse| pulse.duration).sum()
    }
}

impl<'a> IntoIterator for &'a Timeline {
    type Item = &'a Pulse;
    type IntoIter = std::slice::Iter<'a, Pulse>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
