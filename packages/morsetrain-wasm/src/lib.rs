use morsetrain::playback::{Continuation, PresenterState, StaticControls, Trainer};
use morsetrain::{Metadata, RandomSource, Ticket, TrainerError};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[derive(Serialize)]
struct BridgeError {
    message: String,
    kind: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Scheduled {
    ticket: f64,
    delay_ms: f64,
}

fn error_to_js(e: TrainerError) -> JsValue {
    let kind = match &e {
        TrainerError::Io { .. } => "io",
        TrainerError::Json(_) | TrainerError::Yaml(_) | TrainerError::Config(_) => "config",
        TrainerError::UnknownCategory(_) | TrainerError::EmptyCategory(_) => "category",
        TrainerError::MissingLetter(_) => "letter",
    };
    let error = BridgeError {
        message: e.to_string(),
        kind,
    };
    JsValue::from_str(&serde_json::to_string(&error).unwrap_or_else(|_| error.message.clone()))
}

fn scheduled_json(continuation: Continuation) -> String {
    let scheduled = Scheduled {
        ticket: continuation.ticket.generation() as f64,
        delay_ms: continuation.delay.as_secs_f64() * 1000.0,
    };
    serde_json::to_string(&scheduled).unwrap_or_default()
}

/// The browser's `Math.random`.
struct JsRandom;

impl RandomSource for JsRandom {
    fn next_uniform(&mut self) -> f64 {
        js_sys::Math::random()
    }
}

/// Trainer driven from JavaScript.
///
/// JS owns the timer: call `restart()`, then keep calling `step(ticket)` after
/// each returned `delayMs` with `setTimeout`. A `step` with an outdated ticket
/// returns `undefined`, which ends that timer chain.
#[wasm_bindgen]
pub struct WebTrainer {
    inner: Trainer<StaticControls, PresenterState, JsRandom>,
}

#[wasm_bindgen]
impl WebTrainer {
    /// Build a trainer from the fetched `metadata.json` text.
    #[wasm_bindgen(constructor)]
    pub fn new(metadata_json: &str, category: &str) -> Result<WebTrainer, JsValue> {
        let metadata = Metadata::from_json_str(metadata_json).map_err(error_to_js)?;
        Ok(WebTrainer {
            inner: Trainer::with_random(
                metadata,
                StaticControls::new(category),
                PresenterState::default(),
                JsRandom,
            ),
        })
    }

    /// Pick a new word. Returns `{ticket, delayMs}` as JSON.
    pub fn restart(&mut self) -> Result<String, JsValue> {
        self.inner
            .restart()
            .map(scheduled_json)
            .map_err(error_to_js)
    }

    /// Show the next pulse. Returns `{ticket, delayMs}` as JSON, or nothing for a stale ticket.
    pub fn step(&mut self, ticket: f64) -> Option<String> {
        self.inner
            .step(Ticket::from_generation(ticket as u64))
            .map(scheduled_json)
    }

    pub fn reveal(&mut self) {
        self.inner.reveal();
    }

    pub fn set_category(&mut self, category: &str) {
        self.inner.controls_mut().category = category.to_string();
    }

    pub fn set_speed(&mut self, speed: &str) {
        self.inner.controls_mut().speed = speed.to_string();
    }

    #[wasm_bindgen(getter)]
    pub fn indicator(&self) -> bool {
        self.inner.presenter().indicator
    }

    #[wasm_bindgen(getter)]
    pub fn label(&self) -> String {
        self.inner.presenter().label.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn solution_visible(&self) -> bool {
        self.inner.presenter().solution_visible
    }

    pub fn solution_word(&self) -> Option<String> {
        self.inner
            .presenter()
            .solution
            .as_ref()
            .map(|solution| solution.word.clone())
    }

    pub fn solution_html(&self) -> Option<String> {
        self.inner
            .presenter()
            .solution
            .as_ref()
            .map(|solution| solution.morse.to_html())
    }

    /// Category names as a JSON array, for the selector.
    pub fn categories(&self) -> String {
        let names: Vec<&str> = self.inner.metadata().category_names().collect();
        serde_json::to_string(&names).unwrap_or_else(|_| "[]".to_string())
    }

    /// The whole presenter state as JSON.
    pub fn state_json(&self) -> String {
        serde_json::to_string(self.inner.presenter()).unwrap_or_default()
    }
}

/// Transcribe a word and return its pulses as a JSON array.
#[wasm_bindgen]
pub fn transcribe(metadata_json: &str, word: &str) -> Result<String, JsValue> {
    let metadata = Metadata::from_json_str(metadata_json).map_err(error_to_js)?;
    let timeline = morsetrain::transcribe(&metadata, word).map_err(error_to_js)?;
    serde_json::to_string(&timeline).map_err(|e| JsValue::from_str(&e.to_string()))
}
