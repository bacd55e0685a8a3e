use std::collections::BTreeMap;
use std::time::Duration;

use super::*;
use crate::config::{Alphabet, Category, Metadata, Timing};
use crate::error::TrainerError;
use crate::random::SequenceRandom;

#[derive(Debug, Clone, PartialEq)]
enum Shown {
    Indicator(bool),
    Label(String),
    Solution(String),
    Visible(bool),
}

#[derive(Debug, Default)]
struct RecordingPresenter {
    events: Vec<Shown>,
}

impl RecordingPresenter {
    fn labels(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Shown::Label(label) => Some(label.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Presenter for RecordingPresenter {
    fn set_indicator(&mut self, on: bool) {
        self.events.push(Shown::Indicator(on));
    }

    fn set_current_label(&mut self, label: &str) {
        self.events.push(Shown::Label(label.to_string()));
    }

    fn show_solution(&mut self, solution: &Solution) {
        self.events.push(Shown::Solution(solution.word.clone()));
    }

    fn set_solution_visible(&mut self, visible: bool) {
        self.events.push(Shown::Visible(visible));
    }
}

fn timing() -> Timing {
    Timing {
        short: 1.0,
        long: 2.0,
        symbol_gap: 0.5,
        letter_gap: 1.0,
        word_gap: 3.0,
    }
}

fn metadata() -> Metadata {
    let mut words = BTreeMap::new();
    words.insert("ab".to_string(), Category::Phrases(vec!["AB".to_string()]));
    words.insert(
        "two".to_string(),
        Category::Phrases(vec!["A".to_string(), "B".to_string()]),
    );
    words.insert(
        "letters".to_string(),
        Category::Random {
            charset: vec!['A', 'B'],
            length: 2..=3,
        },
    );
    words.insert("blank".to_string(), Category::Phrases(vec![String::new()]));
    words.insert("none".to_string(), Category::Phrases(vec![]));
    Metadata {
        words,
        alphabet: Alphabet::from_pairs([('A', "."), ('B', "-.")]).unwrap(),
        timing: timing(),
    }
}

fn trainer(
    category: &str,
    draws: Vec<f64>,
) -> Trainer<StaticControls, RecordingPresenter, SequenceRandom> {
    Trainer::with_random(
        metadata(),
        StaticControls::new(category),
        RecordingPresenter::default(),
        SequenceRandom::new(draws),
    )
}

fn secs(seconds: f64) -> Duration {
    Duration::from_secs_f64(seconds)
}

#[test]
fn test_starts_idle() {
    let mut trainer = trainer("ab", vec![0.0]);
    assert!(!trainer.is_running());
    assert_eq!(trainer.state().phase, Phase::Idle);
    assert_eq!(trainer.step(trainer.ticket()), None);
    assert!(trainer.presenter().events.is_empty());
}

#[test]
fn test_restart_builds_timeline() {
    let mut trainer = trainer("ab", vec![0.0]);
    let first = trainer.restart().unwrap();

    assert_eq!(first.delay, Duration::ZERO);
    assert_eq!(first.ticket, Ticket::from_generation(1));
    let playback = trainer.playback().unwrap();
    assert_eq!(playback.target, "AB");
    assert_eq!(playback.timeline.len(), 8);
    assert_eq!(playback.cursor, 0);
    assert_eq!(
        trainer.presenter().events,
        vec![
            Shown::Indicator(false),
            Shown::Visible(false),
            Shown::Solution("AB".to_string()),
        ]
    );
}

#[test]
fn test_restart_starts_at_random_pulse() {
    // phrase draw, then cursor draw 0.5 * 8
    let mut trainer = trainer("ab", vec![0.0, 0.5]);
    trainer.restart().unwrap();
    assert_eq!(trainer.playback().unwrap().cursor, 4);
}

#[test]
fn test_end_to_end_pulse_sequence() {
    let mut trainer = trainer("ab", vec![0.0]);
    let mut continuation = trainer.restart().unwrap();
    let mut seen = Vec::new();
    for _ in 0..9 {
        continuation = trainer.step(continuation.ticket).unwrap();
        let shown = trainer.presenter().events.len();
        let (on, label) = match &trainer.presenter().events[shown - 2..] {
            [Shown::Indicator(on), Shown::Label(label)] => (*on, label.clone()),
            other => panic!("unexpected events {:?}", other),
        };
        seen.push((on, label, continuation.delay));
    }

    let expected = vec![
        (true, "A".to_string(), secs(1.0)),
        (false, String::new(), secs(0.5)),
        (false, String::new(), secs(1.0)),
        (true, "B".to_string(), secs(2.0)),
        (false, String::new(), secs(0.5)),
        (true, "B".to_string(), secs(1.0)),
        (false, String::new(), secs(0.5)),
        (false, String::new(), secs(1.0)),
        (false, START_LABEL.to_string(), secs(3.0)),
    ];
    assert_eq!(seen, expected);
}

#[test]
fn test_loop_returns_to_start_after_one_word_gap() {
    let mut trainer = trainer("ab", vec![0.0]);
    let mut continuation = trainer.restart().unwrap();
    let len = trainer.playback().unwrap().timeline.len();

    for _ in 0..len + 1 {
        continuation = trainer.step(continuation.ticket).unwrap();
    }

    assert_eq!(trainer.playback().unwrap().cursor, 0);
    let starts = trainer
        .presenter()
        .labels()
        .into_iter()
        .filter(|label| *label == START_LABEL)
        .count();
    assert_eq!(starts, 1);
}

#[test]
fn test_loop_repeats_same_target() {
    let mut trainer = trainer("letters", vec![0.3, 0.1, 0.7, 0.2, 0.0]);
    let mut continuation = trainer.restart().unwrap();
    let before = trainer.playback().unwrap().clone();

    for _ in 0..3 * (before.timeline.len() + 1) {
        continuation = trainer.step(continuation.ticket).unwrap();
    }

    let after = trainer.playback().unwrap();
    assert_eq!(after.target, before.target);
    assert_eq!(after.timeline, before.timeline);
    assert_eq!(after.cursor, before.cursor);
}

#[test]
fn test_start_mid_word_reaches_word_gap_first() {
    // cursor draw 0.9 * 8 -> 7, the final letter gap
    let mut trainer = trainer("ab", vec![0.0, 0.9]);
    let first = trainer.restart().unwrap();
    let second = trainer.step(first.ticket).unwrap();
    assert_eq!(second.delay, secs(1.0));
    let third = trainer.step(second.ticket).unwrap();
    assert_eq!(third.delay, secs(3.0));
    assert_eq!(trainer.presenter().labels(), vec!["", START_LABEL]);
    assert_eq!(trainer.playback().unwrap().cursor, 0);
}

#[test]
fn test_stale_continuation_is_ignored() {
    let mut trainer = trainer("ab", vec![0.0]);
    let old = trainer.restart().unwrap();
    trainer.step(old.ticket).unwrap();
    trainer.step(old.ticket).unwrap();

    trainer.controls_mut().category = "two".to_string();
    let fresh = trainer.restart().unwrap();
    assert_ne!(old.ticket, fresh.ticket);

    let events_before = trainer.presenter().events.len();
    let state_before = trainer.state().clone();
    assert_eq!(trainer.step(old.ticket), None);
    assert_eq!(trainer.presenter().events.len(), events_before);
    assert_eq!(trainer.state(), &state_before);

    assert!(trainer.step(fresh.ticket).is_some());
    assert_eq!(trainer.playback().unwrap().target, "A");
}

#[test]
fn test_speed_changes_apply_at_next_pulse() {
    let mut trainer = trainer("ab", vec![0.0]);
    let first = trainer.restart().unwrap();
    let second = trainer.step(first.ticket).unwrap();
    assert_eq!(second.delay, secs(1.0));

    trainer.controls_mut().speed = "2".to_string();
    let third = trainer.step(second.ticket).unwrap();
    assert_eq!(third.delay, secs(1.0)); // 0.5 * 2

    trainer.controls_mut().speed = "not a number".to_string();
    let fourth = trainer.step(third.ticket).unwrap();
    assert_eq!(fourth.delay, secs(1.0)); // letter gap at 1.0

    trainer.controls_mut().speed = "1000".to_string();
    let fifth = trainer.step(fourth.ticket).unwrap();
    assert_eq!(fifth.delay, secs(200.0)); // dash clamped to 100x
}

#[test]
fn test_speed_clamping() {
    assert_eq!(effective_speed("abc"), 1.0);
    assert_eq!(effective_speed("-5"), MIN_SPEED);
    assert_eq!(effective_speed("0"), MIN_SPEED);
    assert_eq!(effective_speed("500"), MAX_SPEED);
    assert_eq!(effective_speed(""), 1.0);
    assert_eq!(effective_speed("NaN"), 1.0);
    assert_eq!(effective_speed("inf"), MAX_SPEED);
    assert_eq!(effective_speed("0.25"), 0.25);
}

#[test]
fn test_reveal_and_restart_hides() {
    let mut trainer = trainer("ab", vec![0.0]);
    trainer.restart().unwrap();
    assert!(!trainer.is_revealed());

    trainer.reveal();
    assert!(trainer.is_revealed());
    assert_eq!(trainer.presenter().events.last(), Some(&Shown::Visible(true)));

    trainer.restart().unwrap();
    assert!(!trainer.is_revealed());
    assert!(trainer
        .presenter()
        .events
        .ends_with(&[Shown::Indicator(false), Shown::Visible(false), Shown::Solution("AB".to_string())]));
}

#[test]
fn test_reveal_does_not_affect_playback() {
    let mut trainer = trainer("ab", vec![0.0]);
    let first = trainer.restart().unwrap();
    let ticket = trainer.ticket();
    let cursor = trainer.playback().unwrap().cursor;

    trainer.reveal();
    trainer.set_revealed(false);

    assert_eq!(trainer.ticket(), ticket);
    assert_eq!(trainer.playback().unwrap().cursor, cursor);
    assert!(trainer.step(first.ticket).is_some());
}

#[test]
fn test_failed_restart_keeps_current_playback() {
    let mut trainer = trainer("ab", vec![0.0]);
    let running = trainer.restart().unwrap();
    let state_before = trainer.state().clone();

    trainer.controls_mut().category = "missing".to_string();
    assert!(matches!(
        trainer.restart(),
        Err(TrainerError::UnknownCategory(name)) if name == "missing"
    ));
    trainer.controls_mut().category = "none".to_string();
    assert!(matches!(
        trainer.restart(),
        Err(TrainerError::EmptyCategory(_))
    ));

    assert_eq!(trainer.state(), &state_before);
    assert!(trainer.step(running.ticket).is_some());
}

#[test]
fn test_failed_first_restart_stays_idle() {
    let mut trainer = trainer("missing", vec![0.0]);
    assert!(trainer.restart().is_err());
    assert_eq!(trainer.state().phase, Phase::Idle);
    assert_eq!(trainer.state().generation, 0);
    assert!(trainer.presenter().events.is_empty());
}

#[test]
fn test_missing_letter_fails_restart() {
    let mut metadata = metadata();
    metadata
        .words
        .insert("bad".to_string(), Category::Phrases(vec!["AZ".to_string()]));
    let mut trainer = Trainer::with_random(
        metadata,
        StaticControls::new("bad"),
        RecordingPresenter::default(),
        SequenceRandom::new(vec![0.0]),
    );
    assert!(matches!(
        trainer.restart(),
        Err(TrainerError::MissingLetter('Z'))
    ));
    assert!(!trainer.is_running());
}

#[test]
fn test_empty_target_loops_on_word_gap() {
    let mut trainer = trainer("blank", vec![0.0]);
    let mut continuation = trainer.restart().unwrap();
    assert!(trainer.playback().unwrap().timeline.is_empty());
    for _ in 0..3 {
        continuation = trainer.step(continuation.ticket).unwrap();
        assert_eq!(continuation.delay, secs(3.0));
    }
    assert_eq!(trainer.presenter().labels(), vec![START_LABEL; 3]);
}

#[test]
fn test_zero_durations_are_tolerated() {
    let mut metadata = metadata();
    metadata.timing = Timing {
        short: 0.0,
        long: 0.0,
        symbol_gap: 0.0,
        letter_gap: 0.0,
        word_gap: 0.0,
    };
    let mut trainer = Trainer::with_random(
        metadata,
        StaticControls::new("ab"),
        RecordingPresenter::default(),
        SequenceRandom::new(vec![0.0]),
    );
    let mut continuation = trainer.restart().unwrap();
    for _ in 0..20 {
        continuation = trainer.step(continuation.ticket).unwrap();
        assert_eq!(continuation.delay, Duration::ZERO);
    }
}

#[test]
fn test_virtual_clock_restart_mid_pulse() {
    let mut trainer = trainer("ab", vec![0.0]);
    let mut queue = TimerQueue::new();
    queue.schedule(trainer.restart().unwrap());

    // A (1.0), gap (0.5): the gap's continuation is due at 1.5
    for _ in 0..2 {
        let ticket = queue.advance().unwrap();
        queue.schedule(trainer.step(ticket).unwrap());
    }
    assert_eq!(queue.now(), secs(1.0));

    trainer.controls_mut().category = "two".to_string();
    queue.schedule(trainer.restart().unwrap());
    assert_eq!(queue.len(), 2);

    let mut handled = 0;
    let mut ignored = 0;
    while queue.now() < secs(10.0) {
        let ticket = queue.advance().unwrap();
        match trainer.step(ticket) {
            Some(next) => {
                handled += 1;
                queue.schedule(next);
            }
            None => ignored += 1,
        }
    }

    assert_eq!(ignored, 1);
    assert!(handled > 0);
    assert_eq!(queue.len(), 1);
    let labels = trainer.presenter().labels();
    let after_restart = &labels[2..];
    assert!(after_restart.iter().all(|label| ["A", "", START_LABEL].contains(label)));
}

#[test]
fn test_presenter_state_tracks_last_pulse() {
    let mut trainer = Trainer::with_random(
        metadata(),
        StaticControls::new("ab"),
        PresenterState::default(),
        SequenceRandom::new(vec![0.0]),
    );
    let first = trainer.restart().unwrap();
    let solution = trainer.presenter().solution.clone().unwrap();
    assert_eq!(solution.word, "AB");
    assert_eq!(solution.morse.to_string(), "· –·");
    assert!(!trainer.presenter().solution_visible);

    trainer.step(first.ticket).unwrap();
    assert!(trainer.presenter().indicator);
    assert_eq!(trainer.presenter().label, "A");

    trainer.reveal();
    assert!(trainer.presenter().solution_visible);
}
