//! # Transcriber
//!
//! Turns letters and words into timed light pulses.
//!
//! For every mark of a letter the lamp is switched on for `short` or `long`
//! seconds and then off for `symbol_gap`. A word is its letters in order, each
//! followed by an extra `letter_gap` pause, the last letter included.
//!
//! ## Example
//! ```rust
//! use morsetrain::{Alphabet, Pulse, Timing, Transcriber};
//!
//! let alphabet = Alphabet::from_pairs([('A', ".-")]).unwrap();
//! let timing = Timing { short: 1.0, long: 2.0, symbol_gap: 0.5, letter_gap: 1.0, word_gap: 3.0 };
//! let transcriber = Transcriber::new(&alphabet, &timing);
//!
//! let timeline = transcriber.transcribe_word("A").unwrap();
//! assert_eq!(timeline.pulses(), &[
//!     Pulse::on(1.0, "A"),
//!     Pulse::off(0.5),
//!     Pulse::on(2.0, "A"),
//!     Pulse::off(0.5),
//!     Pulse::off(1.0),
//! ]);
//! ```

use std::fmt;

use serde::Serialize;

use crate::config::{Alphabet, Mark, Metadata, Timing};
use crate::error::TrainerError;
use crate::playback::{Pulse, Timeline};

#[derive(Debug, Clone, Copy)]
pub struct Transcriber<'a> {
    alphabet: &'a Alphabet,
    timing: &'a Timing,
}

impl<'a> Transcriber<'a> {
    pub fn new(alphabet: &'a Alphabet, timing: &'a Timing) -> Self {
        Self { alphabet, timing }
    }

    pub fn for_metadata(metadata: &'a Metadata) -> Self {
        Self::new(&metadata.alphabet, &metadata.timing)
    }

    /// On/off pulse pairs for each mark of `letter`, without the trailing letter gap.
    pub fn transcribe_letter(&self, letter: char) -> Result<Vec<Pulse>, TrainerError> {
        let marks = self.alphabet.code(letter)?;
        let label = letter.to_string();
        let mut pulses = Vec::with_capacity(marks.len() * 2);
        for &mark in marks {
            pulses.push(Pulse::on(self.timing.mark(mark), label.clone()));
            pulses.push(Pulse::off(self.timing.symbol_gap));
        }
        Ok(pulses)
    }

    /// The full timeline for `word`; every letter ends with a `letter_gap` pause.
    pub fn transcribe_word(&self, word: &str) -> Result<Timeline, TrainerError> {
        let mut pulses = Vec::new();
        for letter in word.chars() {
            pulses.extend(self.transcribe_letter(letter)?);
            pulses.push(Pulse::off(self.timing.letter_gap));
        }
        Ok(Timeline::new(pulses))
    }

    /// The `.`/`-` form of `letter`.
    pub fn morse_code(&self, letter: char) -> Result<String, TrainerError> {
        Ok(self
            .alphabet
            .code(letter)?
            .iter()
            .map(|mark| mark.symbol())
            .collect())
    }

    pub fn annotate(&self, word: &str) -> Result<AnnotatedMorse, TrainerError> {
        let letters = word
            .chars()
            .map(|letter| {
                Ok(LetterCode {
                    letter,
                    marks: self.alphabet.code(letter)?.to_vec(),
                })
            })
            .collect::<Result<Vec<_>, TrainerError>>()?;
        Ok(AnnotatedMorse { letters })
    }
}

/// One letter of an [`AnnotatedMorse`] rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LetterCode {
    pub letter: char,
    pub marks: Vec<Mark>,
}

/// The Morse code of a whole word, kept per letter so it can be styled.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnnotatedMorse {
    pub letters: Vec<LetterCode>,
}

impl AnnotatedMorse {
    /// Markup for the solution panel.
    ///
    /// ```
    /// use morsetrain::{Alphabet, Timing, Transcriber};
    ///
    /// let alphabet = Alphabet::from_pairs([('N', "-.")]).unwrap();
    /// let timing = Timing { short: 1.0, long: 3.0, symbol_gap: 1.0, letter_gap: 3.0, word_gap: 7.0 };
    /// let morse = Transcriber::new(&alphabet, &timing).annotate("N").unwrap();
    /// assert_eq!(
    ///     morse.to_html(),
    ///     r#"<span class="letter"><span class="symbol">–</span><span class="symbol">·</span></span>"#
    /// );
    /// ```
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        for letter in &self.letters {
            html.push_str(r#"<span class="letter">"#);
            for mark in &letter.marks {
                html.push_str(r#"<span class="symbol">"#);
                html.push(mark.glyph());
                html.push_str("</span>");
            }
            html.push_str("</span>");
        }
        html
    }
}

impl fmt::Display for AnnotatedMorse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, letter) in self.letters.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            for mark in &letter.marks {
                write!(f, "{}", mark.glyph())?;
            }
        }
        Ok(())
    }
}
