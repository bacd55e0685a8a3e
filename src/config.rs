//! # Configuration Model
//!
//! The immutable snapshot the trainer works from: vocabulary categories, the
//! Morse alphabet, and the timing constants.
//!
//! ## Format
//! The metadata is a JSON or YAML document with three sections:
//!
//! ```yaml
//! words:
//!   vowels: ["A", "E"]                       # fixed phrases
//!   letters: "ABCDEF"                        # charset, 5 or 6 characters
//!   pairs: { charset: "ET", length: [2, 3] } # charset with explicit range
//! alphabet:
//!   A: ".-"
//!   E: "."
//! display:
//!   short: 0.2
//!   long: 0.6
//!   symbol_gap: 0.2
//!   letter_gap: 0.6
//!   word_gap: 1.4
//! ```
//!
//! In YAML, quote charsets and codes that look like numbers
//! (`charset: "0123456789"`); an unquoted `0123456789` is read as an integer
//! and the category is rejected.
//!
//! Loading always runs [`Metadata::validate`], so a successfully loaded
//! `Metadata` only references characters the alphabet can encode.

use std::collections::BTreeMap;
use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::TrainerError;

/// Length range used when a category is given as a bare charset string.
pub const DEFAULT_RANDOM_LENGTH: RangeInclusive<usize> = 5..=6;

/// One Morse element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mark {
    /// Short mark, written `.`
    Dot,
    /// Long mark, written `-`
    Dash,
}

impl Mark {
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '.' => Some(Mark::Dot),
            '-' => Some(Mark::Dash),
            _ => None,
        }
    }

    /// The ASCII form used in the metadata file.
    pub fn symbol(self) -> char {
        match self {
            Mark::Dot => '.',
            Mark::Dash => '-',
        }
    }

    /// The typographic form shown to the learner.
    pub fn glyph(self) -> char {
        match self {
            Mark::Dot => '·',
            Mark::Dash => '–',
        }
    }
}

/// Mapping from a single character to its Morse code.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "BTreeMap<String, String>")]
pub struct Alphabet {
    codes: BTreeMap<char, Vec<Mark>>,
}

impl Alphabet {
    /// Build an alphabet from `(letter, ".-")` pairs.
    ///
    /// # Example
    /// ```
    /// use morsetrain::{Alphabet, Mark};
    ///
    /// let alphabet = Alphabet::from_pairs([('A', ".-"), ('E', ".")]).unwrap();
    /// assert_eq!(alphabet.get('A'), Some(&[Mark::Dot, Mark::Dash][..]));
    /// assert!(alphabet.get('Z').is_none());
    /// ```
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, TrainerError>
    where
        I: IntoIterator<Item = (char, &'a str)>,
    {
        let mut codes = BTreeMap::new();
        for (letter, code) in pairs {
            codes.insert(letter, parse_code(letter, code)?);
        }
        Ok(Self { codes })
    }

    pub fn get(&self, letter: char) -> Option<&[Mark]> {
        self.codes.get(&letter).map(Vec::as_slice)
    }

    /// Like [`Alphabet::get`], but a missing letter is an error.
    pub fn code(&self, letter: char) -> Result<&[Mark], TrainerError> {
        self.get(letter).ok_or(TrainerError::MissingLetter(letter))
    }

    pub fn contains(&self, letter: char) -> bool {
        self.codes.contains_key(&letter)
    }

    pub fn letters(&self) -> impl Iterator<Item = char> + '_ {
        self.codes.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl TryFrom<BTreeMap<String, String>> for Alphabet {
    type Error = TrainerError;

    fn try_from(raw: BTreeMap<String, String>) -> Result<Self, Self::Error> {
        let mut codes = BTreeMap::new();
        for (key, code) in &raw {
            let mut chars = key.chars();
            let letter = match (chars.next(), chars.next()) {
                (Some(letter), None) => letter,
                _ => {
                    return Err(TrainerError::Config(format!(
                        "alphabet key '{}' must be a single character",
                        key
                    )))
                }
            };
            codes.insert(letter, parse_code(letter, code)?);
        }
        Ok(Self { codes })
    }
}

fn parse_code(letter: char, code: &str) -> Result<Vec<Mark>, TrainerError> {
    if code.is_empty() {
        return Err(TrainerError::Config(format!(
            "Morse code for '{}' is empty",
            letter
        )));
    }
    code.chars()
        .map(|symbol| {
            Mark::from_symbol(symbol).ok_or_else(|| {
                TrainerError::Config(format!(
                    "Morse code for '{}' contains '{}', expected '.' or '-'",
                    letter, symbol
                ))
            })
        })
        .collect()
}

/// A named vocabulary source.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawCategory")]
pub enum Category {
    /// Pick one of these phrases.
    Phrases(Vec<String>),
    /// Draw `length` characters from `charset`, with replacement.
    Random {
        charset: Vec<char>,
        length: RangeInclusive<usize>,
    },
}

impl Category {
    /// Every character this category can ever produce.
    pub fn characters(&self) -> Box<dyn Iterator<Item = char> + '_> {
        match self {
            Category::Phrases(phrases) => Box::new(phrases.iter().flat_map(|p| p.chars())),
            Category::Random { charset, .. } => Box::new(charset.iter().copied()),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCategory {
    Charset(String),
    Phrases(Vec<String>),
    Generated {
        charset: String,
        length: (usize, usize),
    },
}

impl TryFrom<RawCategory> for Category {
    type Error = TrainerError;

    fn try_from(raw: RawCategory) -> Result<Self, Self::Error> {
        Ok(match raw {
            RawCategory::Charset(charset) => Category::Random {
                charset: charset.chars().collect(),
                length: DEFAULT_RANDOM_LENGTH,
            },
            RawCategory::Phrases(phrases) => Category::Phrases(phrases),
            RawCategory::Generated {
                charset,
                length: (min, max),
            } => {
                if min > max {
                    return Err(TrainerError::Config(format!(
                        "length range [{}, {}] is reversed",
                        min, max
                    )));
                }
                Category::Random {
                    charset: charset.chars().collect(),
                    length: min..=max,
                }
            }
        })
    }
}

/// Pulse durations, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timing {
    pub short: f64,
    pub long: f64,
    pub symbol_gap: f64,
    pub letter_gap: f64,
    pub word_gap: f64,
}

impl Timing {
    pub fn mark(&self, mark: Mark) -> f64 {
        match mark {
            Mark::Dot => self.short,
            Mark::Dash => self.long,
        }
    }

    pub fn validate(&self) -> Result<(), TrainerError> {
        let fields = [
            ("short", self.short),
            ("long", self.long),
            ("symbol_gap", self.symbol_gap),
            ("letter_gap", self.letter_gap),
            ("word_gap", self.word_gap),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(TrainerError::Config(format!(
                    "timing '{}' must be finite and non-negative, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// The complete configuration snapshot.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Metadata {
    pub words: BTreeMap<String, Category>,
    pub alphabet: Alphabet,
    #[serde(rename = "display")]
    pub timing: Timing,
}

impl Metadata {
    pub fn from_json_str(source: &str) -> Result<Self, TrainerError> {
        let metadata: Metadata = serde_json::from_str(source)?;
        metadata.validate()?;
        Ok(metadata)
    }

    pub fn from_yaml_str(source: &str) -> Result<Self, TrainerError> {
        let metadata: Metadata = serde_yaml::from_str(source)?;
        metadata.validate()?;
        Ok(metadata)
    }

    pub fn category(&self, name: &str) -> Result<&Category, TrainerError> {
        self.words
            .get(name)
            .ok_or_else(|| TrainerError::UnknownCategory(name.to_string()))
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.words.keys().map(String::as_str)
    }

    /// Check the invariants deserialization alone cannot express.
    pub fn validate(&self) -> Result<(), TrainerError> {
        self.timing.validate()?;
        for (name, category) in &self.words {
            if let Some(letter) = category.characters().find(|c| !self.alphabet.contains(*c)) {
                return Err(TrainerError::Config(format!(
                    "category '{}' uses '{}', which is not in the alphabet",
                    name, letter
                )));
            }
        }
        Ok(())
    }
}

/// Load metadata from a file; `.yaml`/`.yml` is read as YAML, anything else as JSON.
pub fn load(path: impl AsRef<Path>) -> Result<Metadata, TrainerError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|source| TrainerError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let is_yaml = matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    );
    let metadata = if is_yaml {
        Metadata::from_yaml_str(&source)?
    } else {
        Metadata::from_json_str(&source)?
    };
    tracing::debug!(
        path = %path.display(),
        categories = metadata.words.len(),
        letters = metadata.alphabet.len(),
        "loaded metadata"
    );
    Ok(metadata)
}
