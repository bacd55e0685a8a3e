//! Target-string generation.
//!
//! Picks what the learner has to recognize next: either one phrase out of a
//! fixed list, or a fresh string drawn character by character from a charset.

use crate::config::{Category, Metadata};
use crate::error::TrainerError;
use crate::random::RandomSource;

/// Generate a target string from `category`.
///
/// `name` is only used for error reporting.
///
/// # Example
/// ```
/// use morsetrain::{generate, Category, SequenceRandom};
///
/// let category = Category::Random { charset: vec!['E', 'T'], length: 2..=3 };
/// // length draw 0.0 -> 2, then 'E', 'T'
/// let mut random = SequenceRandom::new(vec![0.0, 0.1, 0.9]);
/// assert_eq!(generate("pairs", &category, &mut random).unwrap(), "ET");
/// ```
pub fn generate(
    name: &str,
    category: &Category,
    random: &mut impl RandomSource,
) -> Result<String, TrainerError> {
    match category {
        Category::Phrases(phrases) => {
            if phrases.is_empty() {
                return Err(TrainerError::EmptyCategory(name.to_string()));
            }
            Ok(phrases[random.next_index(phrases.len())].clone())
        }
        Category::Random { charset, length } => {
            if charset.is_empty() {
                return Err(TrainerError::EmptyCategory(name.to_string()));
            }
            if length.is_empty() {
                return Err(TrainerError::Config(format!(
                    "category '{}' has an empty length range {}..={}",
                    name,
                    length.start(),
                    length.end()
                )));
            }
            let span = (length.end() - length.start())
                .checked_add(1)
                .ok_or_else(|| {
                    TrainerError::Config(format!("category '{}' has an unbounded length range", name))
                })?;
            let count = length.start() + random.next_index(span);
            Ok((0..count)
                .map(|_| charset[random.next_index(charset.len())])
                .collect())
        }
    }
}

/// Resolve `name` in `metadata` and generate from it.
pub fn generate_named(
    metadata: &Metadata,
    name: &str,
    random: &mut impl RandomSource,
) -> Result<String, TrainerError> {
    generate(name, metadata.category(name)?, random)
}
