//! # Error Types
//!
//! This module defines all error types for the trainer.
//!
//! ## Error Types
//! - `Io` - The configuration file could not be read
//! - `Json` / `Yaml` - The configuration file is not well-formed
//! - `Config` - The configuration is well-formed but inconsistent
//! - `UnknownCategory` / `EmptyCategory` - Target generation failed
//! - `MissingLetter` - A character has no Morse code in the alphabet
//!
//! ## Usage
//! ```rust
//! use morsetrain::{Metadata, TrainerError};
//!
//! match Metadata::from_json_str("{") {
//!     Ok(_) => println!("Loaded!"),
//!     Err(TrainerError::Json(e)) => eprintln!("Bad JSON: {}", e),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrainerError {
    /// The configuration file could not be read from disk.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid JSON for the metadata schema.
    #[error("Invalid JSON metadata: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration is not valid YAML for the metadata schema.
    #[error("Invalid YAML metadata: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The configuration parsed but violates an invariant.
    ///
    /// # Example
    /// ```
    /// # use morsetrain::TrainerError;
    /// let err = TrainerError::Config("timing 'short' must be finite and non-negative".to_string());
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Invalid configuration: timing 'short' must be finite and non-negative"
    /// );
    /// ```
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The selected category name does not exist in the vocabulary.
    #[error("Unknown category '{0}'")]
    UnknownCategory(String),

    /// The category has nothing to draw from (no phrases, or an empty charset).
    #[error("Category '{0}' has no candidates")]
    EmptyCategory(String),

    /// A character has no alphabet entry.
    ///
    /// # Example
    /// ```
    /// # use morsetrain::TrainerError;
    /// let err = TrainerError::MissingLetter('#');
    /// assert_eq!(err.to_string(), "No Morse code for '#'");
    /// ```
    #[error("No Morse code for '{0}'")]
    MissingLetter(char),
}
