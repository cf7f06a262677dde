//! Character-set construction and code generation.
//!
//! Derives the usable glyph alphabet from configuration and draws random
//! codes from it. The thread-local RNG is a CSPRNG; a predictable generator
//! here would make codes guessable.

use std::collections::HashSet;

use rand::Rng;

use crate::config::{CaptchaConfig, CaptchaError, Result};

/// The filtered set of characters eligible for code generation.
#[derive(Debug, Clone)]
pub struct Alphabet {
    chars: Vec<char>,
    case_sensitive: bool,
}

impl Alphabet {
    /// Builds the alphabet from the configured character classes, minus the
    /// excluded characters. When the config is case-insensitive the result
    /// is canonicalized to uppercase and de-duplicated, and exclusion
    /// matching ignores case.
    ///
    /// # Errors
    ///
    /// Returns `CaptchaError::Config` if the resulting set is empty.
    pub fn from_config(config: &CaptchaConfig) -> Result<Self> {
        let mut candidates: Vec<char> = Vec::with_capacity(62);
        if config.include_numbers {
            candidates.extend('0'..='9');
        }
        if config.include_uppercase {
            candidates.extend('A'..='Z');
        }
        if config.include_lowercase {
            candidates.extend('a'..='z');
        }

        let excluded: HashSet<char> = if config.case_sensitive {
            config.excluded_chars.chars().collect()
        } else {
            config
                .excluded_chars
                .chars()
                .map(|c| c.to_ascii_uppercase())
                .collect()
        };

        let mut seen = HashSet::new();
        let mut chars = Vec::with_capacity(candidates.len());
        for mut c in candidates {
            if !config.case_sensitive {
                c = c.to_ascii_uppercase();
            }
            if excluded.contains(&c) || !seen.insert(c) {
                continue;
            }
            chars.push(c);
        }

        if chars.is_empty() {
            return Err(CaptchaError::Config(
                "derived alphabet is empty; relax exclusions or enable a character class"
                    .to_string(),
            ));
        }

        Ok(Self {
            chars,
            case_sensitive: config.case_sensitive,
        })
    }

    /// Draws `length` characters uniformly at random, with replacement.
    #[must_use]
    pub fn generate_code(&self, length: usize) -> String {
        let mut rng = rand::rng();
        (0..length)
            .map(|_| self.chars[rng.random_range(0..self.chars.len())])
            .collect()
    }

    /// Whether the alphabet contains the given character.
    #[must_use]
    pub fn contains(&self, c: char) -> bool {
        self.chars.contains(&c)
    }

    /// Number of distinct characters in the alphabet.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Whether codes drawn from this alphabet compare case-sensitively.
    #[must_use]
    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }
}
