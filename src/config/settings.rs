//! Configuration settings.
//!
//! Defines the immutable [`CaptchaConfig`] struct and the fluent
//! [`CaptchaConfigBuilder`] that validates and freezes it. Validation runs
//! once in [`CaptchaConfigBuilder::build`], never per request.

use std::time::Duration;

use crate::config::error::{CaptchaError, Result};

/// Length in bytes required for the cookie-store secret key.
pub const COOKIE_SECRET_LEN: usize = 16;

/// Frozen captcha configuration, immutable for the lifetime of a manager.
#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct CaptchaConfig {
    /// Apply per-glyph shear/rotation while rendering.
    pub twist_enabled: bool,
    /// Draw random noise lines behind the glyphs.
    pub random_line_enabled: bool,
    /// Number of noise lines when enabled.
    pub random_line_count: u32,
    /// Whether verification compares codes case-sensitively.
    pub case_sensitive: bool,
    /// Include digits in the code alphabet.
    pub include_numbers: bool,
    /// Include uppercase letters in the code alphabet.
    pub include_uppercase: bool,
    /// Include lowercase letters in the code alphabet.
    pub include_lowercase: bool,
    /// Glyphs dropped from the alphabet (confusable characters).
    pub excluded_chars: String,
    /// Number of glyphs per generated code.
    pub code_length: usize,
    /// Minutes until an issued code expires.
    pub code_expires_in_minutes: u64,
    /// Whether one issued code may satisfy multiple verifications.
    pub code_reusable: bool,
    /// Secret key for the cookie store backend, exactly 16 bytes.
    pub cookie_secret_key: Option<[u8; COOKIE_SECRET_LEN]>,
}

impl CaptchaConfig {
    /// Returns a builder preloaded with the default settings: 20-minute
    /// expiry, single-use codes, one noise line, no twist, case-insensitive
    /// codes drawn from digits and uppercase letters minus `"01IOlo"`.
    #[must_use]
    pub fn builder() -> CaptchaConfigBuilder {
        CaptchaConfigBuilder::default()
    }

    /// Time-to-live of an issued code.
    #[must_use]
    pub fn code_ttl(&self) -> Duration {
        Duration::from_secs(self.code_expires_in_minutes * 60)
    }

    /// The cookie secret, or a `Config` error if the cookie backend was
    /// selected without one.
    pub fn cookie_secret(&self) -> Result<&[u8; COOKIE_SECRET_LEN]> {
        self.cookie_secret_key.as_ref().ok_or_else(|| {
            CaptchaError::Config("cookie store requires a 16-byte secret key".to_string())
        })
    }
}

/// Fluent builder for [`CaptchaConfig`].
#[derive(Debug, Clone)]
pub struct CaptchaConfigBuilder {
    twist_enabled: bool,
    random_line_enabled: bool,
    random_line_count: u32,
    case_sensitive: bool,
    include_numbers: bool,
    include_uppercase: bool,
    include_lowercase: bool,
    excluded_chars: String,
    code_length: usize,
    code_expires_in_minutes: u64,
    code_reusable: bool,
    cookie_secret_key: Option<Vec<u8>>,
}

impl Default for CaptchaConfigBuilder {
    fn default() -> Self {
        Self {
            twist_enabled: false,
            random_line_enabled: true,
            random_line_count: 1,
            case_sensitive: false,
            include_numbers: true,
            include_uppercase: true,
            include_lowercase: false,
            excluded_chars: "01IOlo".to_string(),
            code_length: 5,
            code_expires_in_minutes: 20,
            code_reusable: false,
            cookie_secret_key: None,
        }
    }
}

impl CaptchaConfigBuilder {
    #[must_use]
    pub fn twist(mut self, enabled: bool) -> Self {
        self.twist_enabled = enabled;
        self
    }

    #[must_use]
    pub fn random_line(mut self, enabled: bool) -> Self {
        self.random_line_enabled = enabled;
        self
    }

    #[must_use]
    pub fn random_line_count(mut self, count: u32) -> Self {
        self.random_line_count = count;
        self
    }

    #[must_use]
    pub fn case_sensitive(mut self, enabled: bool) -> Self {
        self.case_sensitive = enabled;
        self
    }

    #[must_use]
    pub fn include_numbers(mut self, included: bool) -> Self {
        self.include_numbers = included;
        self
    }

    #[must_use]
    pub fn include_uppercase(mut self, included: bool) -> Self {
        self.include_uppercase = included;
        self
    }

    #[must_use]
    pub fn include_lowercase(mut self, included: bool) -> Self {
        self.include_lowercase = included;
        self
    }

    /// Replaces the excluded-character list.
    #[must_use]
    pub fn exclude_chars(mut self, excluded: &str) -> Self {
        self.excluded_chars = excluded.to_string();
        self
    }

    #[must_use]
    pub fn code_length(mut self, length: usize) -> Self {
        self.code_length = length;
        self
    }

    /// Minutes until an issued code expires. Values below 1 clamp to 1.
    #[must_use]
    pub fn code_expires_in_minutes(mut self, minutes: u64) -> Self {
        self.code_expires_in_minutes = minutes.max(1);
        self
    }

    #[must_use]
    pub fn code_reusable(mut self, reusable: bool) -> Self {
        self.code_reusable = reusable;
        self
    }

    /// Sets the cookie-store secret key. Must be exactly 16 bytes.
    #[must_use]
    pub fn cookie_secret_key(mut self, secret: &str) -> Self {
        self.cookie_secret_key = Some(secret.as_bytes().to_vec());
        self
    }

    /// Validates the settings and freezes them into a [`CaptchaConfig`].
    ///
    /// # Errors
    ///
    /// Returns `CaptchaError::Config` when no character class is enabled,
    /// the noise-line count is zero, the code length is zero, or a cookie
    /// secret is present but not exactly 16 bytes.
    pub fn build(self) -> Result<CaptchaConfig> {
        if !self.include_numbers && !self.include_uppercase && !self.include_lowercase {
            return Err(CaptchaError::Config(
                "at least one of numbers/uppercase/lowercase must be included".to_string(),
            ));
        }
        if self.random_line_enabled && self.random_line_count < 1 {
            return Err(CaptchaError::Config(
                "random line count must be at least 1".to_string(),
            ));
        }
        if self.code_length == 0 {
            return Err(CaptchaError::Config(
                "code length must be at least 1".to_string(),
            ));
        }

        let cookie_secret_key = match self.cookie_secret_key {
            None => None,
            Some(bytes) => {
                let arr: [u8; COOKIE_SECRET_LEN] = bytes.try_into().map_err(|_| {
                    CaptchaError::Config(format!(
                        "cookie secret key must be exactly {COOKIE_SECRET_LEN} bytes"
                    ))
                })?;
                Some(arr)
            }
        };

        Ok(CaptchaConfig {
            twist_enabled: self.twist_enabled,
            random_line_enabled: self.random_line_enabled,
            random_line_count: self.random_line_count,
            case_sensitive: self.case_sensitive,
            include_numbers: self.include_numbers,
            include_uppercase: self.include_uppercase,
            include_lowercase: self.include_lowercase,
            excluded_chars: self.excluded_chars,
            code_length: self.code_length,
            code_expires_in_minutes: self.code_expires_in_minutes,
            code_reusable: self.code_reusable,
            cookie_secret_key,
        })
    }
}
