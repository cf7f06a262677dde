//! Error types and result aliases.
//!
//! Defines the core `CaptchaError` enumeration and common `Result` type.

use thiserror::Error;

/// Captcha-specific errors.
#[derive(Debug, Error)]
pub enum CaptchaError {
    /// Invalid configuration (empty alphabet, bad secret-key length,
    /// non-positive line count). Raised at configuration time, never
    /// while serving a request.
    #[error("configuration error: {0}")]
    Config(String),

    /// The backing store failed. Distinct from "code not found", which is
    /// an ordinary `false` verification result.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// Image encoding failed.
    #[error("render error: {0}")]
    Render(String),
}

/// Result type alias for `CaptchaError`.
pub type Result<T> = std::result::Result<T, CaptchaError>;
