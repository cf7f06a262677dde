//! Configuration management.
//!
//! Exposes the frozen [`CaptchaConfig`] value, its fluent builder, and the
//! crate-wide error type. A config is validated once at build time and is
//! immutable afterwards.

mod error;
mod settings;

pub use error::{CaptchaError, Result};
pub use settings::{CaptchaConfig, CaptchaConfigBuilder, COOKIE_SECRET_LEN};
