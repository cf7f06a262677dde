//! Test utilities and shared configuration.
//!
//! This module provides common helpers for unit and integration tests,
//! reducing duplication across the codebase.

use std::sync::Arc;

use crate::config::CaptchaConfig;

/// A 16-byte secret used by cookie-store tests.
pub const TEST_COOKIE_SECRET: &str = "0123456789abcdef";

/// Creates a standard configuration for testing purposes.
///
/// This configuration has:
/// - Default character classes (digits + uppercase, `"01IOlo"` excluded)
/// - Single-use codes with a 1-minute expiry
/// - One noise line, no twist
/// - A valid cookie secret
#[must_use]
pub fn create_test_config() -> Arc<CaptchaConfig> {
    Arc::new(
        CaptchaConfig::builder()
            .code_expires_in_minutes(1)
            .cookie_secret_key(TEST_COOKIE_SECRET)
            .build()
            .expect("test config must validate"),
    )
}
