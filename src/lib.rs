//! Library definitions.
//!
//! Exports the captcha lifecycle manager, configuration types, and the
//! pluggable verification code stores.

pub mod captcha;
pub mod config;
pub mod crypto;
pub mod store;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use captcha::{Alphabet, CaptchaImage, CaptchaManager, Challenge, GlyphRenderer};
pub use config::{CaptchaConfig, CaptchaConfigBuilder, CaptchaError, Result, COOKIE_SECRET_LEN};
pub use crypto::CookieCrypto;
pub use store::{
    CacheCodeStore, CookieCodeStore, SessionCodeStore, StoreReceipt, VerificationCode,
    VerificationCodeStore,
};
