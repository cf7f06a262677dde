//! Verification code storage.
//!
//! Defines the [`VerificationCodeStore`] trait and the three interchangeable
//! backends: client-held encrypted cookie, in-process cache, and per-client
//! session state. The session manager is written against the trait only and
//! never branches on backend identity.

pub mod cache;
pub mod cookie;
pub mod session;

use std::time::{Duration, SystemTime};

use crate::config::Result;

pub use cache::CacheCodeStore;
pub use cookie::CookieCodeStore;
pub use session::SessionCodeStore;

/// The canonical stored copy of an issued code. Exactly one may be live per
/// key; saving again overwrites.
#[derive(Debug, Clone)]
pub struct VerificationCode {
    pub key: String,
    pub plain_text: String,
    pub created_at: SystemTime,
    pub expires_at: SystemTime,
}

impl VerificationCode {
    /// Creates a code expiring `ttl` from now.
    #[must_use]
    pub fn new(key: &str, plain_text: &str, ttl: Duration) -> Self {
        let now = SystemTime::now();
        Self {
            key: key.to_string(),
            plain_text: plain_text.to_string(),
            created_at: now,
            expires_at: now + ttl,
        }
    }

    /// Whether the code has passed its expiry instant.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        SystemTime::now() > self.expires_at
    }
}

/// What the caller must do to complete a save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreReceipt {
    /// The code is held server-side; the key alone retrieves it.
    ServerSide,
    /// The code travels with the client: set `token` as a cookie with
    /// `Max-Age` equal to `max_age`. On verification the cookie's current
    /// value is supplied back as the key.
    ClientToken { token: String, max_age: Duration },
}

/// Persistence strategy for issued codes.
///
/// `validate` returns `Ok(false)` uniformly for absent, expired, and
/// mismatched codes; only genuine backend failures surface as errors. When
/// the store was configured single-use, a successful validation removes the
/// code atomically with the comparison, so concurrent correct submissions
/// yield exactly one winner.
pub trait VerificationCodeStore: Send + Sync {
    /// Stores or overwrites the code for `key`, valid for `ttl`.
    fn save(&self, key: &str, plain_text: &str, ttl: Duration) -> Result<StoreReceipt>;

    /// Compares a submitted answer against the stored code for `key`.
    fn validate(&self, key: &str, submitted: &str, case_sensitive: bool) -> Result<bool>;

    /// Explicitly removes any code stored for `key`.
    fn invalidate(&self, key: &str) -> Result<()>;
}

/// Compares a stored code against a submission under the case policy.
pub(crate) fn codes_match(stored: &str, submitted: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        stored == submitted
    } else {
        stored.eq_ignore_ascii_case(submitted)
    }
}
