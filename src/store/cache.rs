//! In-process cache code store.
//!
//! Server-side key-value storage with TTL enforcement. All operations take
//! a single lock acquisition, so read-compare-delete during validation is
//! atomic per the whole map and concurrent correct submissions against a
//! single-use code produce exactly one winner.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use tracing::debug;

use crate::config::{CaptchaConfig, CaptchaError, Result};
use crate::store::{codes_match, StoreReceipt, VerificationCode, VerificationCodeStore};

/// Server-side cache backend.
pub struct CacheCodeStore {
    entries: Mutex<HashMap<String, VerificationCode>>,
    reusable: bool,
}

impl CacheCodeStore {
    #[must_use]
    pub fn new(config: &CaptchaConfig) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            reusable: config.code_reusable,
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, VerificationCode>>> {
        self.entries
            .lock()
            .map_err(|_| CaptchaError::StoreUnavailable("cache lock poisoned".to_string()))
    }

    /// Drops expired entries. Called opportunistically on writes; a cache
    /// collaborator with native TTL would make this redundant.
    fn sweep(entries: &mut HashMap<String, VerificationCode>) {
        entries.retain(|_, code| !code.is_expired());
    }

    /// Reads back the live plaintext for `key`, for tests that need to
    /// submit the correct answer.
    #[cfg(any(test, feature = "testing"))]
    pub fn stored_code(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().ok()?;
        entries
            .get(key)
            .filter(|code| !code.is_expired())
            .map(|code| code.plain_text.clone())
    }
}

impl VerificationCodeStore for CacheCodeStore {
    fn save(&self, key: &str, plain_text: &str, ttl: Duration) -> Result<StoreReceipt> {
        let code = VerificationCode::new(key, plain_text, ttl);
        let mut entries = self.lock()?;
        Self::sweep(&mut entries);
        entries.insert(key.to_string(), code);
        debug!(key, backend = "cache", "verification code saved");
        Ok(StoreReceipt::ServerSide)
    }

    fn validate(&self, key: &str, submitted: &str, case_sensitive: bool) -> Result<bool> {
        let mut entries = self.lock()?;

        let matched = match entries.get(key) {
            None => false,
            Some(code) if code.is_expired() => {
                entries.remove(key);
                false
            }
            Some(code) => codes_match(&code.plain_text, submitted, case_sensitive),
        };

        if matched && !self.reusable {
            entries.remove(key);
        }
        Ok(matched)
    }

    fn invalidate(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}
