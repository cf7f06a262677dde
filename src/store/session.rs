//! Session code store.
//!
//! Keeps issued codes in per-client session state. The host owns one
//! `SessionCodeStore` handle per client session (clones share the same
//! state) and drops it when the session ends. Expiry is checked logically
//! against `expires_at` on every validation and expired entries are lazily
//! swept; no background timer runs.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::debug;

use crate::config::{CaptchaConfig, CaptchaError, Result};
use crate::store::{codes_match, StoreReceipt, VerificationCode, VerificationCodeStore};

/// Per-client session backend.
#[derive(Clone)]
pub struct SessionCodeStore {
    state: Arc<Mutex<HashMap<String, VerificationCode>>>,
    reusable: bool,
}

impl SessionCodeStore {
    #[must_use]
    pub fn new(config: &CaptchaConfig) -> Self {
        Self {
            state: Arc::new(Mutex::new(HashMap::new())),
            reusable: config.code_reusable,
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, VerificationCode>>> {
        self.state
            .lock()
            .map_err(|_| CaptchaError::StoreUnavailable("session lock poisoned".to_string()))
    }

    /// Number of live (unexpired) codes in this session.
    pub fn live_codes(&self) -> Result<usize> {
        let state = self.lock()?;
        Ok(state.values().filter(|c| !c.is_expired()).count())
    }

    /// Reads back the live plaintext for `key`, for tests that need to
    /// submit the correct answer.
    #[cfg(any(test, feature = "testing"))]
    pub fn stored_code(&self, key: &str) -> Option<String> {
        let state = self.state.lock().ok()?;
        state
            .get(key)
            .filter(|code| !code.is_expired())
            .map(|code| code.plain_text.clone())
    }
}

impl VerificationCodeStore for SessionCodeStore {
    fn save(&self, key: &str, plain_text: &str, ttl: Duration) -> Result<StoreReceipt> {
        let code = VerificationCode::new(key, plain_text, ttl);
        self.lock()?.insert(key.to_string(), code);
        debug!(key, backend = "session", "verification code saved");
        Ok(StoreReceipt::ServerSide)
    }

    fn validate(&self, key: &str, submitted: &str, case_sensitive: bool) -> Result<bool> {
        let mut state = self.lock()?;

        // Lazy sweep: every validation clears whatever has expired.
        state.retain(|_, code| !code.is_expired());

        let matched = state
            .get(key)
            .is_some_and(|code| codes_match(&code.plain_text, submitted, case_sensitive));

        if matched && !self.reusable {
            state.remove(key);
        }
        Ok(matched)
    }

    fn invalidate(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}
