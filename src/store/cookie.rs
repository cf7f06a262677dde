//! Cookie code store.
//!
//! Stateless backend: the code rides with the client inside an encrypted,
//! authenticated cookie. `save` returns the token for the caller to set
//! (with `Max-Age` matching the TTL) and `validate` expects the cookie's
//! current value as the key. Decryption or integrity failure collapses to
//! an ordinary `false`, indistinguishable from a wrong answer.
//!
//! Single-use enforcement is best-effort only: with no server-side state a
//! client can replay the raw cookie within its validity window. Deployments
//! that need strict at-most-once semantics should use the cache or session
//! backend instead.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::debug;

use crate::config::{CaptchaConfig, Result};
use crate::crypto::CookieCrypto;
use crate::store::{codes_match, StoreReceipt, VerificationCodeStore};

/// Client-held encrypted cookie backend.
pub struct CookieCodeStore {
    crypto: CookieCrypto,
}

impl CookieCodeStore {
    /// Creates the store from the configured 16-byte secret key.
    ///
    /// # Errors
    ///
    /// Returns `CaptchaError::Config` if no cookie secret is configured.
    pub fn new(config: &CaptchaConfig) -> Result<Self> {
        Ok(Self {
            crypto: CookieCrypto::new(config.cookie_secret()?),
        })
    }

    fn now_millis() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

impl VerificationCodeStore for CookieCodeStore {
    fn save(&self, key: &str, plain_text: &str, ttl: Duration) -> Result<StoreReceipt> {
        let expires_at = Self::now_millis().saturating_add(ttl.as_millis() as u64);
        let payload = format!("{plain_text}|{expires_at}");
        let token = self.crypto.encrypt(payload.as_bytes());
        debug!(key, backend = "cookie", "verification code tokenized");
        Ok(StoreReceipt::ClientToken {
            token,
            max_age: ttl,
        })
    }

    fn validate(&self, key: &str, submitted: &str, case_sensitive: bool) -> Result<bool> {
        // For this backend the key *is* the cookie value.
        let Some(decrypted) = self.crypto.decrypt(key) else {
            return Ok(false);
        };
        let Ok(payload) = String::from_utf8(decrypted) else {
            return Ok(false);
        };

        let Some((plain_text, expiry)) = payload.rsplit_once('|') else {
            return Ok(false);
        };
        let Ok(expires_at) = expiry.parse::<u64>() else {
            return Ok(false);
        };

        if Self::now_millis() > expires_at {
            return Ok(false);
        }

        Ok(codes_match(plain_text, submitted, case_sensitive))
    }

    fn invalidate(&self, _key: &str) -> Result<()> {
        // No server-side state; the caller clears the cookie itself.
        Ok(())
    }
}
