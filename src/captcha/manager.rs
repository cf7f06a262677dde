//! Captcha lifecycle management.
//!
//! Orchestrates code generation, rendering, storage, and verification.
//! The store backend is injected at construction and cannot be swapped
//! afterwards; the manager talks to the trait only and never branches on
//! backend identity.

use std::sync::Arc;

use tracing::debug;

use crate::captcha::charset::Alphabet;
use crate::captcha::renderer::{CaptchaImage, GlyphRenderer};
use crate::config::{CaptchaConfig, Result};
use crate::store::{StoreReceipt, VerificationCodeStore};

/// An issued challenge: the image to serve and what the caller must do to
/// complete storage (set a cookie for the cookie backend, nothing for
/// server-side backends).
pub struct Challenge {
    pub image: CaptchaImage,
    pub receipt: StoreReceipt,
}

/// Issues and verifies captcha challenges against a single injected store.
pub struct CaptchaManager {
    config: Arc<CaptchaConfig>,
    alphabet: Alphabet,
    renderer: GlyphRenderer,
    store: Arc<dyn VerificationCodeStore>,
}

impl CaptchaManager {
    /// Creates a manager from a frozen configuration and a store backend.
    ///
    /// # Errors
    ///
    /// Returns `CaptchaError::Config` if the configured alphabet is empty.
    pub fn new(
        config: Arc<CaptchaConfig>,
        store: Arc<dyn VerificationCodeStore>,
    ) -> Result<Self> {
        let alphabet = Alphabet::from_config(&config)?;
        let renderer = GlyphRenderer::new(&config);
        Ok(Self {
            config,
            alphabet,
            renderer,
            store,
        })
    }

    /// Issues a new challenge for `key`, discarding any previously issued,
    /// unconsumed code for the same key.
    ///
    /// # Errors
    ///
    /// Returns `CaptchaError::StoreUnavailable` if the backend fails, or
    /// `CaptchaError::Render` if the image cannot be encoded.
    pub fn issue(&self, key: &str) -> Result<Challenge> {
        let code = self.alphabet.generate_code(self.config.code_length);
        let image = self.renderer.render(&code);
        self.finish_issue(key, &code, image)
    }

    /// Like [`CaptchaManager::issue`] but renders with an injected seed.
    /// The code itself is still drawn from the unpredictable RNG.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`CaptchaManager::issue`].
    pub fn issue_seeded(&self, key: &str, seed: u64) -> Result<Challenge> {
        let code = self.alphabet.generate_code(self.config.code_length);
        let image = self.renderer.render_seeded(&code, seed);
        self.finish_issue(key, &code, image)
    }

    fn finish_issue(&self, key: &str, code: &str, image: image::RgbImage) -> Result<Challenge> {
        let image = GlyphRenderer::encode_png(&image)?;

        self.store.invalidate(key)?;
        let receipt = self.store.save(key, code, self.config.code_ttl())?;

        debug!(key, "captcha issued");
        Ok(Challenge { image, receipt })
    }

    /// Verifies a submitted answer. "Never issued", "expired", and "wrong
    /// answer" are all a plain `Ok(false)`, indistinguishable by design.
    ///
    /// # Errors
    ///
    /// Returns `CaptchaError::StoreUnavailable` if the backend fails.
    pub fn verify(&self, key: &str, submitted: &str) -> Result<bool> {
        let matched = self
            .store
            .validate(key, submitted, self.config.case_sensitive)?;
        debug!(key, matched, "captcha verified");
        Ok(matched)
    }
}
