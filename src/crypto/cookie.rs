//! Cookie encryption.
//!
//! Implements AES-128-GCM encryption with per-token HMAC key derivation for
//! the client-held code cookie. Decryption fails closed: any integrity or
//! format problem yields `None`, indistinguishable from a missing code.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{Aes128Gcm, Key, Nonce};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::config::COOKIE_SECRET_LEN;

type HmacSha256 = Hmac<Sha256>;

const TOKEN_LEN: usize = 16;
const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

/// Symmetric authenticated encryption for cookie-carried codes.
#[derive(Clone)]
pub struct CookieCrypto {
    master_key: [u8; COOKIE_SECRET_LEN],
}

impl CookieCrypto {
    /// Creates a new `CookieCrypto` from the operator's 16-byte secret.
    #[must_use]
    pub fn new(secret: &[u8; COOKIE_SECRET_LEN]) -> Self {
        Self {
            master_key: *secret,
        }
    }

    /// Encrypts a payload into a URL-safe string.
    ///
    /// # Panics
    ///
    /// Panics if AES-GCM encryption fails (internal library error).
    #[must_use]
    pub fn encrypt(&self, plaintext: &[u8]) -> String {
        let mut token = [0u8; TOKEN_LEN];
        OsRng.fill_bytes(&mut token);

        let derived_key = self.derive_key(&token);

        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let cipher = Aes128Gcm::new(Key::<Aes128Gcm>::from_slice(&derived_key));
        let ciphertext = cipher
            .encrypt(nonce, plaintext)
            .expect("AES-GCM encryption failed");

        let mut combined = Vec::with_capacity(TOKEN_LEN + NONCE_LEN + ciphertext.len());
        combined.extend_from_slice(&token);
        combined.extend_from_slice(&nonce_bytes);
        combined.extend_from_slice(&ciphertext);

        URL_SAFE_NO_PAD.encode(&combined)
    }

    /// Decrypts a URL-safe string produced by [`CookieCrypto::encrypt`].
    /// Returns `None` on any decode, length, or authentication failure.
    #[must_use]
    pub fn decrypt(&self, encoded: &str) -> Option<Vec<u8>> {
        let combined = URL_SAFE_NO_PAD.decode(encoded).ok()?;

        if combined.len() < TOKEN_LEN + NONCE_LEN + TAG_LEN + 1 {
            return None;
        }

        let token = &combined[..TOKEN_LEN];
        let nonce = Nonce::from_slice(&combined[TOKEN_LEN..TOKEN_LEN + NONCE_LEN]);
        let ciphertext = &combined[TOKEN_LEN + NONCE_LEN..];

        let derived_key = self.derive_key(token);

        let cipher = Aes128Gcm::new(Key::<Aes128Gcm>::from_slice(&derived_key));
        cipher.decrypt(nonce, ciphertext).ok()
    }

    /// Derives a per-message key from the master key and random token.
    fn derive_key(&self, token: &[u8]) -> [u8; COOKIE_SECRET_LEN] {
        let mut mac = <HmacSha256 as Mac>::new_from_slice(&self.master_key)
            .expect("HMAC accepts any key size");
        mac.update(token);
        let result = mac.finalize();
        let mut key = [0u8; COOKIE_SECRET_LEN];
        key.copy_from_slice(&result.into_bytes()[..COOKIE_SECRET_LEN]);
        key
    }
}
