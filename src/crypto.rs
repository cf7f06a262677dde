//! Cryptographic utilities.
//!
//! Provides authenticated encryption for the cookie code store.

pub mod cookie;
pub use cookie::CookieCrypto;
