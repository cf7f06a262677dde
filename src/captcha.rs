//! Captcha generation and lifecycle.
//!
//! Implements alphabet construction, image rendering, and the session
//! manager that ties them to a code store.

pub mod charset;
pub mod manager;
pub mod renderer;

pub use charset::Alphabet;
pub use manager::{CaptchaManager, Challenge};
pub use renderer::{CaptchaImage, GlyphRenderer};
