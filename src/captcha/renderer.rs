//! Glyph rendering.
//!
//! Draws a code string into a raster image with optional per-glyph twist
//! and random noise lines. Rendering is deterministic when a seed is
//! injected ([`GlyphRenderer::render_seeded`]) and non-deterministic
//! otherwise.

use ab_glyph::{FontRef, PxScale};
use image::{ImageBuffer, Rgb, RgbImage};
use imageproc::drawing::{draw_antialiased_line_segment_mut, draw_text_mut};
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};
use imageproc::pixelops::interpolate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{CaptchaConfig, CaptchaError, Result};

const FONT_BYTES: &[u8] = include_bytes!("../../assets/DejaVuSans-Bold.ttf");

const IMG_HEIGHT: u32 = 60;
const GLYPH_CELL: u32 = 40;
const MARGIN: u32 = 10;
const FONT_SIZE: f32 = 40.0;
const MAX_TWIST_DEG: f32 = 15.0;
const BACKGROUND: Rgb<u8> = Rgb([245, 246, 250]);

/// A rendered captcha challenge. Ephemeral: owned by the response path,
/// never persisted or reused across requests.
#[derive(Debug, Clone)]
pub struct CaptchaImage {
    /// PNG-encoded pixels, ready to serve as `image/png`.
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

struct GlyphDrawParams {
    ch: char,
    x: i32,
    y: i32,
    rotation_deg: f32,
    color: Rgb<u8>,
}

/// Renders verification codes into obfuscated raster images.
pub struct GlyphRenderer {
    font: FontRef<'static>,
    twist_enabled: bool,
    random_line_enabled: bool,
    random_line_count: u32,
}

impl GlyphRenderer {
    /// Creates a renderer from the frozen configuration.
    ///
    /// # Panics
    ///
    /// Panics if the embedded font data is invalid or fails to load.
    #[must_use]
    pub fn new(config: &CaptchaConfig) -> Self {
        let font = FontRef::try_from_slice(FONT_BYTES).expect("Failed to load embedded font");
        Self {
            font,
            twist_enabled: config.twist_enabled,
            random_line_enabled: config.random_line_enabled,
            random_line_count: config.random_line_count,
        }
    }

    /// Renders `code` with fresh randomness.
    #[must_use]
    pub fn render(&self, code: &str) -> RgbImage {
        self.render_with_rng(code, &mut rand::rng())
    }

    /// Renders `code` deterministically from `seed`. Same seed, same bytes.
    #[must_use]
    pub fn render_seeded(&self, code: &str, seed: u64) -> RgbImage {
        self.render_with_rng(code, &mut StdRng::seed_from_u64(seed))
    }

    /// Encodes a rendered buffer as PNG.
    ///
    /// # Errors
    ///
    /// Returns `CaptchaError::Render` if PNG encoding fails.
    pub fn encode_png(image: &RgbImage) -> Result<CaptchaImage> {
        let mut png = Vec::new();
        image
            .write_to(
                &mut std::io::Cursor::new(&mut png),
                image::ImageFormat::Png,
            )
            .map_err(|e| CaptchaError::Render(format!("PNG encode failed: {e}")))?;
        Ok(CaptchaImage {
            png,
            width: image.width(),
            height: image.height(),
        })
    }

    fn render_with_rng(&self, code: &str, rng: &mut impl Rng) -> RgbImage {
        let glyph_count = code.chars().count().max(1) as u32;
        let width = MARGIN * 2 + GLYPH_CELL * glyph_count;
        let mut img: RgbImage = ImageBuffer::from_pixel(width, IMG_HEIGHT, BACKGROUND);

        // Noise lines go behind the text so no glyph is ever fully occluded.
        if self.random_line_enabled {
            self.draw_noise_lines(&mut img, rng);
        }

        for (i, ch) in code.chars().enumerate() {
            let cell_x = (MARGIN + GLYPH_CELL * i as u32) as i32;
            let params = GlyphDrawParams {
                ch,
                x: cell_x + rng.random_range(-4..=4),
                y: rng.random_range(4..=12),
                rotation_deg: if self.twist_enabled {
                    rng.random_range(-MAX_TWIST_DEG..MAX_TWIST_DEG)
                } else {
                    0.0
                },
                color: random_glyph_color(rng),
            };
            self.draw_glyph(&mut img, &params);
        }

        img
    }

    fn draw_noise_lines(&self, img: &mut RgbImage, rng: &mut impl Rng) {
        let (width, height) = img.dimensions();
        let width_i32 = width as i32;
        let height_i32 = height as i32;

        for _ in 0..self.random_line_count {
            let color = Rgb([
                rng.random_range(120..=200),
                rng.random_range(120..=200),
                rng.random_range(120..=200),
            ]);
            let start = (rng.random_range(0..width_i32), rng.random_range(0..height_i32));
            let end = (rng.random_range(0..width_i32), rng.random_range(0..height_i32));
            draw_antialiased_line_segment_mut(img, start, end, color, interpolate);
        }
    }

    fn draw_glyph(&self, img: &mut RgbImage, params: &GlyphDrawParams) {
        if params.rotation_deg == 0.0 {
            draw_text_mut(
                img,
                params.color,
                params.x,
                params.y,
                PxScale::from(FONT_SIZE),
                &self.font,
                &params.ch.to_string(),
            );
            return;
        }
        self.draw_twisted_glyph(img, params);
    }

    /// Draws the glyph onto a scratch buffer, rotates it about its center,
    /// and blits the non-background pixels back onto the canvas.
    fn draw_twisted_glyph(&self, img: &mut RgbImage, params: &GlyphDrawParams) {
        let scratch_size = (FONT_SIZE * 2.0) as u32;
        let mut scratch: RgbImage =
            ImageBuffer::from_pixel(scratch_size, scratch_size, BACKGROUND);

        let inset = (scratch_size / 4) as i32;
        draw_text_mut(
            &mut scratch,
            params.color,
            inset,
            inset,
            PxScale::from(FONT_SIZE),
            &self.font,
            &params.ch.to_string(),
        );

        let rotated = rotate_about_center(
            &scratch,
            params.rotation_deg.to_radians(),
            Interpolation::Bilinear,
            BACKGROUND,
        );

        let (width, height) = img.dimensions();
        for (rx, ry, pixel) in rotated.enumerate_pixels() {
            if is_background(*pixel) {
                continue;
            }
            let gx = params.x + rx as i32 - inset;
            let gy = params.y + ry as i32 - inset;
            if gx >= 0 && gy >= 0 && (gx as u32) < width && (gy as u32) < height {
                img.put_pixel(gx as u32, gy as u32, *pixel);
            }
        }
    }
}

fn random_glyph_color(rng: &mut impl Rng) -> Rgb<u8> {
    // Dark channels against the light background keep glyphs legible.
    let mut c = [
        rng.random_range(10..=110),
        rng.random_range(10..=110),
        rng.random_range(10..=110),
    ];
    c[rng.random_range(0..3)] = rng.random_range(10..=60);
    Rgb(c)
}

fn is_background(pixel: Rgb<u8>) -> bool {
    pixel[0] >= 225 && pixel[1] >= 225 && pixel[2] >= 225
}
