use crate::common::{cache_manager, test_config_builder};
use simple_captcha::GlyphRenderer;
use std::sync::Arc;

#[test]
fn test_issued_image_decodes_with_glyphs_visible() {
    let config = Arc::new(
        test_config_builder()
            .twist(true)
            .random_line_count(5)
            .build()
            .unwrap(),
    );
    let (manager, _) = cache_manager(config);

    let challenge = manager.issue("client-1").unwrap();
    let decoded = image::load_from_memory(&challenge.image.png)
        .expect("issued PNG must decode")
        .to_rgb8();

    assert_eq!(decoded.width(), challenge.image.width);
    assert_eq!(decoded.height(), challenge.image.height);

    // Glyph regions must stay distinguishable from the light background
    // even with noise lines layered in.
    let dark = decoded
        .pixels()
        .filter(|p| p[0] < 128 && p[1] < 128 && p[2] < 128)
        .count();
    assert!(dark > 100, "expected visible glyph pixels, found {dark}");
}

#[test]
fn test_seeded_issue_renders_deterministically() {
    let config = Arc::new(test_config_builder().twist(true).build().unwrap());
    let renderer = GlyphRenderer::new(&config);

    let a = renderer.render_seeded("W8M4K", 42);
    let b = renderer.render_seeded("W8M4K", 42);
    assert_eq!(a.as_raw(), b.as_raw());

    let c = renderer.render_seeded("W8M4K", 43);
    assert_ne!(a.as_raw(), c.as_raw());
}

#[test]
fn test_unseeded_renders_differ() {
    let config = Arc::new(test_config_builder().twist(true).build().unwrap());
    let renderer = GlyphRenderer::new(&config);

    // Random glyph colors and jitter make identical output implausible.
    let a = renderer.render("W8M4K");
    let b = renderer.render("W8M4K");
    assert_ne!(a.as_raw(), b.as_raw());
}

#[test]
fn test_seeded_issue_stores_fresh_code() {
    let config = Arc::new(test_config_builder().build().unwrap());
    let (manager, store) = cache_manager(config);

    manager.issue_seeded("client-1", 7).unwrap();
    let code = store.stored_code("client-1").unwrap();
    assert!(manager.verify("client-1", &code).unwrap());
}
