use super::*;
use std::sync::Arc;

fn solid_image(width: u32, height: u32, px: [u8; 4]) -> PreparedImage {
    PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(px.repeat((width * height) as usize)),
    }
}

fn template_png(canvas: Canvas, px: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(canvas.width, canvas.height, image::Rgba(px));
    let mut out = Vec::new();
    img.write_with_encoder(image::codecs::png::PngEncoder::new(&mut out))
        .unwrap();
    out
}

#[test]
fn rect_pct_resolves_against_the_canvas() {
    let r = RectPct {
        left: 2.78,
        top: 7.58,
        width: 94.4,
        height: 47.0,
    }
    .resolve(Canvas {
        width: 1000,
        height: 1000,
    });
    assert!((r.x0 - 27.8).abs() < 1e-9);
    assert!((r.y0 - 75.8).abs() < 1e-9);
    assert!((r.width() - 944.0).abs() < 1e-9);
    assert!((r.height() - 470.0).abs() < 1e-9);
}

#[test]
fn default_layout_carries_the_production_constants() {
    let l = PageLayout::default();
    assert_eq!(l.photo_rect_pct.left, 2.78);
    assert_eq!(l.photo_rect_pct.top, 7.58);
    assert_eq!(l.photo_rect_pct.width, 94.4);
    assert_eq!(l.photo_rect_pct.height, 47.0);
    assert_eq!(l.backdrop_shade, 0.20);
}

#[test]
fn cover_fit_scales_by_height_for_wide_images() {
    // 200x100 into a 100x100 rect: image is proportionally wider, so the
    // height must fill and the width overflow.
    let img = solid_image(200, 100, [0, 0, 0, 255]);
    let a = cover_fit_affine(&img, 100, 100);
    let bbox = a.transform_rect_bbox(Rect::new(0.0, 0.0, 200.0, 100.0));
    assert!((bbox.height() - 100.0).abs() < 1e-9);
    assert!((bbox.width() - 200.0).abs() < 1e-9);
    assert!((bbox.center().x - 50.0).abs() < 1e-9);
    assert!((bbox.center().y - 50.0).abs() < 1e-9);
}

#[test]
fn cover_fit_scales_by_width_for_tall_images() {
    let img = solid_image(100, 200, [0, 0, 0, 255]);
    let a = cover_fit_affine(&img, 100, 100);
    let bbox = a.transform_rect_bbox(Rect::new(0.0, 0.0, 100.0, 200.0));
    assert!((bbox.width() - 100.0).abs() < 1e-9);
    assert!((bbox.height() - 200.0).abs() < 1e-9);
}

#[test]
fn identity_render_has_background_border_and_source_center() {
    // Known solid source against a white zero-width frame: border pixels
    // equal the background exactly, the center equals the source exactly.
    let canvas = Canvas {
        width: 24,
        height: 24,
    };
    let photo = solid_image(12, 12, [255, 0, 0, 255]);
    let state = EditState {
        source: Some("p".to_string()),
        ..EditState::default()
    };

    let surface = render_photo(&state, &photo, canvas).unwrap();
    let white = crate::Rgba8Premul {
        r: 255,
        g: 255,
        b: 255,
        a: 255,
    };
    let red = crate::Rgba8Premul {
        r: 255,
        g: 0,
        b: 0,
        a: 255,
    };
    for (x, y) in [(0, 0), (23, 0), (0, 23), (23, 23), (12, 0), (0, 12)] {
        assert_eq!(surface.pixel(x, y), white, "border pixel at ({x},{y})");
    }
    assert_eq!(surface.pixel(12, 12), red);
    assert_eq!(surface.pixel(6, 6), red);
}

#[test]
fn render_is_deterministic() {
    let canvas = Canvas {
        width: 16,
        height: 16,
    };
    let photo = solid_image(8, 8, [10, 200, 30, 255]);
    let mut state = EditState {
        source: Some("p".to_string()),
        ..EditState::default()
    };
    state.placement.rotation_deg = 30.0;
    state.placement.scale = 1.3;
    state.effects.set(crate::EffectKind::Sepia, 40.0);

    let a = render_photo(&state, &photo, canvas).unwrap();
    let b = render_photo(&state, &photo, canvas).unwrap();
    assert_eq!(a.data(), b.data());
}

#[test]
fn border_is_drawn_unrotated_over_the_photo() {
    let canvas = Canvas {
        width: 16,
        height: 16,
    };
    let photo = solid_image(20, 20, [0, 0, 255, 255]);
    let mut state = EditState {
        source: Some("p".to_string()),
        ..EditState::default()
    };
    state.placement.rotation_deg = 45.0;
    state.frame.border_width_px = 2;

    let surface = render_photo(&state, &photo, canvas).unwrap();
    let black = crate::Rgba8Premul {
        r: 0,
        g: 0,
        b: 0,
        a: 255,
    };
    // The oversized rotated photo covers the whole canvas, yet every border
    // pixel is pure border color.
    for i in 0..16 {
        assert_eq!(surface.pixel(i, 0), black);
        assert_eq!(surface.pixel(i, 15), black);
        assert_eq!(surface.pixel(0, i), black);
        assert_eq!(surface.pixel(15, i), black);
    }
}

fn calendar_fixture() -> (EditState, Vec<PageEditState>, AssetStore, CalendarConfig) {
    let canvas = Canvas {
        width: 36,
        height: 33,
    };
    let mut store = AssetStore::new();
    store.insert_prepared_image("p", solid_image(12, 9, [0, 128, 255, 255]));
    store
        .insert_template(
            "tpl-1",
            crate::TemplateSource::Png(template_png(canvas, [0, 0, 0, 0])),
            canvas,
        )
        .unwrap();

    let shared = EditState {
        source: Some("p".to_string()),
        ..EditState::default()
    };
    let pages = vec![PageEditState::new(1), PageEditState::new(2)];
    let config = CalendarConfig {
        canvas,
        layout: PageLayout {
            backdrop_blur_radius_px: 2,
            ..PageLayout::default()
        },
        templates: BTreeMap::from([(1, "tpl-1".to_string())]),
    };
    (shared, pages, store, config)
}

#[test]
fn calendar_renders_configured_pages_and_skips_the_rest() {
    let (shared, pages, store, config) = calendar_fixture();
    let out = render_calendar(&shared, &pages, &store, &config);
    assert_eq!(out.len(), 2);
    // Page 1 has a template configured; page 2 does not and is skipped.
    assert!(out[0].is_some());
    assert!(out[1].is_none());

    let page = out[0].as_ref().unwrap();
    assert_eq!(page.width(), config.canvas.width);
    // The photo rect holds backdrop + photo ink, not bare page white.
    let rect = config.layout.photo_rect_pct.resolve(config.canvas);
    let c = rect.center();
    let px = page.pixel(c.x as u32, c.y as u32);
    assert_ne!(
        px,
        crate::Rgba8Premul {
            r: 255,
            g: 255,
            b: 255,
            a: 255
        }
    );
}

#[test]
fn calendar_page_without_any_source_is_skipped() {
    let (mut shared, pages, store, config) = calendar_fixture();
    shared.source = None;
    let out = render_calendar(&shared, &pages, &store, &config);
    assert!(out.iter().all(Option::is_none));
}

#[test]
fn per_page_source_overrides_the_shared_photo() {
    let (shared, mut pages, mut store, config) = calendar_fixture();
    store.insert_prepared_image("p2", solid_image(6, 6, [255, 255, 0, 255]));
    pages[0].source = Some("p2".to_string());
    let out = render_calendar(&shared, &pages, &store, &config);
    assert!(out[0].is_some());
}

#[test]
fn missing_photo_asset_skips_the_page() {
    let (mut shared, pages, store, config) = calendar_fixture();
    shared.source = Some("gone".to_string());
    let out = render_calendar(&shared, &pages, &store, &config);
    assert!(out.iter().all(Option::is_none));
}

#[test]
fn calendar_page_rejects_mis_sized_templates() {
    let (shared, _, store, config) = calendar_fixture();
    let photo = store.image("p").unwrap();
    let wrong = solid_image(4, 4, [0, 0, 0, 255]);
    let err = render_calendar_page(
        config.canvas,
        &config.layout,
        shared.placement,
        &ColorFilter::resolve(&shared.effects),
        photo,
        &wrong,
    )
    .unwrap_err();
    assert!(matches!(err, PlatenError::Validation(_)));
}

#[test]
fn template_ink_overlays_the_photo_rect() {
    let (shared, pages, mut store, config) = calendar_fixture();
    // Opaque template: its ink must win everywhere, including the photo rect.
    store
        .insert_template(
            "tpl-1",
            crate::TemplateSource::Png(template_png(config.canvas, [20, 30, 40, 255])),
            config.canvas,
        )
        .unwrap();
    let out = render_calendar(&shared, &pages, &store, &config);
    let page = out[0].as_ref().unwrap();
    let rect = config.layout.photo_rect_pct.resolve(config.canvas);
    let c = rect.center();
    assert_eq!(
        page.pixel(c.x as u32, c.y as u32),
        crate::Rgba8Premul {
            r: 20,
            g: 30,
            b: 40,
            a: 255
        }
    );
}

#[test]
fn export_photo_requires_a_loaded_source() {
    let store = AssetStore::new();
    let canvas = Canvas {
        width: 8,
        height: 8,
    };
    let err = export_photo(&EditState::default(), &store, canvas, PRINT_DPI).unwrap_err();
    assert!(matches!(err, PlatenError::Validation(_)));

    let state = EditState {
        source: Some("nope".to_string()),
        ..EditState::default()
    };
    let err = export_photo(&state, &store, canvas, PRINT_DPI).unwrap_err();
    assert!(matches!(err, PlatenError::Validation(_)));
}

#[test]
fn export_calendar_tags_each_exported_page() {
    let (shared, pages, store, config) = calendar_fixture();
    let out = export_calendar(&shared, &pages, &store, &config, PRINT_DPI);
    assert_eq!(out.len(), 2);
    match &out[0] {
        PageExport::Png(bytes) => {
            assert_eq!(crate::read_dpi(bytes), Some(PRINT_DPI));
        }
        other => panic!("expected exported page, got {other:?}"),
    }
    assert!(matches!(out[1], PageExport::Skipped));
}
