use super::*;
use crate::edit::effects::{EffectKind, EffectSet};

#[test]
fn neutral_filter_is_identity() {
    let f = ColorFilter::NEUTRAL;
    for rgb in [[0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [0.3, 0.6, 0.9]] {
        let out = filter_rgb(&f, rgb);
        for c in 0..3 {
            assert!((out[c] - rgb[c]).abs() < 1e-5);
        }
    }
}

#[test]
fn zero_saturation_equalizes_channels_to_luma() {
    let f = ColorFilter {
        saturation: 0.0,
        ..ColorFilter::NEUTRAL
    };
    let out = filter_rgb(&f, [1.0, 0.0, 0.0]);
    assert!((out[0] - out[1]).abs() < 1e-6);
    assert!((out[1] - out[2]).abs() < 1e-6);
    // Pure red collapses to its luma weight.
    assert!((out[0] - 0.213).abs() < 1e-4);
}

#[test]
fn zero_brightness_is_black() {
    let f = ColorFilter {
        brightness: 0.0,
        contrast: 1.0,
        saturation: 1.0,
        sepia: 0.0,
    };
    assert_eq!(filter_rgb(&f, [1.0, 0.8, 0.6]), [0.0, 0.0, 0.0]);
}

#[test]
fn full_sepia_of_white_matches_the_matrix() {
    let f = ColorFilter {
        sepia: 1.0,
        ..ColorFilter::NEUTRAL
    };
    let out = filter_rgb(&f, [1.0, 1.0, 1.0]);
    assert_eq!(out[0], 1.0);
    assert_eq!(out[1], 1.0);
    assert!((out[2] - 0.937).abs() < 1e-4);
}

#[test]
fn contrast_pivots_around_mid_gray() {
    let f = ColorFilter {
        contrast: 2.0,
        ..ColorFilter::NEUTRAL
    };
    let out = filter_rgb(&f, [0.5, 0.75, 0.25]);
    assert!((out[0] - 0.5).abs() < 1e-6);
    assert!((out[1] - 1.0).abs() < 1e-6);
    assert!((out[2] - 0.0).abs() < 1e-6);
}

#[test]
fn filter_premul_preserves_alpha() {
    let f = ColorFilter {
        brightness: 0.5,
        ..ColorFilter::NEUTRAL
    };
    let out = filter_premul(
        &f,
        crate::Rgba8Premul {
            r: 128,
            g: 128,
            b: 128,
            a: 128,
        },
    );
    assert_eq!(out.a, 128);
    assert_eq!(out.r, 64);
}

#[test]
fn filter_premul_passes_transparent_through() {
    let f = ColorFilter {
        brightness: 3.0,
        ..ColorFilter::NEUTRAL
    };
    let px = crate::Rgba8Premul::transparent();
    assert_eq!(filter_premul(&f, px), px);
}

#[test]
fn blackwhite_preset_grayscales_through_the_resolver() {
    let mut effects = EffectSet::default();
    effects.set(EffectKind::Saturation, 0.0);
    let f = ColorFilter::resolve(&effects);
    let out = filter_rgb(&f, [0.9, 0.2, 0.4]);
    assert!((out[0] - out[1]).abs() < 1e-6);
    assert!((out[1] - out[2]).abs() < 1e-6);
}
