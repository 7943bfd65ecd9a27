use super::*;
use crate::edit::effects::EffectKind;
use crate::foundation::core::Vec2;

fn base_state() -> EditState {
    let mut state = EditState::default();
    state.source = Some("photo-1".to_string());
    state
}

#[test]
fn identical_states_share_a_fingerprint() {
    assert_eq!(fingerprint_state(&base_state()), fingerprint_state(&base_state()));
}

#[test]
fn placement_changes_the_fingerprint() {
    let a = fingerprint_state(&base_state());
    let mut moved = base_state();
    moved.placement.offset = Vec2::new(1.0, 0.0);
    assert_ne!(a, fingerprint_state(&moved));

    let mut mirrored = base_state();
    mirrored.placement.mirror_x = true;
    assert_ne!(a, fingerprint_state(&mirrored));
}

#[test]
fn effects_and_preset_change_the_fingerprint() {
    let a = fingerprint_state(&base_state());

    let mut warmer = base_state();
    warmer.effects.set(EffectKind::Sepia, 30.0);
    assert_ne!(a, fingerprint_state(&warmer));

    let mut chosen = base_state();
    chosen.preset = crate::FilterPreset::Sepia;
    assert_ne!(a, fingerprint_state(&chosen));
}

#[test]
fn source_identity_is_part_of_the_fingerprint() {
    let a = fingerprint_state(&base_state());
    let mut other = base_state();
    other.source = Some("photo-2".to_string());
    assert_ne!(a, fingerprint_state(&other));

    let mut unloaded = base_state();
    unloaded.source = None;
    assert_ne!(a, fingerprint_state(&unloaded));
}

#[test]
fn frame_style_changes_the_fingerprint() {
    let a = fingerprint_state(&base_state());
    let mut bordered = base_state();
    bordered.frame.border_width_px = 6;
    assert_ne!(a, fingerprint_state(&bordered));
}
