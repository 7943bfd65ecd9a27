use crate::{edit::state::EditState, foundation::math::Fnv1a64};

/// A stable 128-bit digest of every render-relevant field of an
/// [`EditState`].
///
/// Hosts compare fingerprints between frames to skip recompositing an
/// unchanged preview; identical states always produce identical composites,
/// so equal fingerprints make a re-render redundant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StateFingerprint {
    /// High half.
    pub hi: u64,
    /// Low half.
    pub lo: u64,
}

/// Digest an edit state for preview caching.
pub fn fingerprint_state(state: &EditState) -> StateFingerprint {
    let mut a = Fnv1a64::new(0xcbf2_9ce4_8422_2325);
    let mut b = Fnv1a64::new(0x9ae1_6a3b_2f90_404f);

    let write_u64 = |v: u64, a: &mut Fnv1a64, b: &mut Fnv1a64| {
        a.write_u64(v);
        b.write_u64(v.rotate_left(17));
    };

    match &state.source {
        Some(key) => {
            a.write_u8(1);
            b.write_u8(1);
            a.write_bytes(key.as_bytes());
            b.write_bytes(key.as_bytes());
        }
        None => {
            a.write_u8(0);
            b.write_u8(0);
        }
    }

    let p = &state.placement;
    write_u64(p.scale.to_bits(), &mut a, &mut b);
    write_u64(p.rotation_deg.to_bits(), &mut a, &mut b);
    write_u64(
        (u64::from(p.mirror_x) << 1) | u64::from(p.mirror_y),
        &mut a,
        &mut b,
    );
    write_u64(p.offset.x.to_bits(), &mut a, &mut b);
    write_u64(p.offset.y.to_bits(), &mut a, &mut b);

    for e in state.effects.entries() {
        write_u64(u64::from(e.value.to_bits()), &mut a, &mut b);
    }

    let f = &state.frame;
    write_u64(
        u64::from_le_bytes([
            f.background.r,
            f.background.g,
            f.background.b,
            f.background.a,
            f.border.r,
            f.border.g,
            f.border.b,
            f.border.a,
        ]),
        &mut a,
        &mut b,
    );
    write_u64(u64::from(f.border_width_px), &mut a, &mut b);

    a.write_bytes(state.preset.id().as_bytes());
    b.write_bytes(state.preset.id().as_bytes());

    StateFingerprint {
        hi: a.finish(),
        lo: b.finish(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/fingerprint.rs"]
mod tests;
