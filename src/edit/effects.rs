use smallvec::SmallVec;

use crate::foundation::error::{PlatenError, PlatenResult};

/// The continuous color effects a photo carries.
///
/// Values are percentages: 100 is neutral for everything except sepia, whose
/// neutral is 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum EffectKind {
    /// Linear channel multiplier.
    Brightness,
    /// Contrast around mid-gray.
    Contrast,
    /// Saturation relative to luma.
    Saturation,
    /// Sepia tone mix-in.
    Sepia,
}

impl EffectKind {
    /// The fixed ordering every effect collection is normalized to.
    ///
    /// Downstream code assumes positional access into this sequence, so it is
    /// a post-condition of every mutator that entries appear in this order.
    pub const CANONICAL_ORDER: [EffectKind; 4] = [
        EffectKind::Brightness,
        EffectKind::Contrast,
        EffectKind::Saturation,
        EffectKind::Sepia,
    ];

    /// Neutral (identity) percentage value for this kind.
    pub fn neutral(self) -> f32 {
        match self {
            EffectKind::Brightness | EffectKind::Contrast | EffectKind::Saturation => 100.0,
            EffectKind::Sepia => 0.0,
        }
    }

    fn canonical_index(self) -> usize {
        match self {
            EffectKind::Brightness => 0,
            EffectKind::Contrast => 1,
            EffectKind::Saturation => 2,
            EffectKind::Sepia => 3,
        }
    }
}

/// One effect entry: a kind plus its percentage value.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Effect {
    /// Which effect this entry controls.
    pub kind: EffectKind,
    /// Percentage value (see [`EffectKind::neutral`]).
    pub value: f32,
}

/// A photo's effect collection: always exactly one entry per kind, in
/// [`EffectKind::CANONICAL_ORDER`].
///
/// Serde round-trips through `Vec<Effect>` and re-normalizes on the way in,
/// so persisted state from older hosts (arbitrary order, duplicates, missing
/// kinds) deserializes into a valid set.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(from = "Vec<Effect>", into = "Vec<Effect>")]
pub struct EffectSet {
    entries: SmallVec<[Effect; 4]>,
}

impl Default for EffectSet {
    fn default() -> Self {
        Self {
            entries: EffectKind::CANONICAL_ORDER
                .iter()
                .map(|&kind| Effect {
                    kind,
                    value: kind.neutral(),
                })
                .collect(),
        }
    }
}

impl EffectSet {
    /// Insert-or-update the entry for `kind`, then re-normalize ordering.
    pub fn set(&mut self, kind: EffectKind, value: f32) {
        self.entries.push(Effect { kind, value });
        self.normalize();
    }

    /// Current value for `kind`.
    pub fn get(&self, kind: EffectKind) -> f32 {
        self.entries[kind.canonical_index()].value
    }

    /// The normalized entries, positionally indexable by canonical order.
    pub fn entries(&self) -> &[Effect] {
        &self.entries
    }

    /// Rebuild as exactly one entry per kind in canonical order. Later
    /// entries win over earlier ones; missing kinds get their neutral value.
    fn normalize(&mut self) {
        let mut values = [None::<f32>; 4];
        for e in &self.entries {
            values[e.kind.canonical_index()] = Some(e.value);
        }
        self.entries = EffectKind::CANONICAL_ORDER
            .iter()
            .zip(values)
            .map(|(&kind, v)| Effect {
                kind,
                value: v.unwrap_or_else(|| kind.neutral()),
            })
            .collect();
    }
}

impl From<Vec<Effect>> for EffectSet {
    fn from(entries: Vec<Effect>) -> Self {
        let mut set = Self {
            entries: entries.into_iter().collect(),
        };
        set.normalize();
        set
    }
}

impl From<EffectSet> for Vec<Effect> {
    fn from(set: EffectSet) -> Self {
        set.entries.to_vec()
    }
}

/// A named shortcut resolving to a fixed bundle of effect values.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum FilterPreset {
    /// No filter: full saturation, no sepia.
    #[default]
    None,
    /// Black and white: saturation zeroed.
    BlackWhite,
    /// Sepia tone.
    Sepia,
}

impl FilterPreset {
    /// Parse a preset id. Unknown ids are rejected; callers must not treat
    /// that as a silent no-op, or the selected-filter display state would
    /// drift from the applied effect values.
    pub fn parse(id: &str) -> PlatenResult<Self> {
        match id {
            "none" => Ok(Self::None),
            "blackwhite" => Ok(Self::BlackWhite),
            "sepia" => Ok(Self::Sepia),
            other => Err(PlatenError::InvalidPreset(other.to_string())),
        }
    }

    /// The stable wire id for this preset.
    pub fn id(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::BlackWhite => "blackwhite",
            Self::Sepia => "sepia",
        }
    }

    /// Write this preset's effect values into `effects`. Kinds the preset
    /// does not mention are left untouched.
    pub fn apply_to(self, effects: &mut EffectSet) {
        match self {
            Self::None => {
                effects.set(EffectKind::Saturation, 100.0);
                effects.set(EffectKind::Sepia, 0.0);
            }
            Self::BlackWhite => {
                effects.set(EffectKind::Saturation, 0.0);
                effects.set(EffectKind::Sepia, 0.0);
            }
            Self::Sepia => {
                effects.set(EffectKind::Saturation, 100.0);
                effects.set(EffectKind::Sepia, 100.0);
            }
        }
    }
}

/// Unit-scaled effect parameters resolved from an [`EffectSet`], consumed by
/// the compositing renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorFilter {
    /// Channel multiplier; 1.0 is neutral.
    pub brightness: f32,
    /// Contrast factor around mid-gray; 1.0 is neutral.
    pub contrast: f32,
    /// Saturation mix; 1.0 is neutral, 0.0 is grayscale.
    pub saturation: f32,
    /// Sepia mix; 0.0 is neutral, 1.0 is full sepia.
    pub sepia: f32,
}

impl ColorFilter {
    /// The identity filter.
    pub const NEUTRAL: Self = Self {
        brightness: 1.0,
        contrast: 1.0,
        saturation: 1.0,
        sepia: 0.0,
    };

    /// Resolve an effect set into renderer parameters.
    pub fn resolve(effects: &EffectSet) -> Self {
        let pct = |kind: EffectKind| (effects.get(kind) / 100.0).max(0.0);
        Self {
            brightness: pct(EffectKind::Brightness),
            contrast: pct(EffectKind::Contrast),
            saturation: pct(EffectKind::Saturation),
            sepia: pct(EffectKind::Sepia).min(1.0),
        }
    }

    /// True when applying this filter changes nothing.
    pub fn is_neutral(&self) -> bool {
        *self == Self::NEUTRAL
    }
}

#[cfg(test)]
#[path = "../../tests/unit/edit/effects.rs"]
mod tests;
