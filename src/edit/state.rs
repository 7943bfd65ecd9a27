use crate::{
    edit::effects::{EffectKind, EffectSet, FilterPreset},
    edit::history::{Command, History},
    foundation::core::{Placement, Rgba8},
    foundation::error::PlatenResult,
};

/// Cosmetic canvas dressing, independent of the photo placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameStyle {
    /// Fill behind the photo.
    pub background: Rgba8,
    /// Border stroke color.
    pub border: Rgba8,
    /// Border stroke width in output pixels; 0 disables the border.
    pub border_width_px: u32,
}

impl Default for FrameStyle {
    fn default() -> Self {
        Self {
            background: Rgba8::WHITE,
            border: Rgba8::BLACK,
            border_width_px: 0,
        }
    }
}

/// The canonical, serializable description of one photo's edits.
///
/// This is exactly the state the host persists to resume editing later; it
/// carries no transient fields (zoom, drag progress, history). The source
/// image is referenced by an opaque asset key resolved through
/// [`crate::AssetStore`]; the engine never owns the raw bytes.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EditState {
    /// Asset key of the loaded source image, if any.
    #[serde(default)]
    pub source: Option<String>,
    /// How the photo sits inside the target area.
    #[serde(default)]
    pub placement: Placement,
    /// Color effects, always normalized.
    #[serde(default)]
    pub effects: EffectSet,
    /// Canvas dressing.
    #[serde(default)]
    pub frame: FrameStyle,
    /// The selected filter preset; always matches the applied effect values.
    #[serde(default)]
    pub preset: FilterPreset,
}

/// Per-page edit state for multi-page products (e.g. calendar months).
///
/// Each page is composable independently with its own placement; effects and
/// preset are shared from the product-level [`EditState`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PageEditState {
    /// Page index (e.g. month 1-12).
    pub page: u32,
    /// Asset key of this page's source image, if any.
    #[serde(default)]
    pub source: Option<String>,
    /// This page's own placement.
    #[serde(default)]
    pub placement: Placement,
}

impl PageEditState {
    /// A fresh page with no image and identity placement.
    pub fn new(page: u32) -> Self {
        Self {
            page,
            source: None,
            placement: Placement::default(),
        }
    }
}

/// A concrete edit operation carrying the old and new whole-value of the
/// field it changes.
///
/// Edits are coarse-grained value swaps, not property-level patches, so undo
/// always restores an exactly previous visual state no matter how many
/// sub-fields changed together.
#[derive(Clone, Debug, PartialEq)]
pub enum EditCommand {
    /// Swap the whole placement.
    SetPlacement {
        /// Value before the edit.
        old: Placement,
        /// Value after the edit.
        new: Placement,
    },
    /// Swap the whole effect set.
    SetEffects {
        /// Value before the edit.
        old: EffectSet,
        /// Value after the edit.
        new: EffectSet,
    },
    /// Swap the frame style.
    SetFrameStyle {
        /// Value before the edit.
        old: FrameStyle,
        /// Value after the edit.
        new: FrameStyle,
    },
    /// Swap preset selection and effect values together, so the selection
    /// invariant survives undo/redo.
    ApplyPreset {
        /// Selection and effects before the edit.
        old: (FilterPreset, EffectSet),
        /// Selection and effects after the edit.
        new: (FilterPreset, EffectSet),
    },
}

impl Command for EditCommand {
    type Target = EditState;

    fn undo(&self, state: &mut EditState) {
        match self {
            Self::SetPlacement { old, .. } => state.placement = *old,
            Self::SetEffects { old, .. } => state.effects = old.clone(),
            Self::SetFrameStyle { old, .. } => state.frame = *old,
            Self::ApplyPreset { old, .. } => {
                state.preset = old.0;
                state.effects = old.1.clone();
            }
        }
    }

    fn redo(&self, state: &mut EditState) {
        match self {
            Self::SetPlacement { new, .. } => state.placement = *new,
            Self::SetEffects { new, .. } => state.effects = new.clone(),
            Self::SetFrameStyle { new, .. } => state.frame = *new,
            Self::ApplyPreset { new, .. } => {
                state.preset = new.0;
                state.effects = new.1.clone();
            }
        }
    }
}

/// One editing session: an [`EditState`] plus its undo/redo history.
///
/// All field-level setters route through the history; the only exemptions
/// are [`EditSession::set_source`] (loading an image) and
/// [`EditSession::clear_image`] (the compound reset), which are documented
/// as not undoable.
#[derive(Debug, Default)]
pub struct EditSession {
    state: EditState,
    history: History<EditCommand>,
}

impl EditSession {
    /// Fresh session with default state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume a session from persisted state. History starts empty.
    pub fn from_state(state: EditState) -> Self {
        Self {
            state,
            history: History::new(),
        }
    }

    /// Read access to the live state.
    pub fn state(&self) -> &EditState {
        &self.state
    }

    /// Load (or unload) the source image reference. Not undoable.
    pub fn set_source(&mut self, source: Option<String>) {
        self.state.source = source;
    }

    /// Replace the placement through the history.
    pub fn set_placement(&mut self, new: Placement) -> PlatenResult<()> {
        new.validate()?;
        let old = self.state.placement;
        self.history
            .execute(EditCommand::SetPlacement { old, new }, &mut self.state);
        Ok(())
    }

    /// Replace the whole effect set through the history.
    pub fn set_effects(&mut self, new: EffectSet) {
        let old = self.state.effects.clone();
        self.history
            .execute(EditCommand::SetEffects { old, new }, &mut self.state);
    }

    /// Change one effect value. The committed command still swaps the whole
    /// effect set, re-normalized.
    pub fn set_effect_value(&mut self, kind: EffectKind, value: f32) {
        let mut new = self.state.effects.clone();
        new.set(kind, value);
        self.set_effects(new);
    }

    /// Apply a filter preset by wire id. Rejects unknown ids with
    /// [`crate::PlatenError::InvalidPreset`]; never a silent no-op.
    pub fn apply_preset(&mut self, id: &str) -> PlatenResult<()> {
        let preset = FilterPreset::parse(id)?;
        let old = (self.state.preset, self.state.effects.clone());
        let mut effects = self.state.effects.clone();
        preset.apply_to(&mut effects);
        self.history.execute(
            EditCommand::ApplyPreset {
                old,
                new: (preset, effects),
            },
            &mut self.state,
        );
        Ok(())
    }

    /// Replace the frame style through the history.
    pub fn set_frame_style(&mut self, new: FrameStyle) {
        let old = self.state.frame;
        self.history
            .execute(EditCommand::SetFrameStyle { old, new }, &mut self.state);
    }

    /// Undo one command. Returns false at the boundary.
    pub fn undo(&mut self) -> bool {
        self.history.undo(&mut self.state)
    }

    /// Redo one command. Returns false at the boundary.
    pub fn redo(&mut self) -> bool {
        self.history.redo(&mut self.state)
    }

    /// True if at least one command can be undone.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// True if at least one command can be redone.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Compound reset: placement to identity, frame style and effects to
    /// defaults, preset to none, source unloaded, history emptied.
    ///
    /// This is the one operation explicitly exempt from being undoable; the
    /// three field resets are sequenced synchronously as a single operation.
    pub fn clear_image(&mut self) {
        self.state = EditState::default();
        self.history.reset();
    }

    /// Direct live-state write used by the drag controller mid-gesture, so
    /// dragging never accumulates history entries.
    pub(crate) fn write_placement_provisional(&mut self, p: Placement) {
        self.state.placement = p;
    }

    /// Commit a completed gesture as exactly one history entry.
    pub(crate) fn commit_placement_gesture(&mut self, old: Placement, new: Placement) {
        self.history
            .execute(EditCommand::SetPlacement { old, new }, &mut self.state);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/edit/state.rs"]
mod tests;
