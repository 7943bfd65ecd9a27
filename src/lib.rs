//! Platen is a photo customization and print-ready export engine.
//!
//! It turns one user photograph plus a fixed print template into
//! print-grade PNG bytes, via a replayable edit model:
//!
//! 1. **Edit**: mutate an [`EditState`] (placement, effects, frame style)
//!    through an [`EditSession`], every change an undoable whole-value swap
//! 2. **Interact**: a [`DragController`] turns pointer gestures into
//!    frame-coalesced provisional placements and exactly one history commit
//!    per gesture
//! 3. **Render**: deterministic CPU compositing of the edit state against
//!    template artwork ([`render_photo`] / [`render_calendar`])
//! 4. **Export**: PNG encoding plus direct byte-stream patching of the
//!    physical-density chunk at print resolution ([`write_dpi`])
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic-by-default**: rendering is a pure function of the edit
//!   state and prepared assets; identical inputs produce identical pixels.
//! - **No IO in renderers**: decode IO is front-loaded in [`AssetStore`].
//! - **Premultiplied RGBA8** end-to-end: renderers operate on premultiplied
//!   pixels and un-premultiply only at the encode boundary.
#![forbid(unsafe_code)]

mod assets;
mod edit;
mod encode;
mod foundation;
mod render;

pub use assets::decode::{decode_image, parse_svg, rasterize_svg};
pub use assets::store::{AssetStore, PreparedImage, TemplateSource};
pub use edit::drag::{DragController, FrameClock, Zoom};
pub use edit::effects::{ColorFilter, Effect, EffectKind, EffectSet, FilterPreset};
pub use edit::history::{Command, History};
pub use edit::state::{EditCommand, EditSession, EditState, FrameStyle, PageEditState};
pub use encode::png::{encode_png, read_dpi, write_dpi};
pub use foundation::core::{Affine, Canvas, Placement, Point, Rect, Rgba8, Rgba8Premul, Vec2};
pub use foundation::error::{PlatenError, PlatenResult};
pub use render::fingerprint::{StateFingerprint, fingerprint_state};
pub use render::pipeline::{
    CalendarConfig, PRINT_DPI, PageExport, PageLayout, RectPct, export_calendar, export_photo,
    render_calendar, render_calendar_page, render_photo,
};
pub use render::surface::Surface;
