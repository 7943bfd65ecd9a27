use std::collections::BTreeMap;
use std::sync::Arc;

use crate::{
    assets::decode::{decode_image, parse_svg, rasterize_svg},
    foundation::core::Canvas,
    foundation::error::{PlatenError, PlatenResult},
};

/// A decoded image ready for compositing: premultiplied RGBA8.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8 pixel data, `width * height * 4` bytes.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedImage {
    /// Width / height.
    pub fn aspect(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height.max(1))
    }
}

/// Encoded template artwork as supplied by the asset bundle.
#[derive(Clone, Debug)]
pub enum TemplateSource {
    /// Pre-rasterized artwork; must already match the product canvas size.
    Png(Vec<u8>),
    /// Vector artwork; rasterized at the product canvas size on insert.
    Svg(Vec<u8>),
}

/// Keyed store of prepared source photos and template artwork.
///
/// All decode IO is front-loaded at insert time; renderers only ever read
/// prepared pixels. Decode failures therefore surface where the bytes enter
/// the engine, and a missing key at render time is a per-unit failure, not a
/// batch abort.
#[derive(Debug, Default)]
pub struct AssetStore {
    images: BTreeMap<String, PreparedImage>,
    templates: BTreeMap<String, PreparedImage>,
}

impl AssetStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode and store a user photo under `key`.
    pub fn insert_image(&mut self, key: impl Into<String>, bytes: &[u8]) -> PlatenResult<()> {
        let prepared = decode_image(bytes)?;
        self.images.insert(key.into(), prepared);
        Ok(())
    }

    /// Store an already-prepared photo under `key` (e.g. synthetic test rasters).
    pub fn insert_prepared_image(&mut self, key: impl Into<String>, image: PreparedImage) {
        self.images.insert(key.into(), image);
    }

    /// Look up a prepared photo.
    pub fn image(&self, key: &str) -> Option<&PreparedImage> {
        self.images.get(key)
    }

    /// Decode template artwork under `key`, sized for `canvas`.
    ///
    /// Raster templates must already be pre-sized to the target output
    /// dimensions; SVG templates are rasterized to them here.
    pub fn insert_template(
        &mut self,
        key: impl Into<String>,
        source: TemplateSource,
        canvas: Canvas,
    ) -> PlatenResult<()> {
        let prepared = match source {
            TemplateSource::Png(bytes) => {
                let img = decode_image(&bytes)?;
                if img.width != canvas.width || img.height != canvas.height {
                    return Err(PlatenError::validation(format!(
                        "template raster is {}x{}, product canvas is {}x{}",
                        img.width, img.height, canvas.width, canvas.height
                    )));
                }
                img
            }
            TemplateSource::Svg(bytes) => {
                let tree = parse_svg(&bytes)?;
                rasterize_svg(&tree, canvas.width, canvas.height)?
            }
        };
        self.templates.insert(key.into(), prepared);
        Ok(())
    }

    /// Look up prepared template artwork.
    pub fn template(&self, key: &str) -> Option<&PreparedImage> {
        self.templates.get(key)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
