use std::sync::Arc;

use crate::{
    assets::store::PreparedImage,
    foundation::error::{PlatenError, PlatenResult},
};

/// Decode encoded raster bytes and convert to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> PlatenResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| PlatenError::decode(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// Parse SVG template bytes into a `usvg` tree.
pub fn parse_svg(bytes: &[u8]) -> PlatenResult<usvg::Tree> {
    let opts = usvg::Options::default();
    usvg::Tree::from_data(bytes, &opts)
        .map_err(|e| PlatenError::decode(format!("parse svg tree: {e}")))
}

/// Rasterize an SVG tree to premultiplied RGBA8 at an exact pixel size.
///
/// Template artwork ships at arbitrary SVG logical size and is stretched to
/// the product's target output dimensions here, so renderers can treat every
/// template as a pre-sized raster.
pub fn rasterize_svg(tree: &usvg::Tree, width: u32, height: u32) -> PlatenResult<PreparedImage> {
    const MAX_DIM: u32 = 16_384;
    if width == 0 || height == 0 || width > MAX_DIM || height > MAX_DIM {
        return Err(PlatenError::validation(format!(
            "svg raster size out of range: {width}x{height} (max {MAX_DIM}x{MAX_DIM})"
        )));
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| PlatenError::decode("failed to allocate svg pixmap"))?;

    let size = tree.size();
    if size.width() <= 0.0 || size.height() <= 0.0 {
        return Err(PlatenError::decode("svg has invalid width/height"));
    }
    let sx = (width as f32) / size.width();
    let sy = (height as f32) / size.height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());

    // tiny-skia pixmaps are premultiplied RGBA8 already.
    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(pixmap.data().to_vec()),
    })
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
