use std::collections::BTreeMap;

use crate::{
    assets::store::{AssetStore, PreparedImage},
    edit::effects::ColorFilter,
    edit::state::{EditState, PageEditState},
    encode::png::{encode_png, write_dpi},
    foundation::core::{Affine, Canvas, Placement, Rect, Rgba8, Vec2},
    foundation::error::{PlatenError, PlatenResult},
    render::blur::blur,
    render::composite::{blit_over, draw_image, shade_in_place},
    render::surface::Surface,
};

/// Physical resolution embedded in exported print rasters.
pub const PRINT_DPI: u32 = 300;

/// A rectangle expressed as percentages of a canvas.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RectPct {
    /// Left edge, percent of canvas width.
    pub left: f64,
    /// Top edge, percent of canvas height.
    pub top: f64,
    /// Width, percent of canvas width.
    pub width: f64,
    /// Height, percent of canvas height.
    pub height: f64,
}

impl RectPct {
    /// Resolve against a canvas into pixel coordinates.
    pub fn resolve(self, canvas: Canvas) -> Rect {
        let w = f64::from(canvas.width);
        let h = f64::from(canvas.height);
        let x0 = w * self.left / 100.0;
        let y0 = h * self.top / 100.0;
        Rect::new(x0, y0, x0 + w * self.width / 100.0, y0 + h * self.height / 100.0)
    }
}

/// Multi-page renderer configuration, injected so tests can substitute
/// synthetic layouts. `Default` carries the production constants.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PageLayout {
    /// Photo placement rectangle as percentages of the template.
    pub photo_rect_pct: RectPct,
    /// Backdrop blur radius in pixels.
    pub backdrop_blur_radius_px: u32,
    /// Black overlay fraction applied to the blurred backdrop.
    pub backdrop_shade: f32,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            photo_rect_pct: RectPct {
                left: 2.78,
                top: 7.58,
                width: 94.4,
                height: 47.0,
            },
            backdrop_blur_radius_px: 32,
            backdrop_shade: 0.20,
        }
    }
}

/// Multi-page product configuration: output size, layout, and per-page
/// template artwork keys into the [`AssetStore`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CalendarConfig {
    /// Fixed template output size.
    pub canvas: Canvas,
    /// Page layout constants.
    #[serde(default)]
    pub layout: PageLayout,
    /// Template asset key per page index.
    pub templates: BTreeMap<u32, String>,
}

/// Render a single-page photo product.
///
/// Fills the background, draws the transformed and color-filtered photo
/// centered on its natural size, then strokes the border in untransformed
/// surface space.
#[tracing::instrument(skip(state, photo), fields(w = canvas.width, h = canvas.height))]
pub fn render_photo(
    state: &EditState,
    photo: &PreparedImage,
    canvas: Canvas,
) -> PlatenResult<Surface> {
    state.placement.validate()?;

    let mut surface = Surface::new(canvas)?;
    surface.fill(state.frame.background);

    let filter = ColorFilter::resolve(&state.effects);
    let transform = photo_transform(state.placement, canvas.center().x, canvas.center().y, photo);
    draw_image(&mut surface, photo, transform, None, &filter)?;

    if state.frame.border_width_px > 0 {
        surface.stroke_border(state.frame.border_width_px, state.frame.border);
    }
    Ok(surface)
}

/// Render one calendar page: blurred darkened cover-fit backdrop, the
/// positioned photo clipped to the photo rectangle, then the template
/// artwork over the entire canvas.
#[tracing::instrument(skip_all, fields(w = canvas.width, h = canvas.height))]
pub fn render_calendar_page(
    canvas: Canvas,
    layout: &PageLayout,
    placement: Placement,
    filter: &ColorFilter,
    photo: &PreparedImage,
    template: &PreparedImage,
) -> PlatenResult<Surface> {
    placement.validate()?;
    if template.width != canvas.width || template.height != canvas.height {
        return Err(PlatenError::validation(format!(
            "template artwork is {}x{}, canvas is {}x{}",
            template.width, template.height, canvas.width, canvas.height
        )));
    }

    let mut surface = Surface::new(canvas)?;
    surface.fill(Rgba8::WHITE);

    let rect = layout.photo_rect_pct.resolve(canvas);
    let rx = rect.x0.round().max(0.0) as u32;
    let ry = rect.y0.round().max(0.0) as u32;
    let rw = (rect.width().round() as u32).min(canvas.width.saturating_sub(rx));
    let rh = (rect.height().round() as u32).min(canvas.height.saturating_sub(ry));
    if rw == 0 || rh == 0 {
        return Err(PlatenError::validation("photo rectangle is empty"));
    }

    // Backdrop: cover-fit copy of the photo, blurred and darkened, built in
    // a rect-sized scratch surface so the blur cannot bleed outside the clip.
    let mut backdrop = Surface::new(Canvas {
        width: rw,
        height: rh,
    })?;
    let cover = cover_fit_affine(photo, rw, rh);
    draw_image(&mut backdrop, photo, cover, None, &ColorFilter::NEUTRAL)?;
    let radius = layout.backdrop_blur_radius_px;
    if radius > 0 {
        blur(&mut backdrop, radius, radius as f32 / 2.0)?;
    }
    shade_in_place(backdrop.data_mut(), layout.backdrop_shade);
    let backdrop_img = PreparedImage {
        width: rw,
        height: rh,
        rgba8_premul: std::sync::Arc::new(backdrop.data().to_vec()),
    };
    blit_over(&mut surface, &backdrop_img, (i64::from(rx), i64::from(ry)));

    // The page's own photo, centered on the rect center plus offset.
    let clip = Rect::new(
        f64::from(rx),
        f64::from(ry),
        f64::from(rx + rw),
        f64::from(ry + rh),
    );
    let transform = photo_transform(placement, clip.center().x, clip.center().y, photo);
    draw_image(&mut surface, photo, transform, Some(clip), filter)?;

    // Template ink overlays any backdrop bleed: full canvas, unclipped.
    blit_over(&mut surface, template, (0, 0));

    Ok(surface)
}

/// Render every page of a multi-page product.
///
/// Per-page failures are isolated: a page with no source image, a missing
/// asset key, or a render error yields `None` (logged) and never aborts the
/// batch. The returned vector is aligned with `pages`.
#[tracing::instrument(skip_all, fields(pages = pages.len()))]
pub fn render_calendar(
    shared: &EditState,
    pages: &[PageEditState],
    store: &AssetStore,
    config: &CalendarConfig,
) -> Vec<Option<Surface>> {
    let filter = ColorFilter::resolve(&shared.effects);
    pages
        .iter()
        .map(|page| {
            let source = page.source.as_deref().or(shared.source.as_deref());
            let Some(source) = source else {
                return None;
            };
            let Some(photo) = store.image(source) else {
                tracing::warn!(page = page.page, source, "page photo missing from asset store");
                return None;
            };
            let Some(template_key) = config.templates.get(&page.page) else {
                tracing::warn!(page = page.page, "no template configured for page");
                return None;
            };
            let Some(template) = store.template(template_key) else {
                tracing::warn!(
                    page = page.page,
                    %template_key,
                    "template artwork missing from asset store"
                );
                return None;
            };
            match render_calendar_page(
                config.canvas,
                &config.layout,
                page.placement,
                &filter,
                photo,
                template,
            ) {
                Ok(surface) => Some(surface),
                Err(e) => {
                    tracing::warn!(page = page.page, error = %e, "page render failed; skipping");
                    None
                }
            }
        })
        .collect()
}

/// Outcome of exporting one page of a multi-page product.
#[derive(Debug)]
pub enum PageExport {
    /// DPI-tagged PNG bytes for this page.
    Png(Vec<u8>),
    /// Page skipped: no source image or missing asset (already logged).
    Skipped,
    /// The page rendered but could not be encoded.
    Failed(PlatenError),
}

/// Render and export a single-page product as a DPI-tagged PNG.
pub fn export_photo(
    state: &EditState,
    store: &AssetStore,
    canvas: Canvas,
    dpi: u32,
) -> PlatenResult<Vec<u8>> {
    let source = state
        .source
        .as_deref()
        .ok_or_else(|| PlatenError::validation("no source image loaded"))?;
    let photo = store
        .image(source)
        .ok_or_else(|| PlatenError::validation(format!("unknown image asset '{source}'")))?;
    let surface = render_photo(state, photo, canvas)?;
    let bytes = encode_png(&surface)?;
    Ok(write_dpi(&bytes, dpi))
}

/// Render and export every page of a multi-page product.
///
/// Encode failures are fatal to their own page only; skipped and failed
/// pages never abort the batch.
pub fn export_calendar(
    shared: &EditState,
    pages: &[PageEditState],
    store: &AssetStore,
    config: &CalendarConfig,
    dpi: u32,
) -> Vec<PageExport> {
    render_calendar(shared, pages, store, config)
        .into_iter()
        .map(|surface| match surface {
            None => PageExport::Skipped,
            Some(surface) => match encode_png(&surface) {
                Ok(bytes) => PageExport::Png(write_dpi(&bytes, dpi)),
                Err(e) => PageExport::Failed(e),
            },
        })
        .collect()
}

/// Affine mapping photo pixel coordinates into target coordinates for a
/// placement anchored at `(cx, cy)`, with the photo centered on its own
/// natural size.
fn photo_transform(placement: Placement, cx: f64, cy: f64, photo: &PreparedImage) -> Affine {
    placement.to_affine(crate::foundation::core::Point::new(cx, cy))
        * Affine::translate(Vec2::new(
            -f64::from(photo.width) / 2.0,
            -f64::from(photo.height) / 2.0,
        ))
}

/// Cover-fit transform: scale the photo uniformly so it fully fills a
/// `rw x rh` rectangle (origin at the rectangle's top-left), cropping the
/// overflow. Scales by height when the image is proportionally wider than
/// the rectangle, else by width.
fn cover_fit_affine(photo: &PreparedImage, rw: u32, rh: u32) -> Affine {
    let iw = f64::from(photo.width.max(1));
    let ih = f64::from(photo.height.max(1));
    let rw = f64::from(rw);
    let rh = f64::from(rh);

    let image_aspect = iw / ih;
    let rect_aspect = rw / rh;
    let scale = if image_aspect > rect_aspect {
        rh / ih
    } else {
        rw / iw
    };

    Affine::translate(Vec2::new(rw / 2.0, rh / 2.0))
        * Affine::scale(scale)
        * Affine::translate(Vec2::new(-iw / 2.0, -ih / 2.0))
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
