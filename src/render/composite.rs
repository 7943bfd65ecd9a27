use crate::{
    assets::store::PreparedImage,
    edit::effects::ColorFilter,
    foundation::core::{Affine, Point, Rect, Rgba8Premul},
    foundation::error::{PlatenError, PlatenResult},
    foundation::math::mul_div255_u8,
    render::filter::filter_premul,
    render::surface::Surface,
};

/// Source-over blend of premultiplied pixels.
pub(crate) fn over(dst: Rgba8Premul, src: Rgba8Premul) -> Rgba8Premul {
    if src.a == 0 {
        return dst;
    }
    if src.a == 255 {
        return src;
    }
    let inv = 255u16 - u16::from(src.a);
    Rgba8Premul {
        r: src.r.saturating_add(mul_div255_u8(u16::from(dst.r), inv)),
        g: src.g.saturating_add(mul_div255_u8(u16::from(dst.g), inv)),
        b: src.b.saturating_add(mul_div255_u8(u16::from(dst.b), inv)),
        a: src.a.saturating_add(mul_div255_u8(u16::from(dst.a), inv)),
    }
}

/// Overlay a fractional black layer over the whole buffer (premultiplied),
/// used to darken the multi-page backdrop.
pub(crate) fn shade_in_place(data: &mut [u8], amount: f32) {
    let amount = amount.clamp(0.0, 1.0);
    if amount <= 0.0 {
        return;
    }
    let black = Rgba8Premul {
        r: 0,
        g: 0,
        b: 0,
        a: ((amount * 255.0).round() as i32).clamp(0, 255) as u8,
    };
    for px in data.chunks_exact_mut(4) {
        let dst = Rgba8Premul {
            r: px[0],
            g: px[1],
            b: px[2],
            a: px[3],
        };
        let out = over(dst, black);
        px.copy_from_slice(&[out.r, out.g, out.b, out.a]);
    }
}

/// Source-over blit of a pre-sized image at an integer offset, clipped to
/// the destination surface. Used for template artwork and backdrop layers
/// where no resampling is needed.
pub(crate) fn blit_over(dst: &mut Surface, src: &PreparedImage, origin: (i64, i64)) {
    let (ox, oy) = origin;
    for sy in 0..i64::from(src.height) {
        let dy = oy + sy;
        if dy < 0 || dy >= i64::from(dst.height()) {
            continue;
        }
        for sx in 0..i64::from(src.width) {
            let dx = ox + sx;
            if dx < 0 || dx >= i64::from(dst.width()) {
                continue;
            }
            let i = ((sy as usize * src.width as usize) + sx as usize) * 4;
            let s = Rgba8Premul {
                r: src.rgba8_premul[i],
                g: src.rgba8_premul[i + 1],
                b: src.rgba8_premul[i + 2],
                a: src.rgba8_premul[i + 3],
            };
            if s.a == 0 {
                continue;
            }
            let d = dst.pixel(dx as u32, dy as u32);
            dst.put_pixel(dx as u32, dy as u32, over(d, s));
        }
    }
}

/// Draw `img` into `dst` under an affine transform, with an optional clip
/// rectangle and a per-sample color filter.
///
/// `transform` maps image pixel coordinates (top-left origin) into
/// destination pixel coordinates. Destination pixels are inverse-mapped and
/// bilinearly sampled; samples outside the source are transparent, which
/// antialiases the photo's edges against whatever is already on the surface.
pub(crate) fn draw_image(
    dst: &mut Surface,
    img: &PreparedImage,
    transform: Affine,
    clip: Option<Rect>,
    filter: &ColorFilter,
) -> PlatenResult<()> {
    if transform.determinant().abs() < 1e-12 {
        return Err(PlatenError::validation("draw transform is not invertible"));
    }
    let inv = transform.inverse();

    let src_rect = Rect::new(0.0, 0.0, f64::from(img.width), f64::from(img.height));
    let mut bounds = transform.transform_rect_bbox(src_rect);
    if let Some(clip) = clip {
        bounds = bounds.intersect(clip);
    }
    bounds = bounds.intersect(Rect::new(
        0.0,
        0.0,
        f64::from(dst.width()),
        f64::from(dst.height()),
    ));
    if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
        return Ok(());
    }

    let x0 = bounds.x0.floor().max(0.0) as u32;
    let y0 = bounds.y0.floor().max(0.0) as u32;
    let x1 = (bounds.x1.ceil() as u32).min(dst.width());
    let y1 = (bounds.y1.ceil() as u32).min(dst.height());

    let neutral = filter.is_neutral();
    for y in y0..y1 {
        for x in x0..x1 {
            let src_pt = inv * Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            let Some(mut sample) = sample_bilinear(img, src_pt) else {
                continue;
            };
            if sample.a == 0 {
                continue;
            }
            if !neutral {
                sample = filter_premul(filter, sample);
            }
            let d = dst.pixel(x, y);
            dst.put_pixel(x, y, over(d, sample));
        }
    }
    Ok(())
}

/// Bilinear sample at a source-space point; texels outside the image are
/// transparent. Returns None when the point is entirely outside the source
/// footprint.
fn sample_bilinear(img: &PreparedImage, p: Point) -> Option<Rgba8Premul> {
    let w = f64::from(img.width);
    let h = f64::from(img.height);
    if p.x < -0.5 || p.y < -0.5 || p.x > w + 0.5 || p.y > h + 0.5 {
        return None;
    }

    let sx = p.x - 0.5;
    let sy = p.y - 0.5;
    let fx0 = sx.floor();
    let fy0 = sy.floor();
    let tx = (sx - fx0) as f32;
    let ty = (sy - fy0) as f32;
    let x0 = fx0 as i64;
    let y0 = fy0 as i64;

    let texel = |x: i64, y: i64| -> [f32; 4] {
        if x < 0 || y < 0 || x >= i64::from(img.width) || y >= i64::from(img.height) {
            return [0.0; 4];
        }
        let i = ((y as usize * img.width as usize) + x as usize) * 4;
        [
            img.rgba8_premul[i] as f32,
            img.rgba8_premul[i + 1] as f32,
            img.rgba8_premul[i + 2] as f32,
            img.rgba8_premul[i + 3] as f32,
        ]
    };

    let t00 = texel(x0, y0);
    let t10 = texel(x0 + 1, y0);
    let t01 = texel(x0, y0 + 1);
    let t11 = texel(x0 + 1, y0 + 1);

    let mut out = [0u8; 4];
    for c in 0..4 {
        let top = t00[c] * (1.0 - tx) + t10[c] * tx;
        let bot = t01[c] * (1.0 - tx) + t11[c] * tx;
        out[c] = (top * (1.0 - ty) + bot * ty).round().clamp(0.0, 255.0) as u8;
    }
    Some(Rgba8Premul {
        r: out[0],
        g: out[1],
        b: out[2],
        a: out[3],
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
