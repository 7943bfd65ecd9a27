use crate::foundation::{
    core::{Canvas, Rgba8, Rgba8Premul},
    error::{PlatenError, PlatenResult},
};

/// An owned premultiplied-RGBA8 raster the renderer draws into.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Surface {
    /// Allocate a transparent surface of the given size.
    pub fn new(canvas: Canvas) -> PlatenResult<Self> {
        let len = (canvas.width as usize)
            .checked_mul(canvas.height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| PlatenError::validation("surface size overflow"))?;
        if canvas.width == 0 || canvas.height == 0 {
            return Err(PlatenError::validation("surface dimensions must be > 0"));
        }
        Ok(Self {
            width: canvas.width,
            height: canvas.height,
            data: vec![0u8; len],
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Premultiplied RGBA8 pixel data, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Read one pixel. Out-of-range coordinates return transparent.
    pub fn pixel(&self, x: u32, y: u32) -> Rgba8Premul {
        if x >= self.width || y >= self.height {
            return Rgba8Premul::transparent();
        }
        let i = ((y as usize * self.width as usize) + x as usize) * 4;
        Rgba8Premul {
            r: self.data[i],
            g: self.data[i + 1],
            b: self.data[i + 2],
            a: self.data[i + 3],
        }
    }

    pub(crate) fn put_pixel(&mut self, x: u32, y: u32, px: Rgba8Premul) {
        debug_assert!(x < self.width && y < self.height);
        let i = ((y as usize * self.width as usize) + x as usize) * 4;
        self.data[i] = px.r;
        self.data[i + 1] = px.g;
        self.data[i + 2] = px.b;
        self.data[i + 3] = px.a;
    }

    /// Fill the whole surface with a straight-alpha color.
    pub fn fill(&mut self, color: Rgba8) {
        let px = Rgba8Premul::from_straight(color);
        for chunk in self.data.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[px.r, px.g, px.b, px.a]);
        }
    }

    /// Fill an axis-aligned pixel rectangle, clamped to the surface.
    pub fn fill_rect(&mut self, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgba8) {
        let px = Rgba8Premul::from_straight(color);
        let x1 = x1.min(self.width);
        let y1 = y1.min(self.height);
        for y in y0.min(y1)..y1 {
            for x in x0.min(x1)..x1 {
                self.put_pixel(x, y, px);
            }
        }
    }

    /// Stroke the full surface rectangle with an inset border of `width_px`.
    ///
    /// Drawn in untransformed surface space after all photo drawing, so the
    /// border is never rotated or scaled.
    pub fn stroke_border(&mut self, width_px: u32, color: Rgba8) {
        if width_px == 0 {
            return;
        }
        let w = self.width;
        let h = self.height;
        let t = width_px.min(w).min(h);
        self.fill_rect(0, 0, w, t, color);
        self.fill_rect(0, h.saturating_sub(t), w, h, color);
        self.fill_rect(0, 0, t, h, color);
        self.fill_rect(w.saturating_sub(t), 0, w, h, color);
    }

    /// Convert to a straight-alpha [`image::RgbaImage`] for encoding.
    pub fn to_rgba_image(&self) -> PlatenResult<image::RgbaImage> {
        let mut out = self.data.clone();
        for px in out.chunks_exact_mut(4) {
            let s = Rgba8Premul {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            }
            .to_straight();
            px.copy_from_slice(&[s.r, s.g, s.b, s.a]);
        }
        image::RgbaImage::from_raw(self.width, self.height, out)
            .ok_or_else(|| PlatenError::encode("surface buffer does not match dimensions"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
