use crate::foundation::error::{PlatenError, PlatenResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Output raster dimensions in pixels.
///
/// For print products this is the physical target size at print resolution,
/// e.g. 1200x1800 for a 4x6" print at 300 DPI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Center point of the canvas in pixel coordinates.
    pub fn center(self) -> Point {
        Point::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }
}

/// Straight-alpha RGBA8 color, used for frame styling and fills.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (255 = opaque).
    pub a: u8,
}

impl Rgba8 {
    /// Opaque white.
    pub const WHITE: Self = Self::opaque(255, 255, 255);
    /// Opaque black.
    pub const BLACK: Self = Self::opaque(0, 0, 0);
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    /// Build an opaque color from RGB channels.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
///
/// Renderers operate on premultiplied pixels end-to-end.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba8Premul {
    /// Premultiplied red channel.
    pub r: u8,
    /// Premultiplied green channel.
    pub g: u8,
    /// Premultiplied blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent pixel.
    pub const fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Premultiply a straight-alpha color.
    pub fn from_straight(c: Rgba8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(c.r, c.a),
            g: premul(c.g, c.a),
            b: premul(c.b, c.a),
            a: c.a,
        }
    }

    /// Un-premultiply back to a straight-alpha color.
    pub fn to_straight(self) -> Rgba8 {
        if self.a == 0 {
            return Rgba8::TRANSPARENT;
        }
        let a = u16::from(self.a);
        let unmul = |c: u8| -> u8 { (((u16::from(c) * 255) + a / 2) / a).min(255) as u8 };
        Rgba8 {
            r: unmul(self.r),
            g: unmul(self.g),
            b: unmul(self.b),
            a: self.a,
        }
    }
}

/// How a source photo is placed inside a fixed target area.
///
/// `Placement` is the unit of undo for drag gestures: the drag controller
/// snapshots it on press and commits the whole value once on release. Zoom is
/// a separate view-only state and is deliberately not part of this struct.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Placement {
    /// Uniform scale factor, must be finite and > 0.
    pub scale: f64,
    /// Rotation in degrees, positive = clockwise in raster space.
    pub rotation_deg: f64,
    /// Mirror across the vertical axis.
    #[serde(default)]
    pub mirror_x: bool,
    /// Mirror across the horizontal axis.
    #[serde(default)]
    pub mirror_y: bool,
    /// Offset from the target center, in target pixels.
    #[serde(default)]
    pub offset: Vec2,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            scale: 1.0,
            rotation_deg: 0.0,
            mirror_x: false,
            mirror_y: false,
            offset: Vec2::ZERO,
        }
    }
}

impl Placement {
    /// Validate numeric fields.
    pub fn validate(self) -> PlatenResult<()> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(PlatenError::validation("Placement scale must be > 0"));
        }
        if !self.rotation_deg.is_finite() {
            return Err(PlatenError::validation("Placement rotation must be finite"));
        }
        if !self.offset.x.is_finite() || !self.offset.y.is_finite() {
            return Err(PlatenError::validation("Placement offset must be finite"));
        }
        Ok(())
    }

    /// Offset this placement by a pointer delta, leaving everything else intact.
    pub fn offset_by(self, delta: Vec2) -> Self {
        Self {
            offset: self.offset + delta,
            ..self
        }
    }

    /// Affine mapping local image coordinates (origin at image center) into
    /// target coordinates, anchored at `center`.
    pub fn to_affine(self, center: Point) -> Affine {
        let sx = if self.mirror_x { -self.scale } else { self.scale };
        let sy = if self.mirror_y { -self.scale } else { self.scale };

        let t_translate = Affine::translate(center.to_vec2() + self.offset);
        let t_rotate = Affine::rotate(self.rotation_deg.to_radians());
        let t_scale = Affine::scale_non_uniform(sx, sy);

        // Canonical order: T(center + offset) * R(rot) * S(±scale)
        t_translate * t_rotate * t_scale
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
