use crate::{edit::effects::ColorFilter, foundation::core::Rgba8Premul};

// CSS filter-function coefficients, so composites match what the editing
// preview showed the user.
const LUMA_R: f32 = 0.213;
const LUMA_G: f32 = 0.715;
const LUMA_B: f32 = 0.072;

const SEPIA: [[f32; 3]; 3] = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];

/// Apply the resolved color pipeline to straight RGB in `[0, 1]`, in the
/// canonical effect order: brightness, contrast, saturation, sepia.
pub(crate) fn filter_rgb(f: &ColorFilter, rgb: [f32; 3]) -> [f32; 3] {
    let [mut r, mut g, mut b] = rgb;

    r *= f.brightness;
    g *= f.brightness;
    b *= f.brightness;

    r = (r - 0.5) * f.contrast + 0.5;
    g = (g - 0.5) * f.contrast + 0.5;
    b = (b - 0.5) * f.contrast + 0.5;

    let luma = LUMA_R * r + LUMA_G * g + LUMA_B * b;
    r = luma + (r - luma) * f.saturation;
    g = luma + (g - luma) * f.saturation;
    b = luma + (b - luma) * f.saturation;

    if f.sepia > 0.0 {
        let sr = SEPIA[0][0] * r + SEPIA[0][1] * g + SEPIA[0][2] * b;
        let sg = SEPIA[1][0] * r + SEPIA[1][1] * g + SEPIA[1][2] * b;
        let sb = SEPIA[2][0] * r + SEPIA[2][1] * g + SEPIA[2][2] * b;
        r += (sr - r) * f.sepia;
        g += (sg - g) * f.sepia;
        b += (sb - b) * f.sepia;
    }

    [r.clamp(0.0, 1.0), g.clamp(0.0, 1.0), b.clamp(0.0, 1.0)]
}

/// Apply the color pipeline to one premultiplied pixel.
///
/// Color math happens on straight values; alpha is preserved.
pub(crate) fn filter_premul(f: &ColorFilter, px: Rgba8Premul) -> Rgba8Premul {
    if px.a == 0 {
        return px;
    }
    let a = px.a as f32;
    let rgb = filter_rgb(f, [px.r as f32 / a, px.g as f32 / a, px.b as f32 / a]);
    Rgba8Premul {
        r: (rgb[0] * a).round().clamp(0.0, 255.0) as u8,
        g: (rgb[1] * a).round().clamp(0.0, 255.0) as u8,
        b: (rgb[2] * a).round().clamp(0.0, 255.0) as u8,
        a: px.a,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/filter.rs"]
mod tests;
