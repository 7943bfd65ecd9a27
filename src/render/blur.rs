use crate::{
    foundation::error::{PlatenError, PlatenResult},
    render::surface::Surface,
};

#[derive(Clone, Copy)]
enum Axis {
    Horizontal,
    Vertical,
}

/// Separable Gaussian blur over a premultiplied surface, in place.
///
/// The kernel is quantized to Q16 fixed point and re-normalized so the taps
/// sum to exactly one, keeping a constant image bit-exact. Edge taps clamp
/// to the nearest row/column.
pub(crate) fn blur(surface: &mut Surface, radius: u32, sigma: f32) -> PlatenResult<()> {
    if radius == 0 {
        return Ok(());
    }
    let kernel = gaussian_kernel_q16(radius, sigma)?;

    let (w, h) = (surface.width(), surface.height());
    let mut tmp = vec![0u8; surface.data().len()];
    separable_pass(surface.data(), &mut tmp, w, h, &kernel, Axis::Horizontal);
    let mut out = vec![0u8; surface.data().len()];
    separable_pass(&tmp, &mut out, w, h, &kernel, Axis::Vertical);
    surface.data_mut().copy_from_slice(&out);
    Ok(())
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> PlatenResult<Vec<u32>> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(PlatenError::validation("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let sigma = f64::from(sigma);
    let denom = 2.0 * sigma * sigma;
    let weights_f: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = f64::from(i);
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights_f.iter().sum();
    if sum <= 0.0 {
        return Err(PlatenError::validation("gaussian kernel sum is zero"));
    }

    let mut weights: Vec<u32> = weights_f
        .iter()
        .map(|&wf| (((wf / sum) * 65536.0).round() as i64).clamp(0, 65536) as u32)
        .collect();

    // Push rounding residue into the center tap so the taps sum to 1.0 in Q16.
    let acc: i64 = weights.iter().map(|&w| i64::from(w)).sum();
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, 65536) as u32;
    }

    Ok(weights)
}

fn separable_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32], axis: Axis) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let h = height as i32;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let d = ki as i32 - radius;
                let (sx, sy) = match axis {
                    Axis::Horizontal => ((x + d).clamp(0, w - 1), y),
                    Axis::Vertical => (x, (y + d).clamp(0, h - 1)),
                };
                let idx = ((sy * w + sx) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    v.min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/blur.rs"]
mod tests;
