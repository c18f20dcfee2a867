//! Separable Gaussian blur over premultiplied RGBA8, used to soften the pen-tip glow.
//!
//! Pixels outside the buffer count as transparent, so a shape blurred inside a padded
//! tile fades out instead of smearing its border.

use crate::foundation::error::{LuminaError, LuminaResult};

/// Kernel weights are Q16 fixed point and sum to exactly `1 << 16`.
const Q16_ONE: i64 = 1 << 16;

#[derive(Clone, Copy)]
enum Axis {
    Horizontal,
    Vertical,
}

pub fn gaussian_blur_premul(
    src: &[u8],
    width: u32,
    height: u32,
    radius: u32,
    sigma: f32,
) -> LuminaResult<Vec<u8>> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| LuminaError::render("blur buffer size overflow"))?;
    if src.len() != expected_len {
        return Err(LuminaError::render(
            "gaussian_blur_premul expects src matching width*height*4",
        ));
    }
    if radius == 0 || width == 0 || height == 0 {
        return Ok(src.to_vec());
    }

    let kernel = kernel_q16(radius, sigma)?;
    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];
    convolve(src, &mut tmp, width, height, &kernel, Axis::Horizontal);
    convolve(&tmp, &mut out, width, height, &kernel, Axis::Vertical);
    Ok(out)
}

/// Blur radius in pixels covering ±3σ.
pub fn radius_for_sigma(sigma: f64) -> u32 {
    if !sigma.is_finite() || sigma <= 0.0 {
        return 0;
    }
    (sigma * 3.0).ceil() as u32
}

fn kernel_q16(radius: u32, sigma: f32) -> LuminaResult<Vec<u32>> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(LuminaError::validation("blur sigma must be > 0"));
    }

    let r = radius as i64;
    let denom = 2.0 * f64::from(sigma) * f64::from(sigma);
    let weights: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = i as f64;
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights.iter().sum();
    if sum <= 0.0 {
        return Err(LuminaError::render("gaussian kernel sum is zero"));
    }

    let mut q: Vec<i64> = weights
        .iter()
        .map(|w| ((w / sum) * Q16_ONE as f64).round().clamp(0.0, Q16_ONE as f64) as i64)
        .collect();
    // Rounding drift goes to the center tap so flat regions stay flat.
    let drift = Q16_ONE - q.iter().sum::<i64>();
    let mid = q.len() / 2;
    q[mid] = (q[mid] + drift).clamp(0, Q16_ONE);
    Ok(q.into_iter().map(|v| v as u32).collect())
}

fn convolve(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32], axis: Axis) {
    let radius = (k.len() / 2) as i64;
    let (w, h) = (i64::from(width), i64::from(height));
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let d = ki as i64 - radius;
                let (sx, sy) = match axis {
                    Axis::Horizontal => (x + d, y),
                    Axis::Vertical => (x, y + d),
                };
                if sx < 0 || sy < 0 || sx >= w || sy >= h {
                    continue;
                }
                let idx = ((sy * w + sx) as usize) * 4;
                for (c, a) in acc.iter_mut().enumerate() {
                    *a += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out = ((y * w + x) as usize) * 4;
            for (c, a) in acc.iter().enumerate() {
                dst[out + c] = q16_to_u8(*a);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    ((acc + 32768) >> 16).min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/blur.rs"]
mod tests;
