//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image` crate (pure Rust decoders) |
//! | Resize | `image::imageops::resize` with `Lanczos3` filter |
//! | Color controls | per-pixel 3×3 matrix + offset, rows in parallel (rayon) |
//! | Gaussian blur | separable two-pass convolution, rows in parallel (rayon) |
//!
//! Parallel work is split by output row and every row is computed from the
//! same read-only input, so results do not depend on scheduling.

use super::backend::{BackendError, FilterBackend};
use super::bitmap::Bitmap;
use super::calculations::{MAX_BLUR_SIGMA, fold_kernel, gaussian_kernel};
use super::params::ColorMatrix;
use image::RgbaImage;
use image::imageops::FilterType;
use rayon::prelude::*;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn is_empty(bitmap: &Bitmap) -> bool {
    bitmap.width() == 0 || bitmap.height() == 0
}

fn to_bitmap(width: u32, height: u32, raw: Vec<u8>, scale: f32) -> Result<Bitmap, BackendError> {
    RgbaImage::from_raw(width, height, raw)
        .map(|pixels| Bitmap::new(pixels, scale))
        .ok_or_else(|| BackendError::ProcessingFailed("Pixel buffer size mismatch".into()))
}

#[inline]
fn to_channel(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Convolve one axis with edge-clamped sampling.
///
/// Clamping the sample index is the same as extending the boundary pixels
/// outward by the kernel radius and cropping back to the original extent.
fn convolve_axis(
    input: &[f32],
    width: usize,
    height: usize,
    kernel: &[f32],
    horizontal: bool,
) -> Vec<f32> {
    let radius = (kernel.len() / 2) as isize;
    let mut output = vec![0.0f32; input.len()];
    output
        .par_chunks_mut(width * 4)
        .enumerate()
        .for_each(|(y, row_out)| {
            for x in 0..width {
                let mut acc = [0.0f32; 4];
                for (ki, &kv) in kernel.iter().enumerate() {
                    let delta = ki as isize - radius;
                    let idx = if horizontal {
                        let sx = (x as isize + delta).clamp(0, width as isize - 1) as usize;
                        (y * width + sx) * 4
                    } else {
                        let sy = (y as isize + delta).clamp(0, height as isize - 1) as usize;
                        (sy * width + x) * 4
                    };
                    for c in 0..4 {
                        acc[c] += input[idx + c] * kv;
                    }
                }
                row_out[x * 4..x * 4 + 4].copy_from_slice(&acc);
            }
        });
    output
}

impl FilterBackend for RustBackend {
    fn resize(&self, bitmap: &Bitmap, width: u32, height: u32) -> Result<Bitmap, BackendError> {
        if width == 0 || height == 0 {
            return Err(BackendError::InvalidParameter(format!(
                "resize target {}x{} has no pixels",
                width, height
            )));
        }
        if is_empty(bitmap) {
            return Err(BackendError::ProcessingFailed(
                "Cannot resize an empty bitmap".into(),
            ));
        }
        let resized = image::imageops::resize(bitmap.pixels(), width, height, FilterType::Lanczos3);
        Ok(Bitmap::new(resized, bitmap.scale()))
    }

    fn color_controls(
        &self,
        bitmap: &Bitmap,
        matrix: &ColorMatrix,
    ) -> Result<Bitmap, BackendError> {
        if !matrix.is_finite() {
            return Err(BackendError::InvalidParameter(
                "color controls produced a non-finite matrix".into(),
            ));
        }
        if is_empty(bitmap) {
            return Ok(bitmap.clone());
        }

        let (width, height) = bitmap.dimensions();
        let row_len = width as usize * 4;
        let src = bitmap.pixels().as_raw();
        let mut out = vec![0u8; src.len()];
        let m = &matrix.matrix;
        let off = &matrix.offset;

        out.par_chunks_mut(row_len)
            .zip(src.par_chunks(row_len))
            .for_each(|(row_out, row_in)| {
                for (dst, px) in row_out.chunks_exact_mut(4).zip(row_in.chunks_exact(4)) {
                    let (r, g, b) = (px[0] as f32, px[1] as f32, px[2] as f32);
                    for c in 0..3 {
                        dst[c] = to_channel(m[c][0] * r + m[c][1] * g + m[c][2] * b + off[c]);
                    }
                    dst[3] = px[3];
                }
            });

        to_bitmap(width, height, out, bitmap.scale())
    }

    fn blur(&self, bitmap: &Bitmap, sigma: f32) -> Result<Bitmap, BackendError> {
        let kernel = gaussian_kernel(sigma).ok_or_else(|| {
            BackendError::InvalidParameter(format!(
                "blur radius must be between 0 and {}, got {}",
                MAX_BLUR_SIGMA, sigma
            ))
        })?;
        if kernel.len() == 1 || is_empty(bitmap) {
            return Ok(bitmap.clone());
        }

        let (width, height) = bitmap.dimensions();
        let (w, h) = (width as usize, height as usize);
        let input: Vec<f32> = bitmap.pixels().as_raw().iter().map(|&b| b as f32).collect();

        let horizontal = convolve_axis(&input, w, h, &fold_kernel(&kernel, w - 1), true);
        let vertical = convolve_axis(&horizontal, w, h, &fold_kernel(&kernel, h - 1), false);

        let raw = vertical.into_iter().map(to_channel).collect();
        to_bitmap(width, height, raw, bitmap.scale())
    }
}
