//! High-level image operations.
//!
//! These functions combine calculations with backend execution: the preview
//! scaler and the two-stage filter chain. Both absorb failures locally. The
//! scaler returns `None` when there is nothing to show, and the chain hands
//! back its unmodified input when a stage fails, so a caller never ends up
//! with a blank preview because of a bad slider value.

use super::backend::{BackendError, FilterBackend};
use super::bitmap::Bitmap;
use super::params::{ColorMatrix, FilterParameters, TargetSize};
use std::time::Instant;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Downscale a source bitmap to the preview's native pixel box.
///
/// The output is exactly `target.pixel_dimensions()` pixels: a plain
/// stretch, no cropping and no letterboxing. Returns `None` when there is no
/// source, when the target rounds to an empty box, or when the backend
/// cannot resize; the caller should clear its preview.
pub fn scale(
    backend: &impl FilterBackend,
    source: Option<&Bitmap>,
    target: TargetSize,
) -> Option<Bitmap> {
    let source = source?;
    let (width, height) = target.pixel_dimensions();
    if width == 0 || height == 0 {
        log::warn!(
            "preview target {}x{} @{}x has no pixels",
            target.width,
            target.height,
            target.pixel_density
        );
        return None;
    }

    match backend.resize(source, width, height) {
        Ok(scaled) => Some(scaled.with_scale(target.pixel_density)),
        Err(e) => {
            log::warn!("preview scale to {}x{} failed: {}", width, height, e);
            None
        }
    }
}

/// Crop a rendered stage output back to `width × height` from the origin.
///
/// Rendering always uses the extent of the chain's *input*, whatever extent
/// the last stage reports.
fn crop_to_extent(bitmap: Bitmap, width: u32, height: u32) -> Result<Bitmap> {
    let (w, h) = bitmap.dimensions();
    if (w, h) == (width, height) {
        return Ok(bitmap);
    }
    if w < width || h < height {
        return Err(BackendError::ProcessingFailed(format!(
            "stage output {}x{} is smaller than input extent {}x{}",
            w, h, width, height
        )));
    }
    let scale = bitmap.scale();
    let cropped = image::imageops::crop_imm(bitmap.pixels(), 0, 0, width, height).to_image();
    Ok(Bitmap::new(cropped, scale))
}

/// Run the filter chain and report the first stage that fails.
///
/// Stage 1 applies brightness, contrast and saturation as one matrix.
/// Stage 2 blurs the result with edge-clamped sampling. The rendered output
/// always has the input's dimensions.
pub fn try_apply(
    backend: &impl FilterBackend,
    bitmap: &Bitmap,
    params: &FilterParameters,
) -> Result<Bitmap> {
    let (width, height) = bitmap.dimensions();
    let matrix = ColorMatrix::from_parameters(params);

    let adjusted = backend.color_controls(bitmap, &matrix)?;
    let blurred = backend.blur(&adjusted, params.blur_radius)?;
    crop_to_extent(blurred, width, height)
}

/// Run the filter chain, falling back to the unfiltered input on failure.
///
/// Deterministic: the same bitmap and parameters always produce the same
/// bytes.
pub fn apply(
    backend: &impl FilterBackend,
    bitmap: &Bitmap,
    params: &FilterParameters,
) -> Bitmap {
    let started = Instant::now();
    match try_apply(backend, bitmap, params) {
        Ok(filtered) => {
            log::debug!(
                "filter chain on {}x{} took {:?}",
                bitmap.width(),
                bitmap.height(),
                started.elapsed()
            );
            filtered
        }
        Err(e) => {
            log::warn!("filter chain failed, showing unfiltered image: {}", e);
            bitmap.clone()
        }
    }
}
