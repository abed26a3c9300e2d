//! Image processing backend trait and shared types.
//!
//! The [`FilterBackend`] trait defines the three pixel operations the
//! pipeline needs: resize, color controls, and gaussian blur.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend) — pure Rust on top of
//! the `image` crate, with rows processed in parallel by rayon.

use super::bitmap::Bitmap;
use super::params::ColorMatrix;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Trait for image processing backends.
///
/// Every stage returns a fresh [`Bitmap`] with the same scale metadata as
/// its input (resize is the exception: the caller decides the new scale).
pub trait FilterBackend: Sync {
    /// Stretch-resize to exactly `width × height` pixels.
    fn resize(&self, bitmap: &Bitmap, width: u32, height: u32) -> Result<Bitmap, BackendError>;

    /// Apply a combined color matrix to every pixel, rounding once.
    fn color_controls(
        &self,
        bitmap: &Bitmap,
        matrix: &ColorMatrix,
    ) -> Result<Bitmap, BackendError>;

    /// Separable gaussian blur with edge-clamped sampling.
    ///
    /// The output has the input's dimensions.
    fn blur(&self, bitmap: &Bitmap, sigma: f32) -> Result<Bitmap, BackendError>;
}
