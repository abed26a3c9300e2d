//! Image processing — pure Rust on top of the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` |
//! | **Preview scale** | `image::imageops::resize`, Lanczos3, exact pixel box |
//! | **Color controls** | one combined 3×3 matrix + offset, rounded once |
//! | **Blur** | separable gaussian, edge-clamped, rayon row parallelism, σ ≤ [`MAX_BLUR_SIGMA`] |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension, matrix and kernel math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Bitmap**: The immutable pixel value passed between stages
//! - **Backend**: [`FilterBackend`] trait + [`RustBackend`]
//! - **Operations**: [`scale`] and [`apply`], combining calculations + backend

pub mod backend;
mod bitmap;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, FilterBackend};
pub use bitmap::Bitmap;
pub use calculations::MAX_BLUR_SIGMA;
pub use operations::{apply, scale, try_apply};
pub use params::{ColorMatrix, FilterParameters, TargetSize};
pub use rust_backend::RustBackend;
