//! Shared test utilities for the photo-filter test suite.
//!
//! Synthetic bitmaps with known pixel values, plus a smoothness metric for
//! blur assertions.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let board = checkerboard(16, 16);
//! let blurred = apply(&RustBackend::new(), &board, &params);
//! assert!(variance(&blurred) < variance(&board));
//! ```

use crate::imaging::Bitmap;
use image::{Rgba, RgbaImage};

// =========================================================================
// Synthetic bitmaps
// =========================================================================

/// Black/white checkerboard with 1-pixel cells, fully opaque.
pub fn checkerboard(width: u32, height: u32) -> Bitmap {
    Bitmap::from(RgbaImage::from_fn(width, height, |x, y| {
        if (x + y) % 2 == 0 {
            Rgba([255, 255, 255, 255])
        } else {
            Rgba([0, 0, 0, 255])
        }
    }))
}

/// Every pixel set to `rgba`.
pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Bitmap {
    Bitmap::from(RgbaImage::from_pixel(width, height, Rgba(rgba)))
}

/// Distinct values per channel so color bugs show up as pixel mismatches.
pub fn gradient(width: u32, height: u32) -> Bitmap {
    Bitmap::from(RgbaImage::from_fn(width, height, |x, y| {
        Rgba([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            ((x + y) * 7 % 256) as u8,
            255,
        ])
    }))
}

// =========================================================================
// Metrics
// =========================================================================

/// Population variance over all RGB samples.
pub fn variance(bitmap: &Bitmap) -> f64 {
    let samples: Vec<f64> = bitmap
        .pixels()
        .pixels()
        .flat_map(|p| [p[0], p[1], p[2]])
        .map(f64::from)
        .collect();
    if samples.is_empty() {
        return 0.0;
    }
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n
}
