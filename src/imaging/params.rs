//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! (which decides which stages to run) and the [`backend`](super::backend)
//! (which does the actual pixel work).
//!
//! ## Types
//!
//! - [`FilterParameters`] — brightness, contrast, saturation and blur radius.
//!   Defaults form the identity transform.
//! - [`TargetSize`] — viewport size in points plus device pixel density.
//! - [`ColorMatrix`] — the combined color-controls transform, built once per
//!   call from a [`FilterParameters`].

use serde::{Deserialize, Serialize};

/// The four slider values that drive the filter chain.
///
/// No validation happens here: out-of-range values are passed through and
/// the chain decides what it can render.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterParameters {
    /// Additive offset, typically `[-1, 1]`.
    pub brightness: f32,
    /// Gain around mid-gray, typically `[0, 4]`. 1 leaves contrast unchanged.
    pub contrast: f32,
    /// 0 = grayscale, 1 = unchanged, >1 = oversaturated.
    pub saturation: f32,
    /// Gaussian sigma in pixels. 0 disables the blur stage.
    pub blur_radius: f32,
}

impl FilterParameters {
    pub const IDENTITY: Self = Self {
        brightness: 0.0,
        contrast: 1.0,
        saturation: 1.0,
        blur_radius: 0.0,
    };

    /// True when the color-controls stage would leave every pixel unchanged.
    pub fn is_color_identity(&self) -> bool {
        self.brightness == 0.0 && self.contrast == 1.0 && self.saturation == 1.0
    }

    pub fn is_identity(&self) -> bool {
        self.is_color_identity() && self.blur_radius == 0.0
    }
}

impl Default for FilterParameters {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A display viewport: logical size in points and the device pixel density.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetSize {
    pub width: f32,
    pub height: f32,
    /// Physical pixels per point (≥ 1 on real displays).
    pub pixel_density: f32,
}

impl TargetSize {
    pub fn new(width: f32, height: f32, pixel_density: f32) -> Self {
        Self {
            width,
            height,
            pixel_density,
        }
    }

    /// Pixel box of the preview: `round(size × density)` on each axis.
    pub fn pixel_dimensions(&self) -> (u32, u32) {
        super::calculations::round_to_pixels(self.width, self.height, self.pixel_density)
    }
}

/// Combined saturation/brightness/contrast transform in 0–255 units.
///
/// `out = matrix · rgb + offset`, alpha untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorMatrix {
    pub matrix: [[f32; 3]; 3],
    pub offset: [f32; 3],
}

impl ColorMatrix {
    pub fn from_parameters(params: &FilterParameters) -> Self {
        super::calculations::color_controls_matrix(
            params.brightness,
            params.contrast,
            params.saturation,
        )
    }

    pub fn is_finite(&self) -> bool {
        self.matrix.iter().flatten().all(|v| v.is_finite())
            && self.offset.iter().all(|v| v.is_finite())
    }
}
