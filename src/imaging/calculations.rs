//! Pure calculation functions for image processing.
//!
//! These functions contain no I/O and no pixel buffers, and are fully unit
//! testable. They compute preview dimensions, the combined color-controls
//! matrix, and gaussian kernels.

use super::params::ColorMatrix;

/// Rec. 709 luma weights, as used by the color-controls saturation term.
pub const LUMA_WEIGHTS: [f32; 3] = [0.2125, 0.7154, 0.0721];

/// Round a logical size times a pixel density to a pixel box.
///
/// Non-finite or negative products collapse to 0.
pub fn round_to_pixels(width: f32, height: f32, pixel_density: f32) -> (u32, u32) {
    let to_px = |v: f32| {
        let px = (v * pixel_density).round();
        if px.is_finite() && px > 0.0 {
            px as u32
        } else {
            0
        }
    };
    (to_px(width), to_px(height))
}

/// Build the combined color-controls transform.
///
/// In normalized units the transform is
/// `out = c·(S·p + b − 0.5) + 0.5` where `S = s·I + (1 − s)·L` and every row
/// of `L` is [`LUMA_WEIGHTS`]. The returned matrix works directly on 0–255
/// channel values, so applying it and rounding once gives the final pixel.
pub fn color_controls_matrix(brightness: f32, contrast: f32, saturation: f32) -> ColorMatrix {
    let mut matrix = [[0.0f32; 3]; 3];
    for (i, row) in matrix.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            let identity = if i == j { saturation } else { 0.0 };
            *cell = contrast * (identity + (1.0 - saturation) * LUMA_WEIGHTS[j]);
        }
    }

    let offset = (contrast * (brightness - 0.5) + 0.5) * 255.0;
    ColorMatrix {
        matrix,
        offset: [offset; 3],
    }
}

/// Largest blur sigma the chain renders. Anything above it fails the blur
/// stage, so the chain falls back to its input.
pub const MAX_BLUR_SIGMA: f32 = 1000.0;

/// Kernel half-width for a gaussian of the given sigma: `ceil(3σ)`.
///
/// `None` for a negative, non-finite, or larger than [`MAX_BLUR_SIGMA`]
/// sigma.
pub fn kernel_radius(sigma: f32) -> Option<usize> {
    if !sigma.is_finite() || sigma < 0.0 || sigma > MAX_BLUR_SIGMA {
        return None;
    }
    Some((sigma * 3.0).ceil() as usize)
}

/// Build a normalized 1-D gaussian kernel truncated at `ceil(3σ)`.
///
/// A sigma that truncates to a zero radius yields `[1.0]`. Returns `None`
/// wherever [`kernel_radius`] does.
pub fn gaussian_kernel(sigma: f32) -> Option<Vec<f32>> {
    let radius = kernel_radius(sigma)?;
    if radius == 0 {
        return Some(vec![1.0]);
    }
    let len = radius.checked_mul(2)?.checked_add(1)?;
    let two_sigma_sq = 2.0 * sigma * sigma;
    let mut kernel: Vec<f32> = (0..len)
        .map(|i| {
            let x = i as f32 - radius as f32;
            (-x * x / two_sigma_sq).exp()
        })
        .collect();
    let sum: f32 = kernel.iter().sum();
    for v in &mut kernel {
        *v /= sum;
    }
    Some(kernel)
}

/// Shrink a kernel to at most `max_radius` taps either side of the center.
///
/// Under edge-clamped sampling on an axis of `max_radius + 1` pixels, every
/// tap at or beyond `max_radius` reads the edge pixel, so the outer weights
/// are summed into the two end taps and the convolution result is unchanged.
pub fn fold_kernel(kernel: &[f32], max_radius: usize) -> Vec<f32> {
    let radius = kernel.len() / 2;
    if radius <= max_radius {
        return kernel.to_vec();
    }
    if max_radius == 0 {
        return vec![kernel.iter().sum()];
    }
    let lo = radius - max_radius;
    let hi = radius + max_radius;
    let mut folded = kernel[lo..=hi].to_vec();
    let last = folded.len() - 1;
    folded[0] = kernel[..=lo].iter().sum();
    folded[last] = kernel[hi..].iter().sum();
    folded
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // round_to_pixels
    // =========================================================================

    #[test]
    fn round_to_pixels_scales_by_density() {
        assert_eq!(round_to_pixels(320.0, 240.0, 2.0), (640, 480));
    }

    #[test]
    fn round_to_pixels_rounds_half_away_from_zero() {
        assert_eq!(round_to_pixels(10.25, 10.75, 2.0), (21, 22));
    }

    #[test]
    fn round_to_pixels_non_finite_is_zero() {
        assert_eq!(round_to_pixels(f32::NAN, 10.0, 1.0), (0, 10));
        assert_eq!(round_to_pixels(-5.0, 10.0, 1.0), (0, 10));
    }

    // =========================================================================
    // color_controls_matrix
    // =========================================================================

    #[test]
    fn luma_weights_sum_to_one() {
        let sum: f32 = LUMA_WEIGHTS.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
    }

    #[test]
    fn identity_parameters_give_identity_matrix() {
        let m = color_controls_matrix(0.0, 1.0, 1.0);
        assert_eq!(
            m.matrix,
            [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]
        );
        assert_eq!(m.offset, [0.0; 3]);
    }

    #[test]
    fn zero_saturation_rows_are_luma() {
        let m = color_controls_matrix(0.0, 1.0, 0.0);
        for row in m.matrix {
            assert_eq!(row, LUMA_WEIGHTS);
        }
    }

    #[test]
    fn brightness_shifts_offset() {
        let m = color_controls_matrix(0.2, 1.0, 1.0);
        assert!((m.offset[0] - 51.0).abs() < 1e-3);
    }

    #[test]
    fn contrast_pivots_on_mid_gray() {
        // Mid-gray (127.5) is a fixed point for any contrast.
        let m = color_controls_matrix(0.0, 2.5, 1.0);
        let out = m.matrix[0][0] * 127.5 + m.offset[0];
        assert!((out - 127.5).abs() < 1e-3);
    }

    // =========================================================================
    // gaussian_kernel
    // =========================================================================

    #[test]
    fn kernel_is_normalized_and_symmetric() {
        let k = gaussian_kernel(1.5).unwrap();
        assert_eq!(k.len(), 2 * kernel_radius(1.5).unwrap() + 1);
        let sum: f32 = k.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        for i in 0..k.len() / 2 {
            assert_eq!(k[i], k[k.len() - 1 - i]);
        }
    }

    #[test]
    fn kernel_radius_is_three_sigma() {
        assert_eq!(kernel_radius(1.0), Some(3));
        assert_eq!(kernel_radius(0.5), Some(2));
        assert_eq!(kernel_radius(0.0), Some(0));
        assert_eq!(kernel_radius(MAX_BLUR_SIGMA), Some(3000));
    }

    #[test]
    fn kernel_radius_rejects_unrenderable_sigma() {
        assert_eq!(kernel_radius(-1.0), None);
        assert_eq!(kernel_radius(f32::NAN), None);
        assert_eq!(kernel_radius(f32::INFINITY), None);
        assert_eq!(kernel_radius(1.0e9), None);
        assert_eq!(kernel_radius(f32::MAX), None);
        assert!(gaussian_kernel(f32::MAX).is_none());
    }

    #[test]
    fn zero_sigma_kernel_is_passthrough() {
        assert_eq!(gaussian_kernel(0.0), Some(vec![1.0]));
    }

    // =========================================================================
    // fold_kernel
    // =========================================================================

    #[test]
    fn fold_kernel_within_radius_is_unchanged() {
        let k = gaussian_kernel(1.0).unwrap();
        assert_eq!(fold_kernel(&k, 3), k);
        assert_eq!(fold_kernel(&k, 10), k);
    }

    #[test]
    fn fold_kernel_moves_tail_weight_to_end_taps() {
        let k = [0.1, 0.2, 0.4, 0.2, 0.1];
        let folded = fold_kernel(&k, 1);
        assert_eq!(folded.len(), 3);
        assert!((folded[0] - 0.3).abs() < 1e-6);
        assert_eq!(folded[1], 0.4);
        assert!((folded[2] - 0.3).abs() < 1e-6);
    }

    #[test]
    fn fold_kernel_to_single_tap_keeps_total_weight() {
        let k = gaussian_kernel(MAX_BLUR_SIGMA).unwrap();
        let folded = fold_kernel(&k, 0);
        assert_eq!(folded.len(), 1);
        assert!((folded[0] - 1.0).abs() < 1e-3);
    }
}
