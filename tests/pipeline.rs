//! End-to-end properties of the preview scaler and filter chain.
//!
//! These go through the public API only: `imaging::{scale, apply}` with the
//! production `RustBackend`, plus the save flow against a temporary library.
//!
//! Run with: cargo test --test pipeline

use image::{Rgba, RgbaImage};
use photo_filter::imaging::{
    self, Bitmap, FilterParameters, MAX_BLUR_SIGMA, RustBackend, TargetSize,
};
use photo_filter::output;
use photo_filter::preview::{PickedPhoto, PreviewState};
use photo_filter::storage::{
    self, Authorization, LibraryFormat, LibraryStore, PhotoStore, SaveEvent, StorageError,
};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

fn checkerboard(width: u32, height: u32) -> Bitmap {
    Bitmap::from(RgbaImage::from_fn(width, height, |x, y| {
        if (x + y) % 2 == 0 {
            Rgba([255, 255, 255, 255])
        } else {
            Rgba([0, 0, 0, 255])
        }
    }))
}

/// Deterministic pseudo-random texture (xorshift), so blur has real detail to remove.
fn noise(width: u32, height: u32, seed: u32) -> Bitmap {
    let mut state = seed.max(1);
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        (state & 0xff) as u8
    };
    Bitmap::from(RgbaImage::from_fn(width, height, |_, _| {
        Rgba([next(), next(), next(), 255])
    }))
}

fn variance(bitmap: &Bitmap) -> f64 {
    let samples: Vec<f64> = bitmap
        .pixels()
        .pixels()
        .flat_map(|p| [p[0], p[1], p[2]])
        .map(f64::from)
        .collect();
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n
}

fn blur(radius: f32) -> FilterParameters {
    FilterParameters {
        blur_radius: radius,
        ..FilterParameters::default()
    }
}

// =========================================================================
// Filter chain laws
// =========================================================================

#[test]
fn default_parameters_are_identity() {
    let backend = RustBackend::new();
    for src in [checkerboard(2, 2), noise(31, 17, 7), noise(1, 1, 3)] {
        let out = imaging::apply(&backend, &src, &FilterParameters::default());
        assert_eq!(out.pixels().as_raw(), src.pixels().as_raw());
    }
}

#[test]
fn two_by_two_checkerboard_defaults_unchanged() {
    let src = checkerboard(2, 2);
    let out = imaging::apply(&RustBackend::new(), &src, &FilterParameters::default());
    assert_eq!(out, src);
}

#[test]
fn solid_gray_ignores_saturation() {
    let backend = RustBackend::new();
    let params = FilterParameters {
        saturation: 0.0,
        ..FilterParameters::default()
    };
    for level in [0u8, 1, 64, 127, 128, 200, 255] {
        let src = Bitmap::from(RgbaImage::from_pixel(5, 4, Rgba([level, level, level, 255])));
        assert_eq!(imaging::apply(&backend, &src, &params), src, "gray level {level}");
    }
}

#[test]
fn apply_is_deterministic() {
    let backend = RustBackend::new();
    let src = noise(64, 48, 42);
    let params = FilterParameters {
        brightness: 0.15,
        contrast: 1.7,
        saturation: 1.4,
        blur_radius: 2.5,
    };

    let first = imaging::apply(&backend, &src, &params);
    let second = imaging::apply(&backend, &src, &params);
    assert_eq!(first.pixels().as_raw(), second.pixels().as_raw());
}

#[test]
fn output_dimensions_match_input_for_any_blur() {
    let backend = RustBackend::new();
    let src = noise(23, 11, 9);
    for radius in [0.0, 0.3, 1.0, 5.0, 40.0, MAX_BLUR_SIGMA, 1.0e9, f32::MAX] {
        let out = imaging::apply(&backend, &src, &blur(radius));
        assert_eq!(out.dimensions(), (23, 11), "radius {radius}");
    }
}

#[test]
fn larger_blur_never_increases_variance() {
    let backend = RustBackend::new();
    let src = noise(48, 48, 1234);

    let mut previous = variance(&src);
    for radius in [0.5, 1.0, 2.0, 4.0, 8.0] {
        let current = variance(&imaging::apply(&backend, &src, &blur(radius)));
        assert!(
            current <= previous,
            "variance rose from {previous} to {current} at radius {radius}"
        );
        previous = current;
    }
}

#[test]
fn invalid_parameters_fall_back_to_input() {
    let backend = RustBackend::new();
    let src = noise(8, 8, 5);

    let negative_blur = imaging::apply(&backend, &src, &blur(-1.0));
    assert_eq!(negative_blur, src);

    let nan_contrast = FilterParameters {
        contrast: f32::NAN,
        ..FilterParameters::default()
    };
    assert_eq!(imaging::apply(&backend, &src, &nan_contrast), src);
}

#[test]
fn oversized_blur_falls_back_to_input() {
    let backend = RustBackend::new();
    let src = noise(4, 4, 11);

    for radius in [MAX_BLUR_SIGMA * 1.5, 1.0e9, f32::MAX] {
        assert_eq!(imaging::apply(&backend, &src, &blur(radius)), src, "radius {radius}");
    }
}

// =========================================================================
// Preview scaler
// =========================================================================

#[test]
fn scale_matches_rounded_target_for_any_aspect() {
    let backend = RustBackend::new();
    let target = TargetSize::new(120.4, 80.4, 2.5);
    let expected = (301, 201);

    for (w, h) in [(1000, 100), (100, 1000), (640, 480), (3, 3)] {
        let src = noise(w, h, w + h);
        let out = imaging::scale(&backend, Some(&src), target).unwrap();
        assert_eq!(out.dimensions(), expected, "source {w}x{h}");
        assert_eq!(out.scale(), 2.5);
    }
}

#[test]
fn scale_without_source_clears_preview() {
    let out = imaging::scale(&RustBackend::new(), None, TargetSize::new(100.0, 100.0, 2.0));
    assert!(out.is_none());

    let mut state = PreviewState::new(TargetSize::new(100.0, 100.0, 2.0));
    state.set_photo(None);
    assert!(state.preview().is_none());
}

#[test]
fn preview_and_export_use_the_same_chain() {
    let params = FilterParameters {
        brightness: -0.1,
        contrast: 1.3,
        saturation: 0.5,
        blur_radius: 1.0,
    };
    let original = noise(200, 100, 77);

    let mut state = PreviewState::new(TargetSize::new(50.0, 25.0, 2.0));
    state.set_photo(Some(PickedPhoto::new(original.clone())));
    state.set_parameters(params);

    let backend = RustBackend::new();
    let scaled = state.scaled().unwrap().clone();
    assert_eq!(state.preview(), Some(&imaging::apply(&backend, &scaled, &params)));
    assert_eq!(state.export(), Some(imaging::apply(&backend, &original, &params)));
}

// =========================================================================
// Save flow
// =========================================================================

struct BrokenStore;

impl PhotoStore for BrokenStore {
    fn authorize(&self) -> Authorization {
        Authorization::Authorized
    }

    fn write(&self, _bitmap: &Bitmap) -> Result<PathBuf, StorageError> {
        Err(StorageError::Io(std::io::Error::other("device unplugged")))
    }
}

#[test]
fn failed_write_shows_no_success_alert() {
    let event = storage::wait_for_save(storage::save_photo(Arc::new(BrokenStore), noise(4, 4, 1)));

    assert!(matches!(event, SaveEvent::Failed(_)));
    assert!(output::format_save_event(&event).is_empty());
}

#[test]
fn saved_photo_lands_in_library() {
    let tmp = TempDir::new().unwrap();
    let store = Arc::new(LibraryStore::new(tmp.path().join("Photos"), LibraryFormat::Png));
    let exported = noise(12, 9, 3);

    let event = storage::wait_for_save(storage::save_photo(store, exported.clone()));
    let SaveEvent::Saved(path) = &event else {
        panic!("expected Saved, got {event:?}");
    };

    assert_eq!(Bitmap::open(path).unwrap(), exported);
    assert_eq!(output::format_save_event(&event)[0], "Photo Saved!");
}
