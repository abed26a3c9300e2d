//! # Photo Filter
//!
//! Pick a photo, adjust brightness, contrast, saturation and blur, preview
//! the result at display resolution, and save the full-resolution result to
//! a photo library.
//!
//! # Architecture: Scale Once, Filter Often
//!
//! ```text
//! pick photo ──► scale to viewport ──► filter chain ──► preview
//!                  (once per photo)     (every change)
//!
//! save ──► filter chain on original ──► photo library (worker thread)
//! ```
//!
//! The filter chain is a pure function of `(bitmap, parameters)`: the same
//! inputs always give the same bytes, so the preview is an exact scaled
//! rendition of what gets saved.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Bitmaps, the preview scaler, and the two-stage filter chain |
//! | [`preview`] | Preview state: original, scaled derivative, current parameters |
//! | [`storage`] | Photo library store and the asynchronous save flow |
//! | [`config`] | `photo-filter.toml` loading, merging, and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Failures Never Blank the Preview
//!
//! Nothing in the pipeline returns a hard error to the caller. A missing
//! photo clears the preview; a filter stage that cannot render hands back
//! the unfiltered input; a failed save is logged and simply does not show
//! the success message.
//!
//! ## One Rounding Step for Color
//!
//! Brightness, contrast and saturation are folded into a single matrix and
//! offset before touching any pixel, so each channel is rounded exactly once.
//!
//! ## Crop to the Input Extent
//!
//! The blur samples past the image edge by extending boundary pixels, and the
//! rendered result is always cropped back to the extent of the bitmap that
//! entered the chain. Output dimensions equal input dimensions.

pub mod config;
pub mod imaging;
pub mod output;
pub mod preview;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_helpers;
