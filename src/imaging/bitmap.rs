//! Immutable bitmap value passed between pipeline stages.

use super::backend::BackendError;
use image::{DynamicImage, ImageFormat, ImageReader, RgbaImage};
use std::path::Path;

/// Decoded RGBA8 pixels plus the device scale they were produced for.
///
/// There are no mutating methods: every stage takes a `&Bitmap` and returns
/// a new one, so a bitmap can be handed between stages (and threads) freely.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    pixels: RgbaImage,
    scale: f32,
}

impl Bitmap {
    pub fn new(pixels: RgbaImage, scale: f32) -> Self {
        Self { pixels, scale }
    }

    /// Wrap a decoded image at scale 1.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self::new(image.into_rgba8(), 1.0)
    }

    /// Load and decode an image from disk.
    pub fn open(path: &Path) -> Result<Self, BackendError> {
        let image = ImageReader::open(path)
            .map_err(BackendError::Io)?
            .with_guessed_format()
            .map_err(BackendError::Io)?
            .decode()
            .map_err(|e| {
                BackendError::ProcessingFailed(format!(
                    "Failed to decode {}: {}",
                    path.display(),
                    e
                ))
            })?;
        Ok(Self::from_dynamic(image))
    }

    /// Encode to disk, inferring the format from the extension.
    ///
    /// Formats without an alpha channel (JPEG) get the RGB channels only.
    pub fn save(&self, path: &Path) -> Result<(), BackendError> {
        let format = ImageFormat::from_path(path).map_err(|e| {
            BackendError::ProcessingFailed(format!(
                "Unsupported output format {}: {}",
                path.display(),
                e
            ))
        })?;
        let rgba = DynamicImage::ImageRgba8(self.pixels.clone());
        let result = match format {
            ImageFormat::Jpeg => {
                DynamicImage::ImageRgb8(rgba.to_rgb8()).save_with_format(path, format)
            }
            _ => rgba.save_with_format(path, format),
        };
        result.map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to write {}: {}", path.display(), e))
        })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// Device pixel density this bitmap was rendered for.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Same pixels, different scale metadata.
    pub fn with_scale(self, scale: f32) -> Self {
        Self { scale, ..self }
    }

    pub fn into_pixels(self) -> RgbaImage {
        self.pixels
    }
}

impl From<RgbaImage> for Bitmap {
    fn from(pixels: RgbaImage) -> Self {
        Self::new(pixels, 1.0)
    }
}
