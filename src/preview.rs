//! Live preview state: original photo, its display-resolution derivative,
//! and the current filter parameters.
//!
//! Recomputation is explicit. Each setter calls the next step down the
//! dependency chain directly:
//!
//! ```text
//! set_photo / set_target_size  →  rescale  →  rerender
//! set_parameters               →              rerender
//! ```
//!
//! Filtering on every parameter change only touches the cached scaled
//! bitmap; [`PreviewState::export`] re-runs the identical chain on the
//! full-resolution original.

use crate::imaging::{self, Bitmap, FilterBackend, FilterParameters, RustBackend, TargetSize};
use std::path::Path;

/// A photo handed over by the image source.
///
/// The source may supply an edited variant (e.g. a user crop) next to the
/// original; the edited one wins when present.
#[derive(Debug, Clone, PartialEq)]
pub struct PickedPhoto {
    pub original: Bitmap,
    pub edited: Option<Bitmap>,
}

impl PickedPhoto {
    pub fn new(original: Bitmap) -> Self {
        Self {
            original,
            edited: None,
        }
    }

    pub fn with_edited(original: Bitmap, edited: Bitmap) -> Self {
        Self {
            original,
            edited: Some(edited),
        }
    }

    /// Decode a picked photo from disk.
    ///
    /// A variant that fails to load is dropped with a warning. When only the
    /// edited variant loads it stands in as the original; `None` when
    /// neither loads.
    pub fn open(original: &Path, edited: Option<&Path>) -> Option<Self> {
        let original_bitmap = match Bitmap::open(original) {
            Ok(b) => Some(b),
            Err(e) => {
                log::warn!("could not load {}: {}", original.display(), e);
                None
            }
        };
        let edited_bitmap = edited.and_then(|path| match Bitmap::open(path) {
            Ok(b) => Some(b),
            Err(e) => {
                log::warn!("ignoring edited variant {}: {}", path.display(), e);
                None
            }
        });
        match (original_bitmap, edited_bitmap) {
            (Some(original), edited) => Some(Self { original, edited }),
            (None, Some(edited)) => Some(Self::new(edited)),
            (None, None) => None,
        }
    }

    /// The variant the pipeline should work on.
    pub fn selected(self) -> Bitmap {
        self.edited.unwrap_or(self.original)
    }
}

/// Preview pipeline state for a single screen.
pub struct PreviewState<B: FilterBackend = RustBackend> {
    backend: B,
    target: TargetSize,
    params: FilterParameters,
    original: Option<Bitmap>,
    scaled: Option<Bitmap>,
    rendered: Option<Bitmap>,
}

impl PreviewState<RustBackend> {
    pub fn new(target: TargetSize) -> Self {
        Self::with_backend(RustBackend::new(), target)
    }
}

impl<B: FilterBackend> PreviewState<B> {
    pub fn with_backend(backend: B, target: TargetSize) -> Self {
        Self {
            backend,
            target,
            params: FilterParameters::default(),
            original: None,
            scaled: None,
            rendered: None,
        }
    }

    /// Replace the photo wholesale. `None` clears the preview.
    pub fn set_photo(&mut self, photo: Option<PickedPhoto>) {
        self.original = photo.map(PickedPhoto::selected);
        self.rescale();
    }

    /// Viewport changed (rotation, resize, different screen).
    pub fn set_target_size(&mut self, target: TargetSize) {
        self.target = target;
        self.rescale();
    }

    pub fn set_parameters(&mut self, params: FilterParameters) {
        self.params = params;
        self.rerender();
    }

    fn rescale(&mut self) {
        self.scaled = imaging::scale(&self.backend, self.original.as_ref(), self.target);
        self.rerender();
    }

    fn rerender(&mut self) {
        self.rendered = self
            .scaled
            .as_ref()
            .map(|scaled| imaging::apply(&self.backend, scaled, &self.params));
    }

    /// The filtered preview, or `None` when the preview should be cleared.
    pub fn preview(&self) -> Option<&Bitmap> {
        self.rendered.as_ref()
    }

    /// The unfiltered display-resolution bitmap.
    pub fn scaled(&self) -> Option<&Bitmap> {
        self.scaled.as_ref()
    }

    pub fn original(&self) -> Option<&Bitmap> {
        self.original.as_ref()
    }

    pub fn parameters(&self) -> FilterParameters {
        self.params
    }

    pub fn target_size(&self) -> TargetSize {
        self.target
    }

    /// Run the current chain on the full-resolution original.
    pub fn export(&self) -> Option<Bitmap> {
        self.original
            .as_ref()
            .map(|original| imaging::apply(&self.backend, original, &self.params))
    }
}
