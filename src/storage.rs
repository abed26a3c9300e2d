//! Photo library storage and the asynchronous save flow.
//!
//! Saving is the one asynchronous boundary in the pipeline. [`save_photo`]
//! moves the finished bitmap to a worker thread that checks authorization
//! and then writes, and delivers exactly one [`SaveEvent`] on the returned
//! channel. Whoever drains the channel is responsible for getting back onto
//! its own UI thread before showing anything.
//!
//! Failures are terminal for that save: they are logged and reported as
//! [`SaveEvent::Failed`], never retried, and never escape as a panic.
//!
//! ## Library layout
//!
//! ```text
//! Photos/
//! ├── photo-001.jpg
//! ├── photo-002.jpg
//! └── photo-003.png
//! ```

use crate::imaging::Bitmap;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Encode failed: {0}")]
    Encode(String),
    #[error("Unsupported library format: {0}")]
    UnsupportedFormat(String),
    #[error("No photo numbers left in {0}")]
    NumberingExhausted(PathBuf),
    #[error("Save worker exited without reporting")]
    Disconnected,
}

/// Outcome of the authorization check that precedes every write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorization {
    Authorized,
    Denied,
}

/// The single completion event of a save.
#[derive(Debug)]
pub enum SaveEvent {
    Saved(PathBuf),
    Denied,
    Failed(StorageError),
}

impl SaveEvent {
    /// Only a completed write warrants a success notification.
    pub fn is_success(&self) -> bool {
        matches!(self, SaveEvent::Saved(_))
    }
}

/// A persistent photo store.
pub trait PhotoStore: Send + Sync + 'static {
    fn authorize(&self) -> Authorization;

    /// Persist the bitmap, returning where it landed.
    fn write(&self, bitmap: &Bitmap) -> Result<PathBuf, StorageError>;
}

/// Encoding used for files written to the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryFormat {
    Jpeg { quality: u8 },
    Png,
}

impl LibraryFormat {
    /// Parse a config format name (`jpg`, `jpeg`, `png`).
    pub fn parse(name: &str, quality: u8) -> Result<Self, StorageError> {
        match name.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Ok(LibraryFormat::Jpeg { quality }),
            "png" => Ok(LibraryFormat::Png),
            other => Err(StorageError::UnsupportedFormat(other.to_string())),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            LibraryFormat::Jpeg { .. } => "jpg",
            LibraryFormat::Png => "png",
        }
    }
}

/// Directory-backed photo library.
pub struct LibraryStore {
    dir: PathBuf,
    format: LibraryFormat,
}

impl LibraryStore {
    pub fn new(dir: impl Into<PathBuf>, format: LibraryFormat) -> Self {
        Self {
            dir: dir.into(),
            format,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Next `photo-NNN.<ext>` path after the highest number already present.
    fn next_path(&self) -> Result<PathBuf, StorageError> {
        let mut highest = 0;
        for entry in fs::read_dir(&self.dir)? {
            let name = entry?.file_name();
            if let Some(n) = name.to_str().and_then(parse_photo_number) {
                highest = highest.max(n);
            }
        }
        let next = highest
            .checked_add(1)
            .ok_or_else(|| StorageError::NumberingExhausted(self.dir.clone()))?;
        Ok(self.dir.join(format!(
            "photo-{:03}.{}",
            next,
            self.format.extension()
        )))
    }
}

/// Whether a file can be created in `dir`, checked by creating and
/// removing a marker file.
fn can_create_files(dir: &Path) -> bool {
    let marker = dir.join(".photo-filter-write-check");
    match OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&marker)
    {
        Ok(_) => {
            let _ = fs::remove_file(&marker);
            true
        }
        Err(e) => {
            log::warn!("library {} is not writable: {}", dir.display(), e);
            false
        }
    }
}

/// `photo-012.jpg` → `Some(12)`.
fn parse_photo_number(filename: &str) -> Option<u32> {
    let stem = Path::new(filename).file_stem()?.to_str()?;
    stem.strip_prefix("photo-")?.parse().ok()
}

fn encode(bitmap: &Bitmap, file: File, format: LibraryFormat) -> Result<(), StorageError> {
    let mut writer = BufWriter::new(file);
    let rgba = DynamicImage::ImageRgba8(bitmap.pixels().clone());
    match format {
        LibraryFormat::Jpeg { quality } => {
            // JPEG has no alpha channel.
            let encoder = JpegEncoder::new_with_quality(&mut writer, quality);
            DynamicImage::ImageRgb8(rgba.to_rgb8())
                .write_with_encoder(encoder)
                .map_err(|e| StorageError::Encode(format!("JPEG encode failed: {}", e)))?;
        }
        LibraryFormat::Png => {
            rgba.write_to(&mut writer, ImageFormat::Png)
                .map_err(|e| StorageError::Encode(format!("PNG encode failed: {}", e)))?;
        }
    }
    writer.flush()?;
    Ok(())
}

impl PhotoStore for LibraryStore {
    fn authorize(&self) -> Authorization {
        if let Err(e) = fs::create_dir_all(&self.dir) {
            log::warn!("library {} unavailable: {}", self.dir.display(), e);
            return Authorization::Denied;
        }
        if self.dir.is_dir() && can_create_files(&self.dir) {
            Authorization::Authorized
        } else {
            Authorization::Denied
        }
    }

    fn write(&self, bitmap: &Bitmap) -> Result<PathBuf, StorageError> {
        let path = self.next_path()?;
        let file = OpenOptions::new().write(true).create_new(true).open(&path)?;
        if let Err(e) = encode(bitmap, file, self.format) {
            // Don't leave a truncated file behind to be counted next time.
            let _ = fs::remove_file(&path);
            return Err(e);
        }
        Ok(path)
    }
}

/// Authorize-then-write on a worker thread.
///
/// The returned channel receives exactly one event. Use [`wait_for_save`] to
/// block on it from the caller's thread.
pub fn save_photo<S: PhotoStore>(store: Arc<S>, bitmap: Bitmap) -> Receiver<SaveEvent> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let event = match store.authorize() {
            Authorization::Denied => SaveEvent::Denied,
            Authorization::Authorized => match store.write(&bitmap) {
                Ok(path) => SaveEvent::Saved(path),
                Err(e) => SaveEvent::Failed(e),
            },
        };
        // Receiver may have gone away; nothing left to notify.
        let _ = tx.send(event);
    });
    rx
}

/// Block until the save reports, logging anything other than success.
///
/// A worker that dies without reporting counts as a failure.
pub fn wait_for_save(events: Receiver<SaveEvent>) -> SaveEvent {
    let event = events
        .recv()
        .unwrap_or(SaveEvent::Failed(StorageError::Disconnected));
    match &event {
        SaveEvent::Saved(path) => log::info!("saved {}", path.display()),
        SaveEvent::Denied => log::warn!("photo library access denied"),
        SaveEvent::Failed(e) => log::error!("Error saving photo: {}", e),
    }
    event
}
