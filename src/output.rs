//! CLI output formatting.
//!
//! Every formatter returns lines instead of printing, so the exact text is
//! unit testable and `main` stays a thin dispatcher.
//!
//! # Output Format
//!
//! ## Preview
//!
//! ```text
//! Preview 750x1000 @2x
//!     Source: IMG_0042.jpg (4032x3024)
//!     Filter: brightness 0.10, contrast 1.20, saturation 0.00, blur 2.0
//!     Written: preview.png
//! ```
//!
//! ## Save
//!
//! ```text
//! Photo Saved!
//!     The photo has been saved to your Photo Library!
//!     Path: Photos/photo-004.jpg
//! ```
//!
//! Denied and failed saves print nothing. They are reported through the log.

use crate::imaging::{Bitmap, FilterParameters};
use crate::storage::SaveEvent;
use std::path::Path;

/// One-line summary of the four filter values.
pub fn format_parameters(params: &FilterParameters) -> String {
    format!(
        "brightness {:.2}, contrast {:.2}, saturation {:.2}, blur {:.1}",
        params.brightness, params.contrast, params.saturation, params.blur_radius
    )
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Lines describing a rendered preview, or the cleared-preview notice.
pub fn format_preview(
    source: &Path,
    original: Option<&Bitmap>,
    preview: Option<&Bitmap>,
    params: &FilterParameters,
    written: Option<&Path>,
) -> Vec<String> {
    let (Some(original), Some(preview)) = (original, preview) else {
        return vec![
            "Preview cleared".to_string(),
            format!("    No image loaded from {}", file_label(source)),
        ];
    };

    let mut lines = vec![format!(
        "Preview {}x{} @{}x",
        preview.width(),
        preview.height(),
        preview.scale()
    )];
    lines.push(format!(
        "    Source: {} ({}x{})",
        file_label(source),
        original.width(),
        original.height()
    ));
    lines.push(format!("    Filter: {}", format_parameters(params)));
    if let Some(path) = written {
        lines.push(format!("    Written: {}", path.display()));
    }
    lines
}

/// Lines for a finished save. Only a successful save produces output.
pub fn format_save_event(event: &SaveEvent) -> Vec<String> {
    match event {
        SaveEvent::Saved(path) => vec![
            "Photo Saved!".to_string(),
            "    The photo has been saved to your Photo Library!".to_string(),
            format!("    Path: {}", path.display()),
        ],
        SaveEvent::Denied | SaveEvent::Failed(_) => Vec::new(),
    }
}

pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}
