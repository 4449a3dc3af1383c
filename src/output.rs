//! CLI output formatting.
//!
//! Each report has a `format_*` function returning `Vec<String>` for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.
//!
//! ```text
//! beach.jpg
//!     Dimensions: 1920 x 1080 (aspect 1.778)
//!     Type: image/jpeg
//!     Size: 512.4 KB
//!
//! Image compressed successfully!
//!     Saved 312.4 KB (60.97%). New size: 200 KB
//!     Quality: 0.258
//!     Output: beach-compressed.jpg
//! ```

use crate::imaging::{Processed, ProcessedImage};
use crate::types::OriginalImage;
use std::path::Path;

const UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

/// Human-readable size with base-1024 units and trailing zeros trimmed.
///
/// # Examples
/// ```
/// # use pixfit::output::format_bytes;
/// assert_eq!(format_bytes(0, 2), "0 Bytes");
/// assert_eq!(format_bytes(1536, 2), "1.5 KB");
/// ```
pub fn format_bytes(bytes: u64, decimals: usize) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let k = 1024f64;
    let exponent = ((bytes as f64).ln() / k.ln()).floor() as usize;
    let exponent = exponent.min(UNITS.len() - 1);
    let scaled = bytes as f64 / k.powi(exponent as i32);
    let rendered = format!("{scaled:.decimals$}");
    let trimmed = if rendered.contains('.') {
        rendered.trim_end_matches('0').trim_end_matches('.')
    } else {
        rendered.as_str()
    };
    format!("{trimmed} {}", UNITS[exponent])
}

/// Metadata block for `pixfit info`.
pub fn format_info(path: &Path, original: &OriginalImage) -> Vec<String> {
    vec![
        path.display().to_string(),
        format!(
            "    Dimensions: {} x {} (aspect {:.3})",
            original.width,
            original.height,
            original.aspect_ratio()
        ),
        format!("    Type: {}", original.mime_type),
        format!("    Size: {}", format_bytes(original.size_bytes, 2)),
    ]
}

fn format_resized(image: &ProcessedImage, output: &Path) -> Vec<String> {
    vec![
        "Image resized!".to_string(),
        format!(
            "    {} x {} {} ({})",
            image.spec.width,
            image.spec.height,
            image.spec.format,
            format_bytes(image.bytes(), 2)
        ),
        format!("    Output: {}", output.display()),
    ]
}

fn format_compressed(image: &ProcessedImage, original_bytes: u64, output: &Path) -> Vec<String> {
    let new_size = image.bytes();
    let mut lines = vec!["Image compressed successfully!".to_string()];
    if original_bytes > 0 && new_size <= original_bytes {
        let saved = original_bytes - new_size;
        let percent = saved as f64 / original_bytes as f64 * 100.0;
        lines.push(format!(
            "    Saved {} ({percent:.2}%). New size: {}",
            format_bytes(saved, 2),
            format_bytes(new_size, 2)
        ));
    } else {
        lines.push(format!(
            "    New size: {} (original was {})",
            format_bytes(new_size, 2),
            format_bytes(original_bytes, 2)
        ));
    }
    lines.push(format!("    Quality: {:.3}", image.spec.quality));
    lines.push(format!("    Output: {}", output.display()));
    lines
}

/// Message for a target the search could not meet.
///
/// The smallest output can still fit when the target sits below the
/// coarsest quality step the search tried; that case gets its own hint.
pub fn format_unreachable(min_bytes: u64, target_bytes: u64) -> Vec<String> {
    let hint = if min_bytes <= target_bytes {
        format!(
            "    The search never tried a quality low enough to fit {}. Raise compress.iterations or the target size.",
            format_bytes(target_bytes, 2)
        )
    } else {
        format!(
            "    Could not compress to the target size. Try a larger size. The smallest possible is {}.",
            format_bytes(min_bytes, 2)
        )
    };
    vec!["Compression Failed".to_string(), hint]
}

/// Report for a finished resize or compress run.
///
/// `output` is where the artifact was written; it is unused for
/// [`Processed::Unreachable`], which writes nothing.
pub fn format_processed(processed: &Processed, original: &OriginalImage, output: &Path) -> Vec<String> {
    match processed {
        Processed::Resized(image) => format_resized(image, output),
        Processed::Compressed(image) => format_compressed(image, original.size_bytes, output),
        Processed::Unreachable {
            min_bytes,
            target_bytes,
        } => format_unreachable(*min_bytes, *target_bytes),
    }
}

pub fn print_info(path: &Path, original: &OriginalImage) {
    for line in format_info(path, original) {
        println!("{}", line);
    }
}

pub fn print_processed(processed: &Processed, original: &OriginalImage, output: &Path) {
    for line in format_processed(processed, original, output) {
        println!("{}", line);
    }
}
