//! Shared data model used by the resolver, the searcher, and the CLI.
//!
//! These types describe the loaded image and the user's declarative intent.
//! They carry no behavior beyond small conversions; the derivation rules live
//! in [`resolver`](crate::resolver) and [`search`](crate::search).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Metadata of the image the session was loaded with.
///
/// Immutable once set. Loading a new image replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginalImage {
    pub width: u32,
    pub height: u32,
    pub size_bytes: u64,
    pub mime_type: String,
}

impl OriginalImage {
    /// `width / height` of the original. Read-only for everything downstream.
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

/// Output encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Jpeg,
    Png,
    #[serde(rename = "webp")]
    WebP,
}

impl OutputFormat {
    /// Format the original tool would pick for an uploaded MIME type.
    ///
    /// PNG and WebP map to themselves; everything else falls back to JPEG.
    pub fn from_mime(mime: &str) -> Self {
        match mime {
            "image/png" => Self::Png,
            "image/webp" => Self::WebP,
            _ => Self::Jpeg,
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::WebP => "image/webp",
        }
    }

    /// File extension used for generated files (`jpg`, not `jpeg`).
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::WebP => "webp",
        }
    }

    /// Lossless formats have no quality/size tradeoff to search over.
    pub fn is_lossless(self) -> bool {
        matches!(self, Self::Png)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::WebP => "webp",
        })
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            "webp" => Ok(Self::WebP),
            other => Err(format!("unknown format '{other}' (expected jpeg, png or webp)")),
        }
    }
}

/// Unit of a compression target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SizeUnit {
    #[default]
    #[serde(rename = "KB", alias = "kb")]
    Kb,
    #[serde(rename = "MB", alias = "mb")]
    Mb,
}

impl SizeUnit {
    pub fn bytes(self) -> u64 {
        match self {
            Self::Kb => 1024,
            Self::Mb => 1024 * 1024,
        }
    }
}

impl fmt::Display for SizeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Kb => "KB",
            Self::Mb => "MB",
        })
    }
}

impl FromStr for SizeUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "kb" => Ok(Self::Kb),
            "mb" => Ok(Self::Mb),
            other => Err(format!("unknown unit '{other}' (expected KB or MB)")),
        }
    }
}

/// Top-level operation the user picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Resize,
    Compress,
}

impl Mode {
    /// Suffix appended to the output file stem.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Resize => "resized",
            Self::Compress => "compressed",
        }
    }
}

/// How the resize target is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeMode {
    #[default]
    Pixels,
    Percentage,
}

/// Snapshot of the resize form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResizeIntent {
    pub resize_mode: ResizeMode,
    pub width: u32,
    pub height: u32,
    pub percentage: f64,
    pub maintain_aspect_ratio: bool,
}

/// Snapshot of the compress form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressIntent {
    pub target_size: f64,
    pub target_unit: SizeUnit,
    pub format: OutputFormat,
}

impl CompressIntent {
    /// Defaults seeded from the original: its size in KB, its own format.
    pub fn seeded(original: &OriginalImage) -> Self {
        Self {
            target_size: (original.size_bytes as f64 / 1024.0).round(),
            target_unit: SizeUnit::Kb,
            format: OutputFormat::from_mime(&original.mime_type),
        }
    }

    /// Budget in bytes, or `None` when the target is not a positive number.
    pub fn target_bytes(&self) -> Option<u64> {
        crate::imaging::calculations::target_bytes(self.target_size, self.target_unit)
    }
}

/// Fully resolved description of the artifact to encode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutputSpec {
    pub width: u32,
    pub height: u32,
    pub format: OutputFormat,
    pub quality: f32,
}
