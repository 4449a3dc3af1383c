//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `image::ImageReader::with_guessed_format` + `into_dimensions` |
//! | Decode (JPEG, PNG, WebP) | `image` crate decoders |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` |
//! | Encode → PNG | `image::codecs::png::PngEncoder` |
//! | Encode → WebP | `webp::Encoder` (lossy, libwebp) |

use super::backend::{BackendError, DecodedImage, ImageBackend};
use super::params::Quality;
use crate::types::{OriginalImage, OutputFormat, OutputSpec};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::borrow::Cow;
use std::path::Path;

/// Input formats accepted for upload.
const ACCEPTED_INPUTS: &[(ImageFormat, &str)] = &[
    (ImageFormat::Jpeg, "image/jpeg"),
    (ImageFormat::Png, "image/png"),
    (ImageFormat::WebP, "image/webp"),
];

fn mime_for(format: ImageFormat) -> Option<&'static str> {
    ACCEPTED_INPUTS
        .iter()
        .find(|(f, _)| *f == format)
        .map(|(_, mime)| *mime)
}

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn open_reader(path: &Path) -> Result<ImageReader<std::io::BufReader<std::fs::File>>, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)
}

/// Sniff the content and reject anything that is not JPEG, PNG or WebP.
fn accepted_mime(
    reader: &ImageReader<std::io::BufReader<std::fs::File>>,
    path: &Path,
) -> Result<&'static str, BackendError> {
    reader
        .format()
        .and_then(mime_for)
        .ok_or_else(|| BackendError::UnsupportedInput(path.display().to_string()))
}

fn encode_jpeg(img: &DynamicImage, quality: Quality) -> Result<Vec<u8>, BackendError> {
    // JPEG has no alpha channel.
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let mut buf = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buf, quality.jpeg());
    rgb.write_with_encoder(encoder)
        .map_err(|e| BackendError::ProcessingFailed(format!("JPEG encode failed: {e}")))?;
    Ok(buf)
}

fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, BackendError> {
    let mut buf = Vec::new();
    img.write_with_encoder(PngEncoder::new(&mut buf))
        .map_err(|e| BackendError::ProcessingFailed(format!("PNG encode failed: {e}")))?;
    Ok(buf)
}

fn encode_webp(img: &DynamicImage, quality: Quality) -> Result<Vec<u8>, BackendError> {
    let rgba = img.to_rgba8();
    let encoder = webp::Encoder::from_rgba(rgba.as_raw(), rgba.width(), rgba.height());
    let memory = encoder
        .encode_simple(false, quality.percent())
        .map_err(|e| BackendError::ProcessingFailed(format!("WebP encode failed: {e:?}")))?;
    Ok(memory.to_vec())
}

/// Largest width or height the encoder for `format` accepts.
fn max_dimension(format: OutputFormat) -> u32 {
    match format {
        OutputFormat::Jpeg => 65_535,
        OutputFormat::Png => i32::MAX as u32,
        OutputFormat::WebP => 16_383,
    }
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<OriginalImage, BackendError> {
        let size_bytes = std::fs::metadata(path)?.len();
        let reader = open_reader(path)?;
        let mime_type = accepted_mime(&reader, path)?;
        let (width, height) = reader.into_dimensions().map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to read dimensions: {e}"))
        })?;
        if width == 0 || height == 0 {
            return Err(BackendError::ProcessingFailed(format!(
                "{} has no pixels",
                path.display()
            )));
        }
        Ok(OriginalImage {
            width,
            height,
            size_bytes,
            mime_type: mime_type.to_string(),
        })
    }

    fn decode(&self, path: &Path) -> Result<DecodedImage, BackendError> {
        let reader = open_reader(path)?;
        accepted_mime(&reader, path)?;
        let pixels = reader.decode().map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {e}", path.display()))
        })?;
        Ok(DecodedImage::new(pixels))
    }

    fn encode(&self, source: &DecodedImage, spec: &OutputSpec) -> Result<Vec<u8>, BackendError> {
        // Checked before resizing so an oversized canvas is never allocated.
        let limit = max_dimension(spec.format);
        if spec.width > limit || spec.height > limit {
            return Err(BackendError::ProcessingFailed(format!(
                "{} x {} exceeds the {} limit of {limit} pixels per side",
                spec.width, spec.height, spec.format
            )));
        }
        let drawn = if source.dimensions() == (spec.width, spec.height) {
            Cow::Borrowed(&source.pixels)
        } else {
            Cow::Owned(
                source
                    .pixels
                    .resize_exact(spec.width, spec.height, FilterType::Lanczos3),
            )
        };
        let quality = Quality::new(spec.quality);

        match spec.format {
            OutputFormat::Jpeg => encode_jpeg(&drawn, quality),
            OutputFormat::Png => encode_png(&drawn),
            OutputFormat::WebP => encode_webp(&drawn, quality),
        }
    }
}
