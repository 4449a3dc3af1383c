//! High-level image operations.
//!
//! These functions combine a [`Session`] (which knows *what* to produce) with
//! a backend (which does the pixel work) and, in compress mode, the
//! [`SizeBudgetSearcher`].

use super::backend::{BackendError, DecodedImage, ImageBackend};
use super::params::Quality;
use crate::search::{CancelToken, SearchError, SearchOutcome, SizeBudgetSearcher};
use crate::session::Session;
use crate::types::{Mode, OutputFormat, OutputSpec};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OperationError {
    #[error("No image loaded")]
    NoImage,
    #[error("Please specify a target size")]
    MissingTarget,
    #[error("{0} compression is lossless. For size reduction, please choose JPEG or WebP format.")]
    CompressionNotApplicable(OutputFormat),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Search(#[from] SearchError),
}

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, OperationError>;

/// Knobs that come from configuration rather than the form.
#[derive(Debug, Clone, Copy)]
pub struct ProcessSettings {
    /// Quality for plain resizes of lossy formats.
    pub resize_quality: Quality,
    /// Bisection steps for compress mode.
    pub iterations: u32,
}

impl Default for ProcessSettings {
    fn default() -> Self {
        Self {
            resize_quality: Quality::default(),
            iterations: crate::search::DEFAULT_ITERATIONS,
        }
    }
}

/// An encoded artifact and the output spec that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedImage {
    pub spec: OutputSpec,
    pub data: Vec<u8>,
}

impl ProcessedImage {
    pub fn bytes(&self) -> u64 {
        self.data.len() as u64
    }
}

/// What a processing run produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Processed {
    Resized(ProcessedImage),
    Compressed(ProcessedImage),
    /// The budget cannot be met; `min_bytes` is the smallest achievable size.
    Unreachable { min_bytes: u64, target_bytes: u64 },
}

/// Quality used for a plain resize. PNG is always written at full quality.
pub fn resize_quality(format: OutputFormat, configured: Quality) -> Quality {
    if format.is_lossless() {
        Quality::MAX
    } else {
        configured
    }
}

/// Encode at the session's resolved dimensions.
pub fn resize_image(
    backend: &impl ImageBackend,
    session: &Session,
    source: &DecodedImage,
    settings: &ProcessSettings,
) -> Result<ProcessedImage> {
    let format = session.compress_intent()?.format;
    let quality = resize_quality(format, settings.resize_quality);
    let spec = session.output_spec(quality.value())?;
    let data = backend.encode(source, &spec)?;
    log::info!(
        "resized to {}x{} {} ({} bytes)",
        spec.width,
        spec.height,
        spec.format,
        data.len()
    );
    Ok(ProcessedImage { spec, data })
}

/// Search for the highest quality that fits the session's target size.
///
/// Lossless formats are rejected before any encode call.
pub fn compress_image(
    backend: &impl ImageBackend,
    session: &Session,
    source: &DecodedImage,
    settings: &ProcessSettings,
    cancel: &CancelToken,
) -> Result<Processed> {
    let intent = session.compress_intent()?;
    if intent.format.is_lossless() {
        return Err(OperationError::CompressionNotApplicable(intent.format));
    }
    let target = intent.target_bytes().ok_or(OperationError::MissingTarget)?;
    let base = session.output_spec(0.0)?;

    let searcher = SizeBudgetSearcher::new(intent.format).with_iterations(settings.iterations);
    let outcome = searcher.run_cancellable(
        |quality| {
            let spec = OutputSpec {
                quality: quality.value(),
                ..base
            };
            backend.encode(source, &spec)
        },
        target,
        cancel,
    )?;

    Ok(match outcome {
        SearchOutcome::Found(hit) => {
            log::info!(
                "compressed to {} bytes at quality {:.3} (target {target})",
                hit.bytes(),
                hit.quality
            );
            Processed::Compressed(ProcessedImage {
                spec: OutputSpec {
                    quality: hit.quality,
                    ..base
                },
                data: hit.data,
            })
        }
        SearchOutcome::Unreachable { min_bytes } => Processed::Unreachable {
            min_bytes,
            target_bytes: target,
        },
    })
}

/// Run whichever operation the session's mode selects.
pub fn process_image(
    backend: &impl ImageBackend,
    session: &Session,
    source: &DecodedImage,
    settings: &ProcessSettings,
    cancel: &CancelToken,
) -> Result<Processed> {
    match session.mode() {
        Mode::Resize => resize_image(backend, session, source, settings).map(Processed::Resized),
        Mode::Compress => compress_image(backend, session, source, settings, cancel),
    }
}

/// File name for a generated image: `{stem}-{resized|compressed}.{ext}`.
pub fn output_filename(source: &Path, mode: Mode, format: OutputFormat) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    format!("{}-{}.{}", stem, mode.suffix(), format.extension())
}
