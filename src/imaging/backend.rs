//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three operations every backend must
//! support: identify, decode, and encode. Everything above it (resolver,
//! searcher, operations) only sees this trait, so tests run against a
//! recording mock instead of real codecs.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend).

use crate::types::{OriginalImage, OutputSpec};
use image::DynamicImage;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unsupported file type {0}. Please upload a PNG, JPG, or WebP image.")]
    UnsupportedInput(String),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Decoded pixels, ready to be resized and encoded any number of times.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub pixels: DynamicImage,
}

impl DecodedImage {
    pub fn new(pixels: DynamicImage) -> Self {
        Self { pixels }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.pixels.width(), self.pixels.height())
    }
}

/// Trait for image processing backends.
pub trait ImageBackend {
    /// Read dimensions, file size and MIME type without a full decode.
    fn identify(&self, path: &Path) -> Result<OriginalImage, BackendError>;

    /// Decode the file into pixels.
    fn decode(&self, path: &Path) -> Result<DecodedImage, BackendError>;

    /// Draw `source` at the spec's dimensions and encode it.
    ///
    /// Must be deterministic for identical arguments; the size-budget search
    /// relies on encoded size growing with quality.
    fn encode(&self, source: &DecodedImage, spec: &OutputSpec) -> Result<Vec<u8>, BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::types::OutputFormat;
    use std::sync::Mutex;

    /// Mock backend that records operations without touching codecs.
    ///
    /// Encoded size is `bytes_per_quality * quality + floor_bytes`, which is
    /// monotonic in quality like a real lossy encoder.
    pub struct MockBackend {
        pub original: Mutex<Option<OriginalImage>>,
        pub bytes_per_quality: f64,
        pub floor_bytes: usize,
        pub fail_encode: bool,
        pub operations: Mutex<Vec<RecordedOp>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Identify(String),
        Decode(String),
        Encode {
            width: u32,
            height: u32,
            format: OutputFormat,
            quality: f32,
        },
    }

    impl Default for MockBackend {
        fn default() -> Self {
            Self {
                original: Mutex::new(None),
                bytes_per_quality: 1000.0,
                floor_bytes: 0,
                fail_encode: false,
                operations: Mutex::new(Vec::new()),
            }
        }
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_original(original: OriginalImage) -> Self {
            Self {
                original: Mutex::new(Some(original)),
                ..Self::default()
            }
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }

        pub fn encode_calls(&self) -> usize {
            self.get_operations()
                .iter()
                .filter(|op| matches!(op, RecordedOp::Encode { .. }))
                .count()
        }
    }

    impl ImageBackend for MockBackend {
        fn identify(&self, path: &Path) -> Result<OriginalImage, BackendError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Identify(path.to_string_lossy().to_string()));

            self.original
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| BackendError::ProcessingFailed("No mock original".to_string()))
        }

        fn decode(&self, path: &Path) -> Result<DecodedImage, BackendError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Decode(path.to_string_lossy().to_string()));
            Ok(DecodedImage::new(DynamicImage::new_rgb8(1, 1)))
        }

        fn encode(&self, _source: &DecodedImage, spec: &OutputSpec) -> Result<Vec<u8>, BackendError> {
            self.operations.lock().unwrap().push(RecordedOp::Encode {
                width: spec.width,
                height: spec.height,
                format: spec.format,
                quality: spec.quality,
            });
            if self.fail_encode {
                return Err(BackendError::ProcessingFailed("mock encode failure".into()));
            }
            let len = (spec.quality as f64 * self.bytes_per_quality).round() as usize + self.floor_bytes;
            Ok(vec![0u8; len])
        }
    }

    #[test]
    fn mock_records_identify() {
        let backend = MockBackend::with_original(OriginalImage {
            width: 800,
            height: 600,
            size_bytes: 1024,
            mime_type: "image/jpeg".into(),
        });

        let result = backend.identify(Path::new("/test/image.jpg")).unwrap();
        assert_eq!(result.width, 800);
        assert_eq!(result.height, 600);

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(&ops[0], RecordedOp::Identify(p) if p == "/test/image.jpg"));
    }

    #[test]
    fn mock_identify_without_original_errors() {
        let backend = MockBackend::new();
        assert!(backend.identify(Path::new("/missing.jpg")).is_err());
    }

    #[test]
    fn mock_encode_size_tracks_quality() {
        let backend = MockBackend::new();
        let source = backend.decode(Path::new("/source.jpg")).unwrap();
        let spec = OutputSpec {
            width: 10,
            height: 10,
            format: OutputFormat::Jpeg,
            quality: 0.5,
        };

        let bytes = backend.encode(&source, &spec).unwrap();
        assert_eq!(bytes.len(), 500);
        assert_eq!(backend.encode_calls(), 1);
    }

    #[test]
    fn decoded_image_reports_dimensions() {
        let decoded = DecodedImage::new(DynamicImage::new_rgb8(4, 3));
        assert_eq!(decoded.dimensions(), (4, 3));
    }
}
