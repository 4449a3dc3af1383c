//! Image processing: pure Rust codecs behind a small trait.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::ImageReader` format sniffing + header dimensions |
//! | **Decode** | `image` crate (JPEG, PNG, WebP) |
//! | **Resize** | Lanczos3 via `DynamicImage::resize_exact` |
//! | **Encode** | `image` JPEG/PNG encoders, `webp` for lossy WebP |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: The normalized [`Quality`] type
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level resize/compress combining a session, the
//!   size-budget search, and a backend

pub mod backend;
pub mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, DecodedImage, ImageBackend};
pub use operations::{
    OperationError, ProcessSettings, Processed, ProcessedImage, compress_image, output_filename,
    process_image, resize_image,
};
pub use params::Quality;
pub use rust_backend::RustBackend;
