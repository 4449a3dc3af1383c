//! # pixfit
//!
//! Take one raster image and produce a derived image that either has target
//! pixel dimensions or fits under a file-size budget.
//!
//! # Architecture: Resolve, Then Encode
//!
//! ```text
//! identify  file      →  OriginalImage       (dimensions, size, MIME type)
//! resolve   edits     →  (width, height)     (DimensionResolver)
//! encode    resize    →  one encode at fixed quality
//!           compress  →  bisection over quality (SizeBudgetSearcher)
//! ```
//!
//! The two pieces with real logic are pure and synchronous:
//!
//! - [`resolver::DimensionResolver`] keeps width, height and percentage
//!   consistent under pixel edits, percentage edits and the aspect lock.
//! - [`search::SizeBudgetSearcher`] treats the encoder as an opaque oracle and
//!   finds the highest quality whose output fits the budget.
//!
//! Pixel work sits behind the [`imaging::ImageBackend`] trait, so both can be
//! tested against a mock without decoding a single image.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | Shared data model: original image, intents, output spec |
//! | [`resolver`] | Width / height / percentage state machine |
//! | [`search`] | Quality bisection against a byte budget |
//! | [`session`] | Loaded image plus intents seeded from it |
//! | [`imaging`] | Backend trait, `image`-crate backend, high-level operations |
//! | [`config`] | `pixfit.toml` loading, merging, validation |
//! | [`output`] | CLI report formatting |
//!
//! # Design Decisions
//!
//! ## Last-Edited Field Drives Derivation
//!
//! Each setter derives the other fields from the one the user touched and
//! nothing else. There is no reactive recomputation, so a width edit can
//! never bounce back through height and nudge the width it came from.
//!
//! ## Fixed Iteration Budget
//!
//! Compression runs a fixed number of bisection steps (7 by default) instead
//! of searching to convergence. Each step is a full encode of the image, so
//! the cost is bounded and predictable; precision is `1 / 2^K` in quality.
//!
//! ## PNG Is Never Searched
//!
//! Lossless encoders have no quality knob that trades fidelity for size.
//! Compressing to PNG is rejected before the search starts.

pub mod config;
pub mod imaging;
pub mod output;
pub mod resolver;
pub mod search;
pub mod session;
pub mod types;
