//! Quality search against a byte budget.
//!
//! [`SizeBudgetSearcher`] finds the highest encoder quality whose output fits
//! a byte target. The encoder is an oracle passed in as a closure; the search
//! only assumes encoded size never shrinks as quality grows, which holds for
//! JPEG and lossy WebP. Lossless formats are refused up front.
//!
//! ## Algorithm
//!
//! Bounded bisection over `[0, 1]` with a fixed number of encode calls:
//!
//! ```text
//! lo = 0, hi = 1
//! repeat K times:
//!     mid = (lo + hi) / 2
//!     size(mid) > target  →  hi = mid
//!     otherwise           →  lo = mid, best = mid
//! ```
//!
//! `lo` only moves up, so every new `best` has a higher quality than the one
//! it replaces; at equal size the higher quality wins. When no midpoint fits,
//! one extra encode at quality 0 reports the smallest achievable size.
//!
//! The search runs synchronously. A [`CancelToken`] is checked before every
//! encode call so a caller on another thread can abandon it between
//! iterations.

use crate::imaging::{BackendError, Quality};
use crate::types::OutputFormat;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// Number of bisection steps when none is configured.
pub const DEFAULT_ITERATIONS: u32 = 7;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("{0} is lossless; compression to a target size is not applicable. Choose JPEG or WebP.")]
    Unsupported(OutputFormat),
    #[error("Target size must be a positive number of bytes")]
    InvalidTarget,
    #[error("Search cancelled")]
    Cancelled,
    #[error("Encoding failed: {0}")]
    Encode(#[from] BackendError),
}

/// Best encoding found within budget.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetHit {
    pub quality: f32,
    pub data: Vec<u8>,
}

impl BudgetHit {
    pub fn bytes(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Result of a completed search.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Found(BudgetHit),
    /// Even quality 0 exceeds the target; `min_bytes` is its size.
    Unreachable { min_bytes: u64 },
}

/// Shared flag to abandon a running search.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
pub struct SizeBudgetSearcher {
    format: OutputFormat,
    iterations: u32,
}

impl SizeBudgetSearcher {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            iterations: DEFAULT_ITERATIONS,
        }
    }

    /// More iterations buy precision at the cost of one encode each. Minimum 1.
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations.max(1);
        self
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Run to completion.
    pub fn run<F>(&self, encode: F, target_bytes: u64) -> Result<SearchOutcome, SearchError>
    where
        F: FnMut(Quality) -> Result<Vec<u8>, BackendError>,
    {
        self.run_cancellable(encode, target_bytes, &CancelToken::new())
    }

    /// Run, giving up with [`SearchError::Cancelled`] once `cancel` is set.
    pub fn run_cancellable<F>(
        &self,
        mut encode: F,
        target_bytes: u64,
        cancel: &CancelToken,
    ) -> Result<SearchOutcome, SearchError>
    where
        F: FnMut(Quality) -> Result<Vec<u8>, BackendError>,
    {
        if self.format.is_lossless() {
            return Err(SearchError::Unsupported(self.format));
        }
        if target_bytes == 0 {
            return Err(SearchError::InvalidTarget);
        }

        let mut lo = 0.0f32;
        let mut hi = 1.0f32;
        let mut best: Option<BudgetHit> = None;

        for step in 0..self.iterations {
            if cancel.is_cancelled() {
                return Err(SearchError::Cancelled);
            }
            let mid = (lo + hi) / 2.0;
            let data = encode(Quality::new(mid))?;
            let size = data.len() as u64;
            log::debug!(
                "budget search step {}/{}: quality {mid:.4} → {size} bytes (target {target_bytes})",
                step + 1,
                self.iterations
            );

            if size > target_bytes {
                hi = mid;
            } else {
                lo = mid;
                best = Some(BudgetHit { quality: mid, data });
            }
        }

        if let Some(hit) = best {
            return Ok(SearchOutcome::Found(hit));
        }

        if cancel.is_cancelled() {
            return Err(SearchError::Cancelled);
        }
        let min_bytes = encode(Quality::MIN)?.len() as u64;
        log::warn!("target of {target_bytes} bytes is unreachable; smallest output is {min_bytes} bytes");
        Ok(SearchOutcome::Unreachable { min_bytes })
    }
}
