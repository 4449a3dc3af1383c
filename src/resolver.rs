//! Dimension resolution under coupled width / height / percentage edits.
//!
//! A resize form has three fields that depend on each other: width, height
//! and a scale percentage, plus an aspect-ratio lock. [`DimensionResolver`]
//! keeps them consistent as an explicit state machine: every setter names the
//! field the user touched, derives the others from it, and records it as the
//! last-edited field. Nothing is ever re-derived from a field that was not the
//! trigger of the current update, so edits cannot feed back into each other.
//!
//! ```text
//! set_width(w)        height ← w / aspect  (if locked)    percentage ← w / orig.w
//! set_height(h)       width  ← h * aspect  (if locked)    percentage ← w / orig.w
//! set_percentage(p)   width  ← orig.w * p  height ← orig.h * p
//! ```
//!
//! Invalid input (NaN, zero, negative, or an edit that does not belong to
//! the current [`ResizeMode`]) is ignored and the previous state is kept.
//! This mirrors a form where a field is briefly empty while the user types.

use crate::imaging::calculations::{
    clamp_percentage, height_for_width, parse_dimension, percentage_of, scale_dimensions,
    width_for_height,
};
use crate::types::{OriginalImage, ResizeIntent, ResizeMode};

/// Which field drove the most recent derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Width,
    Height,
    Percentage,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DimensionResolver {
    original: (u32, u32),
    aspect_ratio: f64,
    width: u32,
    height: u32,
    percentage: f64,
    resize_mode: ResizeMode,
    maintain_aspect_ratio: bool,
    last_edited: Option<Field>,
}

impl DimensionResolver {
    /// Start at the original size, 100%, pixels mode, aspect locked.
    pub fn new(original: &OriginalImage) -> Self {
        Self {
            original: (original.width, original.height),
            aspect_ratio: original.aspect_ratio(),
            width: original.width,
            height: original.height,
            percentage: 100.0,
            resize_mode: ResizeMode::Pixels,
            maintain_aspect_ratio: true,
            last_edited: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn percentage(&self) -> f64 {
        self.percentage
    }

    pub fn resize_mode(&self) -> ResizeMode {
        self.resize_mode
    }

    pub fn maintain_aspect_ratio(&self) -> bool {
        self.maintain_aspect_ratio
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    pub fn last_edited(&self) -> Option<Field> {
        self.last_edited
    }

    /// Current state as a serializable form snapshot.
    pub fn intent(&self) -> ResizeIntent {
        ResizeIntent {
            resize_mode: self.resize_mode,
            width: self.width,
            height: self.height,
            percentage: self.percentage,
            maintain_aspect_ratio: self.maintain_aspect_ratio,
        }
    }

    /// Edit the width field. Returns `false` if the edit was ignored.
    pub fn set_width(&mut self, value: f64) -> bool {
        let Some(width) = self.accept_pixels(Field::Width, value) else {
            return false;
        };
        self.width = width;
        if self.maintain_aspect_ratio {
            self.height = height_for_width(width, self.aspect_ratio);
        }
        self.percentage = percentage_of(self.width, self.original.0);
        self.last_edited = Some(Field::Width);
        true
    }

    /// Edit the height field. Returns `false` if the edit was ignored.
    pub fn set_height(&mut self, value: f64) -> bool {
        let Some(height) = self.accept_pixels(Field::Height, value) else {
            return false;
        };
        self.height = height;
        if self.maintain_aspect_ratio {
            self.width = width_for_height(height, self.aspect_ratio);
        }
        self.percentage = percentage_of(self.width, self.original.0);
        self.last_edited = Some(Field::Height);
        true
    }

    /// Edit the scale field. Clamped to `[1, 500]`. Returns `false` if ignored.
    pub fn set_percentage(&mut self, value: f64) -> bool {
        if self.resize_mode != ResizeMode::Percentage {
            log::debug!("ignoring percentage edit in pixels mode");
            return false;
        }
        if !value.is_finite() || value <= 0.0 {
            log::debug!("ignoring invalid percentage {value}");
            return false;
        }
        let percentage = clamp_percentage(value);
        let (width, height) = scale_dimensions(self.original, percentage);
        self.percentage = percentage;
        self.width = width;
        self.height = height;
        self.last_edited = Some(Field::Percentage);
        true
    }

    /// Flip the aspect lock. Current values are left untouched; the lock
    /// applies from the next width or height edit.
    pub fn toggle_aspect_lock(&mut self, locked: bool) {
        self.maintain_aspect_ratio = locked;
    }

    /// Switch between pixel and percentage editing.
    ///
    /// Width and height carry over as displayed. Entering percentage mode
    /// recomputes the percentage from the current width.
    pub fn switch_resize_mode(&mut self, mode: ResizeMode) {
        if mode == ResizeMode::Percentage {
            self.percentage = percentage_of(self.width, self.original.0);
        }
        self.resize_mode = mode;
    }

    /// Re-seed from a newly loaded original.
    pub fn reset(&mut self, original: &OriginalImage) {
        let locked = self.maintain_aspect_ratio;
        let mode = self.resize_mode;
        *self = Self::new(original);
        self.maintain_aspect_ratio = locked;
        self.resize_mode = mode;
    }

    fn accept_pixels(&self, field: Field, value: f64) -> Option<u32> {
        if self.resize_mode != ResizeMode::Pixels {
            log::debug!("ignoring {field:?} edit in percentage mode");
            return None;
        }
        let parsed = parse_dimension(value);
        if parsed.is_none() {
            log::debug!("ignoring invalid {field:?} value {value}");
        }
        parsed
    }
}
