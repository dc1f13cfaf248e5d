//! MeasurementOracle trait for abstracting glyph metrics.
//!
//! This trait allows the layout engine to measure text without being tied to a
//! particular font backend.

use std::fmt::Debug;
use thiserror::Error;
use verso_types::FontSpec;

/// Error type for font loading operations.
#[derive(Error, Debug, Clone)]
pub enum FontError {
    #[error("Font not found: {0:?}")]
    NotFound(FontSpec),

    #[error("Failed to load font '{path}': {message}")]
    LoadFailed { path: String, message: String },

    #[error("Invalid font data: {0}")]
    InvalidData(String),
}

/// Glyph advances for one measured run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Measurement {
    /// Advance width of every `char` in the run, in points.
    pub advances: Vec<f32>,
    /// Baseline-to-baseline distance for the font at this size, in points.
    pub line_height: f32,
}

impl Measurement {
    /// Total advance width of the run.
    pub fn width(&self) -> f32 {
        self.advances.iter().sum()
    }
}

/// Answers "how wide is this text and how tall is a line of it".
///
/// Implementations must be pure: the same `(text, font, size)` always yields the
/// same measurement, and calls have no side effects visible to the caller.
/// Memoizing internally is fine.
pub trait MeasurementOracle: Send + Sync + Debug {
    fn measure(&self, text: &str, font: &FontSpec, size: f32) -> Measurement;

    /// Total advance of `text`. Override when a cheaper path than per-glyph
    /// advances exists.
    fn width(&self, text: &str, font: &FontSpec, size: f32) -> f32 {
        self.measure(text, font, size).width()
    }

    /// Line height for the font at this size, independent of any text.
    fn line_height(&self, font: &FontSpec, size: f32) -> f32 {
        self.measure("", font, size).line_height
    }
}
