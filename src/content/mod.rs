//! Module for canvas geometry utils
mod rect;
mod size;

pub use rect::{fit, Rect, ViewportRect};
pub use size::Size;

use thiserror::Error;

/// Error for content
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContentError {
    /// Indicate a zero, negative or non-finite dimension.
    /// Example: a media source reporting a `0x0` video before any frame is decoded.
    #[error("Invalid dimensions {width}x{height}")]
    InvalidDimensions {
        /// Rejected width
        width: f64,
        /// Rejected height
        height: f64,
    },
}
