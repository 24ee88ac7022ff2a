//! Custom error types.

use thiserror::Error;

/// A type representing errors that are specific to `subcanvas`, returned by
/// the [`crate::Player`] operations. Each variant keeps the module error as
/// its source.
///
/// Timestamp and cue errors reach the player wrapped in [`crate::srt::SrtError`],
/// with the line they come from.
#[derive(Debug, Error)]
pub enum OverlayError {
    /// Error with `SubRip` content
    #[error("Subtitle loading failed")]
    Srt(#[from] crate::srt::SrtError),

    /// Error with video or canvas dimensions
    #[error("Can't fit the video in the canvas")]
    Content(#[from] crate::content::ContentError),
}
