//! Subtitle timestamps and their conversion to the playback timeline.
//!
//! Media sources report playback time in seconds as `f64`, so every
//! timestamp read from a subtitle file is normalized to that unit before it
//! reaches the cue index.
mod time_point;

pub use time_point::TimePoint;

use thiserror::Error;

use crate::parse::NomError;

/// Error for timestamp handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeError {
    /// The text is not a `HH:MM:SS,mmm` timestamp.
    #[error("Malformed timestamp '{value}'")]
    MalformedTimestamp {
        /// The rejected text
        value: String,
        /// Parser error
        #[source]
        source: NomError,
    },
}

/// Normalize a `HH:MM:SS,mmm` timestamp to seconds.
///
/// The result is `HH*3600 + MM*60 + SS + mmm/1000`, computed on whole
/// milliseconds so equal inputs give bit-identical outputs.
///
/// # Errors
///
/// Will return [`TimeError::MalformedTimestamp`] if the text does not split
/// into three `:` separated fields, if the last one does not split into two
/// `,` separated parts, or if any part is not a non-negative integer.
pub fn normalize(value: &str) -> Result<f64, TimeError> {
    TimePoint::parse_srt(value)
        .map(TimePoint::to_secs)
        .map_err(|source| TimeError::MalformedTimestamp {
            value: value.to_owned(),
            source,
        })
}
