//! Subtitle cues and the index answering "what is shown at time `t`".
mod index;

pub use index::{CueIndex, Matches};

use compact_str::CompactString;
use std::fmt;
use thiserror::Error;

use crate::time::TimePoint;

/// Error for cue construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CueError {
    /// The cue ends before it starts, or one of its bounds is not a finite time.
    #[error("Invalid cue span {start} --> {end}")]
    InvertedCue {
        /// Start time in seconds
        start: f64,
        /// End time in seconds
        end: f64,
    },
}

/// A subtitle line with the time span it is displayed for.
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleCue {
    start: f64,
    end: f64,
    text: CompactString,
}

impl SubtitleCue {
    /// Create a cue displayed from `start` to `end` (both in seconds, both included).
    ///
    /// # Errors
    /// Will return [`CueError::InvertedCue`] if `start > end` or if a bound is not finite.
    pub fn new(start: f64, end: f64, text: impl Into<CompactString>) -> Result<Self, CueError> {
        if start.is_finite() && end.is_finite() && start <= end {
            Ok(Self {
                start,
                end,
                text: text.into(),
            })
        } else {
            Err(CueError::InvertedCue { start, end })
        }
    }

    /// Start time of the cue, in seconds.
    #[must_use]
    pub const fn start(&self) -> f64 {
        self.start
    }

    /// End time of the cue, in seconds.
    #[must_use]
    pub const fn end(&self) -> f64 {
        self.end
    }

    /// Text of the cue. Lines are separated by `\n`.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Is the cue displayed at `time` ?
    #[must_use]
    pub fn contains(&self, time: f64) -> bool {
        self.start <= time && time <= self.end
    }
}

impl fmt::Display for SubtitleCue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let start = TimePoint::from_secs(self.start);
        let end = TimePoint::from_secs(self.end);
        write!(f, "{start} --> {end} {:?}", self.text)
    }
}
