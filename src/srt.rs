//! `SubRip` (`.srt`) reading.
//!
//! A file is a sequence of blocks separated by blank lines:
//!
//! ```text
//! 1
//! 00:00:01,000 --> 00:00:02,500
//! First line
//! optional second line
//! ```
//!
//! The whole structure is checked before any timestamp is normalized, so a
//! file with a broken block is rejected as [`SrtError::MalformedSubtitleFormat`]
//! whatever its timestamps look like.
use compact_str::CompactString;
use log::trace;
use regex::Regex;
use std::{
    fs,
    io::{self, Read},
    num::ParseIntError,
    path::{Path, PathBuf},
    sync::LazyLock,
};
use thiserror::Error;

use crate::{
    cue::{CueError, SubtitleCue},
    time::{self, TimeError},
};

/// Error for `SubRip` reading.
#[derive(Debug, Error)]
pub enum SrtError {
    /// The text is not a sequence of `SubRip` blocks.
    #[error("Malformed subtitle format at line {line}: {reason}")]
    MalformedSubtitleFormat {
        /// Line number, starting at 1
        line: usize,
        /// What was expected
        reason: &'static str,
    },

    /// The cue number does not fit in a `usize`.
    #[error("Cue number out of range at line {line}")]
    CueNumber {
        /// Line number of the cue number
        line: usize,
        /// Source error
        #[source]
        source: ParseIntError,
    },

    /// A timestamp of a timing line could not be read.
    #[error("Invalid timestamp at line {line}")]
    Timestamp {
        /// Line number of the timing line
        line: usize,
        /// Source error
        #[source]
        source: TimeError,
    },

    /// The timestamps were read but do not make a valid cue.
    #[error("Invalid cue number {index} at line {line}")]
    Cue {
        /// Number of the cue, as written in the file
        index: usize,
        /// Line number of the timing line
        line: usize,
        /// Source error
        #[source]
        source: CueError,
    },

    /// We could not read the subtitle file.
    #[error("Could not read '{}'", path.display())]
    Io {
        /// Source error
        source: io::Error,
        /// Path of the file we tried to read
        path: PathBuf,
    },
}

/// A block of a `SubRip` file, with its timestamps still as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrtRecord<'a> {
    /// Number of the cue, as written in the file.
    pub index: usize,
    /// Line number of the timing line.
    pub line: usize,
    /// Start timestamp text.
    pub start: &'a str,
    /// End timestamp text.
    pub end: &'a str,
    /// Text lines, joined by `\n`.
    pub text: CompactString,
}

impl SrtRecord<'_> {
    /// Normalize the timestamps and build the cue.
    ///
    /// # Errors
    /// Will return [`SrtError::Timestamp`] if a timestamp is malformed and
    /// [`SrtError::Cue`] if the cue ends before it starts.
    pub fn to_cue(&self) -> Result<SubtitleCue, SrtError> {
        let line = self.line;
        let mkerr = |source| SrtError::Timestamp { line, source };
        let start = time::normalize(self.start).map_err(mkerr)?;
        let end = time::normalize(self.end).map_err(mkerr)?;
        SubtitleCue::new(start, end, self.text.clone()).map_err(|source| SrtError::Cue {
            index: self.index,
            line,
            source,
        })
    }
}

/// Split `SubRip` text in records, checking the structure of every block.
///
/// A leading byte order mark and `\r\n` line endings are accepted. Anything
/// following the end timestamp on a timing line (position hints) is ignored.
///
/// # Errors
/// Will return [`SrtError::MalformedSubtitleFormat`] on the first block that
/// lacks a cue number, a timing line or a text line, and [`SrtError::CueNumber`]
/// if a cue number is too large.
#[profiling::function]
pub fn records(input: &str) -> Result<Vec<SrtRecord<'_>>, SrtError> {
    static INDEX_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+$").unwrap());
    static TIMING_LINE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^(\S+)\s+-->\s+(\S+)(?:\s.*)?$").unwrap());

    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    let mut lines = input
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim_end()))
        .peekable();
    let mut records = Vec::new();

    // Skip separators, stop at end of input.
    while let Some((index_line, index_text)) = lines.find(|(_, line)| !line.is_empty()) {
        let index_text = index_text.trim_start();
        let malformed = |line, reason| SrtError::MalformedSubtitleFormat { line, reason };

        if !INDEX_LINE.is_match(index_text) {
            return Err(malformed(index_line, "expected a cue number"));
        }
        let index = index_text
            .parse::<usize>()
            .map_err(|source| SrtError::CueNumber {
                line: index_line,
                source,
            })?;

        let (line, timing) = lines
            .next()
            .ok_or_else(|| malformed(index_line + 1, "expected a timing line"))?;
        let Some(caps) = TIMING_LINE.captures(timing.trim_start()) else {
            return Err(malformed(line, "expected 'start --> end'"));
        };
        let (_, [start, end]) = caps.extract();

        let mut text = CompactString::default();
        while let Some((_, text_line)) = lines.next_if(|(_, line)| !line.is_empty()) {
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(text_line);
        }
        if text.is_empty() {
            return Err(malformed(line + 1, "cue has no text"));
        }

        trace!("srt record {index} at line {line}: {start} --> {end}");
        records.push(SrtRecord {
            index,
            line,
            start,
            end,
            text,
        });
    }

    Ok(records)
}

/// Parse `SubRip` text into cues.
///
/// # Errors
/// Return the structural error of [`records`] if any, otherwise the first
/// timestamp or cue error.
pub fn parse(input: &str) -> Result<Vec<SubtitleCue>, SrtError> {
    records(input)?.iter().map(SrtRecord::to_cue).collect()
}

/// Read and parse `SubRip` content, `path` is only used for error reporting.
fn read<R: Read>(mut reader: R, path: &Path) -> Result<Vec<SubtitleCue>, SrtError> {
    let mut content = String::new();
    reader
        .read_to_string(&mut content)
        .map_err(|source| SrtError::Io {
            source,
            path: path.into(),
        })?;
    parse(&content)
}

/// Open and parse a `*.srt` file.
///
/// # Errors
/// Will return [`SrtError::Io`] if the file can't be opened or read, otherwise the errors of [`parse`].
#[profiling::function]
pub fn open<P: AsRef<Path>>(path: P) -> Result<Vec<SubtitleCue>, SrtError> {
    let path = path.as_ref();
    let file = fs::File::open(path).map_err(|source| SrtError::Io {
        source,
        path: path.into(),
    })?;
    read(io::BufReader::new(file), path)
}
