use core::fmt;
use nom::{
    character::complete::{char, digit1},
    combinator::map_res,
    sequence::preceded,
    IResult, Parser as _,
};
use std::ops::Neg;

use crate::parse::{IResultExt as _, NomError};

/// Define a time in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimePoint(i64);

impl TimePoint {
    /// Create a `TimePoint` from miliseconds
    #[must_use]
    pub const fn from_msecs(time: i64) -> Self {
        Self(time)
    }

    /// Create a `TimePoint` from seconds, rounded to the nearest millisecond.
    #[must_use]
    pub fn from_secs(time: f64) -> Self {
        Self((time * 1000.).round() as i64)
    }

    /// Parse a timestamp in `HH:MM:SS,mmm` form.
    ///
    /// Every field must be a non-negative decimal integer. Field widths are
    /// not enforced, so `1:2:3,4` is read as one hour, two minutes, three
    /// seconds and four milliseconds.
    ///
    /// # Errors
    /// Return a [`NomError`] if the text has not exactly three `:` separated
    /// fields with a `,` separated milliseconds part.
    pub fn parse_srt(input: &str) -> Result<Self, NomError> {
        let (hours, mins, secs, msecs) = timestamp(input).to_result_no_rest()?;
        Ok(Self(
            ((i64::from(hours) * 60 + i64::from(mins)) * 60 + i64::from(secs)) * 1000
                + i64::from(msecs),
        ))
    }

    /// Convert to seconds
    #[must_use]
    pub fn to_secs(self) -> f64 {
        self.0 as f64 / 1000.
    }

    /// Number of milliseconds of this `TimePoint`.
    #[must_use]
    pub const fn msecs(self) -> i64 {
        self.0
    }

    const fn secs(self) -> i64 {
        self.0 / 1000
    }

    const fn mins(self) -> i64 {
        self.0 / (60 * 1000)
    }

    const fn hours(self) -> i64 {
        self.0 / (60 * 60 * 1000)
    }
    const fn mins_comp(self) -> i64 {
        self.mins() % 60
    }

    const fn secs_comp(self) -> i64 {
        self.secs() % 60
    }

    const fn msecs_comp(self) -> i64 {
        self.msecs() % 1000
    }

    /// Write the time with the given separator between seconds and milliseconds.
    pub(crate) fn fmt_separator(self, f: &mut fmt::Formatter<'_>, separator: char) -> fmt::Result {
        let t = if self.0 < 0 { -self } else { self };
        write!(
            f,
            "{}{:02}:{:02}:{:02}{separator}{:03}",
            if self.0 < 0 { "-" } else { "" },
            t.hours(),
            t.mins_comp(),
            t.secs_comp(),
            t.msecs_comp()
        )
    }
}

impl Neg for TimePoint {
    type Output = Self;
    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl fmt::Display for TimePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_separator(f, ',')
    }
}

/// Parse one unsigned decimal field.
fn field(input: &str) -> IResult<&str, u32> {
    map_res(digit1, str::parse::<u32>).parse(input)
}

/// Parse `HH:MM:SS,mmm` into its four fields.
fn timestamp(input: &str) -> IResult<&str, (u32, u32, u32, u32)> {
    (
        field,
        preceded(char(':'), field),
        preceded(char(':'), field),
        preceded(char(','), field),
    )
        .parse(input)
}
