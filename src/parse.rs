//! Glue between `nom` text parsers and the crate error types.

use nom::{error::Error as NomContext, IResult};
use thiserror::Error;

/// Error from a `nom` text parser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NomError {
    /// Parsing stopped before the end of the input.
    #[error("unexpected trailing input '{rest}'")]
    UnexpectedInput {
        /// The part of the input that was not consumed.
        rest: String,
    },

    /// The parser rejected the input.
    #[error("parsing failed at '{input}' ({kind:?})")]
    Rejected {
        /// Input remaining where the parser gave up.
        input: String,
        /// Which combinator gave up.
        kind: nom::error::ErrorKind,
    },

    /// The input ended before the parser was satisfied.
    #[error("input ended too soon")]
    Incomplete,
}

impl From<NomContext<&str>> for NomError {
    fn from(err: NomContext<&str>) -> Self {
        Self::Rejected {
            input: err.input.to_owned(),
            kind: err.code,
        }
    }
}

/// Extend `IResult` on text input to convert it to a [`Result`] with [`NomError`].
pub trait IResultExt<O> {
    /// Check that the whole input was consumed and return the parsed value.
    ///
    /// # Errors
    /// Forward `Error` and `Failure` from nom, and return `UnexpectedInput`
    /// if some input is left after parsing.
    fn to_result_no_rest(self) -> Result<O, NomError>;
}

impl<O> IResultExt<O> for IResult<&str, O> {
    fn to_result_no_rest(self) -> Result<O, NomError> {
        match self {
            Ok(("", val)) => Ok(val),
            Ok((rest, _)) => Err(NomError::UnexpectedInput {
                rest: rest.to_owned(),
            }),
            Err(nom::Err::Incomplete(_)) => Err(NomError::Incomplete),
            Err(nom::Err::Error(err) | nom::Err::Failure(err)) => Err(err.into()),
        }
    }
}
