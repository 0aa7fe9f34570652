//! Errors and result aliases shared by every parsing step.

use crate::low_level::Unique;
use crate::parser::Name;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The coarse classes of failure a caller may want to branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnrecognizedToken,
    InvalidValue,
    ResourceUnavailable,
}

/// A failure encountered while consuming an argument vector. Parsing stops at the first one.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Unrecognised token: {0}")]
    UnrecognizedToken(String),
    #[error("Expected argument following {0}")]
    MissingValue(Name),
    #[error("Unexpected value '{value}' given to flag {name}")]
    UnexpectedValue { name: Name, value: String },
    #[error("{0}")]
    InvalidValue(String),
    #[error("Unable to load input file: '{}'", path.display())]
    ResourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{0}")]
    Runtime(String),
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnrecognizedToken(_) => ErrorKind::UnrecognizedToken,
            Self::ResourceUnavailable { .. } => ErrorKind::ResourceUnavailable,
            Self::MissingValue(_)
            | Self::UnexpectedValue { .. }
            | Self::InvalidValue(_)
            | Self::Runtime(_) => ErrorKind::InvalidValue,
        }
    }

    pub(crate) fn unconvertible(value: &str) -> Self {
        Self::InvalidValue(format!(
            "Unable to convert '{}' to destination type",
            value
        ))
    }
}

/// A mistake in how a parser was put together, as opposed to a problem with the arguments.
#[derive(Debug, Error)]
pub enum SpecError {
    #[error("Name used multiple times: {0}")]
    NameUsedMultipleTimes(Name),
    #[error("At most one {0} may be registered")]
    RepeatedUnique(Unique),
    #[error("Option has no names")]
    OptWithNoNames,
}

pub type ParseResult<T> = Result<T, ParseError>;

/// What a binder returns. Binders have no classification of their own.
pub type BindResult = ParseResult<()>;

/// How a complete parse pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseOutcome {
    /// Every token was consumed and matched.
    Matched,
    /// The help flag was seen. Tokens after it were not looked at.
    HelpRequested,
}

pub fn ok() -> BindResult {
    Ok(())
}

pub fn runtime_error<T, S: Into<String>>(message: S) -> ParseResult<T> {
    Err(ParseError::Runtime(message.into()))
}
