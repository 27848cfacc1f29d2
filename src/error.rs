use thiserror::Error;

use crate::{epoch::ParsingError as EpochParsingError, version::Version};

/// Errors that may rise when reading a file
#[derive(Error, Debug)]
pub enum Error {
    #[error("i/o error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("parsing error: {0}")]
    ParsingError(#[from] ParsingError),
    #[error("table error: {0}")]
    TableError(#[from] TableError),
    /// Read was interrupted by a [crate::reader::CancellationToken]
    #[error("cancelled")]
    Cancelled,
}

/// Errors that may rise in Parsing process
#[derive(Error, Debug)]
pub enum ParsingError {
    /// No header delimiter, or an observable continuation
    /// line that does not continue anything.
    #[error("malformed header")]
    MalformedHeader,
    #[error("invalid RINEX VERSION / TYPE")]
    VersionParsing,
    #[error("not an observation RINEX (type '{0}')")]
    NotObservationRinex(char),
    #[error("non supported revision {0}")]
    UnsupportedVersion(Version),
    #[error("no observables declared in header")]
    NoObservables,
    #[error("invalid number of observables \"{0}\"")]
    ObservableCount(String),
    /// No EPOCH/SAT record found in the block starting at given line
    #[error("malformed epoch block (line {0})")]
    EpochBlockMalformed(usize),
    #[error("epoch parsing error: {0}")]
    EpochParsing(#[from] EpochParsingError),
}

/// Errors related to table indexing
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableError {
    #[error("unknown column \"{0}\"")]
    UnknownColumn(String),
    #[error("index requires at least one column")]
    EmptyIndex,
    /// Key is not unique, first duplicate is described
    #[error("ambiguous index: duplicate key {0}")]
    ReindexAmbiguity(String),
}
