//! The [`GSmoothError`] `enum` definition and error messages.
//!
use crate::Position;
use genomap::GenomeMapError;
use std::num::{ParseFloatError, ParseIntError};
use thiserror::Error;

/// The [`GSmoothError`] defines the standard set of errors that should
/// be passed to the user.
#[derive(Debug, Error)]
pub enum GSmoothError {
    // IO related errors
    #[error("File reading error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("TSV deserialization error: {0}")]
    CsvError(#[from] csv::Error),
    #[cfg(feature = "npy")]
    #[error(".npy writing error: {0}")]
    NpyWriteError(#[from] ndarray_npy::WriteNpyError),

    // File parsing related errors
    #[error("Integer parsing error: {0}")]
    ParseIntError(#[from] ParseIntError),
    #[error("Float parsing error: {0}")]
    ParseFloatError(#[from] ParseFloatError),
    #[error("Genome file is invalid: {0}")]
    InvalidGenomeFile(String),

    // Site track errors
    #[error("Site on sequence '{0}' at position {1} is beyond the sequence length {2}")]
    InvalidSitePosition(String, Position, Position),
    #[error("Site on sequence '{0}' at position {1} is duplicated")]
    DuplicateSitePosition(String, Position),
    #[error("Sequence name '{0}' is not in the series container")]
    MissingSequence(String),
    #[error("Error encountered in genomap::GenomeMap")]
    GenomeMapError(#[from] GenomeMapError),

    // Smoothing argument errors
    #[error("Window size must be positive (got {0})")]
    InvalidWindowSize(usize),
    #[error("Minimum valid fraction must be in (0, 1] (got {0})")]
    InvalidValidFraction(f64),
    #[error("Observation values and validity flags differ in length ({0} != {1})")]
    SeriesLengthMismatch(usize, usize),

    // Command line tool related errors
    #[error("Command line argument error: {0}")]
    ArgumentError(#[from] clap::error::Error),
}
