use crate::targets::LibraryType;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors of which majority are related to I/O issues, incorrect file formats or configuration
pub enum Error {
    #[error("Could not read or write file")]
    /// Underlying I/O failure
    Io(#[from] std::io::Error),
    #[error("Could not open compressed stream")]
    /// Opening a (de)compressing reader or writer failed
    Compression(#[from] niffler::Error),
    #[error("Could not serialize read identifiers")]
    /// Writing the outcome sets failed
    Json(#[from] serde_json::Error),
    #[error("Could not walk the input directory")]
    /// Directory traversal error
    Walk(#[from] walkdir::Error),
    #[error("Invalid input file pattern")]
    /// The glob used for input discovery does not parse
    Pattern(#[from] glob::PatternError),
    #[error("Could not spawn threads")]
    /// Create thread pools erorr
    ThreadError,
    #[error("The output directory should not pre-exist: {0}")]
    /// The output directory is already present
    OutputExists(PathBuf),
    #[error("Input files {0} and {1} would both be written to the same output file")]
    /// Two inputs share a base name
    DuplicateOutput(PathBuf, PathBuf),
    #[error("Cannot trim {1} bases from the {0} adapter of length {2}")]
    /// Trim amount is longer than the adapter it is applied to
    TrimTooLong(&'static str, usize, usize),
    #[error("No junction motif could be built for {0} libraries")]
    /// Empty primer list or a motif masked away entirely
    NoTargets(LibraryType),
    #[error("Library type must be one of Native or PCR but got {0}")]
    /// Unknown library preparation
    InvalidLibraryType(String),
    #[error("Could not read FASTQ entry {0}: {1}")]
    /// Malformed FASTQ record, numbered from one
    FastqRecord(usize, String),
    #[error("Approximate matching failed with status {0}")]
    /// The alignment engine reported a failure
    Alignment(i32),
    #[error("Failed to process {0}")]
    /// Any failure while processing a single input file
    File(PathBuf, #[source] Box<Error>),
}
