#![warn(missing_debug_implementations, rust_2018_idioms, missing_docs)]

//! Splits informatically concatenated reads. Such reads carry two adapter flanked inserts back to
//! back, `>>=====<<>>=====<<`, and are cut at the `<<>>` junction into two reads named
//! `<read id>_1` and `<read id>_2`.
//!
//! The junction is found by approximate matching of a masked tail-adapter/head-adapter motif
//! against everything but the outer 200 bases of a read.

pub mod error;
pub mod locations;
pub mod matcher;
pub mod outcome;
pub mod process;
pub mod report;
pub mod run;
pub mod split;
pub mod targets;

pub use crate::error::Error;
pub use crate::matcher::{find_junction, ApproximateMatcher, Edlib, MatchResult};
pub use crate::outcome::Outcomes;
pub use crate::run::{run, run_with, RunConfig};
pub use crate::split::Decision;
pub use crate::targets::{LibraryType, TargetConfig};

/// Result with the crate error
pub type Result<T> = std::result::Result<T, crate::error::Error>;
