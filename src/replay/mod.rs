//! File-backed collaborators that replay previously recorded simulator
//! output: ground truths per split and estimates per trial.

mod error;
mod recorded;
mod table;

pub use error::ReplayError;
pub use recorded::{RecordedSplits, RecordedTrials};
