//! CLI library for testing purposes

pub mod config;
pub mod merge;
pub mod stats;
pub mod validation;

pub use merge::{ExistingStrategy, MergeCommand, run_merge_command};
pub use xliffmerge::{MergeOptions, MergeReport};
