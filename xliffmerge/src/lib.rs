#![forbid(unsafe_code)]
//! Merge gettext PO translations into XLIFF 1.2 documents.
//!
//! Every `trans-unit` gets a lookup key derived from its `source`, with
//! inline `<x>` placeholders written as positional `{id}` tokens. The key is
//! looked up in the PO catalog (falling back to a small special-case table),
//! and the translation is turned back into a `<target>` where each token is
//! again the placeholder element it stands for.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use xliffmerge::{MergeOptions, merge_files};
//!
//! let (xml, report) = merge_files("xliff/fr.xlf", "locale/fr.po", &MergeOptions::new())?;
//! print!("{}", xml);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod codec;
pub mod converter;
pub mod error;
pub mod formats;
pub mod operations;
pub mod options;
pub mod placeholder;
pub mod special_cases;
pub mod traits;
pub mod types;

// Re-export most used types for easy consumption
pub use crate::{
    codec::{merge_files, merge_str},
    error::Error,
    formats::{FormatType, po::Catalog},
    operations::{MatchKind, MergeReport, merge_document, resolve_translation},
    options::{ExistingTarget, MergeOptions},
    special_cases::SpecialCases,
    types::{Document, Element, Node},
};
