//! The two file formats the merge reads: XLIFF 1.2 and gettext PO.
//!
//! [`FormatType`] names them for generic handling, e.g. sanity-checking
//! file names passed on the command line.

pub mod po;
pub mod xliff;

use std::{
    fmt::{Display, Formatter},
    path::Path,
    str::FromStr,
};

use crate::Error;

/// The supported file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatType {
    /// XLIFF 1.2 (`.xlf`, `.xliff`).
    Xliff,
    /// gettext catalog (`.po`, `.pot`).
    Po,
}

impl Display for FormatType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatType::Xliff => write!(f, "xliff"),
            FormatType::Po => write!(f, "po"),
        }
    }
}

/// Accepts `xliff`, `xlf`, `po` and `pot`, case-insensitively.
impl FromStr for FormatType {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xliff" | "xlf" => Ok(FormatType::Xliff),
            "po" | "pot" => Ok(FormatType::Po),
            other => Err(Error::DataMismatch(format!("unknown format `{}`", other))),
        }
    }
}

impl FormatType {
    /// Returns the typical file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            FormatType::Xliff => "xlf",
            FormatType::Po => "po",
        }
    }
}

/// Infers the format from a path's extension.
///
/// ```rust
/// use xliffmerge::formats::{FormatType, infer_format_from_extension};
/// assert_eq!(infer_format_from_extension("messages.fr.xlf"), Some(FormatType::Xliff));
/// assert_eq!(infer_format_from_extension("locale/fr.po"), Some(FormatType::Po));
/// assert_eq!(infer_format_from_extension("notes.txt"), None);
/// ```
pub fn infer_format_from_extension<P: AsRef<Path>>(path: P) -> Option<FormatType> {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| ext.parse().ok())
}
