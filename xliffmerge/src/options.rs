//! Options controlling a merge run.

use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use crate::{error::Error, special_cases::SpecialCases};

/// What to do with a `trans-unit` that already carries a `<target>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExistingTarget {
    /// Replace the first existing target in place, drop any others.
    #[default]
    Overwrite,
    /// Leave the unit untouched.
    Skip,
    /// Abort the run.
    Error,
}

impl Display for ExistingTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ExistingTarget::Overwrite => write!(f, "overwrite"),
            ExistingTarget::Skip => write!(f, "skip"),
            ExistingTarget::Error => write!(f, "error"),
        }
    }
}

impl FromStr for ExistingTarget {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "overwrite" => Ok(ExistingTarget::Overwrite),
            "skip" => Ok(ExistingTarget::Skip),
            "error" => Ok(ExistingTarget::Error),
            other => Err(Error::DataMismatch(format!(
                "unknown existing-target policy `{}` (expected overwrite, skip or error)",
                other
            ))),
        }
    }
}

/// Configuration passed explicitly into [`crate::operations::merge_document`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MergeOptions {
    /// Fallback table for positional keys extracted with named tokens.
    pub special_cases: SpecialCases,
    /// Policy for units that already have a target.
    pub existing: ExistingTarget,
}

impl MergeOptions {
    /// Creates default options: built-in special cases, overwrite policy.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_special_cases(mut self, special_cases: SpecialCases) -> Self {
        self.special_cases = special_cases;
        self
    }

    pub fn with_existing(mut self, existing: ExistingTarget) -> Self {
        self.existing = existing;
        self
    }
}
