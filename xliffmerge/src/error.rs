//! All error types for the xliffmerge crate.
//!
//! Every stage of the merge is fatal on failure: these are returned from
//! parsing, key derivation, target synthesis and serialization alike.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("PO parse error at line {line}: {message}")]
    PoParse { line: usize, message: String },

    #[error("invalid document: {0}")]
    InvalidDocument(String),

    #[error("Unrecognized node in source: {0}")]
    UnrecognizedNode(String),

    #[error("X with no attributes? {0}")]
    MissingAttributes(String),

    #[error(
        "Could not find placeholder `{key}` in source {node}; known keys: [{}]",
        .known.join(", ")
    )]
    UnresolvedPlaceholder {
        key: String,
        node: String,
        known: Vec<String>,
    },

    #[error("trans-unit `{0}` already has a target")]
    TargetConflict(String),

    #[error("invalid data: {0}")]
    DataMismatch(String),
}

impl Error {
    /// Creates a PO parse error for the given 1-based line.
    pub fn po_parse(line: usize, message: impl Into<String>) -> Self {
        Error::PoParse {
            line,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = Error::Io(io_error);
        assert!(error.to_string().contains("I/O error"));
    }

    #[test]
    fn test_po_parse_error_names_line() {
        let error = Error::po_parse(12, "unterminated string");
        assert_eq!(
            error.to_string(),
            "PO parse error at line 12: unterminated string"
        );
    }

    #[test]
    fn test_unrecognized_node_message() {
        let error = Error::UnrecognizedNode("<g id=\"1\"/>".to_string());
        assert!(error.to_string().starts_with("Unrecognized node in source"));
    }

    #[test]
    fn test_missing_attributes_message() {
        let error = Error::MissingAttributes("<x/>".to_string());
        assert!(error.to_string().contains("X with no attributes?"));
    }

    #[test]
    fn test_unresolved_placeholder_lists_known_keys() {
        let error = Error::UnresolvedPlaceholder {
            key: "99".to_string(),
            node: "<source>Hi <x id=\"0\"/></source>".to_string(),
            known: vec!["0".to_string(), "name".to_string()],
        };
        let message = error.to_string();
        assert!(message.contains("`99`"));
        assert!(message.contains("<source>Hi <x id=\"0\"/></source>"));
        assert!(message.contains("[0, name]"));
    }

    #[test]
    fn test_target_conflict_message() {
        let error = Error::TargetConflict("greeting".to_string());
        assert_eq!(
            error.to_string(),
            "trans-unit `greeting` already has a target"
        );
    }

    #[test]
    fn test_error_debug() {
        let error = Error::InvalidDocument("no <body>".to_string());
        let debug = format!("{:?}", error);
        assert!(debug.contains("InvalidDocument"));
        assert!(debug.contains("no <body>"));
    }
}
