use std::{fs::File, path::Path};

use tracing::warn;
use xliffmerge::formats::{FormatType, infer_format_from_extension};

/// Validate file path exists and is readable
pub fn validate_file_path(path: &str) -> Result<(), String> {
    let path_obj = Path::new(path);

    if !path_obj.exists() {
        return Err(format!("File does not exist: {}", path));
    }

    if !path_obj.is_file() {
        return Err(format!("Path is not a file: {}", path));
    }

    if let Err(e) = File::open(path_obj) {
        return Err(format!("Cannot read file: {}: {}", path, e));
    }

    Ok(())
}

/// Warn when a file's extension suggests a different format than the one
/// it is passed as. Content decides, so this never fails.
pub fn check_extension(path: &str, expected: FormatType) {
    match infer_format_from_extension(path) {
        Some(found) if found == expected => {}
        Some(found) => warn!(
            path,
            %expected,
            %found,
            "input file extension suggests a different format"
        ),
        None => warn!(path, %expected, "cannot infer format from extension"),
    }
}

/// Validate both merge inputs before anything is parsed.
pub fn validate_inputs(xliff: &str, po: &str) -> Result<(), String> {
    validate_file_path(xliff)?;
    validate_file_path(po)?;
    check_extension(xliff, FormatType::Xliff);
    check_extension(po, FormatType::Po);
    Ok(())
}
