//! Loading a special-case table from disk.

use std::{fs, path::Path};

use xliffmerge::SpecialCases;

/// Reads a flat string-to-string map from `path`, as JSON or TOML
/// depending on the extension.
///
/// ```toml
/// "{0} week(s) ago" = "{ago} week(s) ago"
/// ```
pub fn load_special_cases(path: &str) -> Result<SpecialCases, String> {
    let ext = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase();

    let content = fs::read_to_string(path)
        .map_err(|e| format!("Cannot read special cases file {}: {}", path, e))?;

    match ext.as_str() {
        "json" => serde_json::from_str(&content)
            .map_err(|e| format!("Invalid special cases JSON in {}: {}", path, e)),
        "toml" => toml::from_str(&content)
            .map_err(|e| format!("Invalid special cases TOML in {}: {}", path, e)),
        _ => Err(format!(
            "Unsupported file extension for special cases: {}. Expected: json, toml",
            ext
        )),
    }
}
