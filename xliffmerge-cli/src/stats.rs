use serde_json::json;
use xliffmerge::MergeReport;

/// Build the JSON summary of one merge run.
pub fn stats_json(report: &MergeReport) -> serde_json::Value {
    let percent = if report.units == 0 {
        100.0
    } else {
        (report.translated as f64) * 100.0 / (report.units as f64)
    };
    json!({
        "summary": {
            "units": report.units,
            "translated": report.translated,
            "untranslated": report.untranslated,
            "completion_percent": percent,
        },
        "report": report,
    })
}

/// Print the merge statistics on stderr; stdout is reserved for the document.
pub fn print_stats(report: &MergeReport) -> Result<(), String> {
    let rendered = serde_json::to_string_pretty(&stats_json(report)).map_err(|e| e.to_string())?;
    eprintln!("{}", rendered);
    Ok(())
}
