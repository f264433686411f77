use tracing::debug;
use xliffmerge::{ExistingTarget, MergeOptions, SpecialCases, merge_files};

use crate::{config::load_special_cases, stats::print_stats, validation::validate_inputs};

/// Strategy for units that already carry a `<target>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExistingStrategy {
    /// Replace the existing target when a translation is found (default)
    Overwrite,
    /// Leave units with a target untouched
    Skip,
    /// Abort when a translated unit already has a target
    Error,
}

impl From<ExistingStrategy> for ExistingTarget {
    fn from(strategy: ExistingStrategy) -> Self {
        match strategy {
            ExistingStrategy::Overwrite => ExistingTarget::Overwrite,
            ExistingStrategy::Skip => ExistingTarget::Skip,
            ExistingStrategy::Error => ExistingTarget::Error,
        }
    }
}

/// Everything one invocation needs.
#[derive(Debug, Clone)]
pub struct MergeCommand {
    pub xliff: String,
    pub po: String,
    pub special_cases: Option<String>,
    pub no_special_cases: bool,
    pub existing: ExistingStrategy,
    pub stats: bool,
}

impl MergeCommand {
    fn options(&self) -> Result<MergeOptions, String> {
        let special_cases = match (&self.special_cases, self.no_special_cases) {
            (_, true) => SpecialCases::empty(),
            (Some(path), false) => load_special_cases(path)?,
            (None, false) => SpecialCases::default(),
        };
        debug!(entries = special_cases.len(), "special-case table ready");

        Ok(MergeOptions::new()
            .with_special_cases(special_cases)
            .with_existing(self.existing.into()))
    }
}

/// Run the merge and return the rendered document.
///
/// Nothing is printed on stdout here; the caller decides where the document goes.
pub fn run_merge_command(command: MergeCommand) -> Result<String, String> {
    validate_inputs(&command.xliff, &command.po)?;
    let options = command.options()?;

    let (xml, report) =
        merge_files(&command.xliff, &command.po, &options).map_err(|e| e.to_string())?;

    if command.stats {
        print_stats(&report)?;
    }
    Ok(xml)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn command(dir: &TempDir, existing: ExistingStrategy) -> MergeCommand {
        let xliff = dir.path().join("messages.xlf");
        let po = dir.path().join("fr.po");
        fs::write(
            &xliff,
            r#"<xliff version="1.2"><file target-language="fr"><body>
<trans-unit id="ago"><source><x id="0" equiv-text="${ago}"/> day(s) ago</source><target>old</target></trans-unit>
</body></file></xliff>"#,
        )
        .unwrap();
        fs::write(&po, "msgid \"{ago} day(s) ago\"\nmsgstr \"il y a {ago} jour(s)\"\n").unwrap();

        MergeCommand {
            xliff: xliff.to_string_lossy().into_owned(),
            po: po.to_string_lossy().into_owned(),
            special_cases: None,
            no_special_cases: false,
            existing,
            stats: false,
        }
    }

    #[test]
    fn test_builtin_special_cases_apply() {
        let dir = TempDir::new().unwrap();
        let xml = run_merge_command(command(&dir, ExistingStrategy::Overwrite)).unwrap();
        assert!(
            xml.contains("<target>il y a <x id=\"0\" equiv-text=\"${ago}\"/> jour(s)</target>")
        );
        assert!(!xml.contains(">old<"));
    }

    #[test]
    fn test_no_special_cases_leaves_unit_alone() {
        let dir = TempDir::new().unwrap();
        let mut cmd = command(&dir, ExistingStrategy::Overwrite);
        cmd.no_special_cases = true;
        let xml = run_merge_command(cmd).unwrap();
        assert!(xml.contains("<target>old</target>"));
    }

    #[test]
    fn test_existing_error_strategy() {
        let dir = TempDir::new().unwrap();
        let err = run_merge_command(command(&dir, ExistingStrategy::Error)).unwrap_err();
        assert!(err.contains("already has a target"));
    }

    #[test]
    fn test_existing_skip_strategy() {
        let dir = TempDir::new().unwrap();
        let xml = run_merge_command(command(&dir, ExistingStrategy::Skip)).unwrap();
        assert!(xml.contains("<target>old</target>"));
    }

    #[test]
    fn test_missing_input_is_reported() {
        let dir = TempDir::new().unwrap();
        let mut cmd = command(&dir, ExistingStrategy::Overwrite);
        cmd.po = dir.path().join("missing.po").to_string_lossy().into_owned();
        let err = run_merge_command(cmd).unwrap_err();
        assert!(err.starts_with("File does not exist"));
    }
}
