//! The merge itself: match every `trans-unit` against a PO catalog and
//! attach a `<target>` where a translation exists.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    converter::synthesize_target,
    error::Error,
    formats::{
        po::Catalog,
        xliff::{SOURCE_TAG, TARGET_TAG},
    },
    options::{ExistingTarget, MergeOptions},
    placeholder::{PlaceholderIndex, derive_key},
    special_cases::SpecialCases,
    types::{Document, Element, Node},
};

/// How a unit's translation was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// The derived key is a `msgid` of the catalog.
    Direct,
    /// The derived key was rewritten through the special-case table.
    SpecialCase,
}

impl MatchKind {
    fn as_str(self) -> &'static str {
        match self {
            MatchKind::Direct => "direct",
            MatchKind::SpecialCase => "special_case",
        }
    }
}

/// Counters describing one merge run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct MergeReport {
    pub units: usize,
    pub translated: usize,
    pub via_special_case: usize,
    pub replaced: usize,
    pub preserved: usize,
    pub untranslated: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub untranslated_keys: Vec<String>,
}

/// Looks up the translation for `key`: directly first, then through the
/// special-case table. Empty `msgstr`s count as untranslated.
pub fn resolve_translation<'c>(
    key: &str,
    catalog: &'c Catalog,
    special_cases: &SpecialCases,
) -> Option<(&'c str, MatchKind)> {
    let found = |k: &str| catalog.get(k).filter(|msgstr| !msgstr.is_empty());

    if let Some(msgstr) = found(key) {
        return Some((msgstr, MatchKind::Direct));
    }
    special_cases
        .resolve(key)
        .and_then(found)
        .map(|msgstr| (msgstr, MatchKind::SpecialCase))
}

/// Adds `<target>` elements to every translatable unit of `document`.
///
/// Units are independent: processing order has no effect on the result.
/// Units without a translation are left exactly as they were.
pub fn merge_document(
    document: &mut Document,
    catalog: &Catalog,
    options: &MergeOptions,
) -> Result<MergeReport, Error> {
    check_languages(document, catalog);

    let mut report = MergeReport::default();
    for unit in document.trans_units_mut()? {
        merge_unit(unit, catalog, options, &mut report)?;
    }

    info!(
        units = report.units,
        translated = report.translated,
        via_special_case = report.via_special_case,
        replaced = report.replaced,
        preserved = report.preserved,
        untranslated = report.untranslated,
        "merge finished"
    );
    Ok(report)
}

fn merge_unit(
    unit: &mut Element,
    catalog: &Catalog,
    options: &MergeOptions,
    report: &mut MergeReport,
) -> Result<(), Error> {
    report.units += 1;
    let unit_id = unit.attribute("id").unwrap_or("<unnamed>").to_string();

    let source = unit.child(SOURCE_TAG).ok_or_else(|| {
        Error::InvalidDocument(format!("trans-unit `{}` has no <source>", unit_id))
    })?;
    let key = derive_key(&source.children)?;

    let Some((translation, kind)) = resolve_translation(&key, catalog, &options.special_cases)
    else {
        debug!(unit = %unit_id, key = %key, "no translation, skipping");
        report.untranslated += 1;
        report.untranslated_keys.push(key);
        return Ok(());
    };

    let has_target = unit.child(TARGET_TAG).is_some();
    if has_target {
        match options.existing {
            ExistingTarget::Skip => {
                debug!(unit = %unit_id, "target already present, keeping it");
                report.preserved += 1;
                return Ok(());
            }
            ExistingTarget::Error => return Err(Error::TargetConflict(unit_id)),
            ExistingTarget::Overwrite => {}
        }
    }

    let index = PlaceholderIndex::build(&source.children)?;
    let target = synthesize_target(translation, &index, source)?;
    debug!(unit = %unit_id, key = %key, lookup = kind.as_str(), "translated");

    if place_target(unit, target) {
        report.replaced += 1;
    }
    report.translated += 1;
    if kind == MatchKind::SpecialCase {
        report.via_special_case += 1;
    }
    Ok(())
}

/// Puts `target` where the first existing `<target>` was, removing any
/// others, or appends it. Returns whether an existing target was replaced.
fn place_target(unit: &mut Element, target: Element) -> bool {
    let positions: Vec<usize> = unit
        .children
        .iter()
        .enumerate()
        .filter(|(_, node)| matches!(node, Node::Element(el) if el.is_named(TARGET_TAG)))
        .map(|(i, _)| i)
        .collect();

    match positions.split_first() {
        None => {
            unit.children.push(Node::Element(target));
            false
        }
        Some((&first, rest)) => {
            for &i in rest.iter().rev() {
                unit.children.remove(i);
            }
            unit.children[first] = Node::Element(target);
            true
        }
    }
}

fn check_languages(document: &Document, catalog: &Catalog) {
    let Some(po_language) = catalog.language() else {
        return;
    };
    for xliff_language in document.target_languages() {
        if !same_language(xliff_language, po_language) {
            warn!(
                xliff = xliff_language,
                po = po_language,
                "target-language of the XLIFF file differs from the PO catalog language"
            );
        }
    }
}

/// `pt-BR`, `pt_BR` and `pt_br` all name the same language.
fn same_language(a: &str, b: &str) -> bool {
    let canon = |s: &str| s.trim().replace('_', "-").to_ascii_lowercase();
    canon(a) == canon(b)
}
