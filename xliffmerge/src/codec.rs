//! One-call entry points running the whole pipeline:
//! read XLIFF, read PO, merge, render.

use std::path::Path;

use tracing::debug;

use crate::{
    error::Error,
    formats::po::Catalog,
    operations::{MergeReport, merge_document},
    options::MergeOptions,
    traits::{Parser, Serializer},
    types::Document,
};

/// Reads both files, merges, and returns the rendered document with its report.
///
/// The document is rendered completely before returning, so a failure at any
/// stage yields no output at all.
///
/// ```rust,no_run
/// use xliffmerge::{MergeOptions, merge_files};
/// let (xml, report) = merge_files("messages.fr.xlf", "fr.po", &MergeOptions::new())?;
/// print!("{}", xml);
/// eprintln!("{} of {} units translated", report.translated, report.units);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn merge_files<P: AsRef<Path>, Q: AsRef<Path>>(
    xliff_path: P,
    po_path: Q,
    options: &MergeOptions,
) -> Result<(String, MergeReport), Error> {
    let xliff_path = xliff_path.as_ref();
    let po_path = po_path.as_ref();

    debug!(path = %xliff_path.display(), "reading XLIFF document");
    let mut document = Document::read_from(xliff_path)?;
    debug!(path = %po_path.display(), "reading PO catalog");
    let catalog = Catalog::read_from(po_path)?;
    debug!(messages = catalog.len(), "catalog loaded");

    render(&mut document, &catalog, options)
}

/// In-memory variant of [`merge_files`].
pub fn merge_str(
    xliff: &str,
    po: &str,
    options: &MergeOptions,
) -> Result<(String, MergeReport), Error> {
    let mut document = Document::from_str(xliff)?;
    let catalog = Catalog::from_str(po)?;
    render(&mut document, &catalog, options)
}

fn render(
    document: &mut Document,
    catalog: &Catalog,
    options: &MergeOptions,
) -> Result<(String, MergeReport), Error> {
    let report = merge_document(document, catalog, options)?;
    Ok((document.to_string_pretty()?, report))
}
