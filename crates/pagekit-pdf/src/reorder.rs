//! Rewrite page order

use crate::document;
use crate::error::PdfError;
use pagekit_core::{RangeError, ResolveMode, ResolvedPageSet};

/// Rebuild the page tree so pages appear in `resolved` order.
///
/// `resolved` must come from [`ResolveMode::Reorder`], which guarantees every
/// page appears exactly once; the page count is re-checked against the
/// loaded document.
pub fn reorder_document(bytes: &[u8], resolved: &ResolvedPageSet) -> Result<Vec<u8>, PdfError> {
    if resolved.mode() != ResolveMode::Reorder {
        return Err(PdfError::Operation(format!(
            "reorder needs a reorder page set, got {:?}",
            resolved.mode()
        )));
    }

    let mut doc = document::load_editable(bytes)?;
    let source = document::page_ids(&doc);
    if source.len() != resolved.page_count() as usize {
        return Err(RangeError::NotAPermutation {
            page_count: source.len() as u32,
            len: resolved.len(),
            duplicate: None,
            missing: None,
        }
        .into());
    }

    let ordered: Vec<_> = resolved
        .iter()
        .map(|page| source[(page - 1) as usize])
        .collect();

    document::rebuild_page_tree(&mut doc, &ordered)?;
    doc.prune_objects();

    tracing::info!(pages = ordered.len(), "reordered document");
    document::save(&mut doc)
}
