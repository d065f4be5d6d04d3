//! Split a PDF into one output file per range clause

use crate::document;
use crate::error::PdfError;
use lopdf::Document;
use pagekit_core::{RangeError, ResolvedPageSet};
use serde::Serialize;
use std::collections::HashSet;

/// One output file of a split
#[derive(Debug, Clone, Serialize)]
pub struct SplitPart {
    /// `split_{n}_{first}-{last}.pdf`, n counted from 1
    pub name: String,
    /// Source pages (1-indexed) in the part, in order
    pub pages: Vec<u32>,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

/// Produce one PDF per non-empty segment of `resolved`.
///
/// Segments are independent, so a page may appear in several parts.
pub fn split_segments(
    bytes: &[u8],
    resolved: &ResolvedPageSet,
) -> Result<Vec<SplitPart>, PdfError> {
    let doc = document::load_editable(bytes)?;
    let mut parts = Vec::with_capacity(resolved.segments().len());

    for (i, segment) in resolved.segments().iter().enumerate() {
        let (Some(first), Some(last)) = (segment.first(), segment.last()) else {
            continue;
        };
        let part = extract_from(doc.clone(), &segment.pages)?;
        parts.push(SplitPart {
            name: format!("split_{}_{}-{}.pdf", i + 1, first, last),
            pages: segment.pages.clone(),
            bytes: part,
        });
    }

    tracing::info!(parts = parts.len(), "split document");
    Ok(parts)
}

/// Extract the specified pages (1-indexed) into a new PDF
///
/// Pages not listed are deleted from a copy of the document, then
/// unreferenced objects are pruned. Output keeps document order.
pub fn extract_pages(bytes: &[u8], pages: &[u32]) -> Result<Vec<u8>, PdfError> {
    extract_from(document::load_editable(bytes)?, pages)
}

fn extract_from(mut doc: Document, pages: &[u32]) -> Result<Vec<u8>, PdfError> {
    if pages.is_empty() {
        return Err(RangeError::NoPages { page_count: 0 }.into());
    }

    let page_count = doc.get_pages().len() as u32;

    // Validate all page numbers exist
    for &page in pages {
        if page == 0 || page > page_count {
            return Err(RangeError::PageOutOfBounds {
                clause: page.to_string(),
                page,
                page_count,
            }
            .into());
        }
    }

    let pages_to_keep: HashSet<u32> = pages.iter().copied().collect();
    let pages_to_delete: Vec<u32> = (1..=page_count)
        .filter(|p| !pages_to_keep.contains(p))
        .collect();

    if !pages_to_delete.is_empty() {
        doc.delete_pages(&pages_to_delete);
    }

    doc.prune_objects();
    doc.compress();
    document::save(&mut doc)
}
