//! Group mapped highlight rectangles per page
//!
//! Output is ready for a document-mutation collaborator to embed: one ordered
//! list of rectangles per 0-based page index, in the order the user created
//! them.

use crate::error::GeometryError;
use crate::viewport::{to_pdf, NormalizedRect, PageGeometry, PdfRect};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Smallest highlight extent, in points, worth embedding
pub const DEFAULT_MIN_EXTENT: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssembleOptions {
    /// Rectangles narrower or shorter than this are dropped
    pub min_extent: f64,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            min_extent: DEFAULT_MIN_EXTENT,
        }
    }
}

/// Highlight rectangles keyed by 0-based page index
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnnotationBatch {
    pages: BTreeMap<usize, Vec<PdfRect>>,
    dropped: usize,
}

impl AnnotationBatch {
    /// Rectangles for one page, in submission order
    pub fn page(&self, page_index: usize) -> &[PdfRect] {
        self.pages
            .get(&page_index)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Pages with at least one rectangle, ascending
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[PdfRect])> {
        self.pages
            .iter()
            .map(|(page, rects)| (*page, rects.as_slice()))
    }

    pub fn page_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.pages.keys().copied()
    }

    /// Total rectangles kept
    pub fn len(&self) -> usize {
        self.pages.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Degenerate rectangles skipped during assembly
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

/// Group `(page_index, rect)` pairs into a batch.
///
/// A page index outside `0..page_count` is a caller bug and fails the whole
/// batch. Rectangles below `options.min_extent` in either dimension are
/// dropped with a warning.
pub fn assemble<I>(
    rects: I,
    page_count: usize,
    options: &AssembleOptions,
) -> Result<AnnotationBatch, GeometryError>
where
    I: IntoIterator<Item = (usize, PdfRect)>,
{
    let mut batch = AnnotationBatch::default();

    for (page_index, rect) in rects {
        if page_index >= page_count {
            return Err(GeometryError::PageOutOfRange {
                page_index,
                page_count,
            });
        }

        if rect.width < options.min_extent || rect.height < options.min_extent {
            tracing::warn!(
                page_index,
                width = rect.width,
                height = rect.height,
                min_extent = options.min_extent,
                "dropping degenerate highlight"
            );
            batch.dropped += 1;
            continue;
        }

        batch.pages.entry(page_index).or_default().push(rect);
    }

    tracing::debug!(
        pages = batch.pages.len(),
        rects = batch.len(),
        dropped = batch.dropped,
        "assembled annotation batch"
    );
    Ok(batch)
}

/// Map viewer selections onto their pages and assemble them.
///
/// `pages` holds the geometry of every page in document order, so its
/// length is the document's page count.
pub fn project_highlights(
    rects: &[NormalizedRect],
    pages: &[PageGeometry],
    options: &AssembleOptions,
) -> Result<AnnotationBatch, GeometryError> {
    let mapped = rects
        .iter()
        .map(|rect| {
            let page = pages
                .get(rect.page_index)
                .ok_or(GeometryError::PageOutOfRange {
                    page_index: rect.page_index,
                    page_count: pages.len(),
                })?;
            Ok((rect.page_index, to_pdf(rect, page)?))
        })
        .collect::<Result<Vec<_>, GeometryError>>()?;

    assemble(mapped, pages.len(), options)
}
