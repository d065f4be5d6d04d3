//! Page selection and highlight geometry
//!
//! Pure functions behind page-level PDF editing:
//! - `range` / `resolve`: page-range text like `"1-3,5,7-"` shared by split,
//!   reorder and rotate, checked against the real page count
//! - `rotation`: stored page rotation and how requested deltas compose
//! - `viewport` / `assemble`: viewer highlight selections mapped into
//!   PDF page space and grouped per page for embedding
//!
//! Nothing here touches document bytes; loading and saving belong to the
//! `pagekit-pdf` crate.

pub mod assemble;
pub mod error;
pub mod range;
pub mod resolve;
pub mod rotation;
pub mod style;
pub mod viewport;

pub use assemble::{assemble, project_highlights, AnnotationBatch, AssembleOptions};
pub use error::{ErrorKind, GeometryError, PageError, RangeError, SyntaxError, SyntaxReason};
pub use range::{parse, PageRangeSpec, PageRangeToken};
pub use resolve::{resolve, PageSegment, ResolveMode, ResolvedPageSet, MAX_SPLIT_SEGMENTS};
pub use rotation::{Rotation, RotationDelta, RotationPlan};
pub use style::HighlightStyle;
pub use viewport::{to_normalized, to_pdf, NormalizedRect, PageGeometry, PdfRect};

/// Parse page-range text and resolve it against `page_count` in one step
pub fn parse_and_resolve(
    text: &str,
    page_count: u32,
    mode: ResolveMode,
) -> Result<ResolvedPageSet, PageError> {
    let spec = parse(text)?;
    Ok(resolve(&spec, page_count, mode)?)
}
