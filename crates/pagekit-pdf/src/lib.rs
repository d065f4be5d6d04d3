//! Page-level PDF edits on top of lopdf
//!
//! Every operation takes document bytes and returns new bytes. Page
//! selections come in already resolved by `pagekit-core`, so the functions
//! here only deal with the page tree:
//! - `split_segments` / `extract_pages`: one output per range clause
//! - `reorder_document`: rebuild the page tree in a new order
//! - `rotate_document` / `rotate_pages`: compose and store `/Rotate`
//! - `embed_highlights`: write `/Highlight` annotations
//! - `merge_documents`, `strip_metadata`, `compress_document`
//! - `unlock_document`: remove password protection

mod document;
pub mod annotate;
pub mod error;
pub mod info;
pub mod merge;
pub mod metadata;
pub mod reorder;
pub mod rotate;
pub mod security;
pub mod split;

pub use annotate::embed_highlights;
pub use error::PdfError;
pub use info::{inspect, DocumentInfo, PageBox};
pub use merge::merge_documents;
pub use metadata::{compress_document, strip_metadata};
pub use reorder::reorder_document;
pub use rotate::{rotate_document, rotate_pages};
pub use security::unlock_document;
pub use split::{extract_pages, split_segments, SplitPart};

/// Parse PDF bytes and return page count
pub fn get_page_count(bytes: &[u8]) -> Result<u32, PdfError> {
    let doc = document::load(bytes)?;
    Ok(doc.get_pages().len() as u32)
}
