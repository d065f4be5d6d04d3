//! Document and page information
//!
//! Page count and per-page geometry are everything the page-selection core
//! needs to know about a document.

use crate::document::{self, inherited, number};
use crate::error::PdfError;
use lopdf::{Document, Object, ObjectId};
use pagekit_core::{PageGeometry, Rotation};
use serde::Serialize;

/// Size used when neither the page nor its ancestors declare a MediaBox
const US_LETTER: [f64; 4] = [0.0, 0.0, 612.0, 792.0];

/// Geometry of one page, plus the MediaBox origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageBox {
    /// 1-indexed
    pub page_number: u32,
    pub geometry: PageGeometry,
    /// Lower-left corner of the MediaBox; usually (0, 0)
    pub origin_x: f64,
    pub origin_y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentInfo {
    pub page_count: u32,
    /// PDF version string (e.g., "1.7")
    pub version: String,
    pub encrypted: bool,
    pub title: Option<String>,
    pub author: Option<String>,
    pub pages: Vec<PageBox>,
}

impl DocumentInfo {
    /// Page geometries in document order, indexed by 0-based page index
    pub fn geometries(&self) -> Vec<PageGeometry> {
        self.pages.iter().map(|p| p.geometry).collect()
    }

    /// Stored rotation of a 1-based page
    pub fn rotation_of(&self, page_number: u32) -> Rotation {
        page_number
            .checked_sub(1)
            .and_then(|i| self.pages.get(i as usize))
            .map(|p| p.geometry.rotation)
            .unwrap_or_default()
    }
}

/// Read page count, metadata and page geometry from PDF bytes
pub fn inspect(bytes: &[u8]) -> Result<DocumentInfo, PdfError> {
    let doc = document::load(bytes)?;
    let info = inspect_document(&doc);
    tracing::debug!(
        page_count = info.page_count,
        encrypted = info.encrypted,
        "inspected document"
    );
    Ok(info)
}

pub(crate) fn inspect_document(doc: &Document) -> DocumentInfo {
    let pages: Vec<PageBox> = doc
        .get_pages()
        .into_iter()
        .map(|(page_number, page_id)| page_box(doc, page_number, page_id))
        .collect();
    let (title, author) = extract_metadata(doc);

    DocumentInfo {
        page_count: pages.len() as u32,
        version: doc.version.clone(),
        encrypted: doc.is_encrypted(),
        title,
        author,
        pages,
    }
}

pub(crate) fn page_box(doc: &Document, page_number: u32, page_id: ObjectId) -> PageBox {
    let [x1, y1, x2, y2] = media_box(doc, page_id);
    let rotation = rotation(doc, page_id);
    PageBox {
        page_number,
        geometry: PageGeometry::new((x2 - x1).abs(), (y2 - y1).abs(), rotation),
        origin_x: x1.min(x2),
        origin_y: y1.min(y2),
    }
}

fn media_box(doc: &Document, page_id: ObjectId) -> [f64; 4] {
    inherited(doc, page_id, b"MediaBox")
        .and_then(|obj| obj.as_array().ok())
        .and_then(|array| parse_box_array(doc, array))
        .unwrap_or(US_LETTER)
}

/// Parse a box array [x1, y1, x2, y2]
fn parse_box_array(doc: &Document, array: &[Object]) -> Option<[f64; 4]> {
    if array.len() != 4 {
        return None;
    }
    let mut result = [0.0; 4];
    for (slot, obj) in result.iter_mut().zip(array) {
        *slot = number(document::resolve(doc, obj))?;
    }
    Some(result)
}

/// Stored `/Rotate`, inherited and normalized. Values that are not a
/// multiple of 90 are ignored, as viewers do.
fn rotation(doc: &Document, page_id: ObjectId) -> Rotation {
    let Some(value) = inherited(doc, page_id, b"Rotate").and_then(number) else {
        return Rotation::Deg0;
    };
    // Some writers store /Rotate as a real; only whole degrees are usable
    if value.fract() != 0.0 || !value.is_finite() {
        tracing::warn!(?page_id, value, "ignoring fractional /Rotate");
        return Rotation::Deg0;
    }
    let degrees = value as i64;
    Rotation::from_degrees(degrees).unwrap_or_else(|_| {
        tracing::warn!(?page_id, degrees, "ignoring non-right-angle /Rotate");
        Rotation::Deg0
    })
}

/// Extract title and author from the document Info dictionary
fn extract_metadata(doc: &Document) -> (Option<String>, Option<String>) {
    let Some(info) = doc
        .trailer
        .get(b"Info")
        .ok()
        .map(|obj| document::resolve(doc, obj))
        .and_then(|obj| obj.as_dict().ok())
    else {
        return (None, None);
    };

    let text = |key: &[u8]| {
        info.get(key)
            .ok()
            .and_then(|obj| obj.as_str().ok())
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
            .filter(|s| !s.is_empty())
    };
    (text(b"Title"), text(b"Author"))
}
