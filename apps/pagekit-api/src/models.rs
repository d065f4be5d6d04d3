//! Request and response bodies for the pagekit API
//!
//! Documents travel as standard base64 strings.

use pagekit_core::NormalizedRect;
use serde::{Deserialize, Serialize};

fn all_pages() -> String {
    "1-".to_string()
}

fn quarter_turn() -> i64 {
    90
}

/// Body shared by endpoints that only take a document
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentRequest {
    pub pdf_base64: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MergeRequest {
    pub files: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SplitRequest {
    pub pdf_base64: String,
    #[serde(default = "all_pages")]
    pub ranges: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReorderRequest {
    pub pdf_base64: String,
    /// Range text listing every page exactly once, e.g. "3,1,2,4-"
    pub order: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RotateRequest {
    pub pdf_base64: String,
    #[serde(default = "all_pages")]
    pub ranges: String,
    /// Clockwise; any multiple of 90, negative allowed
    #[serde(default = "quarter_turn")]
    pub degrees: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HighlightRequest {
    pub pdf_base64: String,
    pub highlights: Vec<NormalizedRect>,
    pub color: Option<String>,
    pub opacity: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UnlockRequest {
    pub pdf_base64: String,
    pub password: String,
}

/// Response carrying a single output document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentResponse {
    pub data: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitPartResponse {
    pub name: String,
    pub pages: Vec<u32>,
    pub data: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitResponse {
    pub parts: Vec<SplitPartResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderResponse {
    pub data: String,
    /// Source page numbers in their new order
    pub pages: Vec<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRotation {
    pub page: u32,
    pub degrees: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RotateResponse {
    pub data: String,
    pub rotations: Vec<PageRotation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighlightResponse {
    pub data: String,
    /// Highlights written into the document
    pub annotated: usize,
    /// Highlights skipped as too small to see
    pub dropped: usize,
}
