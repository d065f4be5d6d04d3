//! HTTP handlers for the pagekit API
//!
//! Each handler decodes the request, parses and resolves page ranges with
//! `pagekit-core`, and hands resolved values to `pagekit-pdf`.

use axum::{extract::State, Json};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use pagekit_core::{
    parse_and_resolve, project_highlights, HighlightStyle, ResolveMode, RotationDelta,
};
use pagekit_pdf::DocumentInfo;
use std::sync::Arc;

use crate::error::ApiError;
use crate::models::*;
use crate::state::AppState;

fn decode(pdf_base64: &str) -> Result<Vec<u8>, ApiError> {
    BASE64
        .decode(pdf_base64.trim())
        .map_err(|e| ApiError::InvalidRequest(format!("Invalid PDF base64: {}", e)))
}

fn encode(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}

/// Health check endpoint
pub async fn health() -> &'static str {
    "OK"
}

/// Page count, metadata and per-page geometry
pub async fn info(Json(req): Json<DocumentRequest>) -> Result<Json<DocumentInfo>, ApiError> {
    let pdf = decode(&req.pdf_base64)?;
    Ok(Json(pagekit_pdf::inspect(&pdf)?))
}

pub async fn merge(Json(req): Json<MergeRequest>) -> Result<Json<DocumentResponse>, ApiError> {
    if req.files.len() < 2 {
        return Err(ApiError::InvalidRequest(
            "Merge needs at least two files".into(),
        ));
    }
    let documents = req
        .files
        .iter()
        .map(|file| decode(file))
        .collect::<Result<Vec<_>, _>>()?;

    let merged = pagekit_pdf::merge_documents(&documents)?;
    Ok(Json(DocumentResponse {
        data: encode(&merged),
    }))
}

/// One output document per range clause
pub async fn split(Json(req): Json<SplitRequest>) -> Result<Json<SplitResponse>, ApiError> {
    let pdf = decode(&req.pdf_base64)?;
    let page_count = pagekit_pdf::get_page_count(&pdf)?;
    let resolved = parse_and_resolve(&req.ranges, page_count, ResolveMode::Split)?;

    let parts = pagekit_pdf::split_segments(&pdf, &resolved)?
        .into_iter()
        .map(|part| SplitPartResponse {
            data: encode(&part.bytes),
            name: part.name,
            pages: part.pages,
        })
        .collect();

    Ok(Json(SplitResponse { parts }))
}

pub async fn reorder(Json(req): Json<ReorderRequest>) -> Result<Json<ReorderResponse>, ApiError> {
    let pdf = decode(&req.pdf_base64)?;
    let page_count = pagekit_pdf::get_page_count(&pdf)?;
    let resolved = parse_and_resolve(&req.order, page_count, ResolveMode::Reorder)?;

    let reordered = pagekit_pdf::reorder_document(&pdf, &resolved)?;
    Ok(Json(ReorderResponse {
        data: encode(&reordered),
        pages: resolved.pages(),
    }))
}

pub async fn rotate(Json(req): Json<RotateRequest>) -> Result<Json<RotateResponse>, ApiError> {
    let delta = RotationDelta::new(req.degrees).map_err(pagekit_core::PageError::from)?;
    let pdf = decode(&req.pdf_base64)?;
    let page_count = pagekit_pdf::get_page_count(&pdf)?;
    let resolved = parse_and_resolve(&req.ranges, page_count, ResolveMode::Rotate)?;

    let (rotated, plan) = pagekit_pdf::rotate_document(&pdf, &resolved, delta)?;
    let rotations = plan
        .iter()
        .map(|(page, rotation)| PageRotation {
            page,
            degrees: rotation.degrees(),
        })
        .collect();

    Ok(Json(RotateResponse {
        data: encode(&rotated),
        rotations,
    }))
}

/// Map viewer selections into page space and embed them as highlights
pub async fn highlight(
    State(state): State<Arc<AppState>>,
    Json(req): Json<HighlightRequest>,
) -> Result<Json<HighlightResponse>, ApiError> {
    let pdf = decode(&req.pdf_base64)?;
    let info = pagekit_pdf::inspect(&pdf)?;

    let batch = project_highlights(&req.highlights, &info.geometries(), &state.config.assemble)
        .map_err(pagekit_core::PageError::from)?;

    let defaults = &state.config.highlight;
    let style = HighlightStyle::new(
        req.color.unwrap_or_else(|| defaults.color.clone()),
        req.opacity.unwrap_or(defaults.opacity),
    );

    let annotated = pagekit_pdf::embed_highlights(&pdf, &batch, &style)?;
    tracing::info!(
        requested = req.highlights.len(),
        annotated = batch.len(),
        dropped = batch.dropped(),
        "highlight request done"
    );

    Ok(Json(HighlightResponse {
        data: encode(&annotated),
        annotated: batch.len(),
        dropped: batch.dropped(),
    }))
}

pub async fn strip_metadata(
    Json(req): Json<DocumentRequest>,
) -> Result<Json<DocumentResponse>, ApiError> {
    let pdf = decode(&req.pdf_base64)?;
    let stripped = pagekit_pdf::strip_metadata(&pdf)?;
    Ok(Json(DocumentResponse {
        data: encode(&stripped),
    }))
}

pub async fn compress(
    Json(req): Json<DocumentRequest>,
) -> Result<Json<DocumentResponse>, ApiError> {
    let pdf = decode(&req.pdf_base64)?;
    let compressed = pagekit_pdf::compress_document(&pdf)?;
    Ok(Json(DocumentResponse {
        data: encode(&compressed),
    }))
}

/// Remove password protection
pub async fn unlock(Json(req): Json<UnlockRequest>) -> Result<Json<DocumentResponse>, ApiError> {
    let pdf = decode(&req.pdf_base64)?;
    let unlocked = pagekit_pdf::unlock_document(&pdf, &req.password)?;
    Ok(Json(DocumentResponse {
        data: encode(&unlocked),
    }))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use lopdf::{dictionary, Document, Object};

    /// One page, RC4 encrypted with user password "secret"
    pub const ENCRYPTED_PDF: &[u8] =
        include_bytes!("../../../crates/pagekit-pdf/tests/fixtures/encrypted-rc4.pdf");

    /// Blank US Letter pages, base64 encoded
    pub fn pdf_base64(num_pages: usize) -> String {
        use base64::Engine;
        base64::engine::general_purpose::STANDARD.encode(pdf_bytes(num_pages))
    }

    pub fn pdf_bytes(num_pages: usize) -> Vec<u8> {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        let kids: Vec<Object> = (0..num_pages)
            .map(|_| {
                Object::Reference(doc.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                    "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                }))
            })
            .collect();
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Count" => num_pages as i64,
                "Kids" => kids,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).unwrap();
        buffer
    }
}
