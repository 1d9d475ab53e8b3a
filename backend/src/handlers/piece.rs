//! HTTP handler for the piece-lookup address
//!
//! This is the endpoint printed into piece labels, so it must answer for
//! historical orders as well as new ones.

use axum::{
    extract::{OriginalUri, State},
    Json,
};
use serde::Serialize;

use crate::{
    error::{AppError, AppResult},
    models::PieceAddress,
    services::{resolver::ResolvedPiece, PieceResolver},
    AppState,
};

#[derive(Debug, Serialize)]
pub struct PieceLookupResponse {
    #[serde(flatten)]
    pub resolved: ResolvedPiece,
    /// Address to print on the piece label
    pub label_url: String,
}

/// Resolve the scanned address `.../piece/{code}[?workshop={id}]` to its
/// order context. A workshop id that does not parse is ignored.
pub async fn resolve_piece(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
) -> AppResult<Json<PieceLookupResponse>> {
    let address = PieceAddress::parse(&uri.to_string()).ok_or_else(|| AppError::Validation {
        field: "piece_code".to_string(),
        message: format!("{} is not a piece address", uri.path()),
    })?;

    let resolver = PieceResolver::new(state.store.clone());
    let resolved = resolver.resolve(address.code.as_str(), address.workshop)?;

    let label = PieceAddress {
        workshop: Some(resolved.context.workshop.id),
        ..address
    };
    Ok(Json(PieceLookupResponse {
        label_url: label.to_url(&state.config.pieces.public_base_url),
        resolved,
    }))
}
