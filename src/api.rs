use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::badge::{self, BadgeError, BadgeRequest};
use crate::{util, AppState};

#[derive(Debug, Deserialize, ToSchema)]
pub struct GenerateRequest {
    /// Full name printed on the badge (1-50 chars).
    pub name: String,
    /// RG identification number (1-15 chars).
    pub id_number: String,
    /// CPF tax id (1-14 chars).
    pub tax_id: String,
    /// Optional JPEG/PNG photo, base64 or data URI encoded.
    pub photo: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[utoipa::path(get, path = "/health", tag = "crachagen", responses((status=200, body=HealthResponse)))]
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok".into() })
}

#[utoipa::path(
    post,
    path = "/generate",
    tag = "crachagen",
    request_body = GenerateRequest,
    responses(
        (status=200, description="Generated badge PNG", content_type="image/png"),
        (status=400, description="Bad request"),
        (status=500, description="Internal error")
    )
)]
pub async fn generate(
    State(st): State<Arc<AppState>>,
    Json(req): Json<GenerateRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    // A photo field that fails base64 decoding is treated like any other
    // unusable upload: the badge is still produced without it.
    let mut photo_warning = None;
    let photo = match req.photo.as_deref() {
        None => None,
        Some(encoded) if encoded.trim().is_empty() => None,
        Some(encoded) => match util::b64_decode(encoded) {
            Some(bytes) => Some(bytes),
            None => {
                photo_warning = Some("photo is not valid base64".to_string());
                None
            }
        },
    };

    let request = BadgeRequest {
        name: req.name,
        id_number: req.id_number,
        tax_id: req.tax_id,
        photo,
    };

    let output = badge::generate(&st.template, &request).map_err(|e| match e {
        BadgeError::BadRequest(msg) => (StatusCode::BAD_REQUEST, Json(json!({ "detail": msg }))),
        other => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "detail": other.to_string() })),
        ),
    })?;

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("image/png"));

    let disposition = format!(
        "attachment; filename=\"{}\"",
        util::download_filename(&request.name)
    );
    if let Ok(v) = HeaderValue::from_str(&disposition) {
        headers.insert(header::CONTENT_DISPOSITION, v);
    }

    let warning = photo_warning.or(output.photo_warning);
    if let Some(w) = &warning {
        if let Ok(v) = HeaderValue::from_str(w) {
            headers.insert("x-badge-warning", v);
        }
    }

    Ok((StatusCode::OK, headers, output.png))
}
