use crate::{Error, SigningRequest, SigningService};
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

pub const SAVE_SUCCESS_MESSAGE: &str = "PDF saved successfully!";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResponse {
    pub message: String,
    pub file_name: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            log::error!("Error saving PDF: {}", self);
        } else {
            log::debug!("Request refused: {}", self);
        }
        let body = Json(json!({
            "error": self.public_message(),
        }));
        (status, body).into_response()
    }
}

pub async fn handle_health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
    }))
}

/// `POST /api/save-pdf`
pub async fn handle_save_pdf(
    State(service): State<Arc<SigningService>>,
    body: Bytes,
) -> Result<Json<SaveResponse>, Error> {
    // A body that is not the expected JSON object counts as missing fields.
    let request: SigningRequest = serde_json::from_slice(&body).map_err(|err| {
        log::debug!("Unreadable save request: {}", err);
        Error::MissingFields
    })?;

    let signed = tokio::task::spawn_blocking(move || service.save_signed_pdf(request))
        .await
        .map_err(|err| Error::Other(format!("Signing task failed: {}", err)))??;

    Ok(Json(SaveResponse {
        message: SAVE_SUCCESS_MESSAGE.to_owned(),
        file_name: signed.file_name,
    }))
}

/// `GET /api/documents/{file_name}`: the unsigned source document, for the viewer.
pub async fn handle_get_document(
    State(service): State<Arc<SigningService>>,
    Path(file_name): Path<String>,
) -> Result<Response, Error> {
    let pdf_data =
        tokio::task::spawn_blocking(move || service.signer().read_source(&file_name))
            .await
            .map_err(|err| Error::Other(format!("Read task failed: {}", err)))??;
    Ok(([(header::CONTENT_TYPE, "application/pdf")], pdf_data).into_response())
}
