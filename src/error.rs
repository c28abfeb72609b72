use thiserror::Error;

/// Everything that can go wrong while handling a signing request.
///
/// Only the first three variants are caller mistakes; the rest end up as a
/// generic internal failure so nothing about the server leaks to the client.
#[derive(Debug, Error)]
pub enum Error {
    #[error("missing required fields")]
    MissingFields,
    #[error("daily limit of {limit} documents reached for `{id}`")]
    QuotaExceeded { id: String, limit: u32 },
    #[error("source document `{0}` not found")]
    SourceNotFound(String),
    #[error("document has no pages")]
    NoPages,
    #[error("invalid signature data: {0}")]
    SignatureData(String),
    #[error("activity log is corrupt: {0}")]
    CorruptActivityLog(#[source] serde_json::Error),
    #[error("pdf error: {0}")]
    LoPdfError(#[from] lopdf::Error),
    #[error("png error: {0}")]
    PngError(#[from] png::DecodingError),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// HTTP status code the error is reported with.
    pub fn status(&self) -> u16 {
        match self {
            Error::MissingFields => 400,
            Error::QuotaExceeded { .. } => 403,
            Error::SourceNotFound(_) => 404,
            _ => 500,
        }
    }

    /// Message shown to the caller. Internal failures all share one text.
    pub fn public_message(&self) -> String {
        match self {
            Error::MissingFields => "Missing required fields".to_owned(),
            Error::QuotaExceeded { limit, .. } => {
                format!("Daily limit of {} PDFs reached", limit)
            }
            Error::SourceNotFound(_) => "Original PDF not found".to_owned(),
            _ => "Failed to save PDF".to_owned(),
        }
    }
}

impl From<base64::DecodeError> for Error {
    fn from(err: base64::DecodeError) -> Self {
        Self::SignatureData(err.to_string())
    }
}
