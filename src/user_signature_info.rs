use crate::Error;
use serde::{Deserialize, Serialize};

/// The payload posted by the signing form.
/// Fields are optional here so that missing ones are reported as a validation error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigningRequest {
    /// PNG image as a data URL.
    pub signature: Option<String>,
    /// Name of the source document in the document directory.
    pub file_name: Option<String>,
    pub full_name: Option<String>,
    /// Opaque identifier the daily quota is keyed on.
    pub id: Option<String>,
}

/// A request with every field present and non-empty.
#[derive(Debug, Clone)]
pub struct ValidSigningRequest {
    pub signature: String,
    pub file_name: String,
    pub full_name: String,
    pub id: String,
}

fn required(value: Option<String>) -> Result<String, Error> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(Error::MissingFields),
    }
}

impl SigningRequest {
    pub fn validate(self) -> Result<ValidSigningRequest, Error> {
        Ok(ValidSigningRequest {
            signature: required(self.signature)?,
            file_name: required(self.file_name)?,
            full_name: required(self.full_name)?,
            id: required(self.id)?,
        })
    }
}
