use crate::{
    clock::Clock, naming::signed_file_name, quota::QuotaEnforcer, signature_image::decode_data_url,
    signer::DocumentSigner, user_signature_info::SigningRequest, Error, DAILY_LIMIT,
};
use std::{fs, path::PathBuf};

/// A signed document that has been written to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedPdf {
    pub file_name: String,
    pub path: PathBuf,
}

/// Handles one signing request from payload to file on disk.
pub struct SigningService {
    quota: QuotaEnforcer,
    signer: DocumentSigner,
    output_dir: PathBuf,
    clock: Box<dyn Clock>,
}

impl SigningService {
    pub fn new<P: Into<PathBuf>, C: Clock + 'static>(
        quota: QuotaEnforcer,
        signer: DocumentSigner,
        output_dir: P,
        clock: C,
    ) -> Self {
        SigningService {
            quota,
            signer,
            output_dir: output_dir.into(),
            clock: Box::new(clock),
        }
    }

    pub fn signer(&self) -> &DocumentSigner {
        &self.signer
    }

    pub fn quota(&self) -> &QuotaEnforcer {
        &self.quota
    }

    /// Validate, count against the quota, stamp and store.
    ///
    /// The quota is consumed before the source document is looked up, so a request
    /// for a missing document still counts. Files already written are not removed
    /// when a later step fails.
    pub fn save_signed_pdf(&self, request: SigningRequest) -> Result<SignedPdf, Error> {
        let request = request.validate()?;
        let today = self.clock.today();

        if !self.quota.check_and_consume(&request.id, today)? {
            return Err(Error::QuotaExceeded {
                id: request.id,
                limit: DAILY_LIMIT,
            });
        }

        self.signer.locate(&request.file_name)?;
        let signature_png = decode_data_url(&request.signature)?;
        let signed_pdf_data = self
            .signer
            .sign_document(&request.file_name, &signature_png)?;

        let file_name = signed_file_name(&request.id, &request.full_name, today);
        let path = self.output_dir.join(&file_name);
        fs::write(&path, signed_pdf_data)?;
        log::info!(
            "Signed `{}` for `{}` into `{}`.",
            request.file_name,
            request.id,
            file_name
        );

        Ok(SignedPdf { file_name, path })
    }
}
