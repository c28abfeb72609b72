use crate::{naming::is_plain_file_name, Error, PDFSigningDocument};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Loads source documents by name from one directory and stamps signatures onto them.
#[derive(Debug, Clone)]
pub struct DocumentSigner {
    source_dir: PathBuf,
}

impl DocumentSigner {
    pub fn new<P: Into<PathBuf>>(source_dir: P) -> Self {
        DocumentSigner {
            source_dir: source_dir.into(),
        }
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Path of the named source document, or `SourceNotFound`.
    pub fn locate(&self, source_name: &str) -> Result<PathBuf, Error> {
        if !is_plain_file_name(source_name) {
            log::warn!("Rejected source document name `{}`.", source_name);
            return Err(Error::SourceNotFound(source_name.to_owned()));
        }
        let path = self.source_dir.join(source_name);
        if !path.is_file() {
            return Err(Error::SourceNotFound(source_name.to_owned()));
        }
        Ok(path)
    }

    /// Raw bytes of the named source document.
    pub fn read_source(&self, source_name: &str) -> Result<Vec<u8>, Error> {
        let path = self.locate(source_name)?;
        Ok(fs::read(path)?)
    }

    /// Stamp the PNG signature onto page 1 of the named document and return the new bytes.
    /// Nothing is written to disk.
    pub fn sign_document(&self, source_name: &str, signature_png: &[u8]) -> Result<Vec<u8>, Error> {
        let pdf_data = self.read_source(source_name)?;
        let mut pdf_signing_document = PDFSigningDocument::read_from(&pdf_data)?;
        pdf_signing_document.stamp_signature(signature_png)?;
        pdf_signing_document.save_to_bytes()
    }
}
