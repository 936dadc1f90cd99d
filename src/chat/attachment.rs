// ABOUTME: PDF attachment selection — validates type and size before accepting a file.
// ABOUTME: Only one attachment may be pending at a time; it travels with the next submission.

use std::path::Path;

use thiserror::Error;

/// The only MIME type accepted for attachments.
pub const PDF_MIME: &str = "application/pdf";

/// Largest accepted attachment, in bytes.
pub const MAX_ATTACHMENT_BYTES: u64 = 10 * 1024 * 1024;

/// Why a file was refused at selection time.
#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("Please select only PDF files")]
    NotPdf { mime: String },
    #[error("File size should be less than 10MB")]
    TooLarge { size: u64 },
    #[error("PDF upload needs the multipart encoding")]
    UploadUnavailable,
    #[error("Could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// A validated file waiting to be sent with the next question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAttachment {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl PendingAttachment {
    /// Validate and accept an in-memory file.
    pub fn new(
        name: impl Into<String>,
        mime: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Self, AttachmentError> {
        let mime = mime.into();
        validate(&mime, bytes.len() as u64)?;
        Ok(Self {
            name: name.into(),
            mime,
            bytes,
        })
    }

    /// Read a file from disk, checking type and size before loading its contents.
    pub fn from_path(path: &Path) -> Result<Self, AttachmentError> {
        let io_err = |source| AttachmentError::Io {
            path: path.display().to_string(),
            source,
        };

        let mime = mime_for_path(path);
        let size = std::fs::metadata(path).map_err(io_err)?.len();
        validate(&mime, size)?;

        let bytes = std::fs::read(path).map_err(io_err)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Self::new(name, mime, bytes)
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Size formatted for the preview row, e.g. "2.50 MB".
    pub fn size_label(&self) -> String {
        format_megabytes(self.size())
    }
}

/// Reject anything that is not exactly a PDF or exceeds the size limit.
pub fn validate(mime: &str, size: u64) -> Result<(), AttachmentError> {
    if mime != PDF_MIME {
        return Err(AttachmentError::NotPdf {
            mime: mime.to_string(),
        });
    }
    if size > MAX_ATTACHMENT_BYTES {
        return Err(AttachmentError::TooLarge { size });
    }
    Ok(())
}

/// Guess the MIME type from the file extension, defaulting to `application/octet-stream`.
pub fn mime_for_path(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

pub fn format_megabytes(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / 1024.0 / 1024.0)
}
