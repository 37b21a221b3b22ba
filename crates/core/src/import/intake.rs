//! Upload intake: precondition checks run before any byte is parsed.

use std::path::Path;

use super::error::ImportError;

/// Upload limit applied when no other limit is configured (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// MIME types accepted for import.
pub const ACCEPTED_CONTENT_TYPES: &[&str] = &[
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-excel",
    "text/csv",
];

/// File extensions accepted for import (lowercase, without the dot).
///
/// Browsers report MIME types unreliably, so a matching extension is enough
/// on its own.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["xlsx", "xls", "csv"];

/// A raw uploaded file as received from the transport layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub file_name: String,
    /// MIME type reported by the client, if any.
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Lowercased file extension, if the name has one.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
    }

    /// The reported MIME type without parameters, lowercased.
    pub fn essence(&self) -> Option<String> {
        self.content_type.as_deref().map(|ct| {
            ct.split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_lowercase()
        })
    }

    /// Whether either the MIME type or the extension is an accepted format.
    pub fn is_accepted_format(&self) -> bool {
        let type_ok = self
            .essence()
            .is_some_and(|ct| ACCEPTED_CONTENT_TYPES.contains(&ct.as_str()));
        let ext_ok = self
            .extension()
            .is_some_and(|ext| ACCEPTED_EXTENSIONS.contains(&ext.as_str()));
        type_ok || ext_ok
    }
}

/// Run the intake checks in order: presence, format, size.
pub fn check_upload(
    upload: Option<&UploadedFile>,
    max_bytes: usize,
) -> Result<&UploadedFile, ImportError> {
    let file = upload.ok_or(ImportError::MissingInput)?;

    if !file.is_accepted_format() {
        tracing::debug!(
            file_name = %file.file_name,
            content_type = ?file.content_type,
            "Rejected upload with unsupported format"
        );
        return Err(ImportError::UnsupportedFormat);
    }

    if file.bytes.len() > max_bytes {
        return Err(ImportError::PayloadTooLarge {
            limit_bytes: max_bytes,
        });
    }

    Ok(file)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn upload(name: &str, content_type: Option<&str>, size: usize) -> UploadedFile {
        UploadedFile {
            file_name: name.to_string(),
            content_type: content_type.map(str::to_string),
            bytes: vec![b'a'; size],
        }
    }

    #[test]
    fn missing_file_is_rejected() {
        assert_matches!(
            check_upload(None, DEFAULT_MAX_UPLOAD_BYTES),
            Err(ImportError::MissingInput)
        );
    }

    #[test]
    fn accepts_known_mime_with_any_name() {
        let file = upload("export", Some("text/csv"), 4);
        assert!(check_upload(Some(&file), DEFAULT_MAX_UPLOAD_BYTES).is_ok());

        let file = upload("blob.bin", Some("application/vnd.ms-excel"), 4);
        assert!(check_upload(Some(&file), DEFAULT_MAX_UPLOAD_BYTES).is_ok());
    }

    #[test]
    fn extension_is_a_fallback_for_unreliable_mime() {
        let file = upload("Customers.XLSX", Some("application/octet-stream"), 4);
        assert!(check_upload(Some(&file), DEFAULT_MAX_UPLOAD_BYTES).is_ok());

        let file = upload("customers.csv", None, 4);
        assert!(check_upload(Some(&file), DEFAULT_MAX_UPLOAD_BYTES).is_ok());
    }

    #[test]
    fn mime_parameters_are_ignored() {
        let file = upload("data", Some("Text/CSV; charset=utf-8"), 4);
        assert!(file.is_accepted_format());
    }

    #[test]
    fn rejects_when_both_mime_and_extension_are_unknown() {
        let file = upload("report.pdf", Some("application/pdf"), 4);
        assert_matches!(
            check_upload(Some(&file), DEFAULT_MAX_UPLOAD_BYTES),
            Err(ImportError::UnsupportedFormat)
        );

        let file = upload("noext", None, 4);
        assert_matches!(
            check_upload(Some(&file), DEFAULT_MAX_UPLOAD_BYTES),
            Err(ImportError::UnsupportedFormat)
        );
    }

    #[test]
    fn format_is_checked_before_size() {
        let file = upload("huge.pdf", Some("application/pdf"), 32);
        assert_matches!(
            check_upload(Some(&file), 16),
            Err(ImportError::UnsupportedFormat)
        );
    }

    #[test]
    fn oversize_payload_is_rejected() {
        let file = upload("big.csv", Some("text/csv"), 17);
        assert_matches!(
            check_upload(Some(&file), 16),
            Err(ImportError::PayloadTooLarge { limit_bytes: 16 })
        );

        let file = upload("exact.csv", Some("text/csv"), 16);
        assert!(check_upload(Some(&file), 16).is_ok());
    }

    #[test]
    fn payload_limit_message_is_in_mebibytes() {
        let err = ImportError::PayloadTooLarge {
            limit_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        };
        assert_eq!(err.to_string(), "File size must be at most 10MB");
    }
}
