/// Bytes per mebibyte, used to render upload limits.
const MIB: usize = 1024 * 1024;

/// A pipeline-level failure. Any of these aborts the import before a single
/// row is attempted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImportError {
    #[error("No file provided")]
    MissingInput,

    #[error("Invalid file type. Please upload .xlsx, .xls, or .csv")]
    UnsupportedFormat,

    #[error("File size must be at most {}MB", .limit_bytes / MIB)]
    PayloadTooLarge { limit_bytes: usize },

    #[error("File is empty")]
    EmptyFile,

    #[error("Failed to decode file: {0}")]
    Decode(String),

    #[error("File contains {found} rows; at most {limit} rows can be imported at once")]
    TooManyRows { found: usize, limit: usize },
}
