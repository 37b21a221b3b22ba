//! Bulk customer import from spreadsheet and CSV uploads.
//!
//! The pipeline is linear and single-pass:
//!
//! 1. [`intake`] -- reject missing, unsupported or oversize uploads.
//! 2. [`decoder`] -- decode the first sheet into typed [`ImportRow`]s.
//! 3. [`normalizer`] -- resolve column aliases and validate each row.
//! 4. [`sink`] -- insert valid rows one at a time through a [`CustomerSink`].
//! 5. [`report`] -- collect per-row outcomes into an [`ImportResult`].
//!
//! [`run_import`] drives all five stages. Pipeline-level problems are
//! returned as an [`ImportError`]; row-level problems are data in the result.

pub mod decoder;
pub mod error;
pub mod intake;
pub mod normalizer;
pub mod pipeline;
pub mod report;
pub mod sink;

pub use decoder::{decode_rows, CellValue, ImportRow, SourceFormat};
pub use error::ImportError;
pub use intake::{check_upload, UploadedFile};
pub use normalizer::{normalize_row, MISSING_REQUIRED_FIELDS};
pub use pipeline::{import_rows, run_import, ImportLimits};
pub use report::{ImportResult, RowError};
pub use sink::{CustomerSink, InsertError};
