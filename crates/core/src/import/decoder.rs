//! Tabular decoding of uploaded spreadsheets and CSV files.
//!
//! The whole file is decoded into memory once. Only the first sheet of a
//! workbook is read, and its first row is the header.

use std::collections::HashMap;
use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};

use super::error::ImportError;

/// ZIP local-file-header magic; every OOXML workbook (`.xlsx`) starts with it.
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// OLE compound-file magic used by legacy `.xls` workbooks.
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0];

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Header name given to columns whose header cell is blank.
const EMPTY_HEADER: &str = "__EMPTY";

// ---------------------------------------------------------------------------
// Cells and rows
// ---------------------------------------------------------------------------

/// A single decoded cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Empty,
}

impl CellValue {
    /// Whether the cell carries a usable value: any number, or text that is
    /// not blank after trimming.
    pub fn is_present(&self) -> bool {
        match self {
            Self::Text(s) => !s.trim().is_empty(),
            Self::Number(_) => true,
            Self::Empty => false,
        }
    }

    /// Textual form of the cell. Whole numbers render without a fraction
    /// (`42`, not `42.0`).
    pub fn to_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => n.to_string(),
            Self::Empty => String::new(),
        }
    }
}

impl From<&Data> for CellValue {
    fn from(cell: &Data) -> Self {
        match cell {
            Data::Empty => Self::Empty,
            Data::String(s) if s.is_empty() => Self::Empty,
            Data::String(s) => Self::Text(s.clone()),
            Data::Int(i) => Self::Number(*i as f64),
            Data::Float(f) => Self::Number(*f),
            Data::Bool(b) => Self::Text(b.to_string()),
            // Date cells keep their serial value.
            Data::DateTime(dt) => Self::Number(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => Self::Text(s.clone()),
            Data::Error(e) => Self::Text(e.to_string()),
        }
    }
}

/// One decoded data row: header name to cell value, plus its zero-based
/// position among the data rows.
///
/// Blank cells are not stored, so a lookup for them returns `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportRow {
    pub index: usize,
    cells: HashMap<String, CellValue>,
}

impl ImportRow {
    /// Build a row from `(column, value)` pairs, dropping empty cells.
    pub fn new<K, I>(index: usize, cells: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, CellValue)>,
    {
        Self {
            index,
            cells: cells
                .into_iter()
                .filter(|(_, v)| *v != CellValue::Empty)
                .map(|(k, v)| (k.into(), v))
                .collect(),
        }
    }

    /// The cell under `column`, if it was non-empty.
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.get(column)
    }

    /// Row number shown to users: the header is row 1, so the first data
    /// row is row 2.
    pub fn display_row(&self) -> usize {
        self.index + 2
    }

    fn is_blank(&self) -> bool {
        self.cells.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Format detection
// ---------------------------------------------------------------------------

/// Container format detected from the file contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Office Open XML workbook (`.xlsx`).
    OpenXml,
    /// Legacy binary workbook (`.xls`).
    LegacyExcel,
    /// Delimited text.
    Csv,
}

impl SourceFormat {
    /// Sniff the format from magic bytes. Anything that is not a recognized
    /// workbook container is treated as CSV text.
    pub fn sniff(bytes: &[u8]) -> Self {
        if bytes.starts_with(ZIP_MAGIC) {
            Self::OpenXml
        } else if bytes.starts_with(OLE_MAGIC) {
            Self::LegacyExcel
        } else {
            Self::Csv
        }
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Decode an upload into data rows.
///
/// Fails with [`ImportError::EmptyFile`] when no data row remains after the
/// header and blank rows are removed, and with [`ImportError::Decode`] when
/// the bytes cannot be parsed at all.
pub fn decode_rows(bytes: &[u8]) -> Result<Vec<ImportRow>, ImportError> {
    let format = SourceFormat::sniff(bytes);
    let grid = match format {
        SourceFormat::OpenXml | SourceFormat::LegacyExcel => decode_workbook(bytes)?,
        SourceFormat::Csv => decode_csv(bytes)?,
    };

    let mut lines = grid.into_iter();
    let header = lines.next().ok_or(ImportError::EmptyFile)?;
    let columns = header_names(header.iter().map(CellValue::to_text));

    let rows: Vec<ImportRow> = lines
        .map(|cells| columns.iter().cloned().zip(cells))
        .map(|pairs| ImportRow::new(0, pairs))
        .filter(|row| !row.is_blank())
        .enumerate()
        .map(|(index, row)| ImportRow { index, ..row })
        .collect();

    tracing::debug!(?format, columns = columns.len(), rows = rows.len(), "Decoded upload");

    if rows.is_empty() {
        return Err(ImportError::EmptyFile);
    }
    Ok(rows)
}

/// Read every row of the first worksheet.
fn decode_workbook(bytes: &[u8]) -> Result<Vec<Vec<CellValue>>, ImportError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| ImportError::Decode(e.to_string()))?;

    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range.map_err(|e| ImportError::Decode(e.to_string()))?,
        None => return Err(ImportError::EmptyFile),
    };

    Ok(range
        .rows()
        .map(|row| row.iter().map(CellValue::from).collect())
        .collect())
}

/// Read every record of a CSV file. Cells stay textual so identifiers such
/// as `0123` keep their leading zeros; invalid UTF-8 is replaced rather than
/// rejected.
fn decode_csv(bytes: &[u8]) -> Result<Vec<Vec<CellValue>>, ImportError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut grid = Vec::new();
    for record in reader.byte_records() {
        let record = record.map_err(|e| ImportError::Decode(e.to_string()))?;
        grid.push(
            record
                .iter()
                .map(|field| match String::from_utf8_lossy(field) {
                    text if text.is_empty() => CellValue::Empty,
                    text => CellValue::Text(text.into_owned()),
                })
                .collect(),
        );
    }
    Ok(grid)
}

/// Turn raw header cells into unique column names: blank headers become
/// `__EMPTY`, and repeats get `_1`, `_2`, ... suffixes.
fn header_names<I: IntoIterator<Item = String>>(raw: I) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    raw.into_iter()
        .map(|name| {
            let base = if name.trim().is_empty() {
                EMPTY_HEADER.to_string()
            } else {
                name
            };
            let count = seen.entry(base.clone()).or_insert(0);
            let unique = if *count == 0 {
                base
            } else {
                format!("{base}_{count}")
            };
            *count += 1;
            unique
        })
        .collect()
}
