//! Row normalization: column aliases, required-field checks, coercion.

use super::decoder::{CellValue, ImportRow};
use super::report::RowError;
use crate::customer::{status_or_default, CustomerStatus, NewCustomer};

/// Failure message for rows lacking any of the three required columns.
pub const MISSING_REQUIRED_FIELDS: &str = "Missing required fields (name, account_number, phone)";

const NAME: &[&str] = &["name", "Name"];
const ACCOUNT_NUMBER: &[&str] = &["account_number", "accountNumber", "Account Number"];
const PHONE: &[&str] = &["phone", "Phone"];
const NOMINEE: &[&str] = &["nominee", "Nominee"];
const NID: &[&str] = &["nid", "NID"];
const NOTES: &[&str] = &["notes", "Notes"];
const STATUS: &str = "status";

/// Validate one decoded row and build the customer it describes.
///
/// `created_by` is left unset; the pipeline fills in the importing user.
/// Uniqueness of the account number is not checked here.
pub fn normalize_row(row: &ImportRow) -> Result<NewCustomer, RowError> {
    let required = (
        resolve(row, NAME),
        resolve(row, ACCOUNT_NUMBER),
        resolve(row, PHONE),
    );
    let (Some(name), Some(account_number), Some(phone)) = required else {
        return Err(RowError::new(row.display_row(), MISSING_REQUIRED_FIELDS));
    };

    Ok(NewCustomer {
        name,
        account_number,
        phone,
        nominee: resolve(row, NOMINEE),
        nid: resolve(row, NID),
        notes: resolve(row, NOTES),
        status: resolve_status(row),
        created_by: None,
    })
}

/// First alias whose cell carries a value, stringified and trimmed.
fn resolve(row: &ImportRow, aliases: &[&str]) -> Option<String> {
    aliases
        .iter()
        .filter_map(|alias| row.get(alias))
        .find(|cell| cell.is_present())
        .map(|cell| cell.to_text().trim().to_string())
}

/// The `status` column, falling back to the default when absent or not
/// exactly one of the known values.
fn resolve_status(row: &ImportRow) -> CustomerStatus {
    match row.get(STATUS) {
        Some(CellValue::Text(s)) => status_or_default(Some(s)),
        _ => CustomerStatus::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(index: usize, cells: &[(&str, CellValue)]) -> ImportRow {
        ImportRow::new(index, cells.iter().cloned())
    }

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn base() -> Vec<(&'static str, CellValue)> {
        vec![
            ("name", text("Ada")),
            ("account_number", text("1001")),
            ("phone", text("555")),
        ]
    }

    #[test]
    fn minimal_row_gets_defaults() {
        let customer = normalize_row(&row(0, &base())).unwrap();
        assert_eq!(customer.name, "Ada");
        assert_eq!(customer.account_number, "1001");
        assert_eq!(customer.phone, "555");
        assert_eq!(customer.nominee, None);
        assert_eq!(customer.nid, None);
        assert_eq!(customer.notes, None);
        assert_eq!(customer.status, CustomerStatus::Active);
        assert_eq!(customer.created_by, None);
    }

    #[test]
    fn capitalized_and_camel_case_aliases_resolve() {
        let cells = [
            ("Name", text("Grace")),
            ("Account Number", text("2002")),
            ("Phone", text("777")),
            ("NID", text("N-1")),
            ("Notes", text("vip")),
        ];
        let customer = normalize_row(&row(0, &cells)).unwrap();
        assert_eq!(customer.name, "Grace");
        assert_eq!(customer.account_number, "2002");
        assert_eq!(customer.phone, "777");
        assert_eq!(customer.nid.as_deref(), Some("N-1"));
        assert_eq!(customer.notes.as_deref(), Some("vip"));

        let cells = [
            ("name", text("Linus")),
            ("accountNumber", text("3003")),
            ("phone", text("1")),
        ];
        assert_eq!(normalize_row(&row(0, &cells)).unwrap().account_number, "3003");
    }

    #[test]
    fn capitalized_nominee_alias_is_accepted() {
        // Every other optional field accepts a capitalized alias; `Nominee`
        // does too.
        let mut cells = base();
        cells.push(("Nominee", text("Charles")));
        let customer = normalize_row(&row(0, &cells)).unwrap();
        assert_eq!(customer.nominee.as_deref(), Some("Charles"));
    }

    #[test]
    fn lowercase_alias_wins_over_capitalized() {
        let mut cells = base();
        cells.push(("Name", text("Other")));
        assert_eq!(normalize_row(&row(0, &cells)).unwrap().name, "Ada");
    }

    #[test]
    fn blank_alias_falls_through_to_next() {
        let cells = [
            ("name", text("  ")),
            ("Name", text("Fallback")),
            ("account_number", text("1")),
            ("phone", text("2")),
        ];
        assert_eq!(normalize_row(&row(0, &cells)).unwrap().name, "Fallback");
    }

    #[test]
    fn padded_cells_are_trimmed() {
        let cells = [
            ("name", text(" Ada ")),
            ("account_number", text("1001 ")),
            ("phone", text("\t555")),
            ("nominee", text("  Charles  ")),
            ("notes", text(" call back\n")),
        ];
        let customer = normalize_row(&row(0, &cells)).unwrap();
        assert_eq!(customer.name, "Ada");
        assert_eq!(customer.account_number, "1001");
        assert_eq!(customer.phone, "555");
        assert_eq!(customer.nominee.as_deref(), Some("Charles"));
        assert_eq!(customer.notes.as_deref(), Some("call back"));
    }

    #[test]
    fn numbers_are_stringified() {
        let cells = [
            ("name", text("Ada")),
            ("account_number", CellValue::Number(123456.0)),
            ("phone", CellValue::Number(5551234.0)),
            ("nid", CellValue::Number(9.5)),
        ];
        let customer = normalize_row(&row(0, &cells)).unwrap();
        assert_eq!(customer.account_number, "123456");
        assert_eq!(customer.phone, "5551234");
        assert_eq!(customer.nid.as_deref(), Some("9.5"));
    }

    #[test]
    fn missing_required_field_reports_display_row() {
        let cells = [("name", text("B")), ("phone", text("555"))];
        let err = normalize_row(&row(1, &cells)).unwrap_err();
        assert_eq!(err, RowError::new(3, MISSING_REQUIRED_FIELDS));
    }

    #[test]
    fn each_required_field_is_enforced() {
        for missing in ["name", "account_number", "phone"] {
            let cells: Vec<_> = base().into_iter().filter(|(k, _)| *k != missing).collect();
            let err = normalize_row(&row(0, &cells)).unwrap_err();
            assert_eq!(err.error, MISSING_REQUIRED_FIELDS, "missing: {missing}");
            assert_eq!(err.row, 2);
        }
    }

    #[test]
    fn status_is_taken_verbatim_with_default_fallback() {
        let with_status = |status: CellValue| {
            let mut cells = base();
            cells.push(("status", status));
            normalize_row(&row(0, &cells)).unwrap().status
        };
        assert_eq!(with_status(text("lead")), CustomerStatus::Lead);
        assert_eq!(with_status(text("inactive")), CustomerStatus::Inactive);
        assert_eq!(with_status(text(" lead ")), CustomerStatus::Lead);
        assert_eq!(with_status(text("Inactive")), CustomerStatus::Active);
        assert_eq!(with_status(text("vip")), CustomerStatus::Active);
        assert_eq!(with_status(CellValue::Number(1.0)), CustomerStatus::Active);
    }
}
