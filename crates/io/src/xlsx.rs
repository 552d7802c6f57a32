// Excel reading (xlsx, xls, xlsb, ods) into a RawTable
//
// Only cell values are read; formatting, formulas and layout are ignored.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};

use crate::error::LoadError;
use crate::table::RawTable;

/// Read one worksheet: `sheet` by name, or the first sheet in the workbook.
pub fn read_table(path: &Path, sheet: Option<&str>) -> Result<RawTable, LoadError> {
    let mut workbook: Sheets<_> = open_workbook_auto(path)
        .map_err(|e| LoadError::Parse(format!("failed to open {}: {}", path.display(), e)))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let name = match sheet {
        Some(wanted) => sheet_names
            .iter()
            .find(|n| n.as_str() == wanted)
            .cloned()
            .ok_or_else(|| LoadError::SheetNotFound(wanted.to_string()))?,
        None => sheet_names.first().cloned().ok_or(LoadError::NoSheets)?,
    };

    let range = workbook
        .worksheet_range(&name)
        .map_err(|e| LoadError::Parse(format!("failed to read sheet '{}': {}", name, e)))?;

    let (height, width) = range.get_size();
    log::debug!("{}: sheet '{}' is {}x{}", path.display(), name, height, width);

    let records: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();

    RawTable::from_records(records).ok_or(LoadError::EmptyTable)
}

/// Render a cell as the text a user would see for plain values.
pub(crate) fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(n) => {
            // Integral values without a trailing ".0"
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{}", n)
            }
        }
        Data::Int(n) => n.to_string(),
        Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        Data::Error(e) => format!("#{:?}", e),
        Data::DateTime(dt) => format!("{}", dt.as_f64()),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;
    use tempfile::tempdir;

    #[test]
    fn cell_rendering() {
        assert_eq!(cell_to_string(&Data::Empty), "");
        assert_eq!(cell_to_string(&Data::Float(42.0)), "42");
        assert_eq!(cell_to_string(&Data::Float(1.5)), "1.5");
        assert_eq!(cell_to_string(&Data::Int(-3)), "-3");
        assert_eq!(cell_to_string(&Data::Bool(true)), "TRUE");
        assert_eq!(cell_to_string(&Data::String("Acme".into())), "Acme");
    }

    #[test]
    fn reads_first_or_named_sheet() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("coverage.xlsx");

        let mut wb = Workbook::new();
        let first = wb.add_worksheet().set_name("Accounts").unwrap();
        first.write_string(0, 0, "Account Name").unwrap();
        first.write_string(1, 0, "Acme").unwrap();
        let second = wb.add_worksheet().set_name("Coverage").unwrap();
        second.write_string(0, 0, "company").unwrap();
        second.write_string(0, 1, "analyst").unwrap();
        second.write_string(1, 0, "Globex").unwrap();
        second.write_string(1, 1, "Alice").unwrap();
        second.write_number(2, 0, 1234.0).unwrap();
        wb.save(&path).unwrap();

        let t = read_table(&path, None).unwrap();
        assert_eq!(t.headers, vec!["Account Name"]);
        assert_eq!(t.cell(0, 0), "Acme");

        let t = read_table(&path, Some("Coverage")).unwrap();
        assert_eq!(t.headers, vec!["company", "analyst"]);
        assert_eq!(t.cell(0, 1), "Alice");
        assert_eq!(t.cell(1, 0), "1234");

        let err = read_table(&path, Some("Missing")).unwrap_err();
        assert!(matches!(err, LoadError::SheetNotFound(_)));
    }
}
