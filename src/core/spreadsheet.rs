//! XLSX encoding of cleaned records.

use rust_xlsxwriter::{ColNum, RowNum, Workbook, Worksheet};

use crate::domain::model::{CellValue, CleanedRecord};
use crate::utils::error::{ConvertError, Result};

pub const SHEET_NAME: &str = "Data";

/// Excel sheet limits.
const N_ROWS_MAX: usize = 1_048_576;
const N_COLS_MAX: usize = 16_384;

/// Serializes `records` into a single-sheet workbook.
///
/// The header is taken from the first record; every later record must carry the
/// same key sequence or [`ConvertError::SchemaMismatchError`] is returned. An
/// empty slice yields [`ConvertError::EmptyInputError`].
pub fn encode_workbook(records: &[CleanedRecord]) -> Result<Vec<u8>> {
    let first = records.first().ok_or(ConvertError::EmptyInputError)?;
    let header: Vec<&str> = first.keys().collect();

    for record in &records[1..] {
        if !record.keys().eq(header.iter().copied()) {
            return Err(ConvertError::SchemaMismatchError {
                row: record.serial(),
                expected: header.join(", "),
                found: record.keys().collect::<Vec<_>>().join(", "),
            });
        }
    }

    let n_rows = records.len() + 1;
    if n_rows > N_ROWS_MAX || header.len() > N_COLS_MAX {
        return Err(ConvertError::SheetLimitError {
            rows: n_rows,
            columns: header.len(),
        });
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, name) in header.iter().enumerate() {
        worksheet.write_string(0, col as ColNum, *name)?;
    }
    for (index, record) in records.iter().enumerate() {
        write_row(worksheet, (index + 1) as RowNum, record)?;
    }

    let buffer = workbook.save_to_buffer()?;
    tracing::debug!(
        "Encoded workbook: {} data rows, {} columns, {} bytes",
        records.len(),
        header.len(),
        buffer.len()
    );
    Ok(buffer)
}

fn write_row(worksheet: &mut Worksheet, row: RowNum, record: &CleanedRecord) -> Result<()> {
    for (col, cell) in record.cells().enumerate() {
        let col = col as ColNum;
        match cell {
            CellValue::Number(n) => {
                worksheet.write_number(row, col, n as f64)?;
            }
            CellValue::Text(text) => {
                worksheet.write_string(row, col, text)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cleaner::clean_records;
    use crate::core::parser::parse_records;
    use crate::utils::error::ErrorKind;

    fn cleaned(csv: &str) -> Vec<CleanedRecord> {
        clean_records(parse_records(csv.as_bytes()).unwrap())
    }

    #[test]
    fn test_encode_produces_xlsx_container() {
        let buffer = encode_workbook(&cleaned("Name,Gender\nAlice,F\nBob,M\n")).unwrap();

        // xlsx 是 zip 容器
        assert_eq!(&buffer[..2], b"PK");
    }

    #[test]
    fn test_encode_empty_records_is_empty_input_error() {
        let err = encode_workbook(&[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyInput);
    }

    #[test]
    fn test_encode_rejects_extra_key() {
        let records = cleaned("Name,Gender\nAlice,F\nBob,M,extra\n");

        match encode_workbook(&records).unwrap_err() {
            ConvertError::SchemaMismatchError {
                row,
                expected,
                found,
            } => {
                assert_eq!(row, 2);
                assert_eq!(expected, "Serial, Name, Gender");
                assert_eq!(found, "Serial, Name, Gender, field3");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_encode_accepts_padded_rows() {
        let records = cleaned("Name,Gender,Age\nAlice,F,30\nBob\n");
        assert!(encode_workbook(&records).is_ok());
    }
}
