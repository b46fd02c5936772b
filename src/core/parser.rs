//! Delimited-text decoding.
//!
//! The first line is the header. Rows shorter than the header are padded with
//! empty strings; cells beyond the header are kept under `field{n}` keys (1-based
//! column index) so that the encoder can reject the inconsistent row.

use crate::domain::model::Record;
use crate::utils::error::{ConvertError, Result};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub fn parse_records(raw: &[u8]) -> Result<Vec<Record>> {
    let raw = raw.strip_prefix(UTF8_BOM).unwrap_or(raw);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(raw);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_owned).collect();
    if headers.is_empty() {
        return Err(ConvertError::format("missing header line"));
    }
    tracing::debug!("Parsed header with {} columns: {:?}", headers.len(), headers);

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let mut fields = Vec::with_capacity(headers.len().max(row.len()));
        for (index, header) in headers.iter().enumerate() {
            let value = row.get(index).unwrap_or_default();
            fields.push((header.clone(), value.to_owned()));
        }
        // 超出表頭的欄位
        for (index, value) in row.iter().enumerate().skip(headers.len()) {
            fields.push((format!("field{}", index + 1), value.to_owned()));
        }
        records.push(Record::new(fields));
    }

    Ok(records)
}
