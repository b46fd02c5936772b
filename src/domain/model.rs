use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;

/// Column name of the generated row number.
pub const SERIAL_KEY: &str = "Serial";

/// One parsed input row: column name → cell text, in header order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn new(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(_, v)| v.as_str())
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Drops every field named `key`.
    pub fn without(mut self, key: &str) -> Self {
        self.fields.retain(|(k, _)| k != key);
        self
    }

    /// 所有欄位皆為空字串 (不做 trim)
    pub fn is_blank(&self) -> bool {
        self.fields.iter().all(|(_, v)| v.is_empty())
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// A non-blank [`Record`] with its 1-based `Serial` as the leading key.
///
/// Any input column already named `Serial` is shadowed by the generated number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedRecord {
    serial: usize,
    record: Record,
}

/// Cell of a [`CleanedRecord`], keeping the serial numeric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellValue<'a> {
    Number(usize),
    Text(&'a str),
}

impl CleanedRecord {
    pub(crate) fn new(serial: usize, record: Record) -> Self {
        Self {
            serial,
            record: record.without(SERIAL_KEY),
        }
    }

    pub fn serial(&self) -> usize {
        self.serial
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.record.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        std::iter::once(SERIAL_KEY).chain(self.record.keys())
    }

    pub fn cells(&self) -> impl Iterator<Item = CellValue<'_>> {
        std::iter::once(CellValue::Number(self.serial))
            .chain(self.record.values().map(CellValue::Text))
    }

    /// Number of columns including `Serial`.
    pub fn width(&self) -> usize {
        self.record.len() + 1
    }
}

impl Serialize for CleanedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.width()))?;
        map.serialize_entry(SERIAL_KEY, &self.serial)?;
        for (key, value) in self.record.fields() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Which column to tally and the two literals it is compared against.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, Deserialize)]
pub struct TallySpec {
    pub column: String,
    pub value_a: String,
    pub value_b: String,
}

impl TallySpec {
    pub fn new(
        column: impl Into<String>,
        value_a: impl Into<String>,
        value_b: impl Into<String>,
    ) -> Self {
        Self {
            column: column.into(),
            value_a: value_a.into(),
            value_b: value_b.into(),
        }
    }
}

impl Default for TallySpec {
    fn default() -> Self {
        Self::new("Gender", "M", "F")
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct CategoryCounts {
    pub a: usize,
    pub b: usize,
}

impl CategoryCounts {
    pub fn total(&self) -> usize {
        self.a + self.b
    }
}

#[derive(Debug, Clone)]
pub struct ConversionOutput {
    pub spreadsheet: Vec<u8>,
    pub chart: Vec<u8>,
    pub counts: CategoryCounts,
    pub rows: usize,
}

/// Where the two artifacts of one conversion ended up.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedArtifacts {
    pub xlsx_url: String,
    pub png_url: String,
    #[serde(skip)]
    pub xlsx_name: String,
    #[serde(skip)]
    pub png_name: String,
}
