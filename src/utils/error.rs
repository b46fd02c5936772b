use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Format error: {message}")]
    FormatError { message: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Schema mismatch at row {row}: expected columns [{expected}], found [{found}]")]
    SchemaMismatchError {
        row: usize,
        expected: String,
        found: String,
    },

    #[error("No records left to encode after cleaning")]
    EmptyInputError,

    #[error("No data to chart: both tally counts are zero")]
    NoDataError,

    #[error("Sheet limit exceeded: {rows} rows x {columns} columns")]
    SheetLimitError { rows: usize, columns: usize },

    #[error("Spreadsheet encoding failed: {0}")]
    SpreadsheetError(#[from] rust_xlsxwriter::XlsxError),

    #[error("Image encoding failed: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Background task failed: {0}")]
    TaskError(#[from] tokio::task::JoinError),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Upload error: {message}")]
    UploadError { message: String },

    #[error("Upload too large: {message}")]
    UploadTooLargeError { message: String },
}

/// Coarse classification of [`ConvertError`], stable for callers that need to
/// branch on the failing stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Format,
    SchemaMismatch,
    EmptyInput,
    NoData,
    Encoding,
    Io,
    Config,
    Upload,
    UploadTooLarge,
}

impl ErrorKind {
    /// 由請求內容引起的錯誤 (HTTP 4xx)
    pub fn is_client_error(self) -> bool {
        matches!(self, ErrorKind::Upload | ErrorKind::UploadTooLarge)
    }

    /// Pipeline-stage errors whose message is safe to echo back to clients.
    pub fn is_pipeline_error(self) -> bool {
        matches!(
            self,
            ErrorKind::Format | ErrorKind::SchemaMismatch | ErrorKind::EmptyInput | ErrorKind::NoData
        )
    }
}

impl ConvertError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConvertError::FormatError { .. } | ConvertError::CsvError(_) => ErrorKind::Format,
            ConvertError::SchemaMismatchError { .. } => ErrorKind::SchemaMismatch,
            ConvertError::EmptyInputError => ErrorKind::EmptyInput,
            ConvertError::NoDataError => ErrorKind::NoData,
            ConvertError::SheetLimitError { .. }
            | ConvertError::SpreadsheetError(_)
            | ConvertError::ImageError(_)
            | ConvertError::TaskError(_) => ErrorKind::Encoding,
            ConvertError::IoError(_) => ErrorKind::Io,
            ConvertError::UrlError(_)
            | ConvertError::ConfigError { .. }
            | ConvertError::InvalidConfigValueError { .. }
            | ConvertError::MissingConfigError { .. } => ErrorKind::Config,
            ConvertError::UploadError { .. } => ErrorKind::Upload,
            ConvertError::UploadTooLargeError { .. } => ErrorKind::UploadTooLarge,
        }
    }

    pub fn format(message: impl Into<String>) -> Self {
        ConvertError::FormatError {
            message: message.into(),
        }
    }

    pub fn upload(message: impl Into<String>) -> Self {
        ConvertError::UploadError {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_errors_classify_as_format() {
        let err = csv::ReaderBuilder::new()
            .from_reader(&b"a,b\n\xff\xfe,x\n"[..])
            .records()
            .find_map(|r| r.err())
            .unwrap();
        assert_eq!(ConvertError::from(err).kind(), ErrorKind::Format);
    }

    #[test]
    fn test_only_upload_errors_are_client_errors() {
        assert!(ConvertError::upload("missing field").kind().is_client_error());
        assert!(ConvertError::UploadTooLargeError {
            message: "length limit exceeded".to_string()
        }
        .kind()
        .is_client_error());
        assert!(!ConvertError::NoDataError.kind().is_client_error());
        assert!(ConvertError::NoDataError.kind().is_pipeline_error());
        assert!(!ConvertError::IoError(std::io::Error::other("disk")).kind().is_pipeline_error());
    }

    #[test]
    fn test_schema_mismatch_message_names_row() {
        let err = ConvertError::SchemaMismatchError {
            row: 2,
            expected: "Serial, Name".to_string(),
            found: "Serial, Name, field3".to_string(),
        };
        assert!(err.to_string().contains("row 2"));
    }
}
