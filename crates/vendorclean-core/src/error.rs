use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CleanError {
    #[error("failed to read spreadsheet: {0}")]
    Parse(String),

    #[error("cell ({row}, {col}) for '{field}' is outside the sheet")]
    CellOutOfRange { field: String, row: u32, col: u32 },

    #[error("cell ({row}, {col}) for '{field}' is not a number: '{value}'")]
    NotNumeric {
        field: String,
        row: u32,
        col: u32,
        value: String,
    },

    #[error("cell ({row}, {col}) for '{field}' is not a date: '{value}'")]
    NotDate {
        field: String,
        row: u32,
        col: u32,
        value: String,
    },

    #[error("failed to load template from {path}: {reason}")]
    TemplateLoad { path: PathBuf, reason: String },

    #[error("invalid template: {0}")]
    TemplateInvalid(String),

    #[error("failed to write spreadsheet: {0}")]
    Write(String),

    #[error("failed to build archive: {0}")]
    Archive(String),

    #[error("unknown timezone '{0}'")]
    InvalidTimezone(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CleanError {
    /// True for failures raised while reading fields out of a grid.
    pub fn is_extraction(&self) -> bool {
        matches!(
            self,
            CleanError::CellOutOfRange { .. }
                | CleanError::NotNumeric { .. }
                | CleanError::NotDate { .. }
        )
    }
}

impl From<rust_xlsxwriter::XlsxError> for CleanError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        CleanError::Write(e.to_string())
    }
}

impl From<zip::result::ZipError> for CleanError {
    fn from(e: zip::result::ZipError) -> Self {
        CleanError::Archive(e.to_string())
    }
}
