use thiserror::Error;

/// Terminal failures while loading or aggregating a grade sheet.
#[derive(Debug, Error)]
pub enum GradeError {
    #[error("error opening spreadsheet {path}: {message}")]
    FileOpen { path: String, message: String },

    #[error("could not find any sheets in the spreadsheet")]
    NoSheet,

    #[error("error getting rows from sheet '{sheet}': {message}")]
    RowsRead { sheet: String, message: String },

    #[error(
        "no grade data found in the spreadsheet (expected at least 2 rows, including headers, found {rows})"
    )]
    InsufficientData { rows: usize },

    #[error("required columns not found in header: {}", .missing.join(", "))]
    ColumnsNotFound { missing: Vec<&'static str> },

    #[error(
        "no valid grade data found to process. Make sure your 'Předmět', 'Váha' and 'Výsledek' columns contain valid numeric entries"
    )]
    NoValidData,
}

pub type Result<T> = std::result::Result<T, GradeError>;
