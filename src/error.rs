use thiserror::Error;

/// Everything that can abort a render. A failed render writes no output.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid content record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("columns not initialized: call start_two_columns() first")]
    ColumnsNotInitialized,

    #[error("column index must be 0 or 1, got {0}")]
    InvalidColumnIndex(usize),

    #[error("missing required field: {0}")]
    MissingRequiredField(String),

    #[error("column {column} overflows the page: block ends at {y:.1}pt, limit is {limit:.1}pt")]
    ColumnOverflow { column: usize, y: f32, limit: f32 },
}
