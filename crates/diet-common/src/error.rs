/// Error types shared by the recommender's infrastructure components.
///
/// These errors cover dataset loading and nearest-neighbor indexing. Request-level errors
/// (validation, calorie budget) are defined in the server crate and wrap `CommonError`
/// via `#[from]`.

#[derive(Debug, thiserror::Error)]
pub enum CommonError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] arrow_schema::ArrowError),

    #[error("schema error: {0}")]
    Schema(String),

    #[error("insufficient data: need at least {required} rows, have {available}")]
    InsufficientData { required: usize, available: usize },
}
