#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Unknown form field: {0}")]
    UnknownField(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
