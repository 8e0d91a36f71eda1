#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Unknown heating kind: {0} (expected one of gas, electric, solar)")]
    UnknownHeatingKind(String),

    #[error("Invalid number for {field}: {value}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("Validation failed: {0}")]
    Validation(String),
}
