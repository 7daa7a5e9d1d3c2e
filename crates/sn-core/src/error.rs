use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnError {
    #[error("Unknown length unit: {unit}")]
    UnknownUnit { unit: String },
}
