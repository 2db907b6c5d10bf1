use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CoreError {
    #[error("Empty identifier: {what}")]
    EmptyId { what: &'static str },

    #[error("Invalid identifier for {what}: {value:?} ({reason})")]
    InvalidId {
        what: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("Invalid recipe reference: {value:?}")]
    InvalidRecipe { value: String },
}
