use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    /// A column does not match the row count of the table it is added to.
    #[error("column '{column}' has {actual} values, table has {expected} rows")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// A column name is already taken.
    #[error("duplicate column '{name}'")]
    DuplicateColumn { name: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
