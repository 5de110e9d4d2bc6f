use thiserror::Error;

pub type LfResult<T> = Result<T, LfError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LfError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Value out of range: {what} = {value} (allowed {min}..={max})")]
    OutOfRange {
        what: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
}
