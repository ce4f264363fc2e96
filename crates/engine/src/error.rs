use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellError {
    /// Host value cannot be represented as a cell value (non-finite number,
    /// map with non-string keys, failing `Serialize` impl, ...).
    UnsupportedValue(String),
    /// The original-value snapshot could not be restored.
    Snapshot(String),
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedValue(msg) => write!(f, "unsupported value type: {msg}"),
            Self::Snapshot(msg) => write!(f, "cannot restore original value: {msg}"),
        }
    }
}

impl std::error::Error for CellError {}
