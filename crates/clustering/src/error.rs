use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ClusterError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (threshold out of range, empty column name, etc.).
    ConfigValidation(String),
    /// The configured matching mode is not two-sided.
    Unsupported { mode: String },
    /// Cost matrix row whose length differs from the row count.
    MalformedMatrix { row: usize, expected: usize, found: usize },
    /// Collection sizes whose padded matrix or shared id space cannot be addressed.
    MatrixTooLarge { left: usize, right: usize },
    /// NaN or infinite value where a similarity or cost was expected.
    NonFinite { what: &'static str, row: usize, col: usize },
    /// Similarity or cost outside [0, 1].
    SimilarityOutOfRange { row: usize, col: usize, value: f64 },
    /// Entity id outside its collection.
    EntityOutOfRange { side: &'static str, id: usize, size: usize },
    /// Missing required column in input data.
    MissingColumn { column: String },
    /// Unparseable field in input data.
    FieldParse { line: u64, column: String, value: String },
    /// IO error (file read, CSV framing, etc.).
    Io(String),
}

impl fmt::Display for ClusterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::Unsupported { mode } => write!(
                f,
                "unsupported matching mode '{mode}': row-column clustering only supports clean_clean"
            ),
            Self::MalformedMatrix { row, expected, found } => {
                write!(f, "malformed matrix: row {row} has {found} columns, expected {expected}")
            }
            Self::MatrixTooLarge { left, right } => write!(
                f,
                "collections of {left} and {right} entities are too large for a dense cost matrix"
            ),
            Self::NonFinite { what, row, col } => {
                write!(f, "non-finite {what} at ({row}, {col})")
            }
            Self::SimilarityOutOfRange { row, col, value } => {
                write!(f, "value {value} at ({row}, {col}) is outside [0, 1]")
            }
            Self::EntityOutOfRange { side, id, size } => {
                write!(f, "{side} entity id {id} out of range (collection size {size})")
            }
            Self::MissingColumn { column } => write!(f, "missing column '{column}'"),
            Self::FieldParse { line, column, value } => {
                write!(f, "line {line}: cannot parse {column} '{value}'")
            }
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ClusterError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_value() {
        let err = ClusterError::EntityOutOfRange { side: "right", id: 7, size: 3 };
        assert_eq!(err.to_string(), "right entity id 7 out of range (collection size 3)");

        let err = ClusterError::MalformedMatrix { row: 1, expected: 3, found: 2 };
        assert!(err.to_string().contains("row 1 has 2 columns, expected 3"));

        let err = ClusterError::MatrixTooLarge { left: 5, right: 9 };
        assert!(err.to_string().contains("5 and 9 entities are too large"));
    }
}
