use std::fmt;

#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (bad tolerance, empty path, etc.).
    ConfigValidation(String),
    /// Answer key is unparseable or incomplete.
    AnswerKey(String),
    /// Missing required column in input data.
    MissingColumn { table: String, column: String },
    /// A cell could not be parsed as the column's numeric type.
    ValueParse { table: String, row: usize, column: String, value: String },
    /// CSV structure error (ragged rows, bad quoting, invalid UTF-8).
    Csv { table: String, message: String },
    /// Table has no data rows where at least one is required.
    EmptyTable(String),
    /// IO error (file read, etc.).
    Io(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::AnswerKey(msg) => write!(f, "answer key error: {msg}"),
            Self::MissingColumn { table, column } => {
                write!(f, "table '{table}': missing column '{column}'")
            }
            Self::ValueParse { table, row, column, value } => {
                write!(f, "table '{table}', row {row}: cannot parse {column} value '{value}'")
            }
            Self::Csv { table, message } => write!(f, "table '{table}': {message}"),
            Self::EmptyTable(table) => write!(f, "table '{table}' has no data rows"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}

impl ReconError {
    /// True for errors raised while reading or parsing the input tables.
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            Self::MissingColumn { .. }
                | Self::ValueParse { .. }
                | Self::Csv { .. }
                | Self::EmptyTable(_)
                | Self::Io(_)
        )
    }
}
