use std::fmt;

use crate::model::Month;

#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty column name, duplicate mapping, etc.).
    ConfigValidation(String),
    /// A required column is absent from the input header.
    MissingColumn { table: String, column: String },
    /// The input could not be read as delimited text.
    Csv { table: String, message: String },
    /// A monthly total does not fit a Decimal.
    Overflow { track: String, column: String, month: Month },
    /// The report could not be written out.
    Output(String),
}

impl ReconError {
    pub(crate) fn csv(table: &str, err: csv::Error) -> Self {
        Self::Csv { table: table.into(), message: err.to_string() }
    }
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingColumn { table, column } => {
                write!(f, "{table}: missing column '{column}'")
            }
            Self::Csv { table, message } => write!(f, "{table}: cannot read CSV: {message}"),
            Self::Overflow { track, column, month } => {
                write!(f, "{track}: '{column}' total for {month} is out of range")
            }
            Self::Output(msg) => write!(f, "output error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}
