use thiserror::Error;

use crate::element_sets::ParseTleError;

#[derive(Error, Debug)]
pub enum OverheadError {
    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Invalid configuration file: {0}")]
    ConfigError(#[from] toml::de::Error),

    #[error("Error while parsing the element set at line {line}: {source}")]
    ElementSetParsing { line: usize, source: ParseTleError },

    #[error("The element-set archive does not contain any entry")]
    EmptyArchive,

    #[error("Column not found in the input header: {0}")]
    MissingColumn(String),

    #[error("Invalid visibility threshold: {0} km")]
    InvalidThreshold(f64),
}

impl PartialEq for OverheadError {
    fn eq(&self, other: &Self) -> bool {
        use OverheadError::*;
        match (self, other) {
            // Not comparable: equal if same variant
            (IoError(_), IoError(_)) => true,
            (CsvError(_), CsvError(_)) => true,
            (ConfigError(_), ConfigError(_)) => true,

            (
                ElementSetParsing {
                    line: la,
                    source: sa,
                },
                ElementSetParsing {
                    line: lb,
                    source: sb,
                },
            ) => la == lb && sa == sb,
            (MissingColumn(a), MissingColumn(b)) => a == b,
            (InvalidThreshold(a), InvalidThreshold(b)) => a == b,

            (EmptyArchive, EmptyArchive) => true,

            _ => false,
        }
    }
}
