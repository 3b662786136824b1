use std::path::PathBuf;
use std::{io, result};

use thiserror::Error;

use crate::config::Violation;
use crate::types::ColumnType;

/// The class an error belongs to. Used by the binary to pick an exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Parse,
    DataRead,
    DataWrite,
}

/// An error found somewhere between loading the configuration and writing
/// the output file.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    DataRead(#[from] ReadError),

    #[error(transparent)]
    DataWrite(#[from] WriteError),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match *self {
            Error::Config(_) => ErrorKind::Config,
            Error::Parse(_) => ErrorKind::Parse,
            Error::DataRead(_) => ErrorKind::DataRead,
            Error::DataWrite(_) => ErrorKind::DataWrite,
        }
    }
}

pub type Result<T> = result::Result<T, Error>;

fn join(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// The configuration was loaded but cannot drive a run.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {}", join(.0))]
    Invalid(Vec<Violation>),

    #[error("`{0}` is not set in the configuration")]
    MissingPath(&'static str),

    #[error("unknown input encoding `{0}`")]
    UnknownEncoding(String),

    #[error("filter refers to column `{0}` which is not among the selected fields")]
    UnknownFilterColumn(String),
}

/// The configuration document could not be turned into a `Config`.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("cannot read configuration {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("malformed configuration in {origin}: {source}")]
    Yaml {
        origin: String,
        source: serde_yaml::Error,
    },
}

/// Failures while reading or casting the source file.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("cannot open {path:?}: {source}")]
    Open { path: PathBuf, source: csv::Error },

    #[error("{0:?} is empty")]
    Empty(PathBuf),

    #[error("column `{column}` not found in {path:?}")]
    ColumnNotFound { column: String, path: PathBuf },

    #[error("malformed CSV in {path:?}: {source}")]
    Csv { path: PathBuf, source: csv::Error },

    #[error("line {line} of {path:?} is not valid {encoding}")]
    Decode {
        path: PathBuf,
        line: u64,
        encoding: &'static str,
    },

    #[error("line {line}: cannot cast `{value}` in column `{column}` to {ty}")]
    Cast {
        column: String,
        line: u64,
        value: String,
        ty: ColumnType,
    },
}

/// Failures while writing the destination file.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("cannot create {path:?}: {source}")]
    Create { path: PathBuf, source: csv::Error },

    #[error("cannot write to {path:?}: {source}")]
    Write { path: PathBuf, source: csv::Error },

    #[error("cannot flush {path:?}: {source}")]
    Flush { path: PathBuf, source: io::Error },
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, Error, ErrorKind, ReadError};
    use crate::config::Violation;
    use std::path::PathBuf;

    #[test]
    fn kinds_follow_the_wrapped_error() {
        let err = Error::from(ConfigError::MissingPath("output_data_path"));
        assert_eq!(err.kind(), ErrorKind::Config);

        let err = Error::from(ReadError::Empty(PathBuf::from("a.csv")));
        assert_eq!(err.kind(), ErrorKind::DataRead);
    }

    #[test]
    fn invalid_lists_every_violation() {
        let err = ConfigError::Invalid(vec![
            Violation::MissingFields,
            Violation::DuplicateField("city".to_string()),
        ]);

        assert_eq!(
            err.to_string(),
            "invalid configuration: `fields` is missing or empty; field `city` is listed more than once",
        );
    }
}
