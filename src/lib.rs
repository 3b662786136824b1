//! Reads a CSV file, keeps and casts the columns a YAML configuration names,
//! drops the rows that fail its equality filters and writes the rest to a new
//! CSV file.
mod config;
mod error;
mod filter;
mod headers;
mod input;
mod logger;
mod output;
mod processor;
mod table;
mod types;

pub use config::{Config, FieldSpec, Violation};
pub use error::{ConfigError, Error, ErrorKind, ParseError, ReadError, Result, WriteError};
pub use filter::Filter;
pub use headers::Headers;
pub use input::ReaderSource;
pub use logger::Logger;
pub use output::write_table;
pub use processor::Processor;
pub use table::Table;
pub use types::{ColumnType, UnknownType, Value};

type Row = csv::StringRecord;
