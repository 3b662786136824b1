use csv::Writer;
use std::fs::File;
use std::path::Path;

use crate::error::WriteError;
use crate::{Row, Table, Value};

fn to_row(values: &[Value], row: &mut Row) {
    row.clear();

    for value in values.iter() {
        row.push_field(&value.to_string());
    }
}

/// Writes `table` to `path` as comma separated text: a header row and then
/// every row in order, without an index column. An existing file is
/// truncated; missing parent directories are an error.
pub fn write_table<P: AsRef<Path>>(table: &Table, path: P) -> Result<(), WriteError> {
    let path = path.as_ref();

    let mut writer: Writer<File> = Writer::from_path(path).map_err(|source| WriteError::Create {
        path: path.to_path_buf(),
        source,
    })?;

    let write_err = |source| WriteError::Write {
        path: path.to_path_buf(),
        source,
    };

    writer
        .write_record(table.headers().as_row())
        .map_err(write_err)?;

    let mut row = Row::with_capacity(0, table.headers().len());

    for values in table.rows().iter() {
        to_row(values, &mut row);
        writer.write_record(&row).map_err(write_err)?;
    }

    writer.flush().map_err(|source| WriteError::Flush {
        path: path.to_path_buf(),
        source,
    })
}
