use csv::{ByteRecord, Reader};
use encoding::{DecoderTrap, EncodingRef};
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::config::FieldSpec;
use crate::error::ReadError;
use crate::{Headers, Row, Table};

fn decode(data: &[u8], encoding: EncodingRef) -> Option<String> {
    encoding.decode(data, DecoderTrap::Strict).ok()
}

fn decode_record(data: &ByteRecord, encoding: EncodingRef) -> Option<Row> {
    let mut row = Row::with_capacity(data.as_slice().len(), data.len());

    for item in data.iter() {
        row.push_field(&decode(item, encoding)?);
    }

    Some(row)
}

/// A CSV file with a header row, decoded with a known encoding.
pub struct ReaderSource {
    reader: Reader<File>,
    path: PathBuf,
    encoding: EncodingRef,
}

impl ReaderSource {
    pub fn from_reader<P: AsRef<Path>>(
        reader: Reader<File>,
        path: P,
        encoding: EncodingRef,
    ) -> ReaderSource {
        ReaderSource {
            reader,
            path: path.as_ref().to_path_buf(),
            encoding,
        }
    }

    pub fn from_path<P: AsRef<Path>>(
        path: P,
        encoding: EncodingRef,
    ) -> Result<ReaderSource, ReadError> {
        let reader = csv::Reader::from_path(&path).map_err(|source| ReadError::Open {
            path: path.as_ref().to_path_buf(),
            source,
        })?;

        Ok(ReaderSource::from_reader(reader, path, encoding))
    }

    /// Headers of the file. A file without a header row is empty.
    pub fn headers(&mut self) -> Result<Headers, ReadError> {
        let data = match self.reader.byte_headers() {
            Ok(data) => data.clone(),
            Err(source) => {
                return Err(ReadError::Csv {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if data.is_empty() {
            return Err(ReadError::Empty(self.path.clone()));
        }

        match decode_record(&data, self.encoding) {
            Some(row) => Ok(Headers::from_row(row)),
            None => Err(ReadError::Decode {
                path: self.path.clone(),
                line: 1,
                encoding: self.encoding.name(),
            }),
        }
    }

    /// Reads the whole file keeping only `fields`, in the order they are
    /// listed, cast to their declared types.
    pub fn read_table(mut self, fields: &[FieldSpec]) -> Result<Table, ReadError> {
        let file_headers = self.headers()?;

        let mut positions = Vec::with_capacity(fields.len());
        let mut names = Row::with_capacity(0, fields.len());

        for field in fields.iter() {
            match file_headers.get(&field.name) {
                Some(position) => positions.push(position),
                None => {
                    return Err(ReadError::ColumnNotFound {
                        column: field.name.clone(),
                        path: self.path.clone(),
                    })
                }
            }

            names.push_field(&field.name);
        }

        let mut records = Vec::new();
        let mut data = ByteRecord::new();

        loop {
            match self.reader.read_byte_record(&mut data) {
                Ok(true) => {}
                Ok(false) => break,
                Err(source) => {
                    return Err(ReadError::Csv {
                        path: self.path.clone(),
                        source,
                    })
                }
            }

            let line = data.position().map_or(0, |p| p.line());
            let mut row = Row::with_capacity(data.as_slice().len(), positions.len());

            for &position in positions.iter() {
                match decode(&data[position], self.encoding) {
                    Some(field) => row.push_field(&field),
                    None => {
                        return Err(ReadError::Decode {
                            path: self.path.clone(),
                            line,
                            encoding: self.encoding.name(),
                        })
                    }
                }
            }

            records.push((line, row));
        }

        let declared: Vec<_> = fields.iter().map(|f| f.ty).collect();

        Table::from_records(Headers::from_row(names), records, &declared)
    }
}
