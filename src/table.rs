use std::fmt;
use std::iter;

use crate::error::ReadError;
use crate::types::{ColumnType, Value};
use crate::{Headers, Row};

/// Rows of typed cells under a set of named columns. Lives for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    headers: Headers,
    types: Vec<ColumnType>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// An empty table with the given columns.
    pub fn new(headers: Headers, types: Vec<ColumnType>) -> Table {
        debug_assert_eq!(headers.len(), types.len());

        Table {
            headers,
            types,
            rows: Vec::new(),
        }
    }

    /// Builds a table from decoded text records, each tagged with the line it
    /// came from. Columns with a declared type are cast to it, the rest get
    /// the type inferred from their cells. The first cell that does not cast
    /// fails the whole table.
    pub(crate) fn from_records(
        headers: Headers,
        records: Vec<(u64, Row)>,
        declared: &[Option<ColumnType>],
    ) -> Result<Table, ReadError> {
        let types: Vec<ColumnType> = declared
            .iter()
            .enumerate()
            .map(|(i, ty)| match *ty {
                Some(ty) => ty,
                None => ColumnType::infer(records.iter().map(|(_, r)| &r[i])),
            })
            .collect();

        let mut table = Table::new(headers, types);
        table.rows.reserve(records.len());

        for (line, record) in records.iter() {
            let mut row = Vec::with_capacity(table.types.len());

            for ((raw, ty), name) in record.iter().zip(&table.types).zip(table.headers.iter()) {
                match ty.cast(raw) {
                    Some(value) => row.push(value),
                    None => {
                        return Err(ReadError::Cast {
                            column: name.to_string(),
                            line: *line,
                            value: raw.to_string(),
                            ty: *ty,
                        })
                    }
                }
            }

            table.rows.push(row);
        }

        Ok(table)
    }

    pub(crate) fn push(&mut self, row: Vec<Value>) {
        debug_assert_eq!(row.len(), self.types.len());

        self.rows.push(row);
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn column_types(&self) -> &[ColumnType] {
        &self.types
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The cell at `row` under `column`, if both exist.
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let index = self.headers.get(column)?;

        self.rows.get(row).and_then(|r| r.get(index))
    }

    /// Every cell of `column`, top to bottom.
    pub fn column(&self, column: &str) -> Option<Vec<&Value>> {
        let index = self.headers.get(column)?;

        Some(self.rows.iter().map(|r| &r[index]).collect())
    }
}

/// Right-aligned columns under their headers, each row prefixed by its
/// position.
impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|r| r.iter().map(|v| v.to_string()).collect())
            .collect();

        let index_width = self.rows.len().saturating_sub(1).to_string().len();

        let widths: Vec<usize> = self
            .headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                cells
                    .iter()
                    .map(|r| r[i].chars().count())
                    .chain(iter::once(h.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        write!(f, "{:w$}", "", w = index_width)?;
        for (header, width) in self.headers.iter().zip(&widths) {
            write!(f, "  {:>w$}", header, w = *width)?;
        }

        for (i, row) in cells.iter().enumerate() {
            write!(f, "\n{:<w$}", i, w = index_width)?;
            for (cell, width) in row.iter().zip(&widths) {
                write!(f, "  {:>w$}", cell, w = *width)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Table;
    use crate::error::ReadError;
    use crate::types::{ColumnType, Value};
    use crate::{Headers, Row};

    fn records(rows: Vec<Vec<&str>>) -> Vec<(u64, Row)> {
        rows.into_iter()
            .enumerate()
            .map(|(i, r)| (i as u64 + 2, Row::from(r)))
            .collect()
    }

    #[test]
    fn declared_and_inferred_types() {
        let table = Table::from_records(
            Headers::from(vec!["customer_id", "phone", "state"]),
            records(vec![vec!["1", "834234234", "NY"], vec!["2", "", "CA"]]),
            &[None, Some(ColumnType::String), None],
        )
        .unwrap();

        assert_eq!(
            table.column_types(),
            &[ColumnType::Integer, ColumnType::String, ColumnType::String]
        );
        assert_eq!(table.get(0, "customer_id"), Some(&Value::Int(1)));
        assert_eq!(table.get(0, "phone"), Some(&Value::from("834234234")));
        assert_eq!(table.get(1, "phone"), Some(&Value::Null));
        assert_eq!(table.get(2, "phone"), None);
        assert_eq!(
            table.column("state"),
            Some(vec![&Value::from("NY"), &Value::from("CA")])
        );
    }

    #[test]
    fn cast_failure_names_the_cell() {
        let result = Table::from_records(
            Headers::from(vec!["customer_id", "first_name"]),
            records(vec![vec!["1", "Debra"], vec!["two", "Kasha"]]),
            &[Some(ColumnType::Integer), None],
        );

        match result {
            Err(ReadError::Cast { column, line, value, ty }) => {
                assert_eq!(column, "customer_id");
                assert_eq!(line, 3);
                assert_eq!(value, "two");
                assert_eq!(ty, ColumnType::Integer);
            }
            other => panic!("expected a cast error, got {:?}", other),
        }
    }

    #[test]
    fn display_aligns_columns() {
        let mut table = Table::new(
            Headers::from(vec!["customer_id", "first_name"]),
            vec![ColumnType::Integer, ColumnType::String],
        );
        table.push(vec![Value::Int(1), Value::from("Debra")]);
        table.push(vec![Value::Int(2), Value::from("Kasha")]);

        assert_eq!(
            table.to_string(),
            "   customer_id  first_name\n0            1       Debra\n1            2       Kasha",
        );
    }
}
