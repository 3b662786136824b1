//! Exact-match row filtering
use crate::error::ConfigError;
use crate::types::Value;
use crate::{Headers, Table};

/// Keeps rows whose cells equal every required value. Built against a set of
/// headers so that unknown columns are reported before any row is looked at.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    criteria: Vec<(usize, Value)>,
}

impl Filter {
    pub fn new<'a, I>(headers: &Headers, criteria: I) -> Result<Filter, ConfigError>
    where
        I: IntoIterator<Item = (&'a String, &'a Value)>,
    {
        let mut compiled = Vec::new();

        for (column, value) in criteria {
            match headers.get(column) {
                Some(index) => compiled.push((index, value.clone())),
                None => return Err(ConfigError::UnknownFilterColumn(column.clone())),
            }
        }

        Ok(Filter { criteria: compiled })
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    pub fn matches(&self, row: &[Value]) -> bool {
        self.criteria.iter().all(|(index, value)| row[*index] == *value)
    }

    /// A new table with the rows of `table` that match, in their original
    /// order.
    pub fn apply(&self, table: &Table) -> Table {
        let mut filtered = Table::new(table.headers().clone(), table.column_types().to_vec());

        for row in table.rows().iter().filter(|r| self.matches(r)) {
            filtered.push(row.clone());
        }

        filtered
    }
}
