use csv::StringRecordIter;
use std::cmp::PartialEq;
use std::collections::HashMap;

use super::Row;

/// Keeps the relationship between column names and their positions.
///
/// When a name repeats, lookups resolve to its first occurrence.
#[derive(Debug, Clone, PartialEq)]
pub struct Headers {
    indexes: HashMap<String, usize>,
    names: Row,
}

impl Headers {
    pub fn from_row(row: Row) -> Headers {
        let mut indexes = HashMap::with_capacity(row.len());

        // A source file may repeat a column name, e.g. `id,name,id`. Keep the
        // first position so `fields` and `filters` read the leftmost column.
        for (index, entry) in row.iter().enumerate() {
            indexes.entry(entry.to_string()).or_insert(index);
        }

        Headers {
            indexes,
            names: row,
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn as_row(&self) -> &Row {
        &self.names
    }

    pub fn get(&self, field: &str) -> Option<usize> {
        self.indexes.get(field).copied()
    }

    pub fn contains_key(&self, field: &str) -> bool {
        self.indexes.contains_key(field)
    }

    pub fn iter(&self) -> StringRecordIter {
        self.names.iter()
    }
}

impl<'a> From<Vec<&'a str>> for Headers {
    fn from(names: Vec<&'a str>) -> Headers {
        Headers::from_row(Row::from(names))
    }
}

impl PartialEq<Headers> for Row {
    fn eq(&self, other: &Headers) -> bool {
        self == other.as_row()
    }
}
