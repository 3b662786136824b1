use tracing::{debug, info};

use crate::error::Result;
use crate::{write_table, Config, Filter, Logger, ReaderSource, Table};

/// Runs read, filter and write for one configuration. Borrows the
/// configuration for the whole run and never changes it.
#[derive(Debug)]
pub struct Processor<'a> {
    config: &'a Config,
    log: Logger,
}

impl<'a> Processor<'a> {
    pub fn new(config: &'a Config, log: &Logger) -> Processor<'a> {
        Processor {
            config,
            log: log.named("processor"),
        }
    }

    /// Reads the configured fields from the input file, casting the ones that
    /// declare a type.
    pub fn read_data(&self) -> Result<Table> {
        self.log.scope(|| -> Result<Table> {
            info!("Reading data from CSV file.");

            let path = self.config.input_path()?;
            let encoding = self.config.input_encoding()?;

            let table = ReaderSource::from_path(path, encoding)?.read_table(&self.config.fields)?;

            for (name, ty) in table.headers().iter().zip(table.column_types()) {
                debug!(column = name, ty = %ty, "column type");
            }
            info!(rows = table.len(), path = %path.display(), "read data");

            Ok(table)
        })
    }

    /// Keeps the rows that hold every configured filter value. Without
    /// filters the result equals `table`.
    pub fn filter_data(&self, table: &Table) -> Result<Table> {
        self.log.scope(|| -> Result<Table> {
            info!("Filtering data based on criteria.");

            for (column, value) in self.config.filters.iter() {
                debug!(column = column.as_str(), value = ?value, "filter");
            }

            let filter = Filter::new(table.headers(), &self.config.filters)?;
            let filtered = filter.apply(table);

            info!(kept = filtered.len(), of = table.len(), "filtered data");

            Ok(filtered)
        })
    }

    /// Writes `table` to the configured output path. Fails before touching
    /// the filesystem when no output path is configured.
    pub fn write_data(&self, table: &Table) -> Result<()> {
        self.log.scope(|| -> Result<()> {
            info!("Writing data to CSV file.");

            let path = self.config.output_path()?;

            write_table(table, path)?;

            info!(rows = table.len(), path = %path.display(), "wrote data");

            Ok(())
        })
    }

    /// read, filter, write. Returns the table that was written.
    pub fn run(&self) -> Result<Table> {
        let data = self.read_data()?;
        let filtered = self.filter_data(&data)?;

        self.write_data(&filtered)?;

        Ok(filtered)
    }
}
