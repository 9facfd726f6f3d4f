use pipeline_core::domain::ReportTable;
use pipeline_core::ports::{ReportWriter, Result};
use pipeline_core::PipelineError;
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;

/// CSV writer adapter implementation
///
/// Writes one header row of column names followed by the table rows, no
/// index column. Existing files are overwritten.
#[derive(Debug, Default)]
pub struct CsvReportWriter;

impl CsvReportWriter {
    pub fn new() -> Self {
        Self
    }

    /// Serializes `table` into any writer
    pub fn write_to<W: io::Write>(table: &ReportTable, out: W) -> csv::Result<()> {
        let mut wtr = csv::WriterBuilder::new().from_writer(out);
        wtr.write_record(&table.columns)?;
        for row in &table.rows {
            wtr.write_record(row.iter().map(|cell| cell.to_string()))?;
        }
        wtr.flush()?;
        Ok(())
    }
}

impl ReportWriter for CsvReportWriter {
    fn write(&self, table: &ReportTable, path: &Path) -> Result<()> {
        // Create output directory if it doesn't exist
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| PipelineError::output(path, e))?;
        }

        let file = fs::File::create(path).map_err(|e| PipelineError::output(path, e))?;
        Self::write_to(table, io::BufWriter::new(file)).map_err(|e| PipelineError::output(path, e))?;

        debug!("wrote {} ({} rows) to {}", table.name, table.len(), path.display());
        Ok(())
    }
}
