use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Context;

use crate::types::RenderBenchResult;

/// Column names written as the first line of every report.
pub const RESULT_COLUMNS: [&str; 3] = ["Test Name", "Render Time", "Peak Memory"];

/// One line of the results CSV.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultRow {
    pub test_name: String,
    /// As printed by the renderer, empty if it never reported one
    pub render_time: String,
    /// As printed by the renderer, empty if it never reported one
    pub peak_memory: String,
}

/// Writes results as CSV, flushing after every row so a failed run keeps the rows written so far.
pub struct CsvReport<W: Write> {
    writer: W,
}

impl CsvReport<BufWriter<File>> {
    /// Create (or truncate) the report file and write the header.
    pub fn create(path: &Path) -> RenderBenchResult<Self> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file '{}'", path.display()))?;

        CsvReport::new(BufWriter::new(file))
            .with_context(|| format!("Failed to write header to '{}'", path.display()))
    }
}

impl<W: Write> CsvReport<W> {
    pub fn new(writer: W) -> std::io::Result<Self> {
        let mut report = Self { writer };
        report.write_record(&RESULT_COLUMNS)?;
        Ok(report)
    }

    pub fn write_row(&mut self, row: &ResultRow) -> std::io::Result<()> {
        self.write_record(&[
            row.test_name.as_str(),
            row.render_time.as_str(),
            row.peak_memory.as_str(),
        ])
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_record(&mut self, fields: &[&str]) -> std::io::Result<()> {
        let line = fields
            .iter()
            .map(|field| quote_field(field))
            .collect::<Vec<_>>()
            .join(",");
        writeln!(self.writer, "{line}")?;
        self.writer.flush()
    }
}

/// Quote a field only when it contains a separator, a quote or a line break.
fn quote_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}
