//! Ordered, append-only view of a report file.

use std::io::{Read, Write};
use std::path::Path;

use tracing::debug;

use crate::{ReportError, Result};

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;

/// A header row plus data rows, kept as raw strings.
///
/// Every row has exactly as many cells as there are headers; short rows
/// read from disk are padded with empty cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl ReportTable {
    /// An empty table with the given columns.
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Reads a report from `path`.
    pub fn read_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let table = Self::from_reader(file)?;
        debug!(path = %path.display(), rows = table.len(), "Read report");
        Ok(table)
    }

    /// Reads a report from any byte source.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            row.resize(headers.len().max(row.len()), String::new());
            rows.push(row);
        }

        let mut table = Self { headers, rows };
        table.normalise_width();
        Ok(table)
    }

    /// Writes the table to `path`, replacing any existing file atomically.
    pub fn write_path(&self, path: &Path) -> Result<()> {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut temp = tempfile::NamedTempFile::new_in(dir)?;
        self.to_writer(temp.as_file_mut())?;
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| ReportError::Io(e.error))?;
        debug!(path = %path.display(), rows = self.len(), "Wrote report");
        Ok(())
    }

    /// Serialises the table as CSV with CRLF record terminators.
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::CRLF)
            .from_writer(writer);
        csv_writer.write_record(&self.headers)?;
        for row in &self.rows {
            csv_writer.write_record(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the column named `name`.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Index of `name`, appending it (with empty cells) if it is not there yet.
    pub fn ensure_column(&mut self, name: &str) -> usize {
        if let Some(index) = self.column(name) {
            return index;
        }
        self.headers.push(name.to_string());
        for row in &mut self.rows {
            row.push(String::new());
        }
        self.headers.len() - 1
    }

    /// Appends each missing column of `names`, in order.
    pub fn ensure_columns(&mut self, names: &[&str]) {
        for name in names {
            self.ensure_column(name);
        }
    }

    /// Fails with [`ReportError::MissingColumns`] listing every absent column.
    pub fn require_columns(&self, names: &[&str]) -> Result<()> {
        let missing: Vec<String> = names
            .iter()
            .filter(|name| self.column(name).is_none())
            .map(|name| name.to_string())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ReportError::MissingColumns { missing })
        }
    }

    /// Cell text of `row` in column `name`; empty if the column does not exist.
    pub fn cell(&self, row: usize, name: &str) -> &str {
        self.column(name)
            .and_then(|col| self.rows.get(row).and_then(|r| r.get(col)))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Sets the cell of `row` in column `name`, appending the column if needed.
    ///
    /// # Panics
    ///
    /// Panics if `row` is out of bounds.
    pub fn set_cell(&mut self, row: usize, name: &str, value: impl Into<String>) {
        let col = self.ensure_column(name);
        self.rows[row][col] = value.into();
    }

    /// Appends a row, padding or truncating it to the header width.
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    // Rows longer than the header get anonymous columns so no cell is lost.
    fn normalise_width(&mut self) {
        let widest = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        while self.headers.len() < widest {
            self.headers.push(String::new());
        }
        let width = self.headers.len();
        for row in &mut self.rows {
            row.resize(width, String::new());
        }
    }
}
