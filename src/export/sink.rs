use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::export::Backend;

pub const CSV_HEADER: &str = "application_name,tier_name,backend_type,backend_name";

/// Append-only CSV writer. The header is written eagerly so an aborted
/// run still leaves a well-formed partial file. Fields are written
/// unquoted to keep the established output format byte-compatible.
pub struct CsvSink {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl CsvSink {
    /// Create or truncate the output file and write the header line.
    pub fn create(path: &Path) -> std::io::Result<Self> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "{CSV_HEADER}")?;
        writer.flush()?;
        Ok(Self {
            writer,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write one line per row and flush, so rows already emitted survive
    /// a later abort.
    pub fn append_rows(&mut self, rows: &[Backend]) -> std::io::Result<()> {
        for row in rows {
            writeln!(
                self.writer,
                "{},{},{},{}",
                row.application, row.tier, row.backend_type, row.name
            )?;
        }
        self.writer.flush()
    }
}
