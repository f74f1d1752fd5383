/// Flat-record persistence for assessed readings.
///
/// One JSON object per line, append-only. This deliberately stays a plain
/// file: the record volume is a handful of frames per device per hour, and
/// readers (the dashboard export) always want the full history anyway.
///
/// Loading is tolerant of damage — a malformed line is skipped and counted
/// rather than failing the whole read, so one interrupted append cannot
/// take down the export.

use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::logging::{self, DataSource};
use crate::model::{AssessmentRecord, TelemetryError};

pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one assessed record as a JSON line, creating the file on
    /// first write.
    pub fn append(&self, record: &AssessmentRecord) -> Result<(), TelemetryError> {
        let line = serde_json::to_string(record)
            .map_err(|e| TelemetryError::ParseError(e.to_string()))?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| TelemetryError::Io(format!("{}: {}", self.path.display(), e)))?;
        writeln!(file, "{}", line)
            .map_err(|e| TelemetryError::Io(format!("{}: {}", self.path.display(), e)))?;
        Ok(())
    }

    /// Reads every stored record. A missing file yields an empty list;
    /// malformed lines are skipped with a warning.
    pub fn load_all(&self) -> Result<Vec<AssessmentRecord>, TelemetryError> {
        let file = match OpenOptions::new().read(true).open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(TelemetryError::Io(format!("{}: {}", self.path.display(), e)));
            }
        };

        let mut records = Vec::new();
        let mut skipped = 0usize;
        for line in BufReader::new(file).lines() {
            let line = line
                .map_err(|e| TelemetryError::Io(format!("{}: {}", self.path.display(), e)))?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<AssessmentRecord>(&line) {
                Ok(record) => records.push(record),
                Err(_) => skipped += 1,
            }
        }

        if skipped > 0 {
            logging::warn(
                DataSource::Store,
                None,
                &format!("skipped {} malformed record line(s)", skipped),
            );
        }

        Ok(records)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
