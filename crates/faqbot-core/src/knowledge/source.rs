//! CSV-backed record source (the export of the FAQ spreadsheet).

use super::{FaqRecord, RecordSource};
use crate::error::KnowledgeBaseUnavailable;
use std::path::{Path, PathBuf};

/// Reads `question,answer[,category]` rows from a CSV file with a header line.
///
/// Headers are matched after trimming and lower-casing, so `Pregunta` and ` RESPUESTA `
/// resolve to the Spanish aliases of [`FaqRecord`].
#[derive(Debug, Clone)]
pub struct CsvRecordSource {
    path: PathBuf,
}

impl CsvRecordSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn malformed(&self, reason: impl ToString) -> KnowledgeBaseUnavailable {
        KnowledgeBaseUnavailable::Malformed {
            path: self.path.clone(),
            reason: reason.to_string(),
        }
    }
}

impl RecordSource for CsvRecordSource {
    fn load(&self) -> Result<Vec<FaqRecord>, KnowledgeBaseUnavailable> {
        if !self.path.exists() {
            return Err(KnowledgeBaseUnavailable::NotFound(self.path.clone()));
        }

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| self.malformed(e))?;

        let headers: csv::StringRecord = reader
            .headers()
            .map_err(|e| self.malformed(e))?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_lowercase())
            .collect();

        // Short rows are fine (the category column is optional); long rows mean an
        // unquoted comma split a field.
        let mut records = Vec::new();
        for row in reader.records() {
            let row = row.map_err(|e| self.malformed(e))?;
            if row.len() > headers.len() {
                let line = row.position().map_or(0, |p| p.line());
                return Err(self.malformed(format!(
                    "line {}: expected at most {} fields, found {}",
                    line,
                    headers.len(),
                    row.len()
                )));
            }
            records.push(
                row.deserialize::<FaqRecord>(Some(&headers))
                    .map_err(|e| self.malformed(e))?,
            );
        }
        Ok(records)
    }
}
