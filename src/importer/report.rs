// ==========================================
// TSMX Customer Import - Report Sink
// ==========================================
// Collects accepted and rejected rows across
// the run and writes the two report tables:
// original columns plus one appended reason
// column ("Motivo do Erro"). Empty streams
// are skipped, never an error.
// ==========================================

use crate::domain::customer::RawRecord;
use crate::importer::error::{ImportError, ImportResult};
use std::path::Path;
use tracing::info;

/// Header of the appended reason column.
pub const REASON_COLUMN: &str = "Motivo do Erro";
/// Title row of the success report.
pub const SUCCESS_TITLE: &str = "Registros Válidos";

struct ReportRow {
    raw: RawRecord,
    reason: String,
}

// ==========================================
// ReportSink
// ==========================================
pub struct ReportSink {
    columns: Vec<String>,
    accepted: Vec<ReportRow>,
    rejected: Vec<ReportRow>,
}

impl ReportSink {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            accepted: Vec::new(),
            rejected: Vec::new(),
        }
    }

    /// Record an accepted row (blank reason).
    pub fn push_accepted(&mut self, raw: &RawRecord) {
        self.accepted.push(ReportRow {
            raw: raw.clone(),
            reason: String::new(),
        });
    }

    /// Record a rejected row with its joined reasons.
    pub fn push_rejected(&mut self, raw: &RawRecord, reasons: &[String]) {
        self.rejected.push(ReportRow {
            raw: raw.clone(),
            reason: reasons.join("; "),
        });
    }

    pub fn accepted_count(&self) -> usize {
        self.accepted.len()
    }

    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }

    /// Write both report files. A report with no rows is skipped.
    pub fn write_reports(&self, success_path: &Path, errors_path: &Path) -> ImportResult<()> {
        if !self.accepted.is_empty() {
            self.write_table(success_path, &self.accepted, Some(SUCCESS_TITLE))?;
            info!(path = %success_path.display(), rows = self.accepted.len(), "relatório de registros importados gravado");
        }

        if !self.rejected.is_empty() {
            self.write_table(errors_path, &self.rejected, None)?;
            info!(path = %errors_path.display(), rows = self.rejected.len(), "relatório de erros gravado");
        }

        Ok(())
    }

    fn write_table(
        &self,
        path: &Path,
        rows: &[ReportRow],
        title: Option<&str>,
    ) -> ImportResult<()> {
        let mut writer = csv::Writer::from_path(path).map_err(|e| {
            ImportError::ReportWriteError {
                path: path.display().to_string(),
                message: e.to_string(),
            }
        })?;

        let width = self.columns.len() + 1;

        if let Some(title) = title {
            let mut title_row = vec![title.to_string()];
            title_row.resize(width, String::new());
            writer.write_record(&title_row)?;
        }

        let mut header: Vec<String> = self.columns.clone();
        header.push(REASON_COLUMN.to_string());
        writer.write_record(&header)?;

        for row in rows {
            let mut record: Vec<String> = self
                .columns
                .iter()
                .map(|column| row.raw.get(column).to_string())
                .collect();
            record.push(row.reason.clone());
            writer.write_record(&record)?;
        }

        writer.flush().map_err(|e| ImportError::ReportWriteError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }
}
