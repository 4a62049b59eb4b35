// ==========================================
// TSMX Customer Import - Importer Traits
// ==========================================
// Interface seams of the import pipeline
// (no implementations here).
// ==========================================

use crate::domain::customer::{ImportSummary, RawSheet};
use crate::importer::error::ImportResult;
use std::path::Path;

// ==========================================
// FileParser Trait
// ==========================================
// Purpose: stage 0, file reading/parsing
// Implementors: CsvParser, ExcelParser
pub trait FileParser {
    /// Parse a file into raw records keyed by header name. Blank data rows
    /// are skipped; cell scalars keep their spreadsheet type.
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<RawSheet>;
}

// ==========================================
// CustomerImporter Trait
// ==========================================
// Purpose: full run over one input file
// Implementor: CustomerImporterImpl
pub trait CustomerImporter {
    /// Import every row of the given spreadsheet.
    ///
    /// # Flow (per run)
    /// 1. Parse file, fail fast on missing required columns
    /// 2. Per row: validate -> upsert client -> contacts (best effort)
    ///    -> plan -> status -> contract, one transaction per row
    /// 3. Write the success/error reports
    ///
    /// # Returns
    /// - Ok(ImportSummary): run metrics
    /// - Err: fatal errors only (missing file/columns, report write);
    ///   per-row failures are routed to the error report instead
    fn import_file<P: AsRef<Path>>(&mut self, file_path: P) -> ImportResult<ImportSummary>;
}
