// ==========================================
// TSMX Customer Import - File Parsers
// ==========================================
// Stage 0: file reading and parsing.
// Supports Excel (.xlsx/.xls) and CSV (.csv).
// ==========================================

use crate::domain::customer::{RawRecord, RawSheet};
use crate::domain::types::CellValue;
use crate::importer::customer_importer_trait::FileParser;
use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook, Data, Reader, Xlsx};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

// ==========================================
// CSV Parser
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<RawSheet> {
        let path = file_path;

        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // tolerate ragged rows
            .from_reader(file);

        let columns: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        let mut row_number = 0usize;
        for result in reader.records() {
            let record = result?;
            row_number += 1;

            let mut cells = HashMap::new();
            for (col_idx, value) in record.iter().enumerate() {
                if let Some(header) = columns.get(col_idx) {
                    cells.insert(header.clone(), CellValue::from_csv_field(value));
                }
            }

            // Skip fully blank rows.
            if cells.values().all(|v| v.is_absent()) {
                continue;
            }

            rows.push(RawRecord { row_number, cells });
        }

        Ok(RawSheet { columns, rows })
    }
}

// ==========================================
// Excel Parser
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<RawSheet> {
        let path = file_path;

        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let mut workbook: Xlsx<_> = open_workbook(path)
            .map_err(|e: calamine::XlsxError| ImportError::ExcelParseError(e.to_string()))?;

        // First sheet only, as the source system exports a single tab.
        let sheet_names = workbook.sheet_names();
        if sheet_names.is_empty() {
            return Err(ImportError::ExcelParseError(
                "planilha sem abas".to_string(),
            ));
        }

        let sheet_name = sheet_names[0].clone();
        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| ImportError::ExcelParseError(e.to_string()))?;

        let mut sheet_rows = range.rows();
        let header_row = sheet_rows
            .next()
            .ok_or_else(|| ImportError::ExcelParseError("planilha sem linhas".to_string()))?;

        let columns: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        let mut rows = Vec::new();
        let mut row_number = 0usize;
        for data_row in sheet_rows {
            row_number += 1;

            let mut cells = HashMap::new();
            for (col_idx, cell) in data_row.iter().enumerate() {
                if let Some(header) = columns.get(col_idx) {
                    cells.insert(header.clone(), convert_cell(cell));
                }
            }

            if cells.values().all(|v| v.is_absent()) {
                continue;
            }

            rows.push(RawRecord { row_number, cells });
        }

        Ok(RawSheet { columns, rows })
    }
}

/// Excel cells keep their scalar type: the date and due-day validators need
/// the raw numeric serial, not its textual rendering.
fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Absent,
        Data::String(s) => CellValue::from_csv_field(s),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Text(b.to_string()),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::from_csv_field(s),
        Data::Error(_) => CellValue::Absent,
    }
}

// ==========================================
// Universal Parser (extension-dispatched)
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<RawSheet> {
        let path = file_path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => CsvParser.parse_to_raw_records(path),
            "xlsx" | "xls" => ExcelParser.parse_to_raw_records(path),
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }
}

impl FileParser for UniversalFileParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<RawSheet> {
        self.parse(file_path)
    }
}
