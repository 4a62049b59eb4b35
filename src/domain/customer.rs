// ==========================================
// TSMX Customer Import - Customer Domain Model
// ==========================================
// RawSheet/RawRecord: parsed input rows.
// CustomerRecord: normalized row (validator output).
// RowOutcome: normalized record + accumulated reasons.
// NewClient/NewContract: repository write payloads.
// ImportSummary: end-of-run metrics.
// ==========================================

use crate::domain::types::CellValue;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

// ==========================================
// RawSheet - Parsed Input File
// ==========================================
// Column order is preserved for the report
// writers and the required-column check.
#[derive(Debug, Clone)]
pub struct RawSheet {
    pub columns: Vec<String>,
    pub rows: Vec<RawRecord>,
}

// ==========================================
// RawRecord - One Input Row
// ==========================================
// Immutable once read; row_number is 1-based
// over data rows (header excluded), used in
// logs and reports.
#[derive(Debug, Clone)]
pub struct RawRecord {
    pub row_number: usize,
    pub cells: HashMap<String, CellValue>,
}

impl RawRecord {
    pub fn get(&self, column: &str) -> &CellValue {
        self.cells.get(column).unwrap_or(&CellValue::Absent)
    }
}

// ==========================================
// FieldOutcome - Validator Result
// ==========================================
// A validator never fails: invalid input maps
// to the field's documented sentinel plus a
// human-readable reason.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldOutcome<T> {
    pub value: T,
    pub reason: Option<String>,
}

impl<T> FieldOutcome<T> {
    pub fn ok(value: T) -> Self {
        Self {
            value,
            reason: None,
        }
    }

    pub fn invalid(value: T, reason: impl Into<String>) -> Self {
        Self {
            value,
            reason: Some(reason.into()),
        }
    }
}

// ==========================================
// CustomerRecord - Normalized Row
// ==========================================
// Every input field has an entry even when
// invalid (sentinel values documented per
// validator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    // Identity
    pub tax_id: String, // CPF (11) or CNPJ (14); sentinel "00000000000"
    pub legal_name: Option<String>,
    pub trade_name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub registration_date: Option<NaiveDate>,

    // Contacts
    pub mobile_phone: Option<String>,   // normalized "+55XXXXXXXXXXX"
    pub landline_phone: Option<String>, // normalized "+55XXXXXXXXXX"
    pub email: Option<String>,

    // Billing
    pub plan_name: Option<String>,
    pub plan_price: f64, // sentinel 0.0
    pub due_day: u32,    // 1..=31; sentinel 1
    pub exempt: bool,

    // Address
    pub street: Option<String>,
    pub number: Option<String>,
    pub district: Option<String>,
    pub city: Option<String>,
    pub complement: Option<String>,
    pub postal_code: String, // 8 digits; sentinel "00000000"
    pub state: String,       // 2-letter UF; sentinel "XX"

    // Contract
    pub status: Option<String>,
}

// ==========================================
// RowOutcome - Row Validation Result
// ==========================================
#[derive(Debug, Clone)]
pub struct RowOutcome {
    pub record: CustomerRecord,
    pub reasons: Vec<String>,
}

impl RowOutcome {
    /// A row is accepted iff no validator produced a reason.
    pub fn accepted(&self) -> bool {
        self.reasons.is_empty()
    }
}

// ==========================================
// NewClient / NewContract - Write Payloads
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewClient {
    pub tax_id: String,
    pub legal_name: String,
    pub trade_name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub registration_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewContract {
    pub client_id: i64,
    pub plan_id: i64,
    pub status_id: i64,
    pub due_day: u32,
    pub exempt: bool,
    pub street: String,
    pub number: Option<String>,
    pub district: Option<String>,
    pub city: Option<String>,
    pub complement: Option<String>,
    pub postal_code: String,
    pub state: String,
}

// ==========================================
// ImportSummary - End-of-Run Metrics
// ==========================================
// Mirrors the per-run counters the operators
// read from the log tail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportSummary {
    pub batch_id: String,
    pub file_name: Option<String>,
    pub total_rows: usize,
    pub accepted_rows: usize,
    pub rejected_rows: usize,
    pub clients_upserted: usize,
    pub contacts_inserted: usize,
    pub contracts_inserted: usize,
    #[serde(skip)]
    pub elapsed: Duration,
}

impl ImportSummary {
    pub fn new(batch_id: String, file_name: Option<String>) -> Self {
        Self {
            batch_id,
            file_name,
            total_rows: 0,
            accepted_rows: 0,
            rejected_rows: 0,
            clients_upserted: 0,
            contacts_inserted: 0,
            contracts_inserted: 0,
            elapsed: Duration::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_record_missing_column_is_absent() {
        let record = RawRecord {
            row_number: 1,
            cells: HashMap::new(),
        };
        assert_eq!(record.get("CPF/CNPJ"), &CellValue::Absent);
    }

    #[test]
    fn test_row_outcome_accepted() {
        let outcome = RowOutcome {
            record: sample_record(),
            reasons: vec![],
        };
        assert!(outcome.accepted());

        let outcome = RowOutcome {
            record: sample_record(),
            reasons: vec!["CEP ausente ou vazio.".to_string()],
        };
        assert!(!outcome.accepted());
    }

    fn sample_record() -> CustomerRecord {
        CustomerRecord {
            tax_id: "52998224725".to_string(),
            legal_name: Some("Fulano de Tal".to_string()),
            trade_name: None,
            birth_date: None,
            registration_date: None,
            mobile_phone: None,
            landline_phone: None,
            email: None,
            plan_name: Some("Fibra 300MB".to_string()),
            plan_price: 99.9,
            due_day: 10,
            exempt: false,
            street: Some("Rua das Flores".to_string()),
            number: Some("100".to_string()),
            district: None,
            city: None,
            complement: None,
            postal_code: "88000000".to_string(),
            state: "SC".to_string(),
            status: Some("Ativo".to_string()),
        }
    }
}
