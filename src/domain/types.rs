// ==========================================
// TSMX Customer Import - Scalar Types
// ==========================================
// CellValue models the untyped spreadsheet
// scalar at the input boundary; validators
// normalize it into concrete domain types.
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// CellValue - Raw Input Scalar
// ==========================================
// Excel cells keep their numeric type (date
// serials, due days); CSV yields text only;
// blank cells map to Absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Absent,
    Text(String),
    Number(f64),
}

impl CellValue {
    /// Parse a CSV field: blank after trim is Absent, everything else Text.
    pub fn from_csv_field(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            CellValue::Absent
        } else {
            CellValue::Text(trimmed.to_string())
        }
    }

    pub fn is_absent(&self) -> bool {
        match self {
            CellValue::Absent => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(_) => false,
        }
    }

    /// Trimmed textual form, None when absent/blank.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Absent => None,
            CellValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            CellValue::Number(n) => Some(format_number(*n)),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Absent => Ok(()),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Number(n) => write!(f, "{}", format_number(*n)),
        }
    }
}

/// Integral floats print without the fractional part ("15", not "15.0"),
/// matching how the numbers appear in the source spreadsheet.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

// ==========================================
// ContactKind - Contact Type Vocabulary
// ==========================================
// Ids align with the tbl_tipos_contato seeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactKind {
    Landline,
    Mobile,
    Email,
}

impl ContactKind {
    pub fn id(&self) -> i64 {
        match self {
            ContactKind::Landline => 1,
            ContactKind::Mobile => 2,
            ContactKind::Email => 3,
        }
    }

    /// Label as seeded in tbl_tipos_contato.
    pub fn label(&self) -> &'static str {
        match self {
            ContactKind::Landline => "Telefone",
            ContactKind::Mobile => "Celular",
            ContactKind::Email => "E-Mail",
        }
    }
}
