// ==========================================
// TSMX Customer Import - Domain Layer
// ==========================================
// Entities and value types shared by the
// importer, repository and report layers.
// ==========================================

pub mod customer;
pub mod types;

pub use customer::{
    CustomerRecord, FieldOutcome, ImportSummary, NewClient, NewContract, RawRecord, RawSheet,
    RowOutcome,
};
pub use types::{CellValue, ContactKind};
