// ==========================================
// TSMX Customer Import - Core Library
// ==========================================
// Validates customer spreadsheets under the
// Brazilian domain rules (CPF/CNPJ, CEP, UF,
// phones) and loads accepted rows into the
// relational store, one transaction per row.
// ==========================================

// ==========================================
// Module declarations
// ==========================================

// Domain layer - entities and value types
pub mod domain;

// Repository layer - data access
pub mod repository;

// Importer layer - pipeline from file to store
pub mod importer;

// Run configuration - fixed tables and paths
pub mod config;

// Database infrastructure - connection init / PRAGMAs / schema
pub mod db;

// Logging
pub mod logging;

// ==========================================
// Re-exports
// ==========================================

// Domain types
pub use domain::{
    CellValue, ContactKind, CustomerRecord, FieldOutcome, ImportSummary, RawRecord, RawSheet,
    RowOutcome,
};

// Importer
pub use importer::{
    CustomerImporter, CustomerImporterImpl, ImportError, ImportResult, ReportSink, RowValidator,
    UniversalFileParser,
};

// Repository
pub use repository::{CustomerImportRepository, CustomerImportRepositoryImpl};

// Configuration
pub use config::ImportConfig;

// ==========================================
// Constants
// ==========================================

// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// System name
pub const APP_NAME: &str = "Importador de Clientes TSMX";
