// ==========================================
// TSMX Customer Import - Repository Layer
// ==========================================
// Data access only; no business rules.
// ==========================================

pub mod customer_import_repo;
pub mod customer_import_repo_impl;
pub mod error;

pub use customer_import_repo::CustomerImportRepository;
pub use customer_import_repo_impl::CustomerImportRepositoryImpl;
pub use error::{RepositoryError, RepositoryResult};
