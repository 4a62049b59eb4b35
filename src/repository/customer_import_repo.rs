// ==========================================
// TSMX Customer Import - Repository Trait
// ==========================================
// Data access interface for the import
// pipeline. No business rules here, only
// idempotent CRUD; the store owns every
// entity and nothing is ever deleted.
// ==========================================

use crate::domain::customer::{NewClient, NewContract};
use crate::domain::types::ContactKind;
use crate::repository::error::RepositoryResult;

// ==========================================
// CustomerImportRepository Trait
// ==========================================
// Implementor: CustomerImportRepositoryImpl (rusqlite)
pub trait CustomerImportRepository {
    // ===== Unit of work (one per row) =====

    /// Open the row's transaction.
    fn begin(&self) -> RepositoryResult<()>;

    /// Commit the row's transaction.
    fn commit(&self) -> RepositoryResult<()>;

    /// Discard every write of the current row.
    fn rollback(&self) -> RepositoryResult<()>;

    // ===== Idempotent writes =====

    /// Insert or update a client by tax-id natural key. The identity never
    /// changes once created; names and dates are overwritten on conflict.
    ///
    /// # Returns
    /// - Ok((id, was_inserted))
    fn upsert_client(&self, client: &NewClient) -> RepositoryResult<(i64, bool)>;

    /// Insert a contact unless (client, type, value) already exists.
    ///
    /// # Returns
    /// - Ok(true): inserted
    /// - Ok(false): duplicate skipped
    fn insert_contact_if_absent(
        &self,
        client_id: i64,
        kind: ContactKind,
        value: &str,
    ) -> RepositoryResult<bool>;

    /// Fetch a plan id by description, creating it with the given price on
    /// first sight. The price is fixed at creation time and never updated
    /// on conflict.
    fn get_or_create_plan(&self, description: &str, price: f64) -> RepositoryResult<i64>;

    /// Resolve a status label to its id. Unknown or absent labels resolve
    /// to the fixed default status instead of failing.
    fn get_status_id(&self, label: Option<&str>) -> RepositoryResult<i64>;

    /// Insert a contract unless its business key already exists.
    ///
    /// # Returns
    /// - Ok(true): inserted
    /// - Ok(false): duplicate skipped
    fn insert_contract_if_absent(&self, contract: &NewContract) -> RepositoryResult<bool>;
}
