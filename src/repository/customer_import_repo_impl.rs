// ==========================================
// TSMX Customer Import - Repository Impl
// ==========================================
// rusqlite implementation. The unit of work
// spans several calls, so transactions are
// driven with explicit BEGIN/COMMIT/ROLLBACK
// statements on the shared connection.
// ==========================================

use crate::config::DEFAULT_STATUS_ID;
use crate::db::open_sqlite_connection;
use crate::domain::customer::{NewClient, NewContract};
use crate::domain::types::ContactKind;
use crate::repository::customer_import_repo::CustomerImportRepository;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// CustomerImportRepositoryImpl
// ==========================================
pub struct CustomerImportRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl CustomerImportRepositoryImpl {
    /// Open the store connection (once per run).
    pub fn new<P: AsRef<Path>>(db_path: P) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::ConnectionError(e.to_string()))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Wrap an already-configured connection (tests use in-memory).
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

impl CustomerImportRepository for CustomerImportRepositoryImpl {
    fn begin(&self) -> RepositoryResult<()> {
        let conn = self.lock()?;
        conn.execute_batch("BEGIN")
            .map_err(|e| RepositoryError::TransactionError(e.to_string()))
    }

    fn commit(&self) -> RepositoryResult<()> {
        let conn = self.lock()?;
        conn.execute_batch("COMMIT")
            .map_err(|e| RepositoryError::TransactionError(e.to_string()))
    }

    fn rollback(&self) -> RepositoryResult<()> {
        let conn = self.lock()?;
        conn.execute_batch("ROLLBACK")
            .map_err(|e| RepositoryError::TransactionError(e.to_string()))
    }

    fn upsert_client(&self, client: &NewClient) -> RepositoryResult<(i64, bool)> {
        let conn = self.lock()?;

        let existing: Option<i64> = conn
            .query_row(
                "SELECT id FROM tbl_clientes WHERE cpf_cnpj = ?1",
                params![client.tax_id],
                |row| row.get(0),
            )
            .optional()?;

        match existing {
            Some(id) => {
                // Identity is immutable; mutable attributes are overwritten.
                conn.execute(
                    r#"
                    UPDATE tbl_clientes
                       SET nome_razao_social = ?1,
                           nome_fantasia = ?2,
                           data_nascimento = ?3,
                           data_cadastro = ?4
                     WHERE id = ?5
                    "#,
                    params![
                        client.legal_name,
                        client.trade_name,
                        client.birth_date,
                        client.registration_date,
                        id
                    ],
                )?;
                Ok((id, false))
            }
            None => {
                let id: i64 = conn.query_row(
                    r#"
                    INSERT INTO tbl_clientes
                        (nome_razao_social, nome_fantasia, cpf_cnpj, data_nascimento, data_cadastro)
                    VALUES (?1, ?2, ?3, ?4, ?5)
                    RETURNING id
                    "#,
                    params![
                        client.legal_name,
                        client.trade_name,
                        client.tax_id,
                        client.birth_date,
                        client.registration_date
                    ],
                    |row| row.get(0),
                )?;
                Ok((id, true))
            }
        }
    }

    fn insert_contact_if_absent(
        &self,
        client_id: i64,
        kind: ContactKind,
        value: &str,
    ) -> RepositoryResult<bool> {
        let conn = self.lock()?;

        let changed = conn.execute(
            r#"
            INSERT INTO tbl_cliente_contatos (cliente_id, tipo_contato_id, contato)
            VALUES (?1, ?2, ?3)
            ON CONFLICT DO NOTHING
            "#,
            params![client_id, kind.id(), value],
        )?;

        Ok(changed > 0)
    }

    fn get_or_create_plan(&self, description: &str, price: f64) -> RepositoryResult<i64> {
        let conn = self.lock()?;

        let existing: Option<i64> = conn
            .query_row(
                "SELECT id FROM tbl_planos WHERE descricao = ?1",
                params![description],
                |row| row.get(0),
            )
            .optional()?;

        if let Some(id) = existing {
            return Ok(id);
        }

        let id: i64 = conn.query_row(
            "INSERT INTO tbl_planos (descricao, valor) VALUES (?1, ?2) RETURNING id",
            params![description, price],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    fn get_status_id(&self, label: Option<&str>) -> RepositoryResult<i64> {
        let label = match label {
            Some(l) => l,
            None => return Ok(DEFAULT_STATUS_ID),
        };

        let conn = self.lock()?;

        let id: Option<i64> = conn
            .query_row(
                "SELECT id FROM tbl_status_contrato WHERE status = ?1",
                params![label],
                |row| row.get(0),
            )
            .optional()?;

        Ok(id.unwrap_or(DEFAULT_STATUS_ID))
    }

    fn insert_contract_if_absent(&self, contract: &NewContract) -> RepositoryResult<bool> {
        let conn = self.lock()?;

        let changed = conn.execute(
            r#"
            INSERT INTO tbl_cliente_contratos (
                cliente_id, plano_id, dia_vencimento, isento,
                endereco_logradouro, endereco_numero, endereco_bairro,
                endereco_cidade, endereco_complemento, endereco_cep,
                endereco_uf, status_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            ON CONFLICT DO NOTHING
            "#,
            params![
                contract.client_id,
                contract.plan_id,
                contract.due_day,
                contract.exempt as i32,
                contract.street,
                contract.number,
                contract.district,
                contract.city,
                contract.complement,
                contract.postal_code,
                contract.state,
                contract.status_id
            ],
        )?;

        Ok(changed > 0)
    }
}
