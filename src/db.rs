// ==========================================
// TSMX Customer Import - SQLite Bootstrap
// ==========================================
// Single place for Connection::open so every
// connection gets the same PRAGMA behavior
// (foreign keys, busy_timeout).
// ==========================================

use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;

/// Default busy_timeout (milliseconds).
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Apply the unified PRAGMAs. foreign_keys and busy_timeout are per-connection
/// settings in SQLite and must be set on every open.
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// Open a SQLite connection with the unified configuration.
pub fn open_sqlite_connection<P: AsRef<Path>>(db_path: P) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// Create the destination tables when absent and seed the fixed vocabularies
/// (contact types, contract statuses). Safe to run on an already-initialized
/// database.
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS tbl_clientes (
            id                  INTEGER PRIMARY KEY AUTOINCREMENT,
            nome_razao_social   TEXT NOT NULL,
            nome_fantasia       TEXT,
            cpf_cnpj            TEXT NOT NULL UNIQUE,
            data_nascimento     TEXT,
            data_cadastro       TEXT
        );

        CREATE TABLE IF NOT EXISTS tbl_tipos_contato (
            id            INTEGER PRIMARY KEY,
            tipo_contato  TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS tbl_cliente_contatos (
            id               INTEGER PRIMARY KEY AUTOINCREMENT,
            cliente_id       INTEGER NOT NULL REFERENCES tbl_clientes(id),
            tipo_contato_id  INTEGER NOT NULL REFERENCES tbl_tipos_contato(id),
            contato          TEXT NOT NULL,
            UNIQUE (cliente_id, tipo_contato_id, contato)
        );

        CREATE TABLE IF NOT EXISTS tbl_planos (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            descricao  TEXT NOT NULL UNIQUE,
            valor      REAL NOT NULL
        );

        CREATE TABLE IF NOT EXISTS tbl_status_contrato (
            id      INTEGER PRIMARY KEY,
            status  TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS tbl_cliente_contratos (
            id                    INTEGER PRIMARY KEY AUTOINCREMENT,
            cliente_id            INTEGER NOT NULL REFERENCES tbl_clientes(id),
            plano_id              INTEGER NOT NULL REFERENCES tbl_planos(id),
            dia_vencimento        INTEGER NOT NULL,
            isento                INTEGER NOT NULL DEFAULT 0,
            endereco_logradouro   TEXT NOT NULL,
            endereco_numero       TEXT,
            endereco_bairro       TEXT,
            endereco_cidade       TEXT,
            endereco_complemento  TEXT,
            endereco_cep          TEXT NOT NULL,
            endereco_uf           TEXT,
            status_id             INTEGER NOT NULL REFERENCES tbl_status_contrato(id),
            UNIQUE (cliente_id, plano_id, endereco_cep, endereco_logradouro, endereco_numero)
        );

        INSERT OR IGNORE INTO tbl_tipos_contato (id, tipo_contato) VALUES
            (1, 'Telefone'),
            (2, 'Celular'),
            (3, 'E-Mail');

        INSERT OR IGNORE INTO tbl_status_contrato (id, status) VALUES
            (1, 'Ativo'),
            (2, 'Velocidade Reduzida'),
            (3, 'Bloqueado'),
            (4, 'Cancelado'),
            (5, 'Inativo');
        "#,
    )?;
    Ok(())
}
