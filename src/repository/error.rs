// ==========================================
// TSMX Customer Import - Repository Errors
// ==========================================

use thiserror::Error;

/// Store access errors. Messages surface verbatim in the error report, so
/// they carry the underlying database text.
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Falha na conexão com o banco de dados: {0}")]
    ConnectionError(String),

    #[error("Falha ao obter o lock da conexão: {0}")]
    LockError(String),

    #[error("Falha na transação: {0}")]
    TransactionError(String),

    #[error("Falha na consulta: {0}")]
    QueryError(String),

    #[error("Violação de chave única: {0}")]
    UniqueConstraintViolation(String),

    #[error("Violação de chave estrangeira: {0}")]
    ForeignKeyViolation(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) => {
                if msg.contains("UNIQUE") {
                    RepositoryError::UniqueConstraintViolation(msg)
                } else if msg.contains("FOREIGN KEY") {
                    RepositoryError::ForeignKeyViolation(msg)
                } else {
                    RepositoryError::QueryError(msg)
                }
            }
            _ => RepositoryError::QueryError(err.to_string()),
        }
    }
}

/// Result alias for the repository layer.
pub type RepositoryResult<T> = Result<T, RepositoryError>;
