// ==========================================
// TSMX Customer Import - Importer Errors
// ==========================================
// Fatal errors abort the run; per-row store
// failures are converted to rejection reasons
// by the coordinator and never surface here.
// ==========================================

use thiserror::Error;

/// Importer error taxonomy.
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== File errors =====
    #[error("Arquivo não encontrado: {0}")]
    FileNotFound(String),

    #[error("Formato de arquivo não suportado: {0} (apenas .xlsx/.xls/.csv)")]
    UnsupportedFormat(String),

    #[error("Falha na leitura do arquivo: {0}")]
    FileReadError(String),

    #[error("Falha ao interpretar o Excel: {0}")]
    ExcelParseError(String),

    #[error("Falha ao interpretar o CSV: {0}")]
    CsvParseError(String),

    // ===== Input-shape errors (fatal, pre-row) =====
    #[error("Colunas obrigatórias ausentes na planilha: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    // ===== Report errors =====
    #[error("Falha ao gravar o relatório {path}: {message}")]
    ReportWriteError { path: String, message: String },

    // ===== Store errors =====
    #[error(transparent)]
    Repository(#[from] crate::repository::error::RepositoryError),

    // ===== Catch-all =====
    #[error("Erro interno: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result alias for the importer layer.
pub type ImportResult<T> = Result<T, ImportError>;
