// ==========================================
// TSMX Customer Import - CLI Entry Point
// ==========================================
// Usage: tsmx-import <planilha> [dir-saida] [banco]
// Fatal problems (missing file, missing
// columns, connection failure) exit non-zero
// before any row; per-row failures only show
// up in the error report.
// ==========================================

use std::path::PathBuf;
use std::process::ExitCode;
use tsmx_import::importer::{CustomerImporter, CustomerImporterImpl, UniversalFileParser};
use tsmx_import::repository::CustomerImportRepositoryImpl;
use tsmx_import::{db, logging, ImportConfig};

const DEFAULT_INPUT_FILE: &str = "dados_importacao.xlsx";
const DEFAULT_DB_FILE: &str = "tsmx.db";

fn main() -> ExitCode {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", tsmx_import::APP_NAME);
    tracing::info!("Versão: {}", tsmx_import::VERSION);
    tracing::info!("==================================================");

    let mut args = std::env::args().skip(1);
    let input_file = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT_FILE));
    let output_dir = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(ImportConfig::default_output_dir);
    let db_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE));

    tracing::info!(
        planilha = %input_file.display(),
        saida = %output_dir.display(),
        banco = %db_path.display(),
        "parâmetros da execução"
    );

    // One store connection for the whole run, opened once here and closed
    // on drop at run end regardless of per-row outcomes.
    let conn = match db::open_sqlite_connection(&db_path) {
        Ok(conn) => conn,
        Err(e) => {
            tracing::error!(error = %e, "falha ao conectar ao banco de dados");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = db::init_schema(&conn) {
        tracing::error!(error = %e, "falha ao preparar o schema do banco");
        return ExitCode::FAILURE;
    }

    let repo = CustomerImportRepositoryImpl::from_connection(conn);
    let config = ImportConfig::new(db_path, output_dir);
    let mut importer = CustomerImporterImpl::new(repo, config, Box::new(UniversalFileParser));

    match importer.import_file(&input_file) {
        Ok(summary) => {
            tracing::info!(
                total = summary.total_rows,
                aceitos = summary.accepted_rows,
                rejeitados = summary.rejected_rows,
                "execução encerrada"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "importação abortada");
            ExitCode::FAILURE
        }
    }
}
