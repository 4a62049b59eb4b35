// ==========================================
// TSMX Customer Import - Run Configuration
// ==========================================
// Fixed lookup tables and run parameters.
// Loaded once at process start, passed by
// reference into the pipeline; no mutation
// after load.
// ==========================================

use std::path::PathBuf;

// ==========================================
// Expected Spreadsheet Columns
// ==========================================
// The run fails fast before any row when one
// of these is missing from the input header.
pub const EXPECTED_COLUMNS: [&str; 20] = [
    "CPF/CNPJ",
    "Nome/Razão Social",
    "Nome Fantasia",
    "Data Nasc.",
    "Data Cadastro cliente",
    "Celulares",
    "Telefones",
    "Emails",
    "Plano",
    "Plano Valor",
    "Vencimento",
    "Isento",
    "Endereço",
    "Número",
    "Bairro",
    "Cidade",
    "Complemento",
    "CEP",
    "UF",
    "Status",
];

// ==========================================
// UF Mapping (Brazilian States)
// ==========================================
// Full name (upper case) -> 2-letter code.
pub const UF_MAPPING: [(&str, &str); 27] = [
    ("ACRE", "AC"),
    ("ALAGOAS", "AL"),
    ("AMAPÁ", "AP"),
    ("AMAZONAS", "AM"),
    ("BAHIA", "BA"),
    ("CEARÁ", "CE"),
    ("DISTRITO FEDERAL", "DF"),
    ("ESPÍRITO SANTO", "ES"),
    ("GOIÁS", "GO"),
    ("MARANHÃO", "MA"),
    ("MATO GROSSO", "MT"),
    ("MATO GROSSO DO SUL", "MS"),
    ("MINAS GERAIS", "MG"),
    ("PARÁ", "PA"),
    ("PARAÍBA", "PB"),
    ("PARANÁ", "PR"),
    ("PERNAMBUCO", "PE"),
    ("PIAUÍ", "PI"),
    ("RIO DE JANEIRO", "RJ"),
    ("RIO GRANDE DO NORTE", "RN"),
    ("RIO GRANDE DO SUL", "RS"),
    ("RONDÔNIA", "RO"),
    ("RORAIMA", "RR"),
    ("SANTA CATARINA", "SC"),
    ("SÃO PAULO", "SP"),
    ("SERGIPE", "SE"),
    ("TOCANTINS", "TO"),
];

/// Default status id when the label does not resolve ("Velocidade Reduzida").
pub const DEFAULT_STATUS_ID: i64 = 2;

// Persisted text limits, aligned with the destination schema.
pub const MAX_NAME_LEN: usize = 255;
pub const MAX_PLAN_LEN: usize = 255;
pub const MAX_STREET_LEN: usize = 255;
pub const MAX_NUMBER_LEN: usize = 15;
pub const MAX_DISTRICT_LEN: usize = 255;
pub const MAX_CITY_LEN: usize = 255;
pub const MAX_COMPLEMENT_LEN: usize = 500;

// Report file names.
pub const SUCCESS_REPORT_FILE: &str = "import_totalregistros.csv";
pub const ERRORS_REPORT_FILE: &str = "import_erros.csv";

// ==========================================
// ImportConfig
// ==========================================
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Destination database file.
    pub db_path: PathBuf,
    /// Directory receiving the two report files.
    pub output_dir: PathBuf,
}

impl ImportConfig {
    pub fn new(db_path: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Reports land in the user's download directory by default, next to
    /// where operators already pick up the source spreadsheets.
    pub fn default_output_dir() -> PathBuf {
        dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn success_report_path(&self) -> PathBuf {
        self.output_dir.join(SUCCESS_REPORT_FILE)
    }

    pub fn errors_report_path(&self) -> PathBuf {
        self.output_dir.join(ERRORS_REPORT_FILE)
    }
}

/// Resolve a UF: accepts a canonical 2-letter code or a full state name,
/// case-insensitively. Returns the canonical code.
pub fn resolve_uf(input: &str) -> Option<&'static str> {
    let upper = input.trim().to_uppercase();
    if upper.len() == 2 {
        if let Some((_, code)) = UF_MAPPING.iter().find(|(_, code)| *code == upper) {
            return Some(code);
        }
    }
    UF_MAPPING
        .iter()
        .find(|(name, _)| *name == upper)
        .map(|(_, code)| *code)
}
