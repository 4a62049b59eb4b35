// ==========================================
// TSMX Customer Import - Import Coordinator
// ==========================================
// Runs the full pipeline over one input file:
// parse -> validate -> upsert client -> contacts
// (best effort) -> plan -> status -> contract,
// one transaction per row, strictly sequential.
// Per-row failures roll the row back and route
// it to the error report; only pre-row problems
// (missing file/columns) abort the run.
// ==========================================

use crate::config::{self, ImportConfig};
use crate::domain::customer::{CustomerRecord, ImportSummary, RawRecord};
use crate::domain::types::ContactKind;
use crate::importer::customer_importer_trait::{CustomerImporter, FileParser};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::report::ReportSink;
use crate::importer::row_validator::RowValidator;
use crate::importer::validators::CEP_SENTINEL;
use crate::repository::CustomerImportRepository;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Writes performed for one accepted row, tallied into the summary only
/// after the row's transaction commits.
struct RowWrites {
    contacts_inserted: usize,
    contract_inserted: bool,
}

// ==========================================
// CustomerImporterImpl
// ==========================================
pub struct CustomerImporterImpl<R>
where
    R: CustomerImportRepository,
{
    repo: R,
    config: ImportConfig,
    file_parser: Box<dyn FileParser>,
    row_validator: RowValidator,
}

impl<R> CustomerImporterImpl<R>
where
    R: CustomerImportRepository,
{
    pub fn new(repo: R, config: ImportConfig, file_parser: Box<dyn FileParser>) -> Self {
        Self {
            repo,
            config,
            file_parser,
            row_validator: RowValidator,
        }
    }

    /// Steps 2-7 of the row state machine. An Err carries the rejection
    /// reason; the caller owns the rollback.
    fn persist_row(&self, record: &CustomerRecord) -> Result<RowWrites, String> {
        // === Step 2: upsert client ===
        let legal_name = match &record.legal_name {
            Some(name) => name.clone(),
            None => return Err("Defina Nome/Razão Social como um valor válido.".to_string()),
        };

        let client = crate::domain::customer::NewClient {
            tax_id: record.tax_id.clone(),
            legal_name,
            trade_name: record.trade_name.clone(),
            birth_date: record.birth_date,
            registration_date: record.registration_date,
        };

        let (client_id, was_inserted) = self
            .repo
            .upsert_client(&client)
            .map_err(|e| format!("Erro ao inserir cliente: {}", e))?;
        debug!(
            client_id,
            was_inserted,
            tax_id = %record.tax_id,
            "cliente gravado"
        );

        // === Step 3: contacts, best effort ===
        // A contact failure is logged and never aborts the row; this is the
        // one deliberate exception to the row's atomicity.
        let contacts = [
            (ContactKind::Mobile, record.mobile_phone.as_deref()),
            (ContactKind::Landline, record.landline_phone.as_deref()),
            (ContactKind::Email, record.email.as_deref()),
        ];

        let mut contacts_inserted = 0usize;
        for (kind, value) in contacts {
            if let Some(value) = value {
                match self.repo.insert_contact_if_absent(client_id, kind, value) {
                    Ok(true) => contacts_inserted += 1,
                    Ok(false) => {
                        debug!(client_id, tipo = kind.label(), contato = %value, "contato duplicado ignorado");
                    }
                    Err(e) => {
                        error!(client_id, tipo = kind.label(), error = %e, "erro ao inserir contato");
                    }
                }
            }
        }

        // === Step 4: resolve plan (price fixed at creation) ===
        let plan_name = record
            .plan_name
            .as_deref()
            .ok_or_else(|| "Defina Plano como uma descrição válida.".to_string())?;
        let plan_id = self
            .repo
            .get_or_create_plan(plan_name, record.plan_price)
            .map_err(|e| format!("Erro ao inserir contrato: {}", e))?;

        // === Step 5: resolve status (fallback default, never rejects) ===
        let status_id = self
            .repo
            .get_status_id(record.status.as_deref())
            .map_err(|e| format!("Erro ao inserir contrato: {}", e))?;

        // === Step 6: contract field guards ===
        if !(1..=31).contains(&record.due_day) {
            return Err("Defina Vencimento como um número válido entre 1 e 31.".to_string());
        }
        if record.postal_code == CEP_SENTINEL {
            return Err("Defina CEP como 00000000 (ou um CEP válido).".to_string());
        }
        let street = match &record.street {
            Some(street) => street.clone(),
            None => {
                return Err(
                    "Coloque Endereço na Rua Desconhecida (ou um endereço válido).".to_string(),
                )
            }
        };

        // === Step 7: insert contract (duplicate is a no-op) ===
        let contract = crate::domain::customer::NewContract {
            client_id,
            plan_id,
            status_id,
            due_day: record.due_day,
            exempt: record.exempt,
            street,
            number: record.number.clone(),
            district: record.district.clone(),
            city: record.city.clone(),
            complement: record.complement.clone(),
            postal_code: record.postal_code.clone(),
            state: record.state.clone(),
        };

        let contract_inserted = self
            .repo
            .insert_contract_if_absent(&contract)
            .map_err(|e| format!("Erro ao inserir contrato: {}", e))?;
        if !contract_inserted {
            debug!(client_id, "contrato duplicado ignorado");
        }

        Ok(RowWrites {
            contacts_inserted,
            contract_inserted,
        })
    }
}

impl<R> CustomerImporter for CustomerImporterImpl<R>
where
    R: CustomerImportRepository,
{
    fn import_file<P: AsRef<Path>>(&mut self, file_path: P) -> ImportResult<ImportSummary> {
        let start_time = Instant::now();
        let batch_id = Uuid::new_v4().to_string();

        let file_name = file_path
            .as_ref()
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string);
        info!(
            batch_id = %batch_id,
            file = %file_path.as_ref().display(),
            "iniciando importação de clientes"
        );

        // === Step 0: parse file ===
        let sheet = self.file_parser.parse_to_raw_records(file_path.as_ref())?;
        info!(total_rows = sheet.rows.len(), "planilha lida");

        // === Step 0.5: required columns (fail fast, before any row) ===
        let missing: Vec<String> = config::EXPECTED_COLUMNS
            .iter()
            .filter(|expected| !sheet.columns.iter().any(|c| c == *expected))
            .map(|c| c.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ImportError::MissingColumns(missing));
        }

        let mut summary = ImportSummary::new(batch_id.clone(), file_name);
        summary.total_rows = sheet.rows.len();

        let mut sink = ReportSink::new(sheet.columns.clone());

        // === Per-row state machine, strictly sequential ===
        for raw in &sheet.rows {
            match self.import_row(raw) {
                RowResult::Accepted(writes) => {
                    summary.clients_upserted += 1;
                    summary.contacts_inserted += writes.contacts_inserted;
                    if writes.contract_inserted {
                        summary.contracts_inserted += 1;
                    }
                    sink.push_accepted(raw);
                }
                RowResult::Rejected(reasons) => {
                    sink.push_rejected(raw, &reasons);
                }
            }
        }

        summary.accepted_rows = sink.accepted_count();
        summary.rejected_rows = sink.rejected_count();

        // === Reports ===
        std::fs::create_dir_all(&self.config.output_dir)?;
        sink.write_reports(
            &self.config.success_report_path(),
            &self.config.errors_report_path(),
        )?;

        summary.elapsed = start_time.elapsed();
        info!(
            batch_id = %batch_id,
            total = summary.total_rows,
            aceitos = summary.accepted_rows,
            rejeitados = summary.rejected_rows,
            clientes = summary.clients_upserted,
            contatos = summary.contacts_inserted,
            contratos = summary.contracts_inserted,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            resumo = %serde_json::to_string(&summary).unwrap_or_default(),
            "importação concluída"
        );

        Ok(summary)
    }
}

enum RowResult {
    Accepted(RowWrites),
    Rejected(Vec<String>),
}

impl<R> CustomerImporterImpl<R>
where
    R: CustomerImportRepository,
{
    /// Full state machine for one row. Every rejected path has already
    /// rolled the row's transaction back when this returns.
    fn import_row(&self, raw: &RawRecord) -> RowResult {
        // === Step 1: validate ===
        let outcome = self.row_validator.validate(raw);
        if !outcome.accepted() {
            return RowResult::Rejected(outcome.reasons);
        }

        // === Steps 2-7 inside one transaction ===
        if let Err(e) = self.repo.begin() {
            warn!(row_number = raw.row_number, error = %e, "falha ao abrir transação");
            return RowResult::Rejected(vec![format!("Erro ao abrir transação: {}", e)]);
        }

        match self.persist_row(&outcome.record) {
            Ok(writes) => {
                // === Step 8: commit ===
                match self.repo.commit() {
                    Ok(()) => RowResult::Accepted(writes),
                    Err(e) => {
                        warn!(row_number = raw.row_number, error = %e, "falha no commit, revertendo");
                        if let Err(rb) = self.repo.rollback() {
                            error!(row_number = raw.row_number, error = %rb, "falha no rollback");
                        }
                        RowResult::Rejected(vec![format!("Erro ao confirmar transação: {}", e)])
                    }
                }
            }
            Err(reason) => {
                warn!(row_number = raw.row_number, reason = %reason, "linha rejeitada na importação, revertendo");
                if let Err(rb) = self.repo.rollback() {
                    error!(row_number = raw.row_number, error = %rb, "falha no rollback");
                }
                RowResult::Rejected(vec![reason])
            }
        }
    }
}
