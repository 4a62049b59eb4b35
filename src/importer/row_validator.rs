// ==========================================
// TSMX Customer Import - Row Validator
// ==========================================
// Applies every field validator to its bound
// column with no short-circuit, so the error
// report lists every defect of a row in one
// pass. A row is accepted iff no reason was
// accumulated.
// ==========================================

use crate::config;
use crate::domain::customer::{CustomerRecord, RawRecord, RowOutcome};
use crate::importer::validators;
use tracing::warn;

pub struct RowValidator;

impl RowValidator {
    /// Validate and normalize one raw row. Every field gets a normalized
    /// entry even when invalid (documented sentinels).
    pub fn validate(&self, raw: &RawRecord) -> RowOutcome {
        let mut reasons: Vec<String> = Vec::new();

        let tax_id = take(validators::clean_cpf_cnpj(raw.get("CPF/CNPJ")), &mut reasons);

        let legal_name = take(
            validators::clean_free_text(
                raw.get("Nome/Razão Social"),
                Some(config::MAX_NAME_LEN),
                None,
            ),
            &mut reasons,
        );
        let trade_name = take(
            validators::clean_free_text(
                raw.get("Nome Fantasia"),
                Some(config::MAX_NAME_LEN),
                None,
            ),
            &mut reasons,
        );

        let birth_date = take(
            validators::convert_spreadsheet_date(raw.get("Data Nasc."), "Data Nasc."),
            &mut reasons,
        );
        let registration_date = take(
            validators::convert_spreadsheet_date(
                raw.get("Data Cadastro cliente"),
                "Data Cadastro cliente",
            ),
            &mut reasons,
        );

        let mobile_phone = take(
            validators::clean_phone(raw.get("Celulares"), "Celulares"),
            &mut reasons,
        );
        let landline_phone = take(
            validators::clean_phone(raw.get("Telefones"), "Telefones"),
            &mut reasons,
        );
        let email = take(validators::clean_email(raw.get("Emails")), &mut reasons);

        let plan_name = take(
            validators::clean_free_text(raw.get("Plano"), Some(config::MAX_PLAN_LEN), None),
            &mut reasons,
        );
        let plan_price = take(validators::validate_plan_price(raw.get("Plano Valor")), &mut reasons);
        let due_day = take(validators::validate_due_day(raw.get("Vencimento")), &mut reasons);
        let exempt = take(validators::validate_exempt_flag(raw.get("Isento")), &mut reasons);

        let street = take(
            validators::clean_free_text(raw.get("Endereço"), Some(config::MAX_STREET_LEN), None),
            &mut reasons,
        );
        let number = take(
            validators::clean_free_text(raw.get("Número"), Some(config::MAX_NUMBER_LEN), None),
            &mut reasons,
        );
        let district = take(
            validators::clean_free_text(raw.get("Bairro"), Some(config::MAX_DISTRICT_LEN), None),
            &mut reasons,
        );
        let city = take(
            validators::clean_free_text(raw.get("Cidade"), Some(config::MAX_CITY_LEN), None),
            &mut reasons,
        );
        let complement = take(
            validators::clean_free_text(
                raw.get("Complemento"),
                Some(config::MAX_COMPLEMENT_LEN),
                None,
            ),
            &mut reasons,
        );

        let postal_code = take(validators::clean_cep(raw.get("CEP")), &mut reasons);
        let state = take(validators::normalize_uf(raw.get("UF")), &mut reasons);

        let status = take(
            validators::clean_free_text(raw.get("Status"), None, None),
            &mut reasons,
        );

        if !reasons.is_empty() {
            warn!(
                row_number = raw.row_number,
                reasons = %reasons.join("; "),
                "linha reprovada na validação"
            );
        }

        RowOutcome {
            record: CustomerRecord {
                tax_id,
                legal_name,
                trade_name,
                birth_date,
                registration_date,
                mobile_phone,
                landline_phone,
                email,
                plan_name,
                plan_price,
                due_day,
                exempt,
                street,
                number,
                district,
                city,
                complement,
                postal_code,
                state,
                status,
            },
            reasons,
        }
    }
}

/// Push the reason (when present) and keep the normalized value.
fn take<T>(outcome: crate::domain::customer::FieldOutcome<T>, reasons: &mut Vec<String>) -> T {
    if let Some(reason) = outcome.reason {
        reasons.push(reason);
    }
    outcome.value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::CellValue;
    use std::collections::HashMap;

    fn build_row(pairs: &[(&str, CellValue)]) -> RawRecord {
        let mut cells = HashMap::new();
        for (column, value) in pairs {
            cells.insert(column.to_string(), value.clone());
        }
        RawRecord {
            row_number: 1,
            cells,
        }
    }

    fn text(v: &str) -> CellValue {
        CellValue::Text(v.to_string())
    }

    fn valid_row() -> RawRecord {
        build_row(&[
            ("CPF/CNPJ", text("529.982.247-25")),
            ("Nome/Razão Social", text("Fulano de Tal")),
            ("Nome Fantasia", text("Fulano")),
            ("Data Nasc.", text("01/01/2022")),
            ("Data Cadastro cliente", CellValue::Number(44562.0)),
            ("Celulares", text("+5511987654321")),
            ("Telefones", text("1133334444")),
            ("Emails", text("test@example.com")),
            ("Plano", text("Fibra 300MB")),
            ("Plano Valor", text("1,234.56")),
            ("Vencimento", text("15")),
            ("Isento", text("1")),
            ("Endereço", text("Rua das Flores")),
            ("Número", text("100")),
            ("Bairro", text("Centro")),
            ("Cidade", text("São Paulo")),
            ("Complemento", text("Apto 12")),
            ("CEP", text("12345")),
            ("UF", text("SP")),
            ("Status", text("Ativo")),
        ])
    }

    #[test]
    fn test_fully_valid_row_is_accepted() {
        let outcome = RowValidator.validate(&valid_row());

        assert!(outcome.accepted(), "reasons: {:?}", outcome.reasons);
        assert_eq!(outcome.record.tax_id, "52998224725");
        assert_eq!(outcome.record.mobile_phone.as_deref(), Some("+5511987654321"));
        assert_eq!(outcome.record.landline_phone.as_deref(), Some("+551133334444"));
        assert_eq!(outcome.record.postal_code, "00012345"); // padded, accepted
        assert_eq!(outcome.record.state, "SP");
        assert_eq!(outcome.record.plan_price, 1234.56);
        assert_eq!(outcome.record.due_day, 15);
        assert!(outcome.record.exempt);
    }

    #[test]
    fn test_all_reasons_accumulate_without_short_circuit() {
        let mut row = valid_row();
        row.cells
            .insert("CPF/CNPJ".to_string(), text("529.982.247-26"));
        row.cells.insert("Emails".to_string(), text("invalid-email"));
        row.cells.insert("UF".to_string(), text("ZZ"));
        row.cells.insert("Vencimento".to_string(), text("32"));

        let outcome = RowValidator.validate(&row);

        assert!(!outcome.accepted());
        assert_eq!(outcome.reasons.len(), 4);
        // Reasons arrive in column order: tax id, email, due day, UF.
        assert!(outcome.reasons[0].contains("Checksum de CPF"));
        assert!(outcome.reasons[1].contains("email"));
        assert!(outcome.reasons[2].contains("Dia de vencimento"));
        assert!(outcome.reasons[3].contains("UF"));
    }

    #[test]
    fn test_invalid_fields_still_normalized_to_sentinels() {
        let row = build_row(&[("CPF/CNPJ", text("111.111.111-11"))]);

        let outcome = RowValidator.validate(&row);

        assert!(!outcome.accepted());
        assert_eq!(outcome.record.tax_id, "00000000000");
        assert_eq!(outcome.record.postal_code, "00000000");
        assert_eq!(outcome.record.state, "XX");
        assert_eq!(outcome.record.due_day, 1);
        assert_eq!(outcome.record.plan_price, 0.0);
    }

    #[test]
    fn test_missing_optional_contacts_do_not_reject() {
        let mut row = valid_row();
        row.cells.insert("Celulares".to_string(), CellValue::Absent);
        row.cells.insert("Telefones".to_string(), CellValue::Absent);
        row.cells.insert("Emails".to_string(), CellValue::Absent);

        let outcome = RowValidator.validate(&row);

        assert!(outcome.accepted(), "reasons: {:?}", outcome.reasons);
        assert_eq!(outcome.record.mobile_phone, None);
        assert_eq!(outcome.record.email, None);
    }
}
