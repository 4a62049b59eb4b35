// ==========================================
// TSMX Customer Import - Field Validators
// ==========================================
// One pure function per semantic field type.
// A validator never fails: invalid input maps
// to the field's sentinel plus a reason in the
// wording the error report exposes to users.
// ==========================================

use crate::config::resolve_uf;
use crate::domain::{CellValue, FieldOutcome};
use chrono::{Duration, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Sentinel for an invalid CPF/CNPJ.
pub const TAX_ID_SENTINEL: &str = "00000000000";
/// Sentinel for an invalid CEP.
pub const CEP_SENTINEL: &str = "00000000";
/// Sentinel for an invalid UF.
pub const UF_SENTINEL: &str = "XX";
/// Sentinel for an invalid due day. A valid day in itself; the reason list
/// is the only way to tell "defaulted" from a genuine 1.
pub const DUE_DAY_SENTINEL: u32 = 1;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("email pattern")
});

fn strip_non_digits(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Weighted-sum mod 11 check digit: remainder < 2 maps to 0, otherwise
/// 11 - remainder.
fn check_digit(digits: &[u32], weights: &[u32]) -> u32 {
    let total: u32 = digits.iter().zip(weights).map(|(d, w)| d * w).sum();
    let remainder = total % 11;
    if remainder < 2 {
        0
    } else {
        11 - remainder
    }
}

// ==========================================
// CPF/CNPJ
// ==========================================

/// Validate a CPF (11 digits) or CNPJ (14 digits) including the check
/// digits. Invalid values normalize to [`TAX_ID_SENTINEL`].
pub fn clean_cpf_cnpj(value: &CellValue) -> FieldOutcome<String> {
    let raw = match value.as_text() {
        Some(v) => v,
        None => {
            return FieldOutcome::invalid(
                TAX_ID_SENTINEL.to_string(),
                "CPF/CNPJ ausente ou vazio.",
            )
        }
    };

    let cleaned = strip_non_digits(&raw);
    if cleaned.is_empty() {
        return FieldOutcome::invalid(
            TAX_ID_SENTINEL.to_string(),
            "CPF/CNPJ vazio após limpeza.",
        );
    }

    let digits: Vec<u32> = cleaned.chars().filter_map(|c| c.to_digit(10)).collect();

    match digits.len() {
        11 => validate_cpf(&cleaned, &digits),
        14 => validate_cnpj(&cleaned, &digits),
        len => FieldOutcome::invalid(
            TAX_ID_SENTINEL.to_string(),
            format!(
                "Comprimento de CPF/CNPJ inválido ({} dígitos, esperado 11 ou 14).",
                len
            ),
        ),
    }
}

fn validate_cpf(cleaned: &str, digits: &[u32]) -> FieldOutcome<String> {
    if digits.iter().all(|d| *d == digits[0]) {
        return FieldOutcome::invalid(
            TAX_ID_SENTINEL.to_string(),
            "CPF inválido (todos os dígitos iguais).",
        );
    }

    // A consecutive run d, d+1, ... (mod 10) over the base digits can pass
    // the checksum by coincidence (123.456.789-09 does) and is still
    // rejected.
    let sequential = digits[..9]
        .iter()
        .enumerate()
        .all(|(i, d)| *d == (digits[0] + i as u32) % 10);
    if sequential {
        return FieldOutcome::invalid(
            TAX_ID_SENTINEL.to_string(),
            "CPF inválido (dígitos sequenciais).",
        );
    }

    let weights1: Vec<u32> = (2..=10).rev().collect();
    let digit1 = check_digit(&digits[..9], &weights1);

    let weights2: Vec<u32> = (2..=11).rev().collect();
    let mut with_first = digits[..9].to_vec();
    with_first.push(digit1);
    let digit2 = check_digit(&with_first, &weights2);

    let expected = format!("{}{}", digit1, digit2);
    let provided = &cleaned[9..11];
    if provided == expected {
        FieldOutcome::ok(cleaned.to_string())
    } else {
        FieldOutcome::invalid(
            TAX_ID_SENTINEL.to_string(),
            format!(
                "Checksum de CPF inválido (esperado: {}, fornecido: {}).",
                expected, provided
            ),
        )
    }
}

fn validate_cnpj(cleaned: &str, digits: &[u32]) -> FieldOutcome<String> {
    if digits.iter().all(|d| *d == digits[0]) {
        return FieldOutcome::invalid(
            TAX_ID_SENTINEL.to_string(),
            "CNPJ inválido (todos os dígitos iguais).",
        );
    }

    let weights1: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
    let digit1 = check_digit(&digits[..12], &weights1);

    let weights2: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
    let mut with_first = digits[..12].to_vec();
    with_first.push(digit1);
    let digit2 = check_digit(&with_first, &weights2);

    let expected = format!("{}{}", digit1, digit2);
    let provided = &cleaned[12..14];
    if provided == expected {
        FieldOutcome::ok(cleaned.to_string())
    } else {
        FieldOutcome::invalid(
            TAX_ID_SENTINEL.to_string(),
            format!(
                "Checksum de CNPJ inválido (esperado: {}, fornecido: {}).",
                expected, provided
            ),
        )
    }
}

// ==========================================
// Dates
// ==========================================

/// Parse a spreadsheet date. Numeric cells are legacy day serials anchored
/// at 1899-12-30; text is tried against day-first formats.
pub fn convert_spreadsheet_date(
    value: &CellValue,
    field_name: &str,
) -> FieldOutcome<Option<NaiveDate>> {
    match value {
        CellValue::Absent => FieldOutcome::invalid(
            None,
            format!("{} ausente ou vazio.", field_name),
        ),
        CellValue::Number(n) => {
            let anchor = NaiveDate::from_ymd_opt(1899, 12, 30).expect("epoch anchor");
            match anchor.checked_add_signed(Duration::days(n.trunc() as i64)) {
                Some(date) => FieldOutcome::ok(Some(date)),
                None => FieldOutcome::invalid(
                    None,
                    format!(
                        "Falha ao converter data numérica para {}: valor fora do intervalo ({}).",
                        field_name, n
                    ),
                ),
            }
        }
        CellValue::Text(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return FieldOutcome::invalid(
                    None,
                    format!("{} ausente ou vazio.", field_name),
                );
            }
            // Day-first precedence for ambiguous forms; ISO accepted as-is.
            // A purely numeric string is a serial typed as text.
            if let Ok(serial) = trimmed.parse::<f64>() {
                return convert_spreadsheet_date(&CellValue::Number(serial), field_name);
            }
            const FORMATS: [&str; 5] = ["%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y-%m-%d", "%d/%m/%y"];
            for format in FORMATS {
                if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
                    return FieldOutcome::ok(Some(date));
                }
            }
            FieldOutcome::invalid(
                None,
                format!(
                    "Falha ao parsear data de string para {}: {}.",
                    field_name, trimmed
                ),
            )
        }
    }
}

// ==========================================
// Phone
// ==========================================

/// Normalize a Brazilian phone number to "+55" + national digits.
/// Absent input is not an error. The country prefix is stripped only when
/// the stripped string is 13 digits long (i.e. prefix + full national
/// number), never unconditionally.
pub fn clean_phone(value: &CellValue, field_name: &str) -> FieldOutcome<Option<String>> {
    let raw = match value.as_text() {
        Some(v) => v,
        None => return FieldOutcome::ok(None),
    };

    let mut cleaned = strip_non_digits(&raw);
    if cleaned.is_empty() {
        return FieldOutcome::ok(None);
    }

    if cleaned.len() == 13 && cleaned.starts_with("55") {
        cleaned = cleaned[2..].to_string();
    }

    let is_mobile = cleaned.len() == 11
        && matches!(cleaned.as_bytes()[2], b'6' | b'7' | b'8' | b'9');
    if is_mobile || cleaned.len() == 10 {
        FieldOutcome::ok(Some(format!("+55{}", cleaned)))
    } else {
        FieldOutcome::invalid(
            None,
            format!(
                "{} inválido (10 dígitos para fixo, 11 dígitos com terceiro dígito após DDD como 9/8/7/6 para móvel).",
                field_name
            ),
        )
    }
}

// ==========================================
// Email
// ==========================================

/// Conservative format check; no deliverability probing. Absent input is
/// not an error.
pub fn clean_email(value: &CellValue) -> FieldOutcome<Option<String>> {
    let trimmed = match value.as_text() {
        Some(v) => v,
        None => return FieldOutcome::ok(None),
    };

    if EMAIL_RE.is_match(&trimmed) {
        FieldOutcome::ok(Some(trimmed))
    } else {
        FieldOutcome::invalid(None, "Formato de email inválido.")
    }
}

// ==========================================
// CEP
// ==========================================

/// Normalize a CEP to exactly 8 digits. Shorter values are zero-padded on
/// the left and accepted (a known truncation of the source spreadsheets);
/// longer values are rejected.
pub fn clean_cep(value: &CellValue) -> FieldOutcome<String> {
    let raw = match value.as_text() {
        Some(v) => v,
        None => {
            return FieldOutcome::invalid(CEP_SENTINEL.to_string(), "CEP ausente ou vazio.")
        }
    };

    let cleaned = strip_non_digits(&raw);
    if cleaned.is_empty() {
        return FieldOutcome::invalid(
            CEP_SENTINEL.to_string(),
            "CEP inválido (contém caracteres não numéricos).",
        );
    }

    match cleaned.len() {
        8 => FieldOutcome::ok(cleaned),
        len if len < 8 => {
            let padded = format!("{:0>8}", cleaned);
            debug!(raw = %raw, padded = %padded, "CEP corrigido com zeros à esquerda");
            FieldOutcome::ok(padded)
        }
        _ => FieldOutcome::invalid(
            CEP_SENTINEL.to_string(),
            "Comprimento de CEP inválido (deve ter 8 dígitos).",
        ),
    }
}

// ==========================================
// UF
// ==========================================

/// Normalize a federative-unit reference to its 2-letter code. Accepts the
/// canonical codes and the full state names, case-insensitively.
pub fn normalize_uf(value: &CellValue) -> FieldOutcome<String> {
    let raw = match value.as_text() {
        Some(v) => v,
        None => {
            return FieldOutcome::invalid(UF_SENTINEL.to_string(), "UF ausente ou vazio.")
        }
    };

    match resolve_uf(&raw) {
        Some(code) => FieldOutcome::ok(code.to_string()),
        None => FieldOutcome::invalid(UF_SENTINEL.to_string(), "UF inválido."),
    }
}

// ==========================================
// Due day
// ==========================================

/// Day of month a contract payment is due, in [1, 31]. Numeric text with a
/// decimal part is coerced through float-then-int.
pub fn validate_due_day(value: &CellValue) -> FieldOutcome<u32> {
    let parsed = match value {
        CellValue::Absent => {
            return FieldOutcome::invalid(DUE_DAY_SENTINEL, "Dia de vencimento ausente ou vazio.")
        }
        CellValue::Number(n) => Some(*n),
        CellValue::Text(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return FieldOutcome::invalid(
                    DUE_DAY_SENTINEL,
                    "Dia de vencimento ausente ou vazio.",
                );
            }
            trimmed.parse::<f64>().ok()
        }
    };

    match parsed {
        Some(n) => {
            let day = n.trunc();
            if (1.0..=31.0).contains(&day) {
                FieldOutcome::ok(day as u32)
            } else {
                FieldOutcome::invalid(
                    DUE_DAY_SENTINEL,
                    "Dia de vencimento inválido (deve ser entre 1 e 31).",
                )
            }
        }
        None => FieldOutcome::invalid(DUE_DAY_SENTINEL, "Dia de vencimento não é um número."),
    }
}

// ==========================================
// Currency
// ==========================================

/// Plan price. Thousands separators are stripped before parsing.
pub fn validate_plan_price(value: &CellValue) -> FieldOutcome<f64> {
    match value {
        CellValue::Absent => FieldOutcome::invalid(0.0, "Plano Valor ausente ou vazio."),
        CellValue::Number(n) => FieldOutcome::ok(*n),
        CellValue::Text(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return FieldOutcome::invalid(0.0, "Plano Valor ausente ou vazio.");
            }
            match trimmed.replace(',', "").parse::<f64>() {
                Ok(n) => FieldOutcome::ok(n),
                Err(_) => FieldOutcome::invalid(0.0, "Plano Valor inválido."),
            }
        }
    }
}

// ==========================================
// Exemption flag
// ==========================================

/// Exemption flag. Absent is false without error; unknown tokens default
/// to false with a reason.
pub fn validate_exempt_flag(value: &CellValue) -> FieldOutcome<bool> {
    let token = match value.as_text() {
        Some(v) => v.to_lowercase(),
        None => return FieldOutcome::ok(false),
    };

    match token.as_str() {
        "sim" | "s" | "yes" | "true" | "1" => FieldOutcome::ok(true),
        "não" | "nao" | "n" | "no" | "false" | "0" => FieldOutcome::ok(false),
        _ => FieldOutcome::invalid(false, format!("Valor de Isento inválido ({}).", token)),
    }
}

// ==========================================
// Free text
// ==========================================

/// Trim, substitute malformed characters and truncate to `max_length`
/// characters (never splitting a multi-byte character). Absent/blank input
/// yields the caller's default and is never an error by itself.
pub fn clean_free_text(
    value: &CellValue,
    max_length: Option<usize>,
    default: Option<&str>,
) -> FieldOutcome<Option<String>> {
    let text = match value.as_text() {
        Some(v) => v,
        None => return FieldOutcome::ok(default.map(str::to_string)),
    };

    let text = String::from_utf8_lossy(text.as_bytes()).into_owned();
    let text = match max_length {
        Some(max) if text.chars().count() > max => text.chars().take(max).collect(),
        _ => text,
    };

    FieldOutcome::ok(Some(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(v: &str) -> CellValue {
        CellValue::Text(v.to_string())
    }

    // ===== CPF/CNPJ =====

    #[test]
    fn test_cpf_valid_returns_digits_unchanged() {
        let outcome = clean_cpf_cnpj(&text("529.982.247-25"));
        assert_eq!(outcome.value, "52998224725");
        assert_eq!(outcome.reason, None);
    }

    #[test]
    fn test_cpf_flipped_check_digit_cites_expected_and_provided() {
        let outcome = clean_cpf_cnpj(&text("529.982.247-26"));
        assert_eq!(outcome.value, TAX_ID_SENTINEL);
        let reason = outcome.reason.unwrap();
        assert!(reason.contains("esperado: 25"), "{}", reason);
        assert!(reason.contains("fornecido: 26"), "{}", reason);
    }

    #[test]
    fn test_cpf_all_identical_digits_rejected() {
        let outcome = clean_cpf_cnpj(&text("111.111.111-11"));
        assert_eq!(outcome.value, TAX_ID_SENTINEL);
        assert!(outcome.reason.unwrap().contains("todos os dígitos iguais"));
    }

    #[test]
    fn test_cpf_sequential_digits_rejected_despite_checksum() {
        // 123.456.789-09 has valid check digits but is a consecutive run.
        let outcome = clean_cpf_cnpj(&text("123.456.789-09"));
        assert_eq!(outcome.value, TAX_ID_SENTINEL);
        assert!(outcome.reason.unwrap().contains("dígitos sequenciais"));
    }

    #[test]
    fn test_cnpj_valid() {
        let outcome = clean_cpf_cnpj(&text("11.222.333/0001-81"));
        assert_eq!(outcome.value, "11222333000181");
        assert_eq!(outcome.reason, None);
    }

    #[test]
    fn test_cnpj_bad_checksum() {
        let outcome = clean_cpf_cnpj(&text("11.222.333/0001-80"));
        assert_eq!(outcome.value, TAX_ID_SENTINEL);
        assert!(outcome.reason.unwrap().contains("Checksum de CNPJ"));
    }

    #[test]
    fn test_tax_id_wrong_length() {
        let outcome = clean_cpf_cnpj(&text("12345"));
        assert_eq!(outcome.value, TAX_ID_SENTINEL);
        assert!(outcome.reason.unwrap().contains("5 dígitos"));
    }

    #[test]
    fn test_tax_id_absent() {
        let outcome = clean_cpf_cnpj(&CellValue::Absent);
        assert_eq!(outcome.value, TAX_ID_SENTINEL);
        assert!(outcome.reason.unwrap().contains("ausente"));
    }

    #[test]
    fn test_tax_id_no_digits_after_cleaning() {
        let outcome = clean_cpf_cnpj(&text("abc"));
        assert!(outcome.reason.unwrap().contains("após limpeza"));
    }

    // ===== Dates =====

    #[test]
    fn test_date_numeric_serial() {
        let outcome = convert_spreadsheet_date(&CellValue::Number(44562.0), "Data Nasc.");
        assert_eq!(
            outcome.value,
            Some(NaiveDate::from_ymd_opt(2022, 1, 1).unwrap())
        );
        assert_eq!(outcome.reason, None);
    }

    #[test]
    fn test_date_day_first_string() {
        let outcome = convert_spreadsheet_date(&text("01/01/2022"), "Data Nasc.");
        assert_eq!(
            outcome.value,
            Some(NaiveDate::from_ymd_opt(2022, 1, 1).unwrap())
        );

        // Day-first precedence: 03/02 is February 3rd, not March 2nd.
        let outcome = convert_spreadsheet_date(&text("03/02/2022"), "Data Nasc.");
        assert_eq!(
            outcome.value,
            Some(NaiveDate::from_ymd_opt(2022, 2, 3).unwrap())
        );
    }

    #[test]
    fn test_date_iso_string() {
        let outcome = convert_spreadsheet_date(&text("2022-01-01"), "Data Cadastro cliente");
        assert_eq!(
            outcome.value,
            Some(NaiveDate::from_ymd_opt(2022, 1, 1).unwrap())
        );
    }

    #[test]
    fn test_date_unparseable() {
        let outcome = convert_spreadsheet_date(&text("invalid"), "Data Nasc.");
        assert_eq!(outcome.value, None);
        assert!(outcome.reason.unwrap().contains("Data Nasc."));
    }

    #[test]
    fn test_date_absent_names_field() {
        let outcome = convert_spreadsheet_date(&CellValue::Absent, "Data Cadastro cliente");
        assert_eq!(outcome.value, None);
        assert_eq!(
            outcome.reason.unwrap(),
            "Data Cadastro cliente ausente ou vazio."
        );
    }

    // ===== Phone =====

    #[test]
    fn test_phone_mobile_with_country_prefix() {
        let outcome = clean_phone(&text("+5511987654321"), "Celulares");
        assert_eq!(outcome.value, Some("+5511987654321".to_string()));
        assert_eq!(outcome.reason, None);
    }

    #[test]
    fn test_phone_normalization_idempotent() {
        let first = clean_phone(&text("11987654321"), "Celulares");
        let normalized = first.value.unwrap();
        let second = clean_phone(&text(&normalized), "Celulares");
        assert_eq!(second.value, Some(normalized));
        assert_eq!(second.reason, None);
    }

    #[test]
    fn test_phone_landline() {
        let outcome = clean_phone(&text("(11) 3333-4444"), "Telefones");
        assert_eq!(outcome.value, Some("+551133334444".to_string()));
    }

    #[test]
    fn test_phone_invalid_shape() {
        let outcome = clean_phone(&text("12345"), "Celulares");
        assert_eq!(outcome.value, None);
        assert!(outcome.reason.unwrap().contains("Celulares inválido"));
    }

    #[test]
    fn test_phone_mobile_needs_valid_third_digit() {
        // 11 digits but 3rd digit outside 6-9.
        let outcome = clean_phone(&text("11587654321"), "Celulares");
        assert_eq!(outcome.value, None);
        assert!(outcome.reason.is_some());
    }

    #[test]
    fn test_phone_absent_is_not_error() {
        let outcome = clean_phone(&CellValue::Absent, "Celulares");
        assert_eq!(outcome.value, None);
        assert_eq!(outcome.reason, None);
    }

    // ===== Email =====

    #[test]
    fn test_email_valid_trimmed() {
        let outcome = clean_email(&text("  test@example.com  "));
        assert_eq!(outcome.value, Some("test@example.com".to_string()));
        assert_eq!(outcome.reason, None);
    }

    #[test]
    fn test_email_invalid() {
        let outcome = clean_email(&text("invalid-email"));
        assert_eq!(outcome.value, None);
        assert_eq!(outcome.reason.unwrap(), "Formato de email inválido.");
    }

    #[test]
    fn test_email_absent_is_not_error() {
        let outcome = clean_email(&CellValue::Absent);
        assert_eq!(outcome.value, None);
        assert_eq!(outcome.reason, None);
    }

    // ===== CEP =====

    #[test]
    fn test_cep_exact_eight_digits() {
        let outcome = clean_cep(&text("12345-678"));
        assert_eq!(outcome.value, "12345678");
        assert_eq!(outcome.reason, None);
    }

    #[test]
    fn test_cep_short_is_zero_padded_and_accepted() {
        let outcome = clean_cep(&text("12345"));
        assert_eq!(outcome.value, "00012345");
        assert_eq!(outcome.reason, None);
    }

    #[test]
    fn test_cep_too_long_rejected() {
        let outcome = clean_cep(&text("123456789"));
        assert_eq!(outcome.value, CEP_SENTINEL);
        assert!(outcome.reason.unwrap().contains("8 dígitos"));
    }

    #[test]
    fn test_cep_non_numeric() {
        let outcome = clean_cep(&text("abc"));
        assert_eq!(outcome.value, CEP_SENTINEL);
        assert!(outcome.reason.is_some());
    }

    #[test]
    fn test_cep_absent() {
        let outcome = clean_cep(&CellValue::Absent);
        assert_eq!(outcome.value, CEP_SENTINEL);
        assert_eq!(outcome.reason.unwrap(), "CEP ausente ou vazio.");
    }

    #[test]
    fn test_cep_numeric_cell() {
        // Excel stores bare CEPs as numbers; leading zeros are lost there.
        let outcome = clean_cep(&CellValue::Number(12345678.0));
        assert_eq!(outcome.value, "12345678");
    }

    // ===== UF =====

    #[test]
    fn test_uf_code_and_full_name() {
        assert_eq!(normalize_uf(&text("SP")).value, "SP");
        assert_eq!(normalize_uf(&text("São Paulo")).value, "SP");
        assert_eq!(normalize_uf(&text("são paulo")).value, "SP");
    }

    #[test]
    fn test_uf_invalid() {
        let outcome = normalize_uf(&text("ZZ"));
        assert_eq!(outcome.value, UF_SENTINEL);
        assert_eq!(outcome.reason.unwrap(), "UF inválido.");
    }

    // ===== Due day =====

    #[test]
    fn test_due_day_valid_forms() {
        assert_eq!(validate_due_day(&text("15")).value, 15);
        assert_eq!(validate_due_day(&text("15.0")).value, 15);
        assert_eq!(validate_due_day(&CellValue::Number(15.0)).value, 15);
    }

    #[test]
    fn test_due_day_out_of_range() {
        let outcome = validate_due_day(&CellValue::Number(32.0));
        assert_eq!(outcome.value, DUE_DAY_SENTINEL);
        assert!(outcome.reason.unwrap().contains("entre 1 e 31"));

        let outcome = validate_due_day(&text("0"));
        assert_eq!(outcome.value, DUE_DAY_SENTINEL);
        assert!(outcome.reason.is_some());
    }

    #[test]
    fn test_due_day_non_numeric() {
        let outcome = validate_due_day(&text("invalid"));
        assert_eq!(outcome.value, DUE_DAY_SENTINEL);
        assert_eq!(outcome.reason.unwrap(), "Dia de vencimento não é um número.");
    }

    // ===== Currency =====

    #[test]
    fn test_plan_price_thousands_separator() {
        let outcome = validate_plan_price(&text("1,234.56"));
        assert_eq!(outcome.value, 1234.56);
        assert_eq!(outcome.reason, None);
    }

    #[test]
    fn test_plan_price_invalid() {
        let outcome = validate_plan_price(&text("invalid"));
        assert_eq!(outcome.value, 0.0);
        assert_eq!(outcome.reason.unwrap(), "Plano Valor inválido.");
    }

    // ===== Exemption flag =====

    #[test]
    fn test_exempt_tokens() {
        assert!(validate_exempt_flag(&text("Sim")).value);
        assert!(validate_exempt_flag(&text("1")).value);
        assert!(!validate_exempt_flag(&text("Não")).value);
        assert!(!validate_exempt_flag(&text("no")).value);
    }

    #[test]
    fn test_exempt_absent_is_false_without_reason() {
        let outcome = validate_exempt_flag(&CellValue::Absent);
        assert!(!outcome.value);
        assert_eq!(outcome.reason, None);
    }

    #[test]
    fn test_exempt_unknown_token() {
        let outcome = validate_exempt_flag(&text("maybe"));
        assert!(!outcome.value);
        assert!(outcome.reason.unwrap().contains("maybe"));
    }

    // ===== Free text =====

    #[test]
    fn test_free_text_default_on_absent() {
        let outcome = clean_free_text(&CellValue::Absent, Some(255), Some("Rua Desconhecida"));
        assert_eq!(outcome.value, Some("Rua Desconhecida".to_string()));
        assert_eq!(outcome.reason, None);
    }

    #[test]
    fn test_free_text_truncates_on_char_boundary() {
        let outcome = clean_free_text(&text("Joãoooo"), Some(4), None);
        assert_eq!(outcome.value, Some("João".to_string()));
    }
}
