// ==========================================
// Repository integration tests
// ==========================================
// Transaction discipline and idempotent
// writes against a temp database file.
// ==========================================


use test_helpers::{count_rows, create_test_db};
use tsmx_import::domain::customer::{NewClient, NewContract};
use tsmx_import::domain::types::ContactKind;
use tsmx_import::repository::{CustomerImportRepository, CustomerImportRepositoryImpl};

fn sample_client(tax_id: &str) -> NewClient {
    NewClient {
        tax_id: tax_id.to_string(),
        legal_name: "Fulano de Tal".to_string(),
        trade_name: Some("Fulano".to_string()),
        birth_date: None,
        registration_date: None,
    }
}

fn sample_contract(client_id: i64, plan_id: i64) -> NewContract {
    NewContract {
        client_id,
        plan_id,
        status_id: 1,
        due_day: 15,
        exempt: false,
        street: "Rua das Flores".to_string(),
        number: Some("100".to_string()),
        district: Some("Centro".to_string()),
        city: Some("São Paulo".to_string()),
        complement: None,
        postal_code: "00012345".to_string(),
        state: "SP".to_string(),
    }
}

#[test]
fn test_committed_row_persists_across_connections() {
    let (_db_file, db_path) = create_test_db().expect("test db");
    let repo = CustomerImportRepositoryImpl::new(&db_path).expect("repository");

    repo.begin().unwrap();
    let (client_id, inserted) = repo.upsert_client(&sample_client("52998224725")).unwrap();
    assert!(inserted);
    repo.insert_contact_if_absent(client_id, ContactKind::Email, "test@example.com")
        .unwrap();
    let plan_id = repo.get_or_create_plan("Fibra 300MB", 99.9).unwrap();
    repo.insert_contract_if_absent(&sample_contract(client_id, plan_id))
        .unwrap();
    repo.commit().unwrap();

    assert_eq!(count_rows(&db_path, "tbl_clientes"), 1);
    assert_eq!(count_rows(&db_path, "tbl_cliente_contatos"), 1);
    assert_eq!(count_rows(&db_path, "tbl_planos"), 1);
    assert_eq!(count_rows(&db_path, "tbl_cliente_contratos"), 1);
}

#[test]
fn test_rollback_leaves_no_partial_state() {
    let (_db_file, db_path) = create_test_db().expect("test db");
    let repo = CustomerImportRepositoryImpl::new(&db_path).expect("repository");

    repo.begin().unwrap();
    let (client_id, _) = repo.upsert_client(&sample_client("52998224725")).unwrap();
    repo.insert_contact_if_absent(client_id, ContactKind::Mobile, "+5511987654321")
        .unwrap();
    let plan_id = repo.get_or_create_plan("Fibra 300MB", 99.9).unwrap();
    repo.insert_contract_if_absent(&sample_contract(client_id, plan_id))
        .unwrap();
    repo.rollback().unwrap();

    // No table keeps anything from the rolled-back row.
    assert_eq!(count_rows(&db_path, "tbl_clientes"), 0);
    assert_eq!(count_rows(&db_path, "tbl_cliente_contatos"), 0);
    assert_eq!(count_rows(&db_path, "tbl_planos"), 0);
    assert_eq!(count_rows(&db_path, "tbl_cliente_contratos"), 0);
}

#[test]
fn test_sequential_rows_commit_independently() {
    let (_db_file, db_path) = create_test_db().expect("test db");
    let repo = CustomerImportRepositoryImpl::new(&db_path).expect("repository");

    // Row 1 commits.
    repo.begin().unwrap();
    repo.upsert_client(&sample_client("52998224725")).unwrap();
    repo.commit().unwrap();

    // Row 2 rolls back; row 1 must survive.
    repo.begin().unwrap();
    repo.upsert_client(&sample_client("11222333000181")).unwrap();
    repo.rollback().unwrap();

    assert_eq!(count_rows(&db_path, "tbl_clientes"), 1);
}

#[test]
fn test_upsert_overwrites_attributes_not_identity() {
    let (_db_file, db_path) = create_test_db().expect("test db");
    let repo = CustomerImportRepositoryImpl::new(&db_path).expect("repository");

    let (id, _) = repo.upsert_client(&sample_client("52998224725")).unwrap();

    let mut updated = sample_client("52998224725");
    updated.legal_name = "Fulano de Tal ME".to_string();
    updated.birth_date = chrono::NaiveDate::from_ymd_opt(1990, 5, 1);
    let (id2, inserted) = repo.upsert_client(&updated).unwrap();

    assert_eq!(id, id2);
    assert!(!inserted);

    let conn = rusqlite::Connection::open(&db_path).unwrap();
    let (name, birth): (String, Option<String>) = conn
        .query_row(
            "SELECT nome_razao_social, data_nascimento FROM tbl_clientes WHERE id = ?1",
            [id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(name, "Fulano de Tal ME");
    assert_eq!(birth.as_deref(), Some("1990-05-01"));
}

#[test]
fn test_foreign_key_enforced_for_contracts() {
    let (_db_file, db_path) = create_test_db().expect("test db");
    let repo = CustomerImportRepositoryImpl::new(&db_path).expect("repository");

    // No client/plan with these ids exist.
    let result = repo.insert_contract_if_absent(&sample_contract(999, 999));
    assert!(result.is_err());
}
