use super::TrainRepository;
use crate::domain::train::TrainRecord;
use crate::domain::types::{MaintenancePriority, TrainStatus};
use crate::repository::error::RepositoryError;
use chrono::NaiveDate;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

fn setup_test_db() -> Arc<Mutex<Connection>> {
    let conn = Connection::open_in_memory().unwrap();
    crate::db::configure_sqlite_connection(&conn).unwrap();
    crate::db::init_schema(&conn).unwrap();
    Arc::new(Mutex::new(conn))
}

fn make_train(id: &str, mileage: u32) -> TrainRecord {
    let mut train = TrainRecord::new(id, &format!("Train {}", id), NaiveDate::from_ymd_opt(2026, 4, 1).unwrap());
    train.mileage = mileage;
    train
}

#[test]
fn test_insert_and_find_by_id() {
    let repo = TrainRepository::from_connection(setup_test_db());

    let mut train = make_train("T-001", 1200);
    train.maintenance_priority = MaintenancePriority::High;
    train.last_maintenance_date = NaiveDate::from_ymd_opt(2026, 1, 3);
    train.branding = Some("City Lines".to_string());
    repo.insert(&train).unwrap();

    let loaded = repo.find_by_id("T-001").unwrap().unwrap();
    assert_eq!(loaded.train_id, "T-001");
    assert_eq!(loaded.mileage, 1200);
    assert_eq!(loaded.maintenance_priority, MaintenancePriority::High);
    assert_eq!(loaded.last_maintenance_date, NaiveDate::from_ymd_opt(2026, 1, 3));
    assert_eq!(loaded.branding.as_deref(), Some("City Lines"));
    assert!(repo.find_by_id("T-999").unwrap().is_none());
}

#[test]
fn test_duplicate_insert_is_unique_violation() {
    let repo = TrainRepository::from_connection(setup_test_db());
    repo.insert(&make_train("T-001", 0)).unwrap();

    let err = repo.insert(&make_train("T-001", 5)).unwrap_err();
    assert!(matches!(err, RepositoryError::UniqueConstraintViolation(_)));
}

#[test]
fn test_list_all_keeps_insertion_order() {
    let repo = TrainRepository::from_connection(setup_test_db());
    for id in ["T-003", "T-001", "T-002"] {
        repo.insert(&make_train(id, 0)).unwrap();
    }

    assert_eq!(repo.list_ids().unwrap(), vec!["T-003", "T-001", "T-002"]);
    assert_eq!(repo.count().unwrap(), 3);

    // 删除后追加的列车排在末尾
    assert!(repo.delete("T-001").unwrap());
    assert!(!repo.delete("T-001").unwrap());
    repo.insert(&make_train("T-004", 0)).unwrap();
    assert_eq!(repo.list_ids().unwrap(), vec!["T-003", "T-002", "T-004"]);
}

#[test]
fn test_update_missing_train_is_not_found() {
    let repo = TrainRepository::from_connection(setup_test_db());
    let err = repo.update(&make_train("T-404", 0)).unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound { .. }));
}

#[test]
fn test_update_status_batch_skips_unknown_ids() {
    let repo = TrainRepository::from_connection(setup_test_db());
    repo.insert(&make_train("T-001", 0)).unwrap();
    repo.insert(&make_train("T-002", 0)).unwrap();

    let updated = repo
        .update_status_batch(&[
            ("T-001".to_string(), TrainStatus::InService),
            ("T-002".to_string(), TrainStatus::Maintenance),
            ("T-404".to_string(), TrainStatus::InService),
        ])
        .unwrap();

    assert_eq!(updated, 2);
    assert_eq!(repo.find_by_id("T-001").unwrap().unwrap().status, TrainStatus::InService);
    assert_eq!(repo.find_by_id("T-002").unwrap().unwrap().status, TrainStatus::Maintenance);
}

#[test]
fn test_replace_all_resets_order() {
    let repo = TrainRepository::from_connection(setup_test_db());
    repo.insert(&make_train("OLD", 0)).unwrap();

    let replaced = repo
        .replace_all(&[make_train("B", 1), make_train("A", 2)])
        .unwrap();

    assert_eq!(replaced, 2);
    assert_eq!(repo.list_ids().unwrap(), vec!["B", "A"]);
    assert!(!repo.exists("OLD").unwrap());
}
