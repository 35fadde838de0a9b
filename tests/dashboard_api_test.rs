// ==========================================
// DashboardApi 集成测试
// ==========================================

mod helpers;

use helpers::api_test_helper::ApiTestEnv;
use helpers::test_data_builder::{date, ids};
use metro_induction::domain::types::{AlertCategory, AlertPriority, TrainStatus};

#[test]
fn test_fleet_stats_on_initial_roster() {
    let env = ApiTestEnv::seeded().expect("无法创建测试环境");
    let stats = env.state.dashboard_api.fleet_stats().unwrap();

    assert_eq!(stats.total, 25);
    assert_eq!((stats.in_service, stats.standby, stats.maintenance), (12, 8, 5));
    assert_eq!(stats.available, 20);
    assert_eq!(stats.utilization_rate, 48);
    assert_eq!(stats.maintenance_rate, 20);
    assert_eq!(stats.availability_rate, 80);
    assert_eq!(stats.high_priority_maintenance, 5);
    assert_eq!(stats.needs_cleaning, 10);
    assert_eq!(stats.fitness_issues, 5);
}

#[test]
fn test_fleet_stats_on_empty_roster() {
    let env = ApiTestEnv::in_memory().expect("无法创建测试环境");
    let stats = env.state.dashboard_api.fleet_stats().unwrap();

    assert_eq!(stats.total, 0);
    assert_eq!(stats.utilization_rate, 0);
    assert_eq!(stats.availability_rate, 0);
}

#[test]
fn test_maintenance_overview() {
    let env = ApiTestEnv::seeded().expect("无法创建测试环境");
    let overview = env.state.dashboard_api.maintenance_overview().unwrap();

    assert_eq!(overview.pending, 5);
    assert_eq!(overview.in_progress, 5);
    assert_eq!(overview.critical, 0);
}

#[test]
fn test_critical_alerts_order() {
    let env = ApiTestEnv::seeded().expect("无法创建测试环境");
    let alerts = env.state.dashboard_api.critical_alerts().unwrap();

    assert_eq!(alerts.len(), 7);
    let certification: Vec<String> = alerts
        .iter()
        .filter(|a| a.category == AlertCategory::Certification)
        .map(|a| a.train_id.clone())
        .collect();
    assert_eq!(certification, ids(&["T-002", "T-005", "T-009", "T-018", "T-024"]));

    assert_eq!(alerts[5].category, AlertCategory::Cleaning);
    assert_eq!(alerts[5].train_id, "T-002");
    assert_eq!(alerts[6].train_id, "T-005");
    assert_eq!(alerts[6].priority, AlertPriority::Medium);
}

#[test]
fn 高优先级列车离开检修后出现检修告警() {
    let env = ApiTestEnv::seeded().expect("无法创建测试环境");
    env.state
        .fleet_api
        .override_status(&ids(&["T-024"]), TrainStatus::Standby)
        .unwrap();

    let alerts = env.state.dashboard_api.critical_alerts().unwrap();
    assert_eq!(alerts.len(), 8);
    assert_eq!(alerts[0].train_id, "T-024");
    assert_eq!(alerts[0].category, AlertCategory::Maintenance);
    assert_eq!(alerts[0].priority, AlertPriority::High);

    let overview = env.state.dashboard_api.maintenance_overview().unwrap();
    assert_eq!(overview.critical, 1);
}

#[test]
fn test_maintenance_alerts_default_thresholds() {
    let env = ApiTestEnv::seeded().expect("无法创建测试环境");
    let alerts = env
        .state
        .dashboard_api
        .maintenance_alerts(date(2024, 2, 12))
        .unwrap();

    let order: Vec<String> = alerts.iter().map(|a| a.train_id.clone()).collect();
    assert_eq!(
        order,
        ids(&[
            "T-025", "T-011", "T-021", "T-007", "T-016", "T-012", "T-001", "T-010", "T-023",
            "T-019", "T-004", "T-014"
        ])
    );
    assert_eq!(alerts[0].days_remaining, -3);
    assert!(alerts[0].is_overdue());
    assert_eq!(
        alerts
            .iter()
            .filter(|a| a.priority == AlertPriority::High)
            .count(),
        7
    );
    assert_eq!(alerts[11].days_remaining, 7);
    assert_eq!(alerts[11].priority, AlertPriority::Medium);
}

#[test]
fn test_maintenance_alerts_follow_settings() {
    let env = ApiTestEnv::seeded().expect("无法创建测试环境");
    let mut settings = env.state.config_api.get_settings().unwrap();
    settings.alert_window_days = 3;
    settings.high_priority_days = 0;
    env.state.config_api.update_settings(&settings).unwrap();

    let alerts = env
        .state
        .dashboard_api
        .maintenance_alerts(date(2024, 2, 12))
        .unwrap();
    assert_eq!(alerts.len(), 7);
    assert_eq!(
        alerts
            .iter()
            .filter(|a| a.priority == AlertPriority::High)
            .count(),
        4
    );

    settings.maintenance_alerts_enabled = false;
    env.state.config_api.update_settings(&settings).unwrap();
    assert!(env
        .state
        .dashboard_api
        .maintenance_alerts(date(2024, 2, 12))
        .unwrap()
        .is_empty());
}

#[test]
fn test_snapshot_combines_views() {
    let env = ApiTestEnv::seeded().expect("无法创建测试环境");
    let today = date(2024, 2, 12);
    let snapshot = env.state.dashboard_api.snapshot(today).unwrap();

    assert_eq!(snapshot.as_of, today);
    assert_eq!(snapshot.stats.total, 25);
    assert_eq!(snapshot.overview.in_progress, 5);
    assert_eq!(snapshot.critical_alerts.len(), 7);
    assert_eq!(snapshot.maintenance_alerts.len(), 12);
}
