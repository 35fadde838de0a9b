// ==========================================
// 引擎间集成测试
// ==========================================
// 职责: 验证多个引擎之间的协作和数据流转
// 场景: 样例名册 → InductionOptimizer → SimulationAnalyzer / FleetStatsEngine
// ==========================================

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use metro_induction::domain::train::TrainRecord;
use metro_induction::domain::types::TrainStatus;
use metro_induction::engine::{
    CriticalAlertEngine, EligibilityCore, FleetStatsEngine, InductionOptimizer,
    MaintenanceAlertEngine, SimulationAnalyzer, SimulationOptions,
};
use metro_induction::importer::RosterImporter;

fn fixture() -> Vec<TrainRecord> {
    RosterImporter::new().load_initial_roster().unwrap()
}

fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 2, 12, 6, 0, 0).unwrap()
}

/// 按方案分组覆写名册状态（模拟落地）
fn apply(roster: &[TrainRecord], assignments: &[(String, TrainStatus)]) -> Vec<TrainRecord> {
    let mut out = roster.to_vec();
    for (id, status) in assignments {
        if let Some(t) = out.iter_mut().find(|t| &t.train_id == id) {
            t.status = *status;
        }
    }
    out
}

#[test]
fn test_plan_partitions_fixture() {
    let roster = fixture();
    let plan = InductionOptimizer::new()
        .plan_at(&roster, 6, fixed_time())
        .unwrap();

    assert_eq!(plan.generated_at, fixed_time());
    assert_eq!(plan.total(), roster.len());

    // 扣车检修 = 门槛不通过的列车,与名册顺序一致
    let held: Vec<String> = roster
        .iter()
        .filter(|t| !EligibilityCore::is_eligible(t))
        .map(|t| t.train_id.clone())
        .collect();
    assert_eq!(plan.maintenance, held);

    // 投运列车走行公里不高于任一备用列车
    let mileage = |id: &String| roster.iter().find(|t| &t.train_id == id).unwrap().mileage;
    let max_service = plan.in_service.iter().map(mileage).max().unwrap();
    let min_standby = plan.standby.iter().map(mileage).min().unwrap();
    assert!(max_service <= min_standby);
}

#[test]
fn test_applied_plan_feeds_stats_and_alerts() {
    let roster = fixture();
    let plan = InductionOptimizer::new()
        .plan_at(&roster, 6, fixed_time())
        .unwrap();
    let after = apply(&roster, &plan.assignments());

    let stats = FleetStatsEngine::compute(&after);
    assert_eq!((stats.in_service, stats.standby, stats.maintenance), (6, 9, 10));
    assert_eq!(stats.utilization_rate, 24);
    assert_eq!(stats.availability_rate, 60);

    // 高优先级列车均已扣车,无检修类关键告警
    let overview = FleetStatsEngine::maintenance_overview(&after);
    assert_eq!(overview.critical, 0);
    assert_eq!(CriticalAlertEngine::derive_alerts(&after).len(), 7);

    // 检修到期告警只依赖日期,与状态无关
    let today = NaiveDate::from_ymd_opt(2024, 2, 12).unwrap();
    let engine = MaintenanceAlertEngine::new();
    assert_eq!(
        engine.derive_alerts(&after, today),
        engine.derive_alerts(&roster, today)
    );
}

#[test]
fn test_replanning_applied_roster_is_stable() {
    let roster = fixture();
    let optimizer = InductionOptimizer::new();
    let first = optimizer.plan_at(&roster, 6, fixed_time()).unwrap();
    let after = apply(&roster, &first.assignments());

    let second = optimizer.plan_at(&after, 6, fixed_time()).unwrap();
    assert_eq!(second, first);
}

#[test]
fn test_simulation_matches_optimizer() {
    let roster = fixture();
    let plan = InductionOptimizer::new()
        .plan_at(&roster, 10, fixed_time())
        .unwrap();
    let report = SimulationAnalyzer::analyze(&roster, plan.clone(), SimulationOptions::default());

    assert_eq!(report.plan, plan);
    assert_eq!(report.statistics.service_percentage, 40);
    assert_eq!(report.statistics.efficiency_gain, Some(-17));
    assert_eq!(report.statistics.maintenance_reduction, -5);
}
