// ==========================================
// 并发控制测试
// ==========================================
// 职责: 验证共享 AppState 在多线程下的一致性
// ==========================================

mod helpers;

use std::sync::Arc;
use std::thread;

use helpers::api_test_helper::ApiTestEnv;
use metro_induction::domain::types::TrainStatus;
use metro_induction::engine::SimulationOptions;

#[test]
fn test_concurrent_optimizer_runs_keep_roster_consistent() {
    let env = Arc::new(ApiTestEnv::seeded().expect("无法创建测试环境"));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let env = Arc::clone(&env);
            thread::spawn(move || {
                env.state
                    .induction_api
                    .run_optimizer(6, "dispatcher")
                    .expect("排程失败")
            })
        })
        .collect();

    let records: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().expect("线程异常"))
        .collect();

    // 名册不变时每次排程结果一致
    for record in &records {
        assert_eq!(record.plan.in_service, records[0].plan.in_service);
        assert_eq!(record.plan.maintenance, records[0].plan.maintenance);
    }

    let stats = env.state.dashboard_api.fleet_stats().unwrap();
    assert_eq!((stats.in_service, stats.standby, stats.maintenance), (6, 9, 10));
    assert_eq!(env.state.induction_api.list_plan_history(10).unwrap().len(), 4);
    assert_eq!(env.events().len(), 4);
}

#[test]
fn test_concurrent_overrides_and_simulations() {
    let env = Arc::new(ApiTestEnv::seeded().expect("无法创建测试环境"));

    let writer = {
        let env = Arc::clone(&env);
        thread::spawn(move || {
            for id in ["T-001", "T-003", "T-004", "T-006"] {
                env.state
                    .fleet_api
                    .override_status(&[id.to_string()], TrainStatus::Maintenance)
                    .expect("覆写失败");
            }
        })
    };

    let readers: Vec<_> = (0..3)
        .map(|_| {
            let env = Arc::clone(&env);
            thread::spawn(move || {
                let report = env
                    .state
                    .induction_api
                    .simulate(6, SimulationOptions::default())
                    .expect("仿真失败");
                // 状态覆写不影响门槛判定,仿真总数恒为名册规模
                assert_eq!(report.statistics.total_trains, 25);
                assert_eq!(report.plan.in_service.len(), 6);
            })
        })
        .collect();

    writer.join().expect("线程异常");
    for reader in readers {
        reader.join().expect("线程异常");
    }

    let stats = env.state.dashboard_api.fleet_stats().unwrap();
    assert_eq!(stats.maintenance, 9);
    assert_eq!(env.state.induction_api.recent_simulations().unwrap().len(), 3);
}
