// ==========================================
// 地铁车队投运排程系统 - 投运排程 API
// ==========================================
// 职责: 排程落地、仿真、历史方案查询与重新落地
// 红线: 名册快照在排程前一次性读取,方案落地为单事务
// 红线: 仿真不修改名册
// ==========================================

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tracing::{info, instrument, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::api::notifier::FleetNotifier;
use crate::api::validator;
use crate::config::config_manager::ConfigManager;
use crate::domain::plan::InductionPlanRecord;
use crate::domain::types::NotificationType;
use crate::engine::events::FleetEventType;
use crate::engine::induction::InductionOptimizer;
use crate::engine::simulation::{SimulationAnalyzer, SimulationOptions, SimulationReport};
use crate::repository::error::RepositoryError;
use crate::repository::plan_history_repo::{
    CommittedRun, PlanHistoryRepository, DEFAULT_PLAN_HISTORY_CAP,
};
use crate::repository::train_repo::TrainRepository;

/// 保留的仿真结果数（仅内存）
pub const SIMULATION_HISTORY_CAP: usize = 5;

/// 默认操作人
pub const SYSTEM_ACTOR: &str = "system";

// ==========================================
// InductionApi - 投运排程 API
// ==========================================
pub struct InductionApi {
    train_repo: Arc<TrainRepository>,
    plan_history_repo: Arc<PlanHistoryRepository>,
    config_manager: Arc<ConfigManager>,
    notifier: Arc<FleetNotifier>,
    optimizer: InductionOptimizer,
    simulations: Mutex<VecDeque<SimulationReport>>,
}

impl InductionApi {
    pub fn new(
        train_repo: Arc<TrainRepository>,
        plan_history_repo: Arc<PlanHistoryRepository>,
        config_manager: Arc<ConfigManager>,
        notifier: Arc<FleetNotifier>,
    ) -> Self {
        Self {
            train_repo,
            plan_history_repo,
            config_manager,
            notifier,
            optimizer: InductionOptimizer::new(),
            simulations: Mutex::new(VecDeque::with_capacity(SIMULATION_HISTORY_CAP)),
        }
    }

    fn plan_history_cap(&self) -> usize {
        self.config_manager.get_plan_history_cap().unwrap_or_else(|e| {
            warn!(error = %e, "读取方案历史上限失败, 使用默认值");
            DEFAULT_PLAN_HISTORY_CAP
        })
    }

    // ==========================================
    // 排程
    // ==========================================

    /// 运行排程并落地
    ///
    /// # 流程
    /// 1. 校验期望投运数量
    /// 2. 单事务内读取名册快照、生成方案并落地（列车状态与已落地方案）
    /// 3. 生成通知
    ///
    /// # 返回
    /// - Err(InvalidArgument): 期望投运数量为负或名册编号重复,无任何写入
    /// - 其余错误同样整体回滚,不发通知
    #[instrument(skip(self))]
    pub fn run_optimizer(
        &self,
        desired_service_count: i64,
        operator: &str,
    ) -> ApiResult<InductionPlanRecord> {
        validator::validate_service_count(desired_service_count)?;

        let cap = self.plan_history_cap();
        let CommittedRun {
            record,
            updated,
            pruned,
        } = self.plan_history_repo.commit_run(cap, |roster| {
            let plan = self.optimizer.plan(roster, desired_service_count)?;
            Ok::<_, ApiError>(InductionPlanRecord {
                plan_id: uuid::Uuid::new_v4().to_string(),
                actor: operator.to_string(),
                applied: true,
                plan,
            })
        })?;

        let counts = record.plan.counts();
        info!(
            plan_id = %record.plan_id,
            in_service = counts.in_service,
            standby = counts.standby,
            maintenance = counts.maintenance,
            updated,
            pruned,
            "排程方案已落地"
        );

        let (service, standby, maintenance) = (
            counts.in_service.to_string(),
            counts.standby.to_string(),
            counts.maintenance.to_string(),
        );
        let event = self
            .notifier
            .notice(
                FleetEventType::PlanGenerated,
                NotificationType::Success,
                "induction.optimizer_run",
                &[
                    ("service", service.as_str()),
                    ("standby", standby.as_str()),
                    ("maintenance", maintenance.as_str()),
                ],
            )
            .with_plan(&record.plan_id)
            .with_trains(record.plan.in_service.clone());
        self.notifier.emit(event);

        Ok(record)
    }

    /// 以设置中的默认投运数量运行排程
    pub fn run_with_default_count(&self, operator: &str) -> ApiResult<InductionPlanRecord> {
        let count = self
            .config_manager
            .get_default_service_count()
            .map_err(|e| ApiError::DatabaseError(e.to_string()))?;
        self.run_optimizer(i64::from(count), operator)
    }

    // ==========================================
    // 仿真
    // ==========================================

    /// 仿真排程（不落地）
    ///
    /// 仿真参数仅回显在报告中,不影响分组
    #[instrument(skip(self, options))]
    pub fn simulate(
        &self,
        desired_service_count: i64,
        options: SimulationOptions,
    ) -> ApiResult<SimulationReport> {
        validator::validate_service_count(desired_service_count)?;

        let roster = self.train_repo.list_all()?;
        let plan = self.optimizer.plan(&roster, desired_service_count)?;
        let report = SimulationAnalyzer::analyze(&roster, plan, options);

        {
            let mut history = self
                .simulations
                .lock()
                .map_err(|e| ApiError::InternalError(format!("仿真历史锁获取失败: {}", e)))?;
            history.push_front(report.clone());
            history.truncate(SIMULATION_HISTORY_CAP);
        }

        let in_service = report.plan.in_service.len().to_string();
        info!(
            in_service = report.plan.in_service.len(),
            strategy = %options.priority_strategy,
            "仿真完成"
        );
        let event = self.notifier.notice(
            FleetEventType::SimulationCompleted,
            NotificationType::Success,
            "induction.simulation_completed",
            &[("count", in_service.as_str())],
        );
        self.notifier.emit(event);

        Ok(report)
    }

    /// 最近的仿真结果（新 → 旧,最多 5 条）
    pub fn recent_simulations(&self) -> ApiResult<Vec<SimulationReport>> {
        let history = self
            .simulations
            .lock()
            .map_err(|e| ApiError::InternalError(format!("仿真历史锁获取失败: {}", e)))?;
        Ok(history.iter().cloned().collect())
    }

    // ==========================================
    // 历史方案
    // ==========================================

    /// 重新落地历史方案
    ///
    /// 方案生成后被删除的列车会被跳过
    ///
    /// # 返回
    /// - 实际更新的列车数
    /// - Err(NotFound): 方案不存在
    #[instrument(skip(self))]
    pub fn apply_plan(&self, plan_id: &str, operator: &str) -> ApiResult<usize> {
        let updated = self.plan_history_repo.reapply(plan_id)?;
        info!(updated, operator, "历史方案已重新落地");

        let count = updated.to_string();
        let event = self
            .notifier
            .notice(
                FleetEventType::PlanApplied,
                NotificationType::Success,
                "induction.plan_applied",
                &[("plan_id", plan_id), ("count", count.as_str())],
            )
            .with_plan(plan_id);
        self.notifier.emit(event);

        Ok(updated)
    }

    /// 方案历史（新 → 旧）
    pub fn list_plan_history(&self, limit: usize) -> ApiResult<Vec<InductionPlanRecord>> {
        Ok(self.plan_history_repo.list_recent(limit)?)
    }

    /// 查询历史方案
    pub fn get_plan(&self, plan_id: &str) -> ApiResult<InductionPlanRecord> {
        self.plan_history_repo
            .find_by_id(plan_id)?
            .ok_or_else(|| RepositoryError::plan_not_found(plan_id).into())
    }

    /// 最近一次方案
    pub fn latest_plan(&self) -> ApiResult<Option<InductionPlanRecord>> {
        Ok(self.plan_history_repo.latest()?)
    }
}
