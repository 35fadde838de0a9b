// ==========================================
// 地铁车队投运排程系统 - 车队名册 API
// ==========================================
// 职责: 名册查询、人工增删改、批量状态覆写、名册重置与导入
// 红线: 每次写入后生成通知;校验失败不产生写入
// ==========================================

use std::cmp::Ordering;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::api::error::{ApiError, ApiResult};
use crate::api::notifier::FleetNotifier;
use crate::api::validator;
use crate::domain::train::{RosterSortKey, SortOrder, TrainPatch, TrainRecord};
use crate::domain::types::{NotificationType, TrainStatus};
use crate::engine::events::FleetEventType;
use crate::importer::RosterImporter;
use crate::repository::error::RepositoryError;
use crate::repository::train_repo::TrainRepository;

/// 自动生成的列车编号前缀
pub const TRAIN_ID_PREFIX: &str = "T-";

// ==========================================
// FleetApi - 车队名册 API
// ==========================================

/// 车队名册API
///
/// 职责：
/// 1. 名册查询（原始顺序 / 排序 / 搜索）
/// 2. 人工新增、编辑、删除列车
/// 3. 批量状态覆写
/// 4. 名册重置（内置样例 / 指定记录 / 文件导入）
pub struct FleetApi {
    train_repo: Arc<TrainRepository>,
    notifier: Arc<FleetNotifier>,
    importer: RosterImporter,
}

impl FleetApi {
    /// 创建新的FleetApi实例
    pub fn new(train_repo: Arc<TrainRepository>, notifier: Arc<FleetNotifier>) -> Self {
        Self {
            train_repo,
            notifier,
            importer: RosterImporter::new(),
        }
    }

    // ==========================================
    // 查询接口
    // ==========================================

    /// 查询名册（名册顺序）
    pub fn list_trains(&self) -> ApiResult<Vec<TrainRecord>> {
        Ok(self.train_repo.list_all()?)
    }

    /// 排序查询（稳定排序,相等元素保持名册顺序）
    pub fn list_trains_sorted(
        &self,
        key: RosterSortKey,
        order: SortOrder,
    ) -> ApiResult<Vec<TrainRecord>> {
        let mut trains = self.train_repo.list_all()?;
        trains.sort_by(|a, b| {
            let ordering = compare_by_key(a, b, key);
            match order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
        Ok(trains)
    }

    /// 搜索列车
    ///
    /// 编号、名称、状态展示名任一包含关键字即命中（忽略大小写）;
    /// 空关键字返回全部
    pub fn search_trains(&self, term: &str) -> ApiResult<Vec<TrainRecord>> {
        let trains = self.train_repo.list_all()?;
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(trains);
        }

        Ok(trains
            .into_iter()
            .filter(|t| {
                t.train_id.to_lowercase().contains(&needle)
                    || t.train_name.to_lowercase().contains(&needle)
                    || t.status.label().to_lowercase().contains(&needle)
            })
            .collect())
    }

    /// 查询单列车
    ///
    /// # 返回
    /// - Err(NotFound): 列车不存在
    pub fn get_train(&self, train_id: &str) -> ApiResult<TrainRecord> {
        self.train_repo
            .find_by_id(train_id)?
            .ok_or_else(|| RepositoryError::train_not_found(train_id).into())
    }

    /// 生成下一个列车编号
    ///
    /// 取现有 `T-NNN` 编号的最大序号加一,名册为空时为 T-001
    pub fn next_train_id(&self) -> ApiResult<String> {
        let ids = self.train_repo.list_ids()?;
        Ok(next_train_id_from(&ids))
    }

    // ==========================================
    // 人工编辑
    // ==========================================

    /// 新增列车
    ///
    /// # 返回
    /// - Err(InvalidInput): 编号 / 名称为空
    /// - Err(BusinessRuleViolation): 编号已存在
    #[instrument(skip(self, train), fields(train_id = %train.train_id))]
    pub fn add_train(&self, train: TrainRecord) -> ApiResult<TrainRecord> {
        validator::validate_new_train(&train)?;
        if self.train_repo.exists(&train.train_id)? {
            return Err(ApiError::BusinessRuleViolation(format!(
                "列车编号已存在: {}",
                train.train_id
            )));
        }

        self.train_repo.insert(&train)?;
        info!("新增列车");

        let event = self
            .notifier
            .notice(
                FleetEventType::TrainAdded,
                NotificationType::Success,
                "fleet.train_added",
                &[("train_id", train.train_id.as_str())],
            )
            .with_trains(vec![train.train_id.clone()]);
        self.notifier.emit(event);

        Ok(train)
    }

    /// 编辑列车
    ///
    /// # 参数
    /// - train_id: 列车编号（不可修改）
    /// - patch: 编辑补丁,None 字段保持原值
    #[instrument(skip(self, patch))]
    pub fn update_train(&self, train_id: &str, patch: &TrainPatch) -> ApiResult<TrainRecord> {
        validator::validate_patch(patch)?;
        let mut train = self.get_train(train_id)?;

        let status_overridden = train.apply_patch(patch);
        self.train_repo.update(&train)?;
        info!(status_overridden, "列车档案已更新");

        let event = self
            .notifier
            .notice(
                FleetEventType::TrainUpdated,
                NotificationType::Info,
                "fleet.train_updated",
                &[("train_id", train_id)],
            )
            .with_trains(vec![train_id.to_string()]);
        self.notifier.emit(event);

        Ok(train)
    }

    /// 删除列车
    ///
    /// # 返回
    /// - Err(NotFound): 列车不存在
    #[instrument(skip(self))]
    pub fn delete_train(&self, train_id: &str) -> ApiResult<()> {
        if !self.train_repo.delete(train_id)? {
            return Err(RepositoryError::train_not_found(train_id).into());
        }
        info!("列车已移除");

        let event = self
            .notifier
            .notice(
                FleetEventType::TrainRemoved,
                NotificationType::Warning,
                "fleet.train_removed",
                &[("train_id", train_id)],
            )
            .with_trains(vec![train_id.to_string()]);
        self.notifier.emit(event);

        Ok(())
    }

    /// 批量覆写状态
    ///
    /// 名册中不存在的编号被忽略
    ///
    /// # 返回
    /// - 实际更新的列车数
    #[instrument(skip(self, train_ids), fields(requested = train_ids.len()))]
    pub fn override_status(&self, train_ids: &[String], status: TrainStatus) -> ApiResult<usize> {
        if train_ids.is_empty() {
            return Err(ApiError::InvalidInput("列车编号列表不能为空".to_string()));
        }

        let assignments: Vec<(String, TrainStatus)> = train_ids
            .iter()
            .map(|id| (id.clone(), status))
            .collect();
        let updated = self.train_repo.update_status_batch(&assignments)?;
        info!(updated, status = %status, "批量状态覆写完成");

        let count = updated.to_string();
        let event = self
            .notifier
            .notice(
                FleetEventType::StatusOverridden,
                NotificationType::Success,
                "fleet.status_overridden",
                &[("count", count.as_str()), ("status", status.label())],
            )
            .with_trains(train_ids.to_vec());
        self.notifier.emit(event);

        Ok(updated)
    }

    // ==========================================
    // 名册重置 / 导入
    // ==========================================

    /// 重置为内置样例名册
    pub fn reset_roster(&self) -> ApiResult<usize> {
        let trains = self.importer.load_initial_roster()?;
        self.reset_roster_with(trains)
    }

    /// 以指定记录替换整个名册（单事务）
    ///
    /// # 返回
    /// - Err(InvalidInput): 记录字段不合法或编号重复
    #[instrument(skip(self, trains), fields(train_count = trains.len()))]
    pub fn reset_roster_with(&self, trains: Vec<TrainRecord>) -> ApiResult<usize> {
        let mut seen = HashSet::with_capacity(trains.len());
        for train in &trains {
            validator::validate_new_train(train)?;
            if !seen.insert(train.train_id.as_str()) {
                return Err(ApiError::InvalidInput(format!(
                    "名册中存在重复列车编号: {}",
                    train.train_id
                )));
            }
        }

        let count = self.train_repo.replace_all(&trains)?;
        info!(count, "名册已重置");

        let count_text = count.to_string();
        let event = self.notifier.notice(
            FleetEventType::RosterReset,
            NotificationType::Info,
            "fleet.roster_reset",
            &[("count", count_text.as_str())],
        );
        self.notifier.emit(event);

        Ok(count)
    }

    /// 从 JSON / CSV 文件导入并替换名册
    #[instrument(skip(self, file_path), fields(path = %file_path.as_ref().display()))]
    pub fn import_roster_file<P: AsRef<Path>>(&self, file_path: P) -> ApiResult<usize> {
        let trains = self.importer.import_file(file_path.as_ref())?;
        for train in &trains {
            validator::validate_new_train(train)?;
        }

        let count = self.train_repo.replace_all(&trains)?;
        info!(count, "名册文件导入完成");

        let count_text = count.to_string();
        let path_text = file_path.as_ref().display().to_string();
        let event = self.notifier.notice(
            FleetEventType::RosterReset,
            NotificationType::Success,
            "import.roster_imported",
            &[("count", count_text.as_str()), ("path", path_text.as_str())],
        );
        self.notifier.emit(event);

        Ok(count)
    }

    /// 名册为空时写入内置样例（不生成通知）
    ///
    /// # 返回
    /// - 写入的列车数,名册非空时为 0
    pub fn seed_initial_roster_if_empty(&self) -> ApiResult<usize> {
        if self.train_repo.count()? > 0 {
            return Ok(0);
        }
        let trains = self.importer.load_initial_roster()?;
        let count = self.train_repo.replace_all(&trains)?;
        info!(count, "已写入内置样例名册");
        Ok(count)
    }
}

fn compare_by_key(a: &TrainRecord, b: &TrainRecord, key: RosterSortKey) -> Ordering {
    match key {
        RosterSortKey::TrainId => a.train_id.cmp(&b.train_id),
        RosterSortKey::TrainName => a.train_name.cmp(&b.train_name),
        RosterSortKey::Mileage => a.mileage.cmp(&b.mileage),
        RosterSortKey::Status => a.status.label().cmp(b.status.label()),
        RosterSortKey::NextMaintenance => a.next_maintenance_date.cmp(&b.next_maintenance_date),
    }
}

fn next_train_id_from(ids: &[String]) -> String {
    let max = ids
        .iter()
        .filter_map(|id| id.strip_prefix(TRAIN_ID_PREFIX))
        .filter_map(|suffix| suffix.parse::<u32>().ok())
        .max()
        .unwrap_or(0);
    format!("{}{:03}", TRAIN_ID_PREFIX, max.saturating_add(1))
}
