// ==========================================
// 地铁车队投运排程系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::settings::{
    FleetSettings, MAX_ALERT_WINDOW_DAYS, MAX_NOTIFICATION_CAP, MAX_PLAN_HISTORY_CAP,
    MAX_SERVICE_COUNT, MIN_NOTIFICATION_CAP, MIN_PLAN_HISTORY_CAP, MIN_SERVICE_COUNT,
};
use crate::db::open_sqlite_connection;
use crate::engine::simulation::PriorityStrategy;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::Display;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;
        crate::db::init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取配置并解析,缺失或格式错误时返回默认值
    fn get_parsed_or<T: FromStr>(&self, key: &str, default: T) -> Result<T, Box<dyn Error>> {
        Ok(match self.get_config_value(key)? {
            Some(raw) => raw.trim().parse::<T>().unwrap_or_else(|_| {
                tracing::warn!(key = key, value = %raw, "配置值格式错误, 使用默认值");
                default
            }),
            None => default,
        })
    }

    /// 读取配置并截断到 [min, max]
    ///
    /// 库中的值可能绕过了设置校验（手工写库 / 旧版本快照）
    fn get_clamped_or<T>(&self, key: &str, default: T, min: T, max: T) -> Result<T, Box<dyn Error>>
    where
        T: FromStr + PartialOrd + Copy + Display,
    {
        let value = self.get_parsed_or(key, default)?;
        let clamped = if value < min {
            min
        } else if value > max {
            max
        } else {
            return Ok(value);
        };
        tracing::warn!(key = key, value = %value, clamped = %clamped, "配置值超出范围, 已截断");
        Ok(clamped)
    }

    /// 写入 global scope 配置（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value, updated_at)
             VALUES ('global', ?1, ?2, datetime('now'))
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    // ===== 车队设置 =====

    pub fn get_default_service_count(&self) -> Result<u32, Box<dyn Error>> {
        let defaults = FleetSettings::default();
        self.get_clamped_or(
            config_keys::DEFAULT_SERVICE_COUNT,
            defaults.default_service_count,
            MIN_SERVICE_COUNT,
            MAX_SERVICE_COUNT,
        )
    }

    pub fn get_notifications_enabled(&self) -> Result<bool, Box<dyn Error>> {
        self.get_parsed_or(config_keys::NOTIFICATIONS_ENABLED, true)
    }

    pub fn get_maintenance_alerts_enabled(&self) -> Result<bool, Box<dyn Error>> {
        self.get_parsed_or(config_keys::MAINTENANCE_ALERTS_ENABLED, true)
    }

    pub fn get_plan_history_cap(&self) -> Result<usize, Box<dyn Error>> {
        let defaults = FleetSettings::default();
        self.get_clamped_or(
            config_keys::PLAN_HISTORY_CAP,
            defaults.plan_history_cap,
            MIN_PLAN_HISTORY_CAP,
            MAX_PLAN_HISTORY_CAP,
        )
    }

    pub fn get_notification_cap(&self) -> Result<usize, Box<dyn Error>> {
        let defaults = FleetSettings::default();
        self.get_clamped_or(
            config_keys::NOTIFICATION_CAP,
            defaults.notification_cap,
            MIN_NOTIFICATION_CAP,
            MAX_NOTIFICATION_CAP,
        )
    }

    /// 读取完整设置（缺失项取默认值）
    pub fn load_settings(&self) -> Result<FleetSettings, Box<dyn Error>> {
        let defaults = FleetSettings::default();

        let default_strategy = self
            .get_config_value(config_keys::DEFAULT_STRATEGY)?
            .and_then(|raw| PriorityStrategy::parse(&raw))
            .unwrap_or(defaults.default_strategy);

        let alert_window_days = self.get_clamped_or(
            config_keys::ALERT_WINDOW_DAYS,
            defaults.alert_window_days,
            0,
            MAX_ALERT_WINDOW_DAYS,
        )?;
        // 高优先级窗口不超过告警窗口
        let high_priority_days = self.get_clamped_or(
            config_keys::HIGH_PRIORITY_DAYS,
            defaults.high_priority_days.min(alert_window_days),
            0,
            alert_window_days,
        )?;

        Ok(FleetSettings {
            default_service_count: self.get_default_service_count()?,
            notifications_enabled: self.get_notifications_enabled()?,
            maintenance_alerts_enabled: self.get_maintenance_alerts_enabled()?,
            alert_window_days,
            high_priority_days,
            plan_history_cap: self.get_plan_history_cap()?,
            notification_cap: self.get_notification_cap()?,
            default_strategy,
            default_depot: self
                .get_config_value(config_keys::DEFAULT_DEPOT)?
                .unwrap_or(defaults.default_depot),
            language: self
                .get_config_value(config_keys::LANGUAGE)?
                .unwrap_or(defaults.language),
        })
    }

    /// 保存完整设置（单事务,调用方负责校验）
    pub fn save_settings(&self, settings: &FleetSettings) -> Result<(), Box<dyn Error>> {
        let entries = [
            (config_keys::DEFAULT_SERVICE_COUNT, settings.default_service_count.to_string()),
            (config_keys::NOTIFICATIONS_ENABLED, settings.notifications_enabled.to_string()),
            (
                config_keys::MAINTENANCE_ALERTS_ENABLED,
                settings.maintenance_alerts_enabled.to_string(),
            ),
            (config_keys::ALERT_WINDOW_DAYS, settings.alert_window_days.to_string()),
            (config_keys::HIGH_PRIORITY_DAYS, settings.high_priority_days.to_string()),
            (config_keys::PLAN_HISTORY_CAP, settings.plan_history_cap.to_string()),
            (config_keys::NOTIFICATION_CAP, settings.notification_cap.to_string()),
            (config_keys::DEFAULT_STRATEGY, settings.default_strategy.as_str().to_string()),
            (config_keys::DEFAULT_DEPOT, settings.default_depot.clone()),
            (config_keys::LANGUAGE, settings.language.clone()),
        ];

        let mut conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        let tx = conn.transaction()?;
        for (key, value) in entries.iter() {
            tx.execute(
                "INSERT INTO config_kv (scope_id, key, value, updated_at)
                 VALUES ('global', ?1, ?2, datetime('now'))
                 ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
                params![key, value],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// 删除所有设置项,恢复默认值
    ///
    /// # 返回
    /// - 删除的配置项数量
    pub fn reset_settings(&self) -> Result<usize, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        let mut removed = 0;
        for key in config_keys::SETTINGS_KEYS {
            removed += conn.execute(
                "DELETE FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
            )?;
        }
        Ok(removed)
    }

    /// 获取所有配置的快照（JSON格式）
    ///
    /// # 用途
    /// - 批量调整设置前留底
    /// - 调整失败时整体回滚
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt = conn.prepare(
            "SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key",
        )?;

        let mut config_map: HashMap<String, String> = HashMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }

    /// 从配置快照恢复配置
    ///
    /// # 返回
    /// - Ok(usize): 恢复的配置项数量
    ///
    /// # 注意
    /// - 快照中没有的设置项会被删除（恢复为默认值）
    /// - 快照还原出的设置未通过校验时不写入
    pub fn restore_config_from_snapshot(&self, snapshot_json: &str) -> Result<usize, Box<dyn Error>> {
        let config_map: HashMap<String, String> = serde_json::from_str(snapshot_json)?;
        Self::settings_from_map(&config_map)?.validate()?;

        let mut conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM config_kv WHERE scope_id = 'global'", [])?;

        let mut count = 0;
        for (key, value) in config_map.iter() {
            count += tx.execute(
                "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
                 ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2",
                params![key, value],
            )?;
        }

        tx.commit()?;
        Ok(count)
    }

    /// 由快照键值还原设置（缺失项取默认值）
    ///
    /// # 返回
    /// - `Err(String)`: 设置项的值无法解析
    pub fn settings_from_map(map: &HashMap<String, String>) -> Result<FleetSettings, String> {
        fn parse_or<T: FromStr>(
            map: &HashMap<String, String>,
            key: &str,
            default: T,
        ) -> Result<T, String> {
            match map.get(key) {
                Some(raw) => raw
                    .trim()
                    .parse::<T>()
                    .map_err(|_| format!("{} 的值无法解析: {}", key, raw)),
                None => Ok(default),
            }
        }

        let defaults = FleetSettings::default();
        let default_strategy = match map.get(config_keys::DEFAULT_STRATEGY) {
            Some(raw) => PriorityStrategy::parse(raw)
                .ok_or_else(|| format!("{} 的值无法解析: {}", config_keys::DEFAULT_STRATEGY, raw))?,
            None => defaults.default_strategy,
        };

        Ok(FleetSettings {
            default_service_count: parse_or(
                map,
                config_keys::DEFAULT_SERVICE_COUNT,
                defaults.default_service_count,
            )?,
            notifications_enabled: parse_or(
                map,
                config_keys::NOTIFICATIONS_ENABLED,
                defaults.notifications_enabled,
            )?,
            maintenance_alerts_enabled: parse_or(
                map,
                config_keys::MAINTENANCE_ALERTS_ENABLED,
                defaults.maintenance_alerts_enabled,
            )?,
            alert_window_days: parse_or(map, config_keys::ALERT_WINDOW_DAYS, defaults.alert_window_days)?,
            high_priority_days: parse_or(
                map,
                config_keys::HIGH_PRIORITY_DAYS,
                defaults.high_priority_days,
            )?,
            plan_history_cap: parse_or(map, config_keys::PLAN_HISTORY_CAP, defaults.plan_history_cap)?,
            notification_cap: parse_or(map, config_keys::NOTIFICATION_CAP, defaults.notification_cap)?,
            default_strategy,
            default_depot: map
                .get(config_keys::DEFAULT_DEPOT)
                .cloned()
                .unwrap_or(defaults.default_depot),
            language: map
                .get(config_keys::LANGUAGE)
                .cloned()
                .unwrap_or(defaults.language),
        })
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 排程
    pub const DEFAULT_SERVICE_COUNT: &str = "default_service_count";
    pub const DEFAULT_STRATEGY: &str = "default_strategy";

    // 通知与告警
    pub const NOTIFICATIONS_ENABLED: &str = "notifications_enabled";
    pub const MAINTENANCE_ALERTS_ENABLED: &str = "maintenance_alerts_enabled";
    pub const ALERT_WINDOW_DAYS: &str = "alert_window_days";
    pub const HIGH_PRIORITY_DAYS: &str = "high_priority_days";

    // 历史保留
    pub const PLAN_HISTORY_CAP: &str = "plan_history_cap";
    pub const NOTIFICATION_CAP: &str = "notification_cap";

    // 其他
    pub const DEFAULT_DEPOT: &str = "default_depot";
    pub const LANGUAGE: &str = "language";

    pub const SETTINGS_KEYS: [&str; 10] = [
        DEFAULT_SERVICE_COUNT,
        DEFAULT_STRATEGY,
        NOTIFICATIONS_ENABLED,
        MAINTENANCE_ALERTS_ENABLED,
        ALERT_WINDOW_DAYS,
        HIGH_PRIORITY_DAYS,
        PLAN_HISTORY_CAP,
        NOTIFICATION_CAP,
        DEFAULT_DEPOT,
        LANGUAGE,
    ];
}
