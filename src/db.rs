// ==========================================
// 地铁车队投运排程系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout,减少并发写入时的偶发 busy 错误
// - 建表幂等,内存库与文件库共用同一套 schema
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 内存库路径
pub const IN_MEMORY_DB_PATH: &str = ":memory:";

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS train (
    train_id TEXT PRIMARY KEY,
    seq_no INTEGER NOT NULL,
    train_name TEXT NOT NULL,
    status TEXT NOT NULL,
    mileage INTEGER NOT NULL DEFAULT 0,
    fitness_clearance INTEGER NOT NULL DEFAULT 1,
    open_job_card INTEGER NOT NULL DEFAULT 0,
    needs_cleaning INTEGER NOT NULL DEFAULT 0,
    maintenance_priority TEXT NOT NULL DEFAULT 'LOW',
    next_maintenance_date TEXT NOT NULL,
    last_maintenance_date TEXT,
    branding TEXT,
    stabling_bay TEXT,
    route TEXT,
    current_location TEXT,
    operational_hours INTEGER NOT NULL DEFAULT 0,
    capacity INTEGER NOT NULL DEFAULT 375,
    updated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_train_seq ON train(seq_no);

CREATE TABLE IF NOT EXISTS induction_plan (
    seq_no INTEGER PRIMARY KEY AUTOINCREMENT,
    plan_id TEXT NOT NULL UNIQUE,
    generated_at TEXT NOT NULL,
    actor TEXT NOT NULL,
    desired_service_count INTEGER NOT NULL,
    applied INTEGER NOT NULL DEFAULT 0,
    plan_json TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS notification (
    seq_no INTEGER PRIMARY KEY AUTOINCREMENT,
    notification_id TEXT NOT NULL UNIQUE,
    message TEXT NOT NULL,
    notification_type TEXT NOT NULL,
    created_at TEXT NOT NULL,
    is_read INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS config_kv (
    scope_id TEXT NOT NULL,
    key TEXT NOT NULL,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (scope_id, key)
);

CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要"每个连接"单独开启
/// - busy_timeout 需要"每个连接"单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
///
/// `db_path` 为 ":memory:" 时打开内存库
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = if db_path == IN_MEMORY_DB_PATH {
        Connection::open_in_memory()?
    } else {
        Connection::open(db_path)?
    };
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 建表（幂等）并登记 schema_version
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}
