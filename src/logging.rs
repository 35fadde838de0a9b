// ==========================================
// 日志系统初始化
// ==========================================
// 使用 tracing 和 tracing-subscriber
// 过滤器: RUST_LOG 优先,缺省 info 且屏蔽 rusqlite 语句跟踪
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 缺省过滤器
pub const DEFAULT_FILTER: &str = "info,rusqlite=warn";

/// 日志输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// 人读格式（命令行默认）
    #[default]
    Pretty,
    /// 每行一个 JSON 对象,携带当前 span（排程 / 仿真调用链）
    Json,
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// 初始化日志系统
///
/// # 环境变量
/// - RUST_LOG: 日志级别过滤器（默认: info）
///   例如: RUST_LOG=debug 或 RUST_LOG=metro_induction::engine=trace
///
/// # 示例
/// ```no_run
/// use metro_induction::logging;
/// logging::init();
/// ```
pub fn init() {
    init_with(LogFormat::Pretty);
}

/// 按指定格式初始化
pub fn init_with(format: LogFormat) {
    match format {
        LogFormat::Pretty => fmt()
            .with_env_filter(env_filter())
            .with_target(true)
            .with_line_number(true)
            .init(),
        LogFormat::Json => fmt()
            .json()
            .with_env_filter(env_filter())
            .with_current_span(true)
            .init(),
    }
}

/// 初始化测试环境的日志系统
///
/// 可重复调用,仅第一次生效
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("metro_induction=debug"))
        .with_test_writer()
        .try_init();
}
