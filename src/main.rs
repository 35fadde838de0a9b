// ==========================================
// 地铁车队投运排程系统 - 命令行入口
// ==========================================
// 职责: 解析命令行参数,驱动库 API,打印结果
// 事件: 车队事件经 tokio 通道异步消费,以日志提示输出
// ==========================================

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;

use metro_induction::app::{get_default_db_path, get_persistent_db_path, AppState};
use metro_induction::engine::{ChannelEventPublisher, PriorityStrategy, SimulationOptions};
use metro_induction::logging::{self, LogFormat};

#[derive(Parser, Debug)]
#[command(name = "metro-induction", version, about = "地铁车队投运排程")]
struct Cli {
    /// 数据库文件路径（默认读取 METRO_INDUCTION_DB_PATH,否则为内存库）
    #[arg(long, global = true)]
    db: Option<String>,

    /// 使用用户数据目录中的持久化数据库
    #[arg(long, global = true, conflicts_with = "db")]
    persist: bool,

    /// JSON 格式日志
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 运行排程并落地
    Run {
        /// 期望投运数量（缺省取设置中的默认值）
        #[arg(short = 'n', long, allow_negative_numbers = true)]
        count: Option<i64>,
    },
    /// 仿真排程（不落地）
    Simulate {
        #[arg(short = 'n', long, allow_negative_numbers = true)]
        count: Option<i64>,
        /// balanced / efficiency / safety / maintenance
        #[arg(long, default_value = "balanced")]
        strategy: String,
        #[arg(long)]
        exclude_maintenance: bool,
        #[arg(long)]
        skip_cleaning: bool,
    },
    /// 查看名册
    Roster {
        /// 按编号 / 名称 / 状态搜索
        #[arg(long)]
        search: Option<String>,
    },
    /// 看板快照
    Dashboard {
        /// 基准日期 YYYY-MM-DD（缺省为今天）
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// 方案历史
    History {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// 从 JSON / CSV 文件导入名册
    Import { path: PathBuf },
    /// 重置为内置样例名册
    Reset,
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_command(state: &AppState, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Run { count } => {
            let record = match count {
                Some(n) => state.induction_api.run_optimizer(n, "cli")?,
                None => state.induction_api.run_with_default_count("cli")?,
            };
            print_json(&record)
        }
        Command::Simulate {
            count,
            strategy,
            exclude_maintenance,
            skip_cleaning,
        } => {
            let priority_strategy = PriorityStrategy::parse(&strategy)
                .with_context(|| format!("未知仿真策略: {}", strategy))?;
            let options = SimulationOptions {
                include_maintenance: !exclude_maintenance,
                optimize_cleaning: !skip_cleaning,
                priority_strategy,
            };
            let count = match count {
                Some(n) => n,
                None => i64::from(state.config_api.get_settings()?.default_service_count),
            };
            print_json(&state.induction_api.simulate(count, options)?)
        }
        Command::Roster { search } => {
            let trains = match search {
                Some(term) => state.fleet_api.search_trains(&term)?,
                None => state.fleet_api.list_trains()?,
            };
            print_json(&trains)
        }
        Command::Dashboard { today } => {
            let today = today.unwrap_or_else(|| chrono::Local::now().date_naive());
            print_json(&state.dashboard_api.snapshot(today)?)
        }
        Command::History { limit } => print_json(&state.induction_api.list_plan_history(limit)?),
        Command::Import { path } => {
            let count = state.fleet_api.import_roster_file(&path)?;
            println!("{}", count);
            Ok(())
        }
        Command::Reset => {
            let count = state.fleet_api.reset_roster()?;
            println!("{}", count);
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init_with(if cli.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    });

    tracing::info!("{} v{}", metro_induction::APP_NAME, metro_induction::VERSION);

    let db_path = match (cli.db, cli.persist) {
        (Some(path), _) => path,
        (None, true) => get_persistent_db_path(),
        (None, false) => get_default_db_path(),
    };

    let (publisher, mut events) = ChannelEventPublisher::channel();
    let toast_task = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            tracing::info!(
                event_type = event.event_type.as_str(),
                notification_type = %event.notification.notification_type,
                "{}",
                event.notification.message
            );
        }
    });

    let state = AppState::new_with_publisher(db_path, Arc::new(publisher))
        .map_err(anyhow::Error::msg)?;

    let seeded = state.fleet_api.seed_initial_roster_if_empty()?;
    if seeded > 0 {
        tracing::info!(seeded, "名册为空, 已写入内置样例");
    }

    let result = run_command(&state, cli.command);

    // 释放发布端,事件任务在通道关闭后退出
    drop(state);
    toast_task.await.context("事件任务异常退出")?;

    result
}
