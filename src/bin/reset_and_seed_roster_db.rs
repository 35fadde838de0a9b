use chrono::Local;
use std::error::Error;
use std::fs;
use std::path::Path;

use metro_induction::app::{get_persistent_db_path, AppState};
use metro_induction::db::IN_MEMORY_DB_PATH;

fn main() -> Result<(), Box<dyn Error>> {
    metro_induction::logging::init();

    let db_path = std::env::args()
        .nth(1)
        .unwrap_or_else(get_persistent_db_path);
    if db_path == IN_MEMORY_DB_PATH {
        return Err("reset_and_seed_roster_db needs a database file path".into());
    }

    backup_and_reset_db(&db_path)?;

    let state = AppState::new(db_path.clone())?;
    let seeded = state.fleet_api.seed_initial_roster_if_empty()?;

    eprintln!("Seeded {} trains into {}", seeded, db_path);
    print_quick_counts(&state)?;
    Ok(())
}

fn backup_and_reset_db(db_path: &str) -> Result<(), Box<dyn Error>> {
    let path = Path::new(db_path);
    if !path.exists() {
        return Ok(());
    }

    let ts = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let backup_path = format!("{}.bak.{}", db_path, ts);
    fs::copy(path, &backup_path)?;
    fs::remove_file(path)?;

    eprintln!("Backed up {} -> {}", db_path, backup_path);
    Ok(())
}

fn print_quick_counts(state: &AppState) -> Result<(), Box<dyn Error>> {
    let stats = state.dashboard_api.fleet_stats()?;
    eprintln!("Row counts:");
    eprintln!("  trains:        {}", stats.total);
    eprintln!("  in service:    {}", stats.in_service);
    eprintln!("  standby:       {}", stats.standby);
    eprintln!("  maintenance:   {}", stats.maintenance);
    eprintln!(
        "  plans:         {}",
        state.induction_api.list_plan_history(100)?.len()
    );
    eprintln!(
        "  notifications: {}",
        state.config_api.list_notifications()?.len()
    );
    Ok(())
}
