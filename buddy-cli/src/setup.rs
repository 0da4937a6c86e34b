use anyhow::{Result, bail};
use buddy_core::time::local_date;
use chrono::Utc;
use std::io::{self, Write};
use std::path::Path;

use crate::config::{Config, config_path, load_config, save_config};

fn prompt(label: &str, current: &str) -> Result<String> {
    print!("{label} [{current}]: ");
    io::stdout().flush().ok();
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    let s = s.trim();
    Ok(if s.is_empty() { current.to_string() } else { s.to_string() })
}

fn prompt_bool(label: &str, current: bool) -> Result<bool> {
    let answer = prompt(label, if current { "y" } else { "n" })?;
    parse_yes_no(&answer)
}

fn parse_yes_no(answer: &str) -> Result<bool> {
    match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" | "true" => Ok(true),
        "n" | "no" | "false" => Ok(false),
        other => bail!("expected y or n, got {other:?}"),
    }
}

/// Interactive setup: walk through each config value, keeping the current one
/// on a blank answer.
pub fn run_setup(home: &Path) -> Result<()> {
    println!("Budget Buddy setup\n");
    let mut cfg: Config = load_config(home)?;

    let tz = prompt("Timezone (IANA)", &cfg.general.timezone)?;
    local_date(Utc::now(), &tz)?;
    cfg.general.timezone = tz;

    let budget = prompt("Monthly budget", &format!("{:.2}", cfg.budget.default_monthly))?;
    cfg.budget.default_monthly = match budget.replace(',', "").parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => v,
        _ => bail!("monthly budget must be a positive number, got {budget:?}"),
    };

    cfg.notifications.enabled = prompt_bool("Read bank notifications on this host? (y/n)", cfg.notifications.enabled)?;
    cfg.advice.enabled = prompt_bool("Ask an advice service about new transactions? (y/n)", cfg.advice.enabled)?;
    if cfg.advice.enabled {
        cfg.advice.endpoint = prompt("Advice endpoint", &cfg.advice.endpoint)?;
    }

    save_config(home, &cfg)?;
    println!("\nWrote {}", config_path(home).display());

    println!("\nNext recommended steps:");
    println!("- buddy login");
    println!("- buddy add 12.50 \"Lunch at cafe\"");
    println!("- buddy sms scan --file messages.txt");

    Ok(())
}
