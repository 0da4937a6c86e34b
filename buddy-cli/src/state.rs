use anyhow::{Context, Result};
use buddy_core::BudgetState;
use buddy_ingest::NotificationInbox;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

/// `$BUDDY_HOME`, else `~/.budget-buddy`.
pub fn buddy_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("BUDDY_HOME") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".budget-buddy"))
}

pub fn ensure_buddy_home() -> Result<PathBuf> {
    let dir = buddy_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn state_path(home: &Path) -> PathBuf {
    home.join("state.json")
}

pub fn inbox_path(home: &Path) -> PathBuf {
    home.join("inbox.json")
}

/// Missing file means a fresh state with the configured budget.
pub fn load_state(home: &Path, default_budget: f64) -> Result<BudgetState> {
    Ok(read_json(&state_path(home))?.unwrap_or_else(|| BudgetState::with_monthly_budget(default_budget)))
}

pub fn save_state(home: &Path, state: &BudgetState) -> Result<()> {
    write_json(&state_path(home), state)
}

pub fn load_inbox(home: &Path) -> Result<NotificationInbox> {
    Ok(read_json(&inbox_path(home))?.unwrap_or_default())
}

pub fn save_inbox(home: &Path, inbox: &NotificationInbox) -> Result<()> {
    write_json(&inbox_path(home), inbox)
}

fn read_json<T: DeserializeOwned>(p: &Path) -> Result<Option<T>> {
    if !p.exists() {
        return Ok(None);
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    let value = serde_json::from_str(&s).with_context(|| format!("parse {}", p.display()))?;
    Ok(Some(value))
}

// Atomic replace via a sibling temp file.
fn write_json<T: Serialize>(p: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serialize")?;
    let tmp = p.with_extension("json.tmp");
    fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
    fs::rename(&tmp, p).with_context(|| format!("replace {}", p.display()))?;
    Ok(())
}
