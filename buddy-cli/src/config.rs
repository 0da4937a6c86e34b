use anyhow::{Context, Result};
use buddy_core::budget::DEFAULT_MONTHLY_BUDGET;
use buddy_finance::{Advisor, HttpAdviceProvider};
use buddy_ingest::NotificationCapability;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_TIMEZONE: &str = "America/Chicago";
pub const DEFAULT_ADVICE_ENDPOINT: &str = "https://toolkit.rork.com/text/llm/";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralSection,
    pub budget: BudgetSection,
    pub notifications: NotificationsSection,
    pub advice: AdviceSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSection {
    /// IANA timezone used to decide what "today" is
    pub timezone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetSection {
    /// Budget given to a fresh state
    pub default_monthly: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationsSection {
    /// Whether this host can read bank notifications at all
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdviceSection {
    pub enabled: bool,
    pub endpoint: String,
    pub model: Option<String>,
    pub timeout_secs: u64,
}

impl Default for GeneralSection {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE.to_string(),
        }
    }
}

impl Default for BudgetSection {
    fn default() -> Self {
        Self {
            default_monthly: DEFAULT_MONTHLY_BUDGET,
        }
    }
}

impl Default for NotificationsSection {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for AdviceSection {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: DEFAULT_ADVICE_ENDPOINT.to_string(),
            model: None,
            timeout_secs: 10,
        }
    }
}

impl Config {
    pub fn notification_capability(&self) -> NotificationCapability {
        NotificationCapability::from_enabled(self.notifications.enabled)
    }

    /// A disabled advisor still answers, with the fallback text.
    pub fn advisor(&self) -> Advisor {
        if !self.advice.enabled || self.advice.endpoint.trim().is_empty() {
            return Advisor::disabled();
        }
        let provider = HttpAdviceProvider::new(self.advice.endpoint.trim(), self.advice.model.clone());
        Advisor::new(Arc::new(provider), Duration::from_secs(self.advice.timeout_secs.max(1)))
    }
}

pub fn config_path(home: &Path) -> PathBuf {
    home.join("config.toml")
}

pub fn load_config(home: &Path) -> Result<Config> {
    let p = config_path(home);
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config(home: &Path, cfg: &Config) -> Result<()> {
    let p = config_path(home);
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

/// Write the defaults unless a config already exists. Returns whether it wrote.
pub fn init_config(home: &Path) -> Result<bool> {
    if config_path(home).exists() {
        return Ok(false);
    }
    save_config(home, &Config::default())?;
    Ok(true)
}
