//! Plant health: a bounded score that grows with good financial habits and
//! decays with bad ones.
//!
//! Decay (10) is twice the growth step (5).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const MAX_LEVEL: u8 = 100;
pub const DEFAULT_LEVEL: u8 = 50;
const GOOD_STEP: u8 = 5;
const BAD_STEP: u8 = 10;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum HabitKind {
    Good,
    Bad,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Seed,
    Sprout,
    Sapling,
    Tree,
    Wilting,
    Dead,
}

impl Stage {
    pub fn from_level(level: u8) -> Stage {
        match level {
            80.. => Stage::Tree,
            60..=79 => Stage::Sapling,
            40..=59 => Stage::Sprout,
            20..=39 => Stage::Seed,
            10..=19 => Stage::Wilting,
            _ => Stage::Dead,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Stage::Seed => "Tiny Seed",
            Stage::Sprout => "Growing Sprout",
            Stage::Sapling => "Young Sapling",
            Stage::Tree => "Mighty Tree",
            Stage::Wilting => "Wilting Plant",
            Stage::Dead => "Dormant Seed",
        }
    }
}

/// Health Engine state. Only [`PlantHealth::apply_habit`] mutates it.
///
/// Persisted with its derived `stage` alongside `level`. A stored `stage` is
/// ignored on load; the level is authoritative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "PlantHealthRecord", from = "PlantHealthRecord")]
pub struct PlantHealth {
    level: u8,
    good_habits: u32,
    bad_habits: u32,
    last_updated: Option<DateTime<Utc>>,
}

impl Default for PlantHealth {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL,
            good_habits: 0,
            bad_habits: 0,
            last_updated: None,
        }
    }
}

impl PlantHealth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(level: u8) -> Self {
        Self {
            level: level.min(MAX_LEVEL),
            ..Self::default()
        }
    }

    pub fn apply_habit(&mut self, kind: HabitKind, now: DateTime<Utc>) -> &PlantHealth {
        match kind {
            HabitKind::Good => {
                self.level = self.level.saturating_add(GOOD_STEP).min(MAX_LEVEL);
                self.good_habits += 1;
            }
            HabitKind::Bad => {
                self.level = self.level.saturating_sub(BAD_STEP);
                self.bad_habits += 1;
            }
        }
        self.last_updated = Some(now);
        self
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn stage(&self) -> Stage {
        Stage::from_level(self.level)
    }

    pub fn good_habits(&self) -> u32 {
        self.good_habits
    }

    pub fn bad_habits(&self) -> u32 {
        self.bad_habits
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    pub fn message(&self) -> &'static str {
        match self.level {
            80.. => "Your plant is thriving! Keep up the great financial habits!",
            60..=79 => "Your plant is growing well! You're making good progress.",
            40..=59 => "Your plant needs some care. Try to improve your spending habits.",
            20..=39 => "Your plant is struggling. Focus on better financial decisions.",
            _ => "Your plant needs immediate attention! Time to get back on track.",
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlantHealthRecord {
    level: i64,
    #[serde(default, skip_deserializing)]
    stage: Option<Stage>,
    good_habits: u32,
    bad_habits: u32,
    last_updated: Option<DateTime<Utc>>,
}

impl From<PlantHealth> for PlantHealthRecord {
    fn from(p: PlantHealth) -> Self {
        Self {
            level: i64::from(p.level),
            stage: Some(p.stage()),
            good_habits: p.good_habits,
            bad_habits: p.bad_habits,
            last_updated: p.last_updated,
        }
    }
}

impl From<PlantHealthRecord> for PlantHealth {
    fn from(r: PlantHealthRecord) -> Self {
        let level = r.level.clamp(0, i64::from(MAX_LEVEL)) as u8;
        if i64::from(level) != r.level {
            warn!(stored = r.level, level, "Stored plant level out of range, clamped");
        }
        Self {
            level,
            good_habits: r.good_habits,
            bad_habits: r.bad_habits,
            last_updated: r.last_updated,
        }
    }
}
