use chrono::{NaiveDate, Weekday};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Streak {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Zero means no active streak; `start`/`end` then point at the latest period.
    pub length: u32,
}

impl Streak {
    pub fn empty(at: NaiveDate) -> Self {
        Self {
            start: at,
            end: at,
            length: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.length > 0
    }

    /// Appends `period` to the streak, opening it when it was empty.
    pub fn extend(&mut self, period: NaiveDate) {
        self.length += 1;
        self.end = period;
        if self.length == 1 {
            self.start = period;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakSummary {
    pub total_contributions: u64,
    pub first_contribution: NaiveDate,
    pub longest_streak: Streak,
    pub current_streak: Streak,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatsMode {
    Daily,
    Weekly,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum StatsResult {
    Daily {
        #[serde(flatten)]
        summary: StreakSummary,
        #[serde(rename = "excludedDays")]
        excluded_days: Vec<Weekday>,
    },
    Weekly {
        #[serde(flatten)]
        summary: StreakSummary,
    },
}

impl StatsResult {
    pub fn summary(&self) -> &StreakSummary {
        match self {
            StatsResult::Daily { summary, .. } | StatsResult::Weekly { summary } => summary,
        }
    }

    pub fn mode(&self) -> StatsMode {
        match self {
            StatsResult::Daily { .. } => StatsMode::Daily,
            StatsResult::Weekly { .. } => StatsMode::Weekly,
        }
    }

    pub fn excluded_days(&self) -> &[Weekday] {
        match self {
            StatsResult::Daily { excluded_days, .. } => excluded_days,
            StatsResult::Weekly { .. } => &[],
        }
    }
}
