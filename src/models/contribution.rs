use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Raw body of a GraphQL contributions query. Any field may be missing when
/// GitHub answers with an error payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphQlResponse {
    #[serde(default)]
    pub data: Option<ResponseData>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
    #[serde(default)]
    pub message: Option<String>,
}

impl GraphQlResponse {
    /// First error message, falling back to the top-level REST-style message.
    pub fn error_message(&self) -> Option<&str> {
        self.errors
            .first()
            .map(|e| e.message.as_str())
            .or(self.message.as_deref())
    }

    pub fn error_type(&self) -> Option<&str> {
        self.errors.first().and_then(|e| e.error_type.as_deref())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseData {
    #[serde(default)]
    pub user: Option<ContributionGraph>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQlError {
    #[serde(default)]
    pub message: String,
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
}

/// One calendar year of a user's contribution calendar.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionGraph {
    pub created_at: DateTime<Utc>,
    pub contributions_collection: ContributionsCollection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionsCollection {
    /// Years with any contribution, newest first.
    #[serde(default)]
    pub contribution_years: Vec<i32>,
    pub contribution_calendar: ContributionCalendar,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContributionCalendar {
    #[serde(default)]
    pub weeks: Vec<ContributionWeek>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionWeek {
    #[serde(default)]
    pub contribution_days: Vec<ContributionDay>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionDay {
    pub date: NaiveDate,
    pub contribution_count: u32,
}

impl ContributionGraph {
    pub fn days(&self) -> impl Iterator<Item = &ContributionDay> {
        self.contributions_collection
            .contribution_calendar
            .weeks
            .iter()
            .flat_map(|week| week.contribution_days.iter())
    }
}

/// Fetched graphs keyed by calendar year.
pub type ContributionGraphs = HashMap<i32, ContributionGraph>;

/// Date to contribution count. Ordered so iteration is always chronological.
pub type Timeline = BTreeMap<NaiveDate, u32>;
