use chrono::{Datelike, NaiveDate, Utc};
use std::sync::Arc;

use crate::analysis::streak_engine::{compute_daily, compute_weekly};
use crate::analysis::timeline::merge_as_of;
use crate::card::{CardContent, CardOptions, GeneratedResponse, OutputGenerator};
use crate::error::Result;
use crate::github::GitHubClient;
use crate::models::{StatsMode, StatsResult};
use crate::params::{RequestParams, StreakRequest};

/// Request path from raw parameters to a rendered card.
pub struct StreakPipeline {
    github: Arc<GitHubClient>,
    output: OutputGenerator,
    today: Option<NaiveDate>,
}

impl StreakPipeline {
    pub fn new(github: GitHubClient, output: OutputGenerator) -> Self {
        Self {
            github: Arc::new(github),
            output,
            today: None,
        }
    }

    /// Evaluates "today" as `today` instead of the current UTC date.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Utc::now().date_naive())
    }

    pub async fn compute_stats(&self, request: &StreakRequest) -> Result<StatsResult> {
        let today = self.today();

        // Step 1: Fetch every year of contribution history
        let graphs = self
            .github
            .fetch_all_until(&request.user, request.starting_year, today.year())
            .await?;
        tracing::debug!("Fetched {} yearly graphs for {}", graphs.len(), request.user);

        // Step 2: Flatten into one timeline
        let timeline = merge_as_of(&graphs, today);

        // Step 3: Aggregate streaks
        match request.mode {
            StatsMode::Daily => compute_daily(&timeline, &request.excluded_days),
            StatsMode::Weekly => compute_weekly(&timeline),
        }
    }

    pub async fn render_request(&self, params: &RequestParams) -> GeneratedResponse {
        let request = match StreakRequest::from_params(params) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!("Rejected request: {}", e);
                // Nothing about the request is trusted, so render with defaults.
                return self
                    .output
                    .generate_output(CardContent::Error(&e.to_string()), &CardOptions::default(), e.status_code())
                    .await;
            }
        };
        let options = CardOptions::from_params(params);

        tracing::info!("Rendering {:?} streak card for: {}", request.mode, request.user);
        match self.compute_stats(&request).await {
            Ok(stats) => {
                self.output
                    .generate_output(CardContent::Stats(&stats), &options, 200)
                    .await
            }
            Err(e) => {
                tracing::error!("Failed to build card for {}: {}", request.user, e);
                self.output
                    .generate_output(CardContent::Error(&e.to_string()), &options, e.status_code())
                    .await
            }
        }
    }
}
