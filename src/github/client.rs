use chrono::{Datelike, Utc};
use futures::future::try_join_all;
use std::sync::Arc;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::github::token_pool::{Token, TokenPool};
use crate::github::transport::{ContributionQuery, GraphQlTransport, HttpTransport};
use crate::models::{ContributionGraph, ContributionGraphs, GraphQlResponse};

/// Earliest year worth asking GitHub about.
pub const FIRST_GITHUB_YEAR: i32 = 2005;

const RATE_LIMIT_MESSAGE: &str = "rate limit exceeded";

enum Attempt {
    Graph(ContributionGraph),
    Failed(Option<String>),
}

pub struct GitHubClient {
    transport: Arc<dyn GraphQlTransport>,
    tokens: TokenPool,
}

impl GitHubClient {
    pub fn new(config: &ClientConfig, tokens: TokenPool) -> Result<Self> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::with_transport(Arc::new(transport), tokens))
    }

    pub fn with_transport(transport: Arc<dyn GraphQlTransport>, tokens: TokenPool) -> Self {
        Self { transport, tokens }
    }

    /// Fetches one year, retrying once with a fresh token.
    ///
    /// Returns `Ok(None)` when both attempts fail for a non-fatal reason so the
    /// year is dropped from the result instead of failing the request.
    pub async fn fetch_year(&self, user: &str, year: i32) -> Result<Option<ContributionGraph>> {
        let query = ContributionQuery::new(user, year);

        let first_token = self.tokens.take().await?;
        let message = match self.attempt(&query, &first_token).await? {
            Attempt::Graph(graph) => return Ok(Some(graph)),
            Attempt::Failed(message) => message,
        };
        if is_rate_limit_message(message.as_deref()) {
            self.tokens.evict(&first_token).await?;
        }
        tracing::error!(
            "First attempt to decode response for {}'s {} contributions failed. {}",
            user,
            year,
            message.as_deref().unwrap_or("An API error occurred.")
        );

        let retry_token = self.tokens.take().await?;
        match self.attempt(&query, &retry_token).await? {
            Attempt::Graph(graph) => Ok(Some(graph)),
            Attempt::Failed(message) => {
                if is_rate_limit_message(message.as_deref()) {
                    self.tokens.evict(&retry_token).await?;
                }
                tracing::error!(
                    "Failed to decode response for {}'s {} contributions after 2 attempts. {}",
                    user,
                    year,
                    message.as_deref().unwrap_or("An API error occurred.")
                );
                Ok(None)
            }
        }
    }

    /// Fetches every year of the user's history, up to and including the current UTC year.
    pub async fn fetch_all(&self, user: &str, starting_year: Option<i32>) -> Result<ContributionGraphs> {
        self.fetch_all_until(user, starting_year, Utc::now().year()).await
    }

    pub async fn fetch_all_until(
        &self,
        user: &str,
        starting_year: Option<i32>,
        current_year: i32,
    ) -> Result<ContributionGraphs> {
        tracing::info!("Fetching {} contributions for: {}", current_year, user);
        let mut graphs = self.fetch_years(user, &[current_year]).await?;

        let (created_year, first_contribution_year) = match graphs.get(&current_year) {
            Some(graph) => {
                let created_year = graph.created_at.year();
                let first_contribution_year = graph
                    .contributions_collection
                    .contribution_years
                    .last()
                    .copied()
                    .unwrap_or(created_year);
                (created_year, first_contribution_year)
            }
            None => return Err(Error::UpstreamUnavailable),
        };

        let minimum_year = starting_year.unwrap_or(created_year).max(FIRST_GITHUB_YEAR);
        let mut years: Vec<i32> = (minimum_year..current_year).collect();

        // Accounts can carry contributions dated before GitHub existed.
        if first_contribution_year < FIRST_GITHUB_YEAR && !years.contains(&first_contribution_year) {
            years.insert(0, first_contribution_year);
        }

        if !years.is_empty() {
            tracing::info!("Fetching {} historical years for: {}", years.len(), user);
            graphs.extend(self.fetch_years(user, &years).await?);
        }

        Ok(graphs)
    }

    async fn fetch_years(&self, user: &str, years: &[i32]) -> Result<ContributionGraphs> {
        let fetches = years.iter().map(|&year| async move {
            let graph = self.fetch_year(user, year).await?;
            tracing::debug!("Year {} for {}: {}", year, user, if graph.is_some() { "ok" } else { "dropped" });
            Ok::<_, Error>(graph.map(|graph| (year, graph)))
        });

        let results = try_join_all(fetches).await?;
        Ok(results.into_iter().flatten().collect())
    }

    async fn attempt(&self, query: &ContributionQuery, token: &Token) -> Result<Attempt> {
        match self.transport.execute(query, token).await {
            Ok(response) => classify(response),
            Err(e) => {
                tracing::warn!("GitHub GraphQL request failed: {}", e);
                Ok(Attempt::Failed(None))
            }
        }
    }

    pub fn tokens(&self) -> &TokenPool {
        &self.tokens
    }
}

fn classify(response: GraphQlResponse) -> Result<Attempt> {
    let not_found = response.error_type() == Some("NOT_FOUND");
    let message = response.error_message().map(str::to_string);
    match response.data.and_then(|data| data.user) {
        Some(graph) => Ok(Attempt::Graph(graph)),
        None if not_found => Err(Error::UserNotFound),
        None => Ok(Attempt::Failed(message)),
    }
}

fn is_rate_limit_message(message: Option<&str>) -> bool {
    message
        .map(|m| m.to_lowercase().contains(RATE_LIMIT_MESSAGE))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::stub_transport::{error, graph, not_found, rate_limited, StubReply, StubTransport};

    fn client(transport: StubTransport, tokens: &[&str]) -> (GitHubClient, Arc<StubTransport>) {
        let transport = Arc::new(transport);
        let client = GitHubClient::with_transport(transport.clone(), TokenPool::new(tokens.iter().copied()));
        (client, transport)
    }

    #[tokio::test]
    async fn test_fetch_year_success() {
        let stub = StubTransport::new().given(2024, graph("2020-05-01T00:00:00Z", &[2024], &[("2024-01-01", 2)]));
        let (client, transport) = client(stub, &["t1"]);

        let result = client.fetch_year("octocat", 2024).await.unwrap();

        assert!(result.is_some());
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_user_not_found_is_fatal_without_retry() {
        let stub = StubTransport::new().given(2024, not_found());
        let (client, transport) = client(stub, &["t1"]);

        let result = client.fetch_year("ghost", 2024).await;

        assert!(matches!(result, Err(Error::UserNotFound)));
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_rate_limit_evicts_and_retries_with_other_token() {
        let stub = StubTransport::new()
            .given(2024, rate_limited())
            .given(2024, graph("2020-05-01T00:00:00Z", &[2024], &[]));
        let (client, transport) = client(stub, &["t1", "t2"]);

        let result = client.fetch_year("octocat", 2024).await.unwrap();

        assert!(result.is_some());
        let calls = transport.calls();
        assert_eq!(calls.len(), 2);
        assert_ne!(calls[0].1, calls[1].1);
        assert_eq!(client.tokens().len().await, 1);
    }

    #[tokio::test]
    async fn test_generic_error_retries_without_eviction() {
        let stub = StubTransport::new()
            .given(2024, error(None, "Something went wrong"))
            .given(2024, graph("2020-05-01T00:00:00Z", &[2024], &[]));
        let (client, _) = client(stub, &["t1"]);

        assert!(client.fetch_year("octocat", 2024).await.unwrap().is_some());
        assert_eq!(client.tokens().len().await, 1);
    }

    #[tokio::test]
    async fn test_two_failures_drop_the_year() {
        let stub = StubTransport::new()
            .given(2024, StubReply::TransportError("connection reset".into()))
            .given(2024, error(None, "Something went wrong"));
        let (client, transport) = client(stub, &["t1"]);

        let result = client.fetch_year("octocat", 2024).await.unwrap();

        assert!(result.is_none());
        assert_eq!(transport.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_not_found_on_retry_is_fatal() {
        let stub = StubTransport::new()
            .given(2024, error(None, "Something went wrong"))
            .given(2024, not_found());
        let (client, _) = client(stub, &["t1"]);

        assert!(matches!(client.fetch_year("ghost", 2024).await, Err(Error::UserNotFound)));
    }

    #[tokio::test]
    async fn test_rate_limit_on_last_token_exhausts_pool() {
        let stub = StubTransport::new().given(2024, rate_limited());
        let (client, _) = client(stub, &["t1"]);

        assert!(matches!(client.fetch_year("octocat", 2024).await, Err(Error::PoolExhausted)));
    }

    #[tokio::test]
    async fn test_fetch_all_requests_years_since_creation() {
        let stub = StubTransport::new()
            .given(2024, graph("2021-06-01T00:00:00Z", &[2024, 2022, 2021], &[("2024-01-02", 1)]))
            .given(2021, graph("2021-06-01T00:00:00Z", &[], &[("2021-07-01", 1)]))
            .given(2022, graph("2021-06-01T00:00:00Z", &[], &[]))
            .given(2023, graph("2021-06-01T00:00:00Z", &[], &[]));
        let (client, transport) = client(stub, &["t1"]);

        let graphs = client.fetch_all_until("octocat", None, 2024).await.unwrap();

        assert_eq!(transport.years_requested(), vec![2021, 2022, 2023, 2024]);
        let mut years: Vec<_> = graphs.keys().copied().collect();
        years.sort_unstable();
        assert_eq!(years, vec![2021, 2022, 2023, 2024]);
    }

    #[tokio::test]
    async fn test_fetch_all_honors_starting_year() {
        let stub = StubTransport::new()
            .given(2024, graph("2010-01-01T00:00:00Z", &[2024, 2010], &[]))
            .given(2023, graph("2010-01-01T00:00:00Z", &[], &[]));
        let (client, transport) = client(stub, &["t1"]);

        client.fetch_all_until("octocat", Some(2023), 2024).await.unwrap();

        assert_eq!(transport.years_requested(), vec![2023, 2024]);
    }

    #[tokio::test]
    async fn test_fetch_all_clamps_to_platform_inception() {
        let stub = StubTransport::new().given(2006, graph("2001-01-01T00:00:00Z", &[2006], &[]));
        let stub = stub.given(2005, graph("2001-01-01T00:00:00Z", &[], &[]));
        let (client, transport) = client(stub, &["t1"]);

        client.fetch_all_until("octocat", Some(1990), 2006).await.unwrap();

        assert_eq!(transport.years_requested(), vec![2005, 2006]);
    }

    #[tokio::test]
    async fn test_fetch_all_adds_pre_inception_contribution_year() {
        let stub = StubTransport::new()
            .given(2006, graph("2005-03-01T00:00:00Z", &[2006, 2005, 2001], &[]))
            .given(2005, graph("2005-03-01T00:00:00Z", &[], &[]))
            .given(2001, graph("2005-03-01T00:00:00Z", &[], &[("2001-04-01", 1)]));
        let (client, transport) = client(stub, &["t1"]);

        let graphs = client.fetch_all_until("octocat", None, 2006).await.unwrap();

        assert_eq!(transport.years_requested(), vec![2001, 2005, 2006]);
        assert!(graphs.contains_key(&2001));
    }

    #[tokio::test]
    async fn test_fetch_all_fails_without_current_year() {
        let stub = StubTransport::new()
            .given(2024, error(None, "Something went wrong"))
            .given(2024, error(None, "Something went wrong"));
        let (client, _) = client(stub, &["t1"]);

        let result = client.fetch_all_until("octocat", None, 2024).await;

        assert!(matches!(result, Err(Error::UpstreamUnavailable)));
    }

    #[tokio::test]
    async fn test_fetch_all_tolerates_missing_historical_year() {
        let stub = StubTransport::new()
            .given(2024, graph("2022-01-01T00:00:00Z", &[2024, 2022], &[]))
            .given(2022, graph("2022-01-01T00:00:00Z", &[], &[]))
            .given(2023, StubReply::TransportError("timeout".into()))
            .given(2023, StubReply::TransportError("timeout".into()));
        let (client, _) = client(stub, &["t1"]);

        let graphs = client.fetch_all_until("octocat", None, 2024).await.unwrap();

        assert!(graphs.contains_key(&2022));
        assert!(!graphs.contains_key(&2023));
        assert!(graphs.contains_key(&2024));
    }

    #[test]
    fn test_rate_limit_message_detection() {
        assert!(is_rate_limit_message(Some("API Rate Limit Exceeded for user")));
        assert!(!is_rate_limit_message(Some("Bad credentials")));
        assert!(!is_rate_limit_message(None));
    }
}
