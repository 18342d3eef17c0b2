use async_trait::async_trait;
use reqwest::{header, Client};
use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::github::token_pool::Token;
use crate::models::GraphQlResponse;

/// Contributions query for a single calendar year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContributionQuery {
    pub user: String,
    pub year: i32,
}

impl ContributionQuery {
    pub fn new(user: &str, year: i32) -> Self {
        Self {
            user: user.to_string(),
            year,
        }
    }

    pub fn to_graphql(&self) -> String {
        let start = format!("{}-01-01T00:00:00Z", self.year);
        let end = format!("{}-12-31T23:59:59Z", self.year);
        format!(
            r#"query {{
    user(login: "{}") {{
        createdAt
        contributionsCollection(from: "{}", to: "{}") {{
            contributionYears
            contributionCalendar {{
                weeks {{
                    contributionDays {{
                        contributionCount
                        date
                    }}
                }}
            }}
        }}
    }}
}}"#,
            self.user, start, end
        )
    }
}

/// Sends one query with one credential. Implementations return `Ok` for any
/// body that parses, including GraphQL and REST error payloads.
#[async_trait]
pub trait GraphQlTransport: Send + Sync {
    async fn execute(&self, query: &ContributionQuery, token: &Token) -> Result<GraphQlResponse>;
}

#[derive(Serialize)]
struct GraphQlRequestBody {
    query: String,
}

pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github.v4.idl"),
        );
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_str(&config.user_agent)?,
        );

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            endpoint: config.graphql_url.clone(),
        })
    }
}

#[async_trait]
impl GraphQlTransport for HttpTransport {
    async fn execute(&self, query: &ContributionQuery, token: &Token) -> Result<GraphQlResponse> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(header::AUTHORIZATION, format!("bearer {}", token.expose()))
            .json(&GraphQlRequestBody {
                query: query.to_graphql(),
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if body.trim().is_empty() {
            return Err(Error::GitHubApi(format!("empty response body ({})", status)));
        }

        Ok(serde_json::from_str(&body)?)
    }
}
