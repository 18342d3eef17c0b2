use crate::error::{Error, Result};
use std::env;

pub const DEFAULT_GRAPHQL_URL: &str = "https://api.github.com/graphql";
pub const DEFAULT_USER_AGENT: &str = "GitHub-Readme-Streak-Stats";
pub const DEFAULT_RASTERIZE_COMMAND: &str = "rsvg-convert";

#[derive(Debug, Clone)]
pub struct Config {
    pub github_tokens: Vec<String>,
    pub graphql_url: String,
    pub user_agent: String,
    pub rasterize_command: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let github_tokens = discover_tokens(|key| env::var(key).ok());
        if github_tokens.is_empty() {
            return Err(Error::Config(
                "GITHUB_TOKEN environment variable not set".to_string(),
            ));
        }

        let graphql_url = env::var("GITHUB_GRAPHQL_URL")
            .unwrap_or_else(|_| DEFAULT_GRAPHQL_URL.to_string());

        let user_agent = env::var("STREAK_USER_AGENT")
            .unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string());

        let rasterize_command = env::var("RASTERIZE_COMMAND")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_RASTERIZE_COMMAND.to_string());

        Ok(Self {
            github_tokens,
            graphql_url,
            user_agent,
            rasterize_command,
        })
    }
}

/// Reads `GITHUB_TOKEN`, then `GITHUB_TOKEN2`, `GITHUB_TOKEN3`, ... until the
/// first index that is unset or blank.
pub fn discover_tokens<F>(lookup: F) -> Vec<String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut tokens = Vec::new();
    if let Some(primary) = lookup("GITHUB_TOKEN").filter(|t| !t.trim().is_empty()) {
        tokens.push(primary);
    }

    let mut index = 2;
    while let Some(token) = lookup(&format!("GITHUB_TOKEN{}", index)).filter(|t| !t.trim().is_empty()) {
        tokens.push(token);
        index += 1;
    }

    tokens
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub graphql_url: String,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            graphql_url: DEFAULT_GRAPHQL_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl From<&Config> for ClientConfig {
    fn from(config: &Config) -> Self {
        Self {
            graphql_url: config.graphql_url.clone(),
            user_agent: config.user_agent.clone(),
        }
    }
}
