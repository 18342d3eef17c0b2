use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Could not find a user with that name.")]
    UserNotFound,

    #[error("We are being rate-limited! Check https://git.io/streak-ratelimit for details.")]
    PoolExhausted,

    #[error("Failed to retrieve contributions. This is likely a GitHub API issue.")]
    UpstreamUnavailable,

    #[error("No contributions found.")]
    NoContributions,

    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Failed to convert SVG to PNG: {0}")]
    ConversionFailure(String),

    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Conditions that abort the whole request instead of dropping one year.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::UserNotFound
                | Error::PoolExhausted
                | Error::UpstreamUnavailable
                | Error::NoContributions
        )
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Error::MissingParameter(_) => 400,
            _ => 500,
        }
    }
}
