pub mod client;
pub mod token_pool;
pub mod transport;

#[cfg(test)]
pub(crate) mod stub_transport;

pub use client::{GitHubClient, FIRST_GITHUB_YEAR};
pub use token_pool::{Token, TokenPool};
pub use transport::{ContributionQuery, GraphQlTransport, HttpTransport};
