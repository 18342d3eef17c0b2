pub mod analysis;
pub mod card;
pub mod config;
pub mod error;
pub mod github;
pub mod models;
pub mod params;

pub use analysis::StreakPipeline;
pub use card::{CardOptions, CardRenderer, CommandRasterizer, OutputGenerator};
pub use config::{ClientConfig, Config};
pub use error::{Error, Result};
pub use github::{GitHubClient, TokenPool};
pub use params::{RequestParams, StreakRequest};
