pub mod pipeline;
pub mod streak_engine;
pub mod timeline;

pub use pipeline::StreakPipeline;
pub use streak_engine::{compute_daily, compute_weekly};
