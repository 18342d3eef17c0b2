pub mod contribution;
pub mod stats;

pub use contribution::*;
pub use stats::*;
