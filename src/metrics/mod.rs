pub mod tracker;
pub mod statistics;

pub use tracker::{EpisodeRecord, RunStatistics};
pub use statistics::Statistics;
