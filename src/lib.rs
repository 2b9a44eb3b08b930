//! COIQ - startup rocket-type classification
//!
//! Loads a startup table, keeps the for-profit organizations, labels each one
//! with a rocket type derived from its funding stage, places it on a map by
//! country centroid and summarizes the resulting distribution.

pub mod config;
pub mod data;
pub mod stats;
pub mod taxonomy;

pub use data::{DataLoader, DataProcessor};
pub use stats::{StatsCalculator, StatsSummary};
pub use taxonomy::RocketType;
