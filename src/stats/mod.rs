//! Statistics module - summary statistics and portfolio insights

mod calculator;
mod insights;

pub use calculator::{LabelCounts, StatsCalculator, StatsSummary};
pub use insights::{Breakdown, CountryRow, Insights, InsightsCalculator, LocationCount, Overview};
