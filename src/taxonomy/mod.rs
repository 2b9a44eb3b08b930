//! Taxonomy module - fixed lookup tables for labels and coordinates

pub mod classifier;
pub mod geo;

pub use classifier::{classify, classify_value, RocketType, FUND_LEVEL_MAPPING};
pub use geo::{enrich, lookup, resolve, Coordinates, StartupRecord, COUNTRY_COORDS};
