// src/sources/platform.rs
//! National Career Service platform usage.

use serde::Deserialize;

use super::types::{count_or, lenient_number, percent_or, SourceRecord};

pub mod defaults {
    pub const URBAN_USAGE: f64 = 65.0;
    pub const RURAL_USAGE: f64 = 28.0;
    pub const TOTAL_USERS: u64 = 1_250_000;

    // Loop strengths are fixed model constants, not fetched.
    pub const CURIOSITY_STRENGTH: f64 = 0.75;
    pub const VISIBILITY_STRENGTH: f64 = 0.65;
    pub const TRADITIONAL_PRESSURE_STRENGTH: f64 = -0.60;
}

#[derive(Debug, Default, Deserialize)]
pub struct PlatformRecord {
    #[serde(default, deserialize_with = "lenient_number")]
    pub urban_usage: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub rural_usage: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub total_users: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlatformMetrics {
    pub urban_usage: f64,
    pub rural_usage: f64,
    pub total_users: u64,
    pub curiosity_strength: f64,
    pub visibility_strength: f64,
    pub traditional_pressure_strength: f64,
}

impl SourceRecord for PlatformRecord {
    type Metrics = PlatformMetrics;
    const NAME: &'static str = "platform-usage";

    fn normalize(self) -> PlatformMetrics {
        PlatformMetrics {
            urban_usage: percent_or(self.urban_usage, defaults::URBAN_USAGE),
            rural_usage: percent_or(self.rural_usage, defaults::RURAL_USAGE),
            total_users: count_or(self.total_users, defaults::TOTAL_USERS),
            curiosity_strength: defaults::CURIOSITY_STRENGTH,
            visibility_strength: defaults::VISIBILITY_STRENGTH,
            traditional_pressure_strength: defaults::TRADITIONAL_PRESSURE_STRENGTH,
        }
    }
}
