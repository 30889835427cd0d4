// src/sources/schools.rs
//! UDISE school infrastructure.

use serde::Deserialize;

use super::types::{count_or, lenient_number, percent_or, SourceRecord};

pub mod defaults {
    pub const TOTAL_SCHOOLS: u64 = 1_500_000;
    pub const RURAL_SCHOOLS: u64 = 1_200_000;
    pub const URBAN_SCHOOLS: u64 = 300_000;
    pub const CAREER_COUNSELING: f64 = 35.0;
}

#[derive(Debug, Default, Deserialize)]
pub struct SchoolRecord {
    #[serde(default, deserialize_with = "lenient_number")]
    pub total_schools: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub rural_schools: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub urban_schools: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub career_counseling: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SchoolMetrics {
    pub total_schools: u64,
    pub rural_schools: u64,
    pub urban_schools: u64,
    /// Share of schools with counseling, percent.
    pub career_counseling: f64,
}

impl SourceRecord for SchoolRecord {
    type Metrics = SchoolMetrics;
    const NAME: &'static str = "school-infrastructure";

    fn normalize(self) -> SchoolMetrics {
        SchoolMetrics {
            total_schools: count_or(self.total_schools, defaults::TOTAL_SCHOOLS),
            rural_schools: count_or(self.rural_schools, defaults::RURAL_SCHOOLS),
            urban_schools: count_or(self.urban_schools, defaults::URBAN_SCHOOLS),
            career_counseling: percent_or(self.career_counseling, defaults::CAREER_COUNSELING),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_table() {
        let m = SchoolRecord::defaults();
        assert_eq!(m.total_schools, 1_500_000);
        assert_eq!(m.rural_schools, 1_200_000);
        assert_eq!(m.urban_schools, 300_000);
        assert_eq!(m.career_counseling, 35.0);
    }
}
