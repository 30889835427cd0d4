// src/sources/survey.rs
//! National Sample Survey: career-preference shares.

use serde::Deserialize;

use super::types::{lenient_number, percent_or, SourceRecord};

pub mod defaults {
    pub const ENGINEERING: f64 = 68.0;
    pub const MEDICINE: f64 = 45.0;
    pub const DESIGN: f64 = 12.0;
    pub const ENTREPRENEURSHIP: f64 = 8.0;
    pub const ARTS: f64 = 5.0;
    pub const CONTENT_CREATION: f64 = 7.0;

    // Not published by the endpoint; always these values.
    pub const TRADITIONAL: f64 = 78.0;
    pub const NON_TRADITIONAL: f64 = 22.0;
    pub const URBAN_RURAL_GAP: f64 = 42.0;
}

#[derive(Debug, Default, Deserialize)]
pub struct SurveyRecord {
    #[serde(default, deserialize_with = "lenient_number")]
    pub engineering: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub medicine: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub design: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub entrepreneurship: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub arts: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub content_creation: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SurveyMetrics {
    pub traditional: f64,
    pub non_traditional: f64,
    pub urban_rural_gap: f64,
    pub engineering: f64,
    pub medicine: f64,
    pub design: f64,
    pub entrepreneurship: f64,
    pub arts: f64,
    pub content_creation: f64,
}

impl SurveyMetrics {
    /// Preference shares in display order.
    pub fn preferences(&self) -> [f64; 6] {
        [
            self.engineering,
            self.medicine,
            self.design,
            self.entrepreneurship,
            self.arts,
            self.content_creation,
        ]
    }
}

impl SourceRecord for SurveyRecord {
    type Metrics = SurveyMetrics;
    const NAME: &'static str = "survey-preferences";

    fn normalize(self) -> SurveyMetrics {
        SurveyMetrics {
            traditional: defaults::TRADITIONAL,
            non_traditional: defaults::NON_TRADITIONAL,
            urban_rural_gap: defaults::URBAN_RURAL_GAP,
            engineering: percent_or(self.engineering, defaults::ENGINEERING),
            medicine: percent_or(self.medicine, defaults::MEDICINE),
            design: percent_or(self.design, defaults::DESIGN),
            entrepreneurship: percent_or(self.entrepreneurship, defaults::ENTREPRENEURSHIP),
            arts: percent_or(self.arts, defaults::ARTS),
            content_creation: percent_or(self.content_creation, defaults::CONTENT_CREATION),
        }
    }
}
