// src/view_model.rs
//! Render-ready dashboard model and the tab selector.
//!
//! Field names serialize in camelCase because the dashboard UI consumes them
//! verbatim.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewModel {
    pub awareness_stats: AwarenessStats,
    pub platform_usage: PlatformUsage,
    pub career_preferences: Vec<CareerPreference>,
    pub feedback_loops: Vec<FeedbackLoop>,
    pub education_stats: EducationStats,
}

/// Percentages, 0..=100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwarenessStats {
    pub traditional: f64,
    pub non_traditional: f64,
    pub urban_rural_gap: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformUsage {
    pub urban: f64,
    pub rural: f64,
    pub total_users: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerPreference {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoopType {
    Reinforcing,
    Balancing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackLoop {
    pub name: String,
    /// In [-1, 1].
    pub strength: f64,
    #[serde(rename = "type")]
    pub kind: LoopType,
}

/// School counts are independent figures; rural + urban is not checked against total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationStats {
    pub total_schools: u64,
    pub rural_schools: u64,
    pub urban_schools: u64,
    pub career_counseling_availability: f64,
}

/// Display order of the six career categories.
pub const CAREER_CATEGORIES: [&str; 6] = [
    "Engineering",
    "Medicine",
    "Design",
    "Entrepreneurship",
    "Arts",
    "Content Creation",
];

/// Display order of the three feedback loops.
pub const FEEDBACK_LOOPS: [(&str, LoopType); 3] = [
    ("Curiosity-Awareness", LoopType::Reinforcing),
    ("Visibility-Awareness", LoopType::Reinforcing),
    ("Traditional Pressure", LoopType::Balancing),
];

/// Dashboard tabs, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Problem,
    Analysis,
    Solutions,
    Roadmap,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Problem, Tab::Analysis, Tab::Solutions, Tab::Roadmap];

    pub fn as_str(self) -> &'static str {
        match self {
            Tab::Problem => "problem",
            Tab::Analysis => "analysis",
            Tab::Solutions => "solutions",
            Tab::Roadmap => "roadmap",
        }
    }

    /// Lenient selection: anything unrecognised lands on the problem tab.
    pub fn from_query(raw: Option<&str>) -> Tab {
        raw.and_then(|s| s.parse().ok()).unwrap_or_default()
    }
}

impl FromStr for Tab {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "problem" => Ok(Tab::Problem),
            "analysis" => Ok(Tab::Analysis),
            "solutions" => Ok(Tab::Solutions),
            "roadmap" => Ok(Tab::Roadmap),
            _ => Err(()),
        }
    }
}
