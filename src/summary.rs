// src/summary.rs
//! Headline figures quoted across the dashboard tabs, derived from a loaded model.

use serde::Serialize;

use crate::view_model::{CareerPreference, ViewModel};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Headline {
    pub total_schools_thousands: u64,
    pub rural_school_share_pct: u64,
    pub urban_school_share_pct: u64,
    pub career_counseling_pct: f64,
    /// Urban minus rural platform usage, percentage points.
    pub urban_rural_usage_gap: f64,
    pub traditional_pressure_pct: u64,
    /// Reinforcing loops plus the magnitude of the balancing one, halved.
    pub intervention_effectiveness: u64,
    pub top_preference: Option<String>,
}

impl Headline {
    pub fn from_view_model(vm: &ViewModel) -> Self {
        let es = &vm.education_stats;
        let strength = |i: usize| vm.feedback_loops.get(i).map_or(0.0, |l| l.strength);
        let pressure = strength(2).abs();

        Self {
            total_schools_thousands: (es.total_schools as f64 / 1000.0).round() as u64,
            rural_school_share_pct: share_pct(es.rural_schools, es.total_schools),
            urban_school_share_pct: share_pct(es.urban_schools, es.total_schools),
            career_counseling_pct: es.career_counseling_availability,
            urban_rural_usage_gap: vm.platform_usage.urban - vm.platform_usage.rural,
            traditional_pressure_pct: (pressure * 100.0).round() as u64,
            intervention_effectiveness: ((strength(0) + strength(1) + pressure) * 100.0 / 2.0)
                .round()
                .max(0.0) as u64,
            top_preference: top_preference(vm),
        }
    }
}

fn share_pct(part: u64, total: u64) -> u64 {
    if total == 0 {
        return 0;
    }
    (part as f64 / total as f64 * 100.0).round() as u64
}

// First entry wins ties.
fn top_preference(vm: &ViewModel) -> Option<String> {
    let mut best: Option<&CareerPreference> = None;
    for p in &vm.career_preferences {
        if best.map_or(true, |b| p.value > b.value) {
            best = Some(p);
        }
    }
    best.map(|p| p.name.clone())
}

/// Offsets applied to the current figures for 2023..=2030.
const PROJECTION_YEARS: [u16; 8] = [2023, 2024, 2025, 2026, 2027, 2028, 2029, 2030];
const AWARENESS_GAIN: [f64; 8] = [0.0, 5.0, 12.0, 20.0, 28.0, 35.0, 42.0, 50.0];
const GAP_REDUCTION: [f64; 8] = [0.0, 2.0, 5.0, 8.0, 12.0, 15.0, 18.0, 22.0];

/// One year of the roadmap chart. Percentages are clamped to `0..=100`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    pub year: u16,
    pub awareness: f64,
    pub counseling: f64,
    pub gap: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortTermPhase {
    pub partner_urban_schools: u64,
    pub campaign_target_users: u64,
    pub parent_session_districts: u64,
    pub pilot_lab_urban_schools: u64,
    pub pilot_lab_rural_schools: u64,
    pub target_awareness: f64,
    pub target_counseling: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediumTermPhase {
    pub mentorship_users: u64,
    pub career_class_schools: u64,
    pub career_lab_schools: u64,
    pub target_awareness: f64,
    pub target_counseling: f64,
    pub target_gap: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LongTermPhase {
    pub curriculum_schools: u64,
    pub mentor_network: u64,
    pub target_awareness: f64,
}

/// Roadmap tab figures: yearly projection plus the three phase plans.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Roadmap {
    pub projections: Vec<Projection>,
    pub short_term: ShortTermPhase,
    pub medium_term: MediumTermPhase,
    pub long_term: LongTermPhase,
}

impl Roadmap {
    pub fn from_view_model(vm: &ViewModel) -> Self {
        let awareness = vm.awareness_stats.non_traditional;
        let counseling = vm.education_stats.career_counseling_availability;
        let gap = vm.awareness_stats.urban_rural_gap;
        let es = &vm.education_stats;
        let users = vm.platform_usage.total_users;

        Self {
            projections: projections(awareness, counseling, gap),
            short_term: ShortTermPhase {
                partner_urban_schools: ratio(es.urban_schools, 10.0),
                campaign_target_users: users,
                parent_session_districts: ratio(es.rural_schools, 100.0),
                pilot_lab_urban_schools: ratio(es.urban_schools, 2000.0),
                pilot_lab_rural_schools: ratio(es.rural_schools, 4000.0),
                target_awareness: pct(awareness + 5.0),
                target_counseling: pct(counseling + 5.0),
            },
            medium_term: MediumTermPhase {
                mentorship_users: scaled(users, 0.2),
                career_class_schools: scaled(es.total_schools, 0.3),
                career_lab_schools: ratio(es.total_schools, 3000.0),
                target_awareness: pct(awareness + 15.0),
                target_counseling: pct(counseling + 15.0),
                target_gap: pct(gap - 8.0),
            },
            long_term: LongTermPhase {
                curriculum_schools: es.total_schools,
                mentor_network: scaled(users, 0.01),
                target_awareness: pct(awareness + 30.0),
            },
        }
    }
}

pub fn projections(awareness: f64, counseling: f64, gap: f64) -> Vec<Projection> {
    PROJECTION_YEARS
        .iter()
        .zip(AWARENESS_GAIN.iter().zip(GAP_REDUCTION))
        .map(|(&year, (&gain, cut))| Projection {
            year,
            awareness: pct(awareness + gain),
            counseling: pct(counseling + gain),
            gap: pct(gap - cut),
        })
        .collect()
}

fn pct(v: f64) -> f64 {
    v.clamp(0.0, 100.0)
}

fn scaled(n: u64, factor: f64) -> u64 {
    (n as f64 * factor).round() as u64
}

fn ratio(n: u64, divisor: f64) -> u64 {
    (n as f64 / divisor).round() as u64
}
