// src/reconcile.rs
//! Reconciler: fetch all sources concurrently, merge into one [`ViewModel`].
//!
//! Degradation happens in two tiers:
//! 1. a failed source contributes its default table (no warning);
//! 2. a merge that breaks the model contract yields the static fallback
//!    model plus a user-visible warning.
//!
//! `load()` never panics and never returns an error.

use metrics::{counter, gauge};
use serde::Serialize;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{debug, error, info, warn};

use crate::error::DashboardError;
use crate::metrics::ensure_metrics_described;
use crate::sources::{
    DynSource, FetchOutcome, PlatformMetrics, SchoolMetrics, Sources, SurveyMetrics,
};
use crate::view_model::{
    AwarenessStats, CareerPreference, EducationStats, FeedbackLoop, LoopType, PlatformUsage,
    ViewModel, CAREER_CATEGORIES, FEEDBACK_LOOPS,
};

pub const FALLBACK_WARNING: &str = "Failed to load data. Please try again later.";

/// Per-source diagnostics; not part of the presentation contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceReport {
    pub source: &'static str,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutcome {
    pub view_model: ViewModel,
    /// Set only when the static fallback replaced the merged model.
    pub warning: Option<String>,
    pub sources: Vec<SourceReport>,
}

impl LoadOutcome {
    /// Whole-model fallback with the warning raised.
    pub fn fallback() -> Self {
        Self {
            view_model: fallback_view_model(),
            warning: Some(FALLBACK_WARNING.to_string()),
            sources: Vec::new(),
        }
    }
}

pub struct Reconciler {
    sources: Sources,
}

impl Reconciler {
    pub fn new(sources: Sources) -> Self {
        Self { sources }
    }

    pub async fn load(&self) -> LoadOutcome {
        ensure_metrics_described();

        // All-settled: each client runs in its own task; a panic there is a failure, not ours.
        let (survey, platform, schools) = tokio::join!(
            settle(self.sources.survey.clone()),
            settle(self.sources.platform.clone()),
            settle(self.sources.schools.clone()),
        );

        let sources = vec![
            survey.report.clone(),
            platform.report.clone(),
            schools.report.clone(),
        ];

        let merged = match (survey.metrics, platform.metrics, schools.metrics) {
            (Ok(s), Ok(p), Ok(e)) => merge(&s, &p, &e),
            (s, p, e) => Err(s.and(p).and(e).err().unwrap_or_else(|| {
                DashboardError::ReconciliationFailure("source produced no metrics".into())
            })),
        };

        let (view_model, warning) = match merged {
            Ok(vm) => (vm, None),
            Err(e) => {
                error!(target: "reconcile", error = %e, "merge failed; serving static fallback model");
                counter!("dashboard_reconcile_fallback_total").increment(1);
                (fallback_view_model(), Some(FALLBACK_WARNING.to_string()))
            }
        };

        counter!("dashboard_loads_total").increment(1);
        gauge!("dashboard_last_load_ts").set(chrono::Utc::now().timestamp().max(0) as f64);

        let failed = sources.iter().filter(|r| !r.ok).count();
        info!(
            target: "reconcile",
            failed_sources = failed,
            fallback = warning.is_some(),
            "dashboard model loaded"
        );

        LoadOutcome {
            view_model,
            warning,
            sources,
        }
    }
}

struct Settled<M> {
    /// `Err` only when the client could not even produce its default table.
    metrics: Result<M, DashboardError>,
    report: SourceReport,
}

async fn settle<M: Send + 'static>(client: DynSource<M>) -> Settled<M> {
    let name = client.name();
    let task_client = client.clone();
    let outcome = match tokio::spawn(async move { task_client.fetch().await }).await {
        Ok(outcome) => outcome,
        Err(join_err) => {
            warn!(target: "reconcile", source = name, error = %join_err, "source task died");
            FetchOutcome::Failure(DashboardError::SourceUnavailable {
                source_name: name,
                reason: format!("client task failed: {join_err}"),
            })
        }
    };

    let report = SourceReport {
        source: name,
        ok: outcome.is_success(),
        error: outcome.failure().map(|e| e.to_string()),
    };

    let metrics = match outcome {
        FetchOutcome::Success(m) => Ok(m),
        FetchOutcome::Failure(_) => catch_unwind(AssertUnwindSafe(|| client.defaults()))
            .map_err(|_| {
                DashboardError::ReconciliationFailure(format!(
                    "{name}: default table unavailable"
                ))
            }),
    };

    Settled { metrics, report }
}

/// Fixed field mapping from the three metric sets to the view model.
pub fn merge(
    survey: &SurveyMetrics,
    platform: &PlatformMetrics,
    schools: &SchoolMetrics,
) -> Result<ViewModel, DashboardError> {
    let career_preferences = CAREER_CATEGORIES
        .iter()
        .zip(survey.preferences())
        .map(|(name, value)| CareerPreference {
            name: (*name).to_string(),
            value,
        })
        .collect();

    let strengths = [
        platform.curiosity_strength,
        platform.visibility_strength,
        platform.traditional_pressure_strength,
    ];
    let feedback_loops = FEEDBACK_LOOPS
        .iter()
        .zip(strengths)
        .map(|((name, kind), strength)| FeedbackLoop {
            name: (*name).to_string(),
            strength,
            kind: *kind,
        })
        .collect();

    let vm = ViewModel {
        awareness_stats: AwarenessStats {
            traditional: survey.traditional,
            non_traditional: survey.non_traditional,
            urban_rural_gap: survey.urban_rural_gap,
        },
        platform_usage: PlatformUsage {
            urban: platform.urban_usage,
            rural: platform.rural_usage,
            total_users: platform.total_users,
        },
        career_preferences,
        feedback_loops,
        education_stats: EducationStats {
            total_schools: schools.total_schools,
            rural_schools: schools.rural_schools,
            urban_schools: schools.urban_schools,
            career_counseling_availability: schools.career_counseling,
        },
    };

    validate(&vm)?;

    let es = &vm.education_stats;
    if es.rural_schools.saturating_add(es.urban_schools) != es.total_schools {
        // Sources are independent; the mismatch is reported, not corrected.
        debug!(
            target: "reconcile",
            total = es.total_schools,
            rural = es.rural_schools,
            urban = es.urban_schools,
            "school counts do not sum to total"
        );
    }

    Ok(vm)
}

/// Contract checks on a merged model.
pub fn validate(vm: &ViewModel) -> Result<(), DashboardError> {
    let fail = |msg: String| Err(DashboardError::ReconciliationFailure(msg));

    let mut percentages = vec![
        ("awarenessStats.traditional", vm.awareness_stats.traditional),
        ("awarenessStats.nonTraditional", vm.awareness_stats.non_traditional),
        ("awarenessStats.urbanRuralGap", vm.awareness_stats.urban_rural_gap),
        ("platformUsage.urban", vm.platform_usage.urban),
        ("platformUsage.rural", vm.platform_usage.rural),
        (
            "educationStats.careerCounselingAvailability",
            vm.education_stats.career_counseling_availability,
        ),
    ];
    percentages.extend(
        vm.career_preferences
            .iter()
            .map(|p| ("careerPreferences.value", p.value)),
    );
    for (field, v) in percentages {
        if !v.is_finite() || !(0.0..=100.0).contains(&v) {
            return fail(format!("{field} = {v} is not a percentage"));
        }
    }

    if vm.career_preferences.len() != CAREER_CATEGORIES.len() {
        return fail(format!(
            "expected {} career preferences, got {}",
            CAREER_CATEGORIES.len(),
            vm.career_preferences.len()
        ));
    }
    if vm.feedback_loops.len() != FEEDBACK_LOOPS.len() {
        return fail(format!(
            "expected {} feedback loops, got {}",
            FEEDBACK_LOOPS.len(),
            vm.feedback_loops.len()
        ));
    }
    for fl in &vm.feedback_loops {
        if !fl.strength.is_finite() || !(-1.0..=1.0).contains(&fl.strength) {
            return fail(format!(
                "feedback loop '{}' strength {} outside [-1, 1]",
                fl.name, fl.strength
            ));
        }
    }
    Ok(())
}

/// Literal snapshot served when reconciliation itself fails.
pub fn fallback_view_model() -> ViewModel {
    let pref = |name: &str, value: f64| CareerPreference {
        name: name.to_string(),
        value,
    };
    let fl = |name: &str, strength: f64, kind: LoopType| FeedbackLoop {
        name: name.to_string(),
        strength,
        kind,
    };
    ViewModel {
        awareness_stats: AwarenessStats {
            traditional: 78.0,
            non_traditional: 22.0,
            urban_rural_gap: 42.0,
        },
        platform_usage: PlatformUsage {
            urban: 65.0,
            rural: 28.0,
            total_users: 1_250_000,
        },
        career_preferences: vec![
            pref("Engineering", 68.0),
            pref("Medicine", 45.0),
            pref("Design", 12.0),
            pref("Entrepreneurship", 8.0),
            pref("Arts", 5.0),
            pref("Content Creation", 7.0),
        ],
        feedback_loops: vec![
            fl("Curiosity-Awareness", 0.75, LoopType::Reinforcing),
            fl("Visibility-Awareness", 0.65, LoopType::Reinforcing),
            fl("Traditional Pressure", -0.60, LoopType::Balancing),
        ],
        education_stats: EducationStats {
            total_schools: 1_500_000,
            rural_schools: 1_200_000,
            urban_schools: 300_000,
            career_counseling_availability: 35.0,
        },
    }
}
