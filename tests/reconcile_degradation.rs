// tests/reconcile_degradation.rs
//
// Two-tier degradation of the reconciler with in-process source clients.
//
// Covered:
// - every source failing -> static fallback model, no warning
// - one missing field -> only that field defaults
// - all-settled join (bounded by the slowest client)
// - panicking clients never escape load()
// - contract-violating metrics -> fallback model + warning
// - idempotence

use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};

use career_dashboard::error::DashboardError;
use career_dashboard::reconcile::{fallback_view_model, FALLBACK_WARNING};
use career_dashboard::sources::{
    FetchOutcome, PlatformMetrics, PlatformRecord, SchoolMetrics, SchoolRecord, SourceClient,
    SourceRecord, Sources, SurveyMetrics, SurveyRecord,
};
use career_dashboard::Reconciler;

#[derive(Clone)]
enum Behaviour<M> {
    Ok(M),
    Fail,
    Slow(Duration, M),
    Panic,
    /// Fetch fails and the default table panics too.
    Broken,
}

struct MockClient<M> {
    name: &'static str,
    behaviour: Behaviour<M>,
    defaults: fn() -> M,
}

#[async_trait]
impl<M: Clone + Send + Sync + 'static> SourceClient for MockClient<M> {
    type Metrics = M;

    async fn fetch(&self) -> FetchOutcome<M> {
        match &self.behaviour {
            Behaviour::Ok(m) => FetchOutcome::Success(m.clone()),
            Behaviour::Slow(d, m) => {
                tokio::time::sleep(*d).await;
                FetchOutcome::Success(m.clone())
            }
            Behaviour::Fail | Behaviour::Broken => FetchOutcome::Failure(DashboardError::Timeout {
                source_name: self.name,
                after_ms: 10_000,
            }),
            Behaviour::Panic => panic!("{} exploded", self.name),
        }
    }

    fn defaults(&self) -> M {
        if matches!(self.behaviour, Behaviour::Broken) {
            panic!("{} has no default table", self.name);
        }
        (self.defaults)()
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

fn survey(b: Behaviour<SurveyMetrics>) -> Arc<MockClient<SurveyMetrics>> {
    Arc::new(MockClient {
        name: SurveyRecord::NAME,
        behaviour: b,
        defaults: SurveyRecord::defaults,
    })
}

fn platform(b: Behaviour<PlatformMetrics>) -> Arc<MockClient<PlatformMetrics>> {
    Arc::new(MockClient {
        name: PlatformRecord::NAME,
        behaviour: b,
        defaults: PlatformRecord::defaults,
    })
}

fn schools(b: Behaviour<SchoolMetrics>) -> Arc<MockClient<SchoolMetrics>> {
    Arc::new(MockClient {
        name: SchoolRecord::NAME,
        behaviour: b,
        defaults: SchoolRecord::defaults,
    })
}

fn reconciler(
    s: Behaviour<SurveyMetrics>,
    p: Behaviour<PlatformMetrics>,
    e: Behaviour<SchoolMetrics>,
) -> Reconciler {
    Reconciler::new(Sources::new(survey(s), platform(p), schools(e)))
}

#[tokio::test]
async fn all_sources_failing_yields_fallback_without_warning() {
    let out = reconciler(Behaviour::Fail, Behaviour::Fail, Behaviour::Fail)
        .load()
        .await;
    assert_eq!(out.view_model, fallback_view_model());
    assert!(out.warning.is_none(), "field-level failures must not warn");
    assert_eq!(out.sources.len(), 3);
    assert!(out.sources.iter().all(|r| !r.ok));
}

#[tokio::test]
async fn one_missing_field_defaults_alone() {
    let mut s = SurveyRecord::defaults();
    s.engineering = 80.0;
    s.medicine = 50.0;
    let mut p = PlatformRecord::defaults();
    p.urban_usage = 70.0;
    p.rural_usage = 30.0;
    // total_users "missing": left at default by normalization

    let out = reconciler(Behaviour::Ok(s), Behaviour::Ok(p), Behaviour::Fail)
        .load()
        .await;
    let vm = out.view_model;
    assert_eq!(vm.career_preferences[0].value, 80.0);
    assert_eq!(vm.career_preferences[1].value, 50.0);
    assert_eq!(vm.platform_usage.urban, 70.0);
    assert_eq!(vm.platform_usage.rural, 30.0);
    assert_eq!(vm.platform_usage.total_users, 1_250_000);
    assert_eq!(vm.education_stats, fallback_view_model().education_stats);
    assert!(out.warning.is_none());
}

#[tokio::test]
async fn join_is_bounded_by_slowest_client() {
    let d = Duration::from_millis(300);
    let r = reconciler(
        Behaviour::Slow(d, SurveyRecord::defaults()),
        Behaviour::Slow(d, PlatformRecord::defaults()),
        Behaviour::Slow(d, SchoolRecord::defaults()),
    );
    let t0 = Instant::now();
    let out = r.load().await;
    let took = t0.elapsed();
    assert!(out.sources.iter().all(|r| r.ok));
    assert!(
        took < Duration::from_millis(800),
        "sources ran sequentially? took {took:?}"
    );
}

#[tokio::test]
async fn panicking_clients_degrade_to_defaults() {
    let out = reconciler(Behaviour::Panic, Behaviour::Panic, Behaviour::Panic)
        .load()
        .await;
    assert_eq!(out.view_model, fallback_view_model());
    assert!(out.warning.is_none());
    let err = out.sources[0].error.as_deref().unwrap_or_default();
    assert!(err.contains("survey-preferences"), "{err}");
}

#[tokio::test]
async fn contract_violation_serves_fallback_with_warning() {
    let mut p = PlatformRecord::defaults();
    p.traditional_pressure_strength = -3.0;
    let mut s = SurveyRecord::defaults();
    s.engineering = 90.0;

    let out = reconciler(Behaviour::Ok(s), Behaviour::Ok(p), Behaviour::Fail)
        .load()
        .await;
    assert_eq!(out.warning.as_deref(), Some(FALLBACK_WARNING));
    // Whole model replaced, including the otherwise valid survey value.
    assert_eq!(out.view_model, fallback_view_model());
}

#[tokio::test]
async fn missing_default_table_serves_fallback_with_warning() {
    let out = reconciler(
        Behaviour::Ok(SurveyRecord::defaults()),
        Behaviour::Broken,
        Behaviour::Fail,
    )
    .load()
    .await;
    assert_eq!(out.warning.as_deref(), Some(FALLBACK_WARNING));
    assert_eq!(out.view_model, fallback_view_model());
}

#[tokio::test]
async fn identical_responses_give_equal_models() {
    let mut s = SurveyRecord::defaults();
    s.arts = 9.0;
    let r = reconciler(
        Behaviour::Ok(s),
        Behaviour::Ok(PlatformRecord::defaults()),
        Behaviour::Fail,
    );
    let a = r.load().await;
    let b = r.load().await;
    assert_eq!(a.view_model, b.view_model);
    assert_eq!(a.warning, b.warning);
}
