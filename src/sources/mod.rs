// src/sources/mod.rs
//! Source clients: one per data.gov.in dataset.
//!
//! Every client resolves to a [`FetchOutcome`]; nothing escapes as an error.
//! Per-field defaults live with each record type (tier 1 of degradation).

pub mod platform;
pub mod schools;
pub mod survey;
pub mod types;

use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::{redact_api_key, DashboardConfig, SourceEndpoint};
use crate::error::DashboardError;
use crate::metrics::ensure_metrics_described;

pub use platform::{PlatformMetrics, PlatformRecord};
pub use schools::{SchoolMetrics, SchoolRecord};
pub use survey::{SurveyMetrics, SurveyRecord};
pub use types::{FetchOutcome, SourceClient, SourceRecord};

pub type SurveyClient = DataGovSource<SurveyRecord>;
pub type PlatformClient = DataGovSource<PlatformRecord>;
pub type SchoolClient = DataGovSource<SchoolRecord>;

/// Generic data.gov.in client parameterised by the record it reads.
pub struct DataGovSource<R> {
    mode: Mode,
    _record: PhantomData<fn() -> R>,
}

enum Mode {
    /// In-memory response body.
    Fixture(String),
    Http {
        client: reqwest::Client,
        endpoint: SourceEndpoint,
        timeout: Duration,
    },
}

impl<R: SourceRecord> DataGovSource<R> {
    pub fn from_fixture_str(body: &str) -> Self {
        Self {
            mode: Mode::Fixture(body.to_string()),
            _record: PhantomData,
        }
    }

    /// Each source gets its own HTTP client; nothing is shared between sources.
    pub fn from_endpoint(endpoint: SourceEndpoint, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("career-dashboard/", env!("CARGO_PKG_VERSION")))
            .build()
            .with_context(|| format!("building http client for {}", R::NAME))?;
        Ok(Self {
            mode: Mode::Http {
                client,
                endpoint,
                timeout,
            },
            _record: PhantomData,
        })
    }

    async fn fetch_record(&self) -> Result<R, DashboardError> {
        match &self.mode {
            Mode::Fixture(body) => types::parse_first_record::<R>(body),
            Mode::Http {
                client,
                endpoint,
                timeout,
            } => {
                let body = get_body(client, endpoint, *timeout, R::NAME).await?;
                types::parse_first_record::<R>(&body)
            }
        }
    }
}

async fn get_body(
    client: &reqwest::Client,
    endpoint: &SourceEndpoint,
    timeout: Duration,
    source_name: &'static str,
) -> Result<String, DashboardError> {
    let classify = |e: reqwest::Error| {
        if e.is_timeout() {
            DashboardError::Timeout {
                source_name,
                after_ms: timeout.as_millis() as u64,
            }
        } else {
            DashboardError::SourceUnavailable {
                source_name,
                reason: redact_api_key(&e.without_url().to_string()),
            }
        }
    };

    tracing::debug!(source = source_name, url = %endpoint.redacted(), "source fetch");
    let resp = client
        .get(&endpoint.url)
        .query(&endpoint.query)
        .send()
        .await
        .map_err(classify)?;

    let status = resp.status();
    if !status.is_success() {
        return Err(DashboardError::SourceUnavailable {
            source_name,
            reason: format!("HTTP {status}"),
        });
    }
    resp.text().await.map_err(classify)
}

#[async_trait]
impl<R: SourceRecord> SourceClient for DataGovSource<R> {
    type Metrics = R::Metrics;

    async fn fetch(&self) -> FetchOutcome<R::Metrics> {
        ensure_metrics_described();
        let t0 = Instant::now();
        let res = self.fetch_record().await;

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("dashboard_source_fetch_ms", "source" => R::NAME).record(ms);

        match res {
            Ok(record) => {
                counter!("dashboard_source_fetch_total", "source" => R::NAME, "outcome" => "success")
                    .increment(1);
                FetchOutcome::Success(record.normalize())
            }
            Err(e) => {
                tracing::warn!(
                    target: "sources",
                    source = R::NAME,
                    kind = e.kind(),
                    error = %e,
                    "source fetch failed; defaults will be used"
                );
                counter!("dashboard_source_fetch_total", "source" => R::NAME, "outcome" => e.kind())
                    .increment(1);
                FetchOutcome::Failure(e)
            }
        }
    }

    fn defaults(&self) -> R::Metrics {
        R::defaults()
    }

    fn name(&self) -> &'static str {
        R::NAME
    }
}

pub type DynSource<M> = Arc<dyn SourceClient<Metrics = M>>;

/// The three independent clients the reconciler runs.
#[derive(Clone)]
pub struct Sources {
    pub survey: DynSource<SurveyMetrics>,
    pub platform: DynSource<PlatformMetrics>,
    pub schools: DynSource<SchoolMetrics>,
}

impl Sources {
    pub fn new(
        survey: DynSource<SurveyMetrics>,
        platform: DynSource<PlatformMetrics>,
        schools: DynSource<SchoolMetrics>,
    ) -> Self {
        Self {
            survey,
            platform,
            schools,
        }
    }

    /// Live HTTP clients built from configuration.
    pub fn from_config(cfg: &DashboardConfig) -> Result<Self> {
        let timeout = cfg.timeout();
        let survey = SurveyClient::from_endpoint(
            cfg.endpoint(&cfg.resources.survey_preferences),
            timeout,
        )?;
        let platform =
            PlatformClient::from_endpoint(cfg.endpoint(&cfg.resources.platform_usage), timeout)?;
        let schools = SchoolClient::from_endpoint(
            cfg.endpoint(&cfg.resources.school_infrastructure),
            timeout,
        )?;
        Ok(Self::new(
            Arc::new(survey),
            Arc::new(platform),
            Arc::new(schools),
        ))
    }

    /// Clients answering from in-memory bodies.
    pub fn from_fixtures(survey: &str, platform: &str, schools: &str) -> Self {
        Self::new(
            Arc::new(SurveyClient::from_fixture_str(survey)),
            Arc::new(PlatformClient::from_fixture_str(platform)),
            Arc::new(SchoolClient::from_fixture_str(schools)),
        )
    }
}
