//! Runs one reconciliation and prints the resulting dashboard JSON.
//!
//! Usage:
//!   fetch_once                      # live data.gov.in sources (config/dashboard.toml + env)
//!   fetch_once --fixtures <dir>     # survey.json / platform.json / schools.json from <dir>

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use career_dashboard::config::DashboardConfig;
use career_dashboard::sources::Sources;
use career_dashboard::summary::Headline;
use career_dashboard::Reconciler;

fn fixture_sources(dir: &Path) -> Result<Sources> {
    let read = |name: &str| {
        let p = dir.join(name);
        std::fs::read_to_string(&p).with_context(|| format!("reading fixture {}", p.display()))
    };
    Ok(Sources::from_fixtures(
        &read("survey.json")?,
        &read("platform.json")?,
        &read("schools.json")?,
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    career_dashboard::init_tracing();

    let mut args = std::env::args().skip(1);
    let fixtures = match args.next().as_deref() {
        Some("--fixtures") => Some(PathBuf::from(
            args.next().context("--fixtures needs a directory")?,
        )),
        Some(other) => anyhow::bail!("unknown argument: {other}"),
        None => None,
    };

    let sources = match fixtures {
        Some(dir) => fixture_sources(&dir)?,
        None => Sources::from_config(&DashboardConfig::load_default()?)?,
    };

    let outcome = Reconciler::new(sources).load().await;
    let out = serde_json::json!({
        "viewModel": outcome.view_model,
        "warningMessage": outcome.warning,
        "headline": Headline::from_view_model(&outcome.view_model),
        "sources": outcome.sources,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
