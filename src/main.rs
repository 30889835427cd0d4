//! Career Dashboard: binary entrypoint.
//! Boots the Axum HTTP server; the dashboard model loads in the background.

use shuttle_axum::ShuttleAxum;

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    career_dashboard::init_tracing();

    let router = career_dashboard::app().await?;

    Ok(router.into())
}
