//! Smoke test for a deployed scoring API.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::time::Duration;
use tokio_retry::{strategy::ExponentialBackoff, Retry};

use crate::config::VerifyConfig;
use crate::server::dto::{DEFAULT_LAT, DEFAULT_LON};

/// Fields of a score response worth showing after a successful check.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyReport {
    pub score: f64,
    pub classification: String,
    pub details: serde_json::Value,
}

/// Score endpoint URL for a deployment base URL.
pub fn score_url(base_url: &str) -> String {
    format!(
        "{}/api/score?lat={}&lon={}",
        base_url.trim_end_matches('/'),
        DEFAULT_LAT,
        DEFAULT_LON
    )
}

/// Call the score endpoint of the deployment at `base_url`.
///
/// Connection failures are retried with exponential backoff. Any non-200
/// response is an error carrying the status and body.
pub async fn verify_deployment(base_url: &str, config: &VerifyConfig) -> Result<VerifyReport> {
    let url = score_url(base_url);
    let client = reqwest::Client::builder()
        .timeout(config.timeout()?)
        .build()
        .context("Failed to create HTTP client")?;

    let retry_strategy = ExponentialBackoff::from_millis(100)
        .max_delay(Duration::from_secs(5))
        .take(config.attempts.saturating_sub(1));

    tracing::info!(url = %url, attempts = config.attempts, "verifying deployment");

    let response = Retry::spawn(retry_strategy, || async {
        client.get(&url).send().await.map_err(|e| {
            tracing::debug!(error = %e, "request failed");
            e
        })
    })
    .await
    .with_context(|| format!("Could not connect to backend at {}", url))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        bail!("Backend returned status code {}: {}", status.as_u16(), body);
    }

    response
        .json::<VerifyReport>()
        .await
        .context("Backend response is not a score document")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{FixedProviders, Providers};
    use crate::scoring::ScoringConfig;
    use crate::server::{router, AppState};
    use axum::{routing::get, Router};

    fn install_crypto() {
        let _ = rustls::crypto::ring::default_provider().install_default();
    }

    async fn spawn(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn quick() -> VerifyConfig {
        VerifyConfig {
            timeout: "2s".to_string(),
            attempts: 1,
        }
    }

    #[test]
    fn test_score_url_strips_trailing_slash() {
        assert_eq!(
            score_url("https://backend.example.com/"),
            "https://backend.example.com/api/score?lat=34.754&lon=-78.789"
        );
        assert_eq!(
            score_url("http://localhost:5000"),
            "http://localhost:5000/api/score?lat=34.754&lon=-78.789"
        );
    }

    #[tokio::test]
    async fn test_verify_against_live_router() {
        install_crypto();
        let state = AppState::new(
            ScoringConfig::default(),
            Providers::fixed(FixedProviders::new(85.0, 180, 3)),
        );
        let base = spawn(router(state)).await;

        let report = verify_deployment(&format!("{}/", base), &quick()).await.unwrap();
        assert_eq!(report.score, 72.5);
        assert_eq!(report.classification, "STANDARD PROSPECT");
        assert_eq!(report.details["gates"], 3);
    }

    #[tokio::test]
    async fn test_verify_reports_error_status() {
        install_crypto();
        let app = Router::new().route(
            "/api/score",
            get(|| async { (axum::http::StatusCode::SERVICE_UNAVAILABLE, "warming up") }),
        );
        let base = spawn(app).await;

        let err = verify_deployment(&base, &quick()).await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("503"));
        assert!(message.contains("warming up"));
    }

    #[tokio::test]
    async fn test_verify_gives_up_after_retrying_closed_port() {
        install_crypto();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = VerifyConfig {
            timeout: "1s".to_string(),
            attempts: 2,
        };
        let err = verify_deployment(&format!("http://{}", addr), &config)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Could not connect to backend"));
    }
}
