use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::domain::order::OrderError;
use crate::metrics::Metrics;

/// JSON-over-HTTP access to one collaborator service
pub(super) struct RemoteService {
    service: &'static str,
    base_url: String,
    client: Client,
    metrics: Arc<Metrics>,
}

impl RemoteService {
    pub(super) fn new(
        service: &'static str,
        base_url: &str,
        timeout: Duration,
        metrics: Arc<Metrics>,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            service,
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            metrics,
        })
    }

    pub(super) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, OrderError> {
        let url = format!("{}/{}", self.base_url, path);
        let started = Instant::now();

        let result = self.fetch(&url).await;

        self.metrics
            .record_remote_call(self.service, started.elapsed().as_secs_f64(), result.is_ok());

        if let Err(e) = &result {
            tracing::warn!(service = self.service, url = %url, error = %e, "Collaborator call failed");
        }
        result
    }

    async fn fetch<T: DeserializeOwned>(&self, url: &str) -> Result<T, OrderError> {
        tracing::debug!(service = self.service, url = %url, "Calling collaborator");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.call_failed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.call_failed(format!("HTTP {status}")));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| self.call_failed(e.to_string()))?;

        serde_json::from_slice(&body).map_err(|e| OrderError::DecodeFailed {
            service: self.service,
            reason: e.to_string(),
        })
    }

    fn call_failed(&self, reason: String) -> OrderError {
        OrderError::RemoteCallFailed {
            service: self.service,
            reason,
        }
    }
}
