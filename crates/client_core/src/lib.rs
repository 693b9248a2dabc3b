use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use shared::protocol::{Prediction, PredictionRequest, PredictionResponse, ServiceInfo};
use thiserror::Error;
use tracing::{debug, info, warn};

pub mod config;
pub mod controller;
pub mod view;

pub use config::ClientSettings;
pub use controller::{
    LifecycleController, LifecyclePhase, LifecycleState, SubmitRejected, SubmitTicket,
};
pub use view::{format_usd, submit_label, ResultView};

/// Shown when a transport failure carries no usable description.
pub const NETWORK_ERROR_FALLBACK: &str = "Network error";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    /// The service answered with an explicit `error` message.
    #[error("{message}")]
    Server { status: u16, message: String },
    #[error("Request failed with status code {0}")]
    Status(u16),
    #[error("Malformed response from server: {0}")]
    Malformed(String),
    #[error("Unexpected response from server")]
    Unexpected,
    #[error("Network error: {0}")]
    Network(String),
}

impl PredictionError {
    /// The single message retained in session state. Never empty.
    pub fn user_message(&self) -> String {
        match self {
            PredictionError::Server { message, .. } => message.clone(),
            PredictionError::Network(description) if description.trim().is_empty() => {
                NETWORK_ERROR_FALLBACK.to_string()
            }
            other => other.to_string(),
        }
    }
}

fn network_error(err: reqwest::Error) -> PredictionError {
    PredictionError::Network(err.to_string())
}

/// Decodes a service body, accepting only a JSON object.
fn parse_body(body: &[u8]) -> Result<PredictionResponse, PredictionError> {
    let value = serde_json::from_slice::<serde_json::Value>(body)
        .map_err(|err| PredictionError::Malformed(err.to_string()))?;
    if !value.is_object() {
        return Err(PredictionError::Malformed(
            "expected a JSON object body".to_string(),
        ));
    }
    serde_json::from_value(value).map_err(|err| PredictionError::Malformed(err.to_string()))
}

/// Failure for a non-2xx answer: the body's `error` field if it has one,
/// otherwise the bare status.
fn status_failure(status: u16, body: &[u8]) -> PredictionError {
    match parse_body(body) {
        Ok(PredictionResponse {
            error: Some(message),
            ..
        }) if !message.is_empty() => PredictionError::Server { status, message },
        _ => PredictionError::Status(status),
    }
}

/// Maps a status code and raw body onto the outcome the controller records.
///
/// On success statuses a numeric `predicted_price` wins over an `error`
/// field; a body with neither is `Unexpected`. Bodies that are not JSON
/// objects are `Malformed`.
pub fn classify_response(status: u16, body: &[u8]) -> Result<Prediction, PredictionError> {
    if !(200..300).contains(&status) {
        return Err(status_failure(status, body));
    }

    let response = parse_body(body)?;
    if let Some(predicted_price) = response.predicted_price {
        return Ok(Prediction {
            predicted_price,
            units: response.units,
        });
    }
    match response.error {
        Some(message) if !message.is_empty() => Err(PredictionError::Server { status, message }),
        _ => Err(PredictionError::Unexpected),
    }
}

#[async_trait]
pub trait PredictionService: Send + Sync {
    async fn predict(&self, request: &PredictionRequest) -> Result<Prediction, PredictionError>;
}

pub struct PredictionClient {
    http: Client,
    server_url: String,
}

impl PredictionClient {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            server_url: server_url.into(),
        }
    }

    pub fn from_settings(settings: &ClientSettings) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = settings.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .context("failed to build prediction http client")?;
        Ok(Self {
            http,
            server_url: settings.server_url.clone(),
        })
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub async fn service_info(&self) -> Result<ServiceInfo, PredictionError> {
        let res = self
            .http
            .get(format!("{}/", self.server_url))
            .send()
            .await
            .map_err(network_error)?;
        let status = res.status();
        let body = res.bytes().await.map_err(network_error)?;
        if !status.is_success() {
            return Err(status_failure(status.as_u16(), &body));
        }
        serde_json::from_slice(&body).map_err(|err| PredictionError::Malformed(err.to_string()))
    }
}

#[async_trait]
impl PredictionService for PredictionClient {
    async fn predict(&self, request: &PredictionRequest) -> Result<Prediction, PredictionError> {
        let url = format!("{}/predict", self.server_url);
        debug!(%url, ocean_proximity = %request.ocean_proximity, "posting prediction request");

        let res = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|err| {
                warn!(%url, error = %err, "prediction request did not complete");
                network_error(err)
            })?;
        let status = res.status().as_u16();
        let body = res.bytes().await.map_err(network_error)?;

        let outcome = classify_response(status, &body);
        match &outcome {
            Ok(prediction) => {
                info!(status, price = prediction.predicted_price, "prediction received")
            }
            Err(err) => warn!(status, error = %err, "prediction service reported failure"),
        }
        outcome
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
