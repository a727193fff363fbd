use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use viz_core::{Transport, TransportError};
use viz_proto::SessionConfig;

/// Endpoint paths joined onto the base URL, overridable per endpoint.
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    pub base: String,
    pub init: String,
    pub update: String,
    pub robots: String,
    pub boxes: String,
    pub objective: String,
}

/// Transport adapter over reqwest. Thin by design: it moves bytes and maps
/// failures into the core's taxonomy, nothing else.
pub struct HttpTransport {
    client: Client,
    endpoints: EndpointConfig,
}

impl HttpTransport {
    pub fn new(endpoints: EndpointConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .map_err(|err| TransportError::Connection(err.to_string()))?;
        Ok(Self { client, endpoints })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoints.base.trim_end_matches('/'), path)
    }

    async fn get_text(&self, path: &str) -> Result<String, TransportError> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(map_send_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }
        response
            .text()
            .await
            .map_err(|err| TransportError::Body(err.to_string()))
    }
}

fn map_send_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Connection(err.to_string())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send_config(&self, config: &SessionConfig) -> Result<(), TransportError> {
        let response = self
            .client
            .post(self.url(&self.endpoints.init))
            .form(&config.form_fields())
            .send()
            .await
            .map_err(map_send_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }
        Ok(())
    }

    async fn check_update(&self) -> Result<(), TransportError> {
        self.get_text(&self.endpoints.update).await.map(|_| ())
    }

    async fn fetch_robots(&self) -> Result<String, TransportError> {
        self.get_text(&self.endpoints.robots).await
    }

    async fn fetch_boxes(&self) -> Result<String, TransportError> {
        self.get_text(&self.endpoints.boxes).await
    }

    async fn fetch_objective(&self) -> Result<String, TransportError> {
        self.get_text(&self.endpoints.objective).await
    }
}
