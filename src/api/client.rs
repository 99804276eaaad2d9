use crate::api::response::first_message;
use crate::api::ChatRequest;
use crate::error::{BridgeError, Result};
use crate::models::Message;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use tokio::time::{timeout, Duration};
use tokio_util::sync::CancellationToken;

/// One blocking request/response exchange with the chat model.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(&self, request: &ChatRequest, cancel: &CancellationToken) -> Result<Message>;
}

pub struct OpenAiClient {
    client: reqwest::Client,
    endpoint: String,
    request_timeout: Duration,
}

impl OpenAiClient {
    pub fn new(api_key: &str, endpoint: &str, request_timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|e| BridgeError::Config(format!("Invalid authorization header: {}", e)))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            request_timeout,
        })
    }

    async fn send(&self, request: &ChatRequest) -> Result<Message> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(BridgeError::Api {
                status,
                message: error_text,
            });
        }

        let response_json: Value = response.json().await?;
        first_message(response_json)
    }
}

#[async_trait]
impl ChatClient for OpenAiClient {
    async fn complete(&self, request: &ChatRequest, cancel: &CancellationToken) -> Result<Message> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(BridgeError::Cancelled),
            result = timeout(self.request_timeout, self.send(request)) => {
                result.map_err(|_| BridgeError::Timeout(self.request_timeout))?
            }
        }
    }
}
