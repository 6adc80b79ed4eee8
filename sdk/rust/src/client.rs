use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessRequest {
    pub data: String,
    pub processing_mode: String, // "secure", "fast", "reactive", "balanced" or "benchmark"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workers: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_native_libs: Option<bool>,
}

impl ProcessRequest {
    pub fn new(data: &str, mode: &str) -> Self {
        Self {
            data: data.to_string(),
            processing_mode: mode.to_string(),
            workers: None,
            use_native_libs: None,
        }
    }

    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn use_native_libs(mut self, enabled: bool) -> Self {
        self.use_native_libs = Some(enabled);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessResponse {
    pub status: String,
    pub original_data: String,
    pub security_result: Value,
    pub parallel_result: Value,
    pub reactive_result: Value,
    pub processing_mode: String,
    pub total_processing_time: f64,
    pub system_metrics: Value,
    pub capabilities_used: Vec<String>,
    pub timestamp: String,
}

/// Error returned by [`IlnClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    /// Engine answered with a non-success status.
    #[error("Engine returned error status {status}: {body}")]
    Status { status: StatusCode, body: String },
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Http(e) => e.status(),
        }
    }
}

pub struct IlnClient {
    client: Client,
    base_url: String,
}

impl IlnClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::builder()
                .no_proxy()
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn health(&self) -> Result<Value, ClientError> {
        self.get_json("/health").await
    }

    pub async fn capabilities(&self) -> Result<Value, ClientError> {
        self.get_json("/capabilities").await
    }

    pub async fn metrics(&self) -> Result<Value, ClientError> {
        self.get_json("/metrics").await
    }

    /// Submit a processing request to `/process-advanced`.
    pub async fn process(&self, req: &ProcessRequest) -> Result<ProcessResponse, ClientError> {
        self.process_at("/process-advanced", req).await
    }

    /// Submit a processing request to one of the processing routes.
    pub async fn process_at(
        &self,
        route: &str,
        req: &ProcessRequest,
    ) -> Result<ProcessResponse, ClientError> {
        let resp = self
            .client
            .post(format!("{}{}", self.base_url, route))
            .json(req)
            .send()
            .await?;
        Self::decode(resp).await
    }

    pub async fn stress_test(&self, iterations: i64) -> Result<Value, ClientError> {
        self.get_json(&format!("/stress-test/{}", iterations)).await
    }

    async fn get_json(&self, path: &str) -> Result<Value, ClientError> {
        let resp = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await?;
        Self::decode(resp).await
    }

    async fn decode<T: for<'de> Deserialize<'de>>(resp: reqwest::Response) -> Result<T, ClientError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Status { status, body });
        }
        Ok(resp.json::<T>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_message() {
        let err = ClientError::Status {
            status: StatusCode::BAD_REQUEST,
            body: "Max 100 iterations allowed, got 101".into(),
        };
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
        assert_eq!(
            err.to_string(),
            "Engine returned error status 400 Bad Request: Max 100 iterations allowed, got 101"
        );
        let source: &dyn std::error::Error = &err;
        assert!(source.source().is_none());
    }

    #[test]
    fn test_request_omits_unset_fields() {
        let json = serde_json::to_value(ProcessRequest::new("abc", "fast")).unwrap();
        assert_eq!(json, serde_json::json!({"data": "abc", "processing_mode": "fast"}));

        let json = serde_json::to_value(ProcessRequest::new("abc", "fast").use_native_libs(false))
            .unwrap();
        assert_eq!(json["use_native_libs"], false);
    }
}
