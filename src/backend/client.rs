// HTTP client for the gallery backend

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::types::{
    DeleteAllRequest, DeletePreviewResponse, DeleteResultResponse, HealthResponse,
    PathSearchResponse, PhotosResponse, SearchRequest, SearchResponse, UploadPhoto,
    UploadRequest, UploadResponse,
};

/// Error types for backend operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BackendError {
    /// Backend not reachable (connection refused, DNS, timeout)
    Unavailable(String),
    /// Backend answered with a non-success status
    RequestFailed(String),
    /// Response body did not match the expected contract
    InvalidResponse(String),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Unavailable(msg) => write!(f, "Backend unavailable: {}", msg),
            BackendError::RequestFailed(msg) => write!(f, "Request failed: {}", msg),
            BackendError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}

/// Backend client configuration
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Typed client for the gallery backend
pub struct BackendClient {
    config: BackendConfig,
    client: Client,
}

impl BackendClient {
    pub fn new(config: BackendConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    pub fn with_default_config() -> Self {
        Self::new(BackendConfig::default())
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// `GET /health`
    pub async fn health(&self) -> Result<HealthResponse, BackendError> {
        let url = format!("{}/health", self.config.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| BackendError::Unavailable(format!("Cannot connect to backend: {}", e)))?;

        if !response.status().is_success() {
            return Err(BackendError::RequestFailed(format!(
                "Health check returned {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))
    }

    /// `GET /photos?limit&offset` — server-side pagination
    pub async fn get_photos(&self, limit: i64, offset: i64) -> Result<PhotosResponse, BackendError> {
        let url = format!(
            "{}/photos?limit={}&offset={}",
            self.config.base_url, limit, offset
        );
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| BackendError::Unavailable(format!("Cannot connect to backend: {}", e)))?;

        if !response.status().is_success() {
            return Err(BackendError::RequestFailed(format!(
                "Photo listing returned {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))
    }

    /// `POST /upload_photos` — submit a staged batch in one request
    pub async fn upload_photos(
        &self,
        photos: Vec<UploadPhoto>,
    ) -> Result<UploadResponse, BackendError> {
        let url = format!("{}/upload_photos", self.config.base_url);
        let response = self
            .client
            .post(&url)
            .json(&UploadRequest { photos })
            .send()
            .await
            .map_err(|e| BackendError::Unavailable(format!("Cannot connect to backend: {}", e)))?;

        // The backend answers 400 with the same body shape when every photo
        // in the batch failed; surface the typed breakdown either way.
        let status = response.status();
        let body = response
            .json::<UploadResponse>()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()));
        match body {
            Ok(parsed) => Ok(parsed),
            Err(_) if !status.is_success() => Err(BackendError::RequestFailed(format!(
                "Upload returned {}",
                status
            ))),
            Err(e) => Err(e),
        }
    }

    /// `POST /search`, id-keyed contract: hits carry full photo payloads.
    pub async fn search_photos(&self, query: &str) -> Result<SearchResponse, BackendError> {
        let url = format!("{}/search", self.config.base_url);
        let response = self
            .client
            .post(&url)
            .json(&SearchRequest {
                query: query.to_string(),
            })
            .send()
            .await
            .map_err(|e| BackendError::Unavailable(format!("Cannot connect to backend: {}", e)))?;

        if !response.status().is_success() {
            return Err(BackendError::RequestFailed(format!(
                "Search returned {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))
    }

    /// `POST /search`, path-keyed contract used by the desktop listing.
    /// Callers degrade to a local filename match on any error here.
    pub async fn search_paths(&self, query: &str) -> Result<PathSearchResponse, BackendError> {
        let url = format!("{}/search", self.config.base_url);
        let response = self
            .client
            .post(&url)
            .json(&SearchRequest {
                query: query.to_string(),
            })
            .send()
            .await
            .map_err(|e| BackendError::Unavailable(format!("Cannot connect to backend: {}", e)))?;

        if !response.status().is_success() {
            return Err(BackendError::RequestFailed(format!(
                "Search returned {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))
    }

    /// `POST /delete_all_data {}` — count preview, never mutates
    pub async fn delete_all_preview(&self) -> Result<DeletePreviewResponse, BackendError> {
        let url = format!("{}/delete_all_data", self.config.base_url);
        let response = self
            .client
            .post(&url)
            .json(&DeleteAllRequest { confirmed: false })
            .send()
            .await
            .map_err(|e| BackendError::Unavailable(format!("Cannot connect to backend: {}", e)))?;

        if !response.status().is_success() {
            return Err(BackendError::RequestFailed(format!(
                "Delete preview returned {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))
    }

    /// `POST /delete_all_data {confirmed: true}` — the mutating phase.
    /// 207 Multi-Status marks a partial failure and still carries the
    /// per-store breakdown.
    pub async fn delete_all_confirm(&self) -> Result<DeleteResultResponse, BackendError> {
        let url = format!("{}/delete_all_data", self.config.base_url);
        let response = self
            .client
            .post(&url)
            .json(&DeleteAllRequest { confirmed: true })
            .send()
            .await
            .map_err(|e| BackendError::Unavailable(format!("Cannot connect to backend: {}", e)))?;

        // 207 Multi-Status (partial failure) is within the 2xx range and
        // still carries the breakdown body.
        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::RequestFailed(format!(
                "Delete returned {}",
                status
            )));
        }

        response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))
    }
}
