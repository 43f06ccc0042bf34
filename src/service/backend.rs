// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindcanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Backend REST client for the map/block API.
//!
//! Request discipline: every call carries the static identity header and a
//! client-side timeout. Timeouts retry immediately, transport failures retry
//! with exponential backoff, and HTTP error responses surface immediately
//! without a retry.

use std::time::Duration;

use log::{debug, warn};
use reqwest::Method;
use serde::de::DeserializeOwned;
use tokio::time::sleep;

use crate::config::AppConfig;

use super::error::ServiceError;
use super::types::{
    BackendMap, CreateBlockResponse, CreateMapResponse, ErrorBody, FinalizeBlockResponse,
    SendMessageResponse, UserMapsResponse,
};

enum AttemptFailure {
    Timeout,
    Network(String),
}

#[derive(Debug, Clone)]
pub struct BackendAi {
    http: reqwest::Client,
    base_url: String,
    user_id: String,
    timeout: Duration,
    retries: u32,
}

impl BackendAi {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.api_base_url.trim_end_matches('/').to_owned(),
            user_id: config.user_id.clone(),
            timeout: config.api_timeout,
            retries: config.api_retries,
        }
    }

    pub async fn create_map(&self, message: &str) -> Result<CreateMapResponse, ServiceError> {
        debug!("creating map ({} chars)", message.len());
        let body = serde_json::json!({ "message": message });
        self.execute(Method::POST, "/api/map/create", Some(body)).await
    }

    pub async fn get_user_maps(&self) -> Result<UserMapsResponse, ServiceError> {
        self.execute(Method::GET, "/api/user/maps", None).await
    }

    pub async fn get_map(&self, map_id: &str) -> Result<BackendMap, ServiceError> {
        debug!("loading map {map_id}");
        self.execute(Method::GET, &format!("/api/map/{map_id}"), None)
            .await
    }

    pub async fn create_block(
        &self,
        map_id: &str,
        message: &str,
        parent_block_id: Option<&str>,
        highlighted_text: Option<&str>,
    ) -> Result<CreateBlockResponse, ServiceError> {
        debug!("creating block in map {map_id} (parent: {parent_block_id:?})");
        let mut body = serde_json::json!({ "mapId": map_id, "message": message });
        if let Some(parent_block_id) = parent_block_id {
            body["parentBlockId"] = serde_json::Value::String(parent_block_id.to_owned());
        }
        if let Some(highlighted_text) = highlighted_text {
            body["highlightedText"] = serde_json::Value::String(highlighted_text.to_owned());
        }
        self.execute(Method::POST, "/api/block/create", Some(body)).await
    }

    pub async fn send_message(
        &self,
        block_id: &str,
        message: &str,
    ) -> Result<String, ServiceError> {
        debug!("sending message to block {block_id}");
        let body = serde_json::json!({ "message": message });
        let response: SendMessageResponse = self
            .execute(
                Method::POST,
                &format!("/api/block/{block_id}/message"),
                Some(body),
            )
            .await?;
        Ok(response.response)
    }

    pub async fn finalize_block(
        &self,
        block_id: &str,
    ) -> Result<FinalizeBlockResponse, ServiceError> {
        debug!("finalizing block {block_id}");
        self.execute(
            Method::POST,
            &format!("/api/block/{block_id}/finalize"),
            None,
        )
        .await
    }

    /// Lightweight availability probe: the user-maps read mapped to a bool.
    pub async fn health_check(&self) -> bool {
        match self.get_user_maps().await {
            Ok(_) => true,
            Err(err) => {
                warn!("backend health check failed: {err}");
                false
            }
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<T, ServiceError> {
        let url = format!("{}{path}", self.base_url);
        let mut attempt: u32 = 0;

        loop {
            let mut request = self
                .http
                .request(method.clone(), &url)
                .header("Authorization", self.user_id.as_str())
                .header("Content-Type", "application/json")
                .timeout(self.timeout);
            if let Some(body) = &body {
                request = request.json(body);
            }

            let failure = match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    if !status.is_success() {
                        // Application-level errors are final; retrying them
                        // would repeat a rejected request verbatim.
                        let detail = read_error_detail(response).await;
                        return Err(ServiceError::Api {
                            status: status.as_u16(),
                            detail,
                        });
                    }
                    match response.json::<T>().await {
                        Ok(value) => return Ok(value),
                        Err(err) => AttemptFailure::Network(format!(
                            "could not decode response from {path}: {err}"
                        )),
                    }
                }
                Err(err) if err.is_timeout() => AttemptFailure::Timeout,
                Err(err) => AttemptFailure::Network(format!("request to {path} failed: {err}")),
            };

            if attempt >= self.retries {
                return Err(match failure {
                    AttemptFailure::Timeout => ServiceError::Timeout { limit: self.timeout },
                    AttemptFailure::Network(message) => ServiceError::Network { message },
                });
            }

            match &failure {
                AttemptFailure::Timeout => {
                    warn!(
                        "request to {path} timed out, retrying ({}/{})",
                        attempt + 1,
                        self.retries
                    );
                }
                AttemptFailure::Network(message) => {
                    // Shift capped so absurd retry counts cannot overflow.
                    let delay = Duration::from_secs(1u64 << attempt.min(16));
                    warn!(
                        "{message}; retrying in {}s ({}/{})",
                        delay.as_secs(),
                        attempt + 1,
                        self.retries
                    );
                    sleep(delay).await;
                }
            }
            attempt += 1;
        }
    }
}

async fn read_error_detail(response: reqwest::Response) -> String {
    let status = response.status();
    let fallback = format!(
        "HTTP {} {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("error")
    );
    let Ok(text) = response.text().await else {
        return fallback;
    };
    match serde_json::from_str::<ErrorBody>(&text) {
        Ok(ErrorBody { detail: Some(detail) }) => detail,
        _ => fallback,
    }
}
