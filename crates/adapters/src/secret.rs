// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Password retrieval from the hosted secret store.

use async_trait::async_trait;
use base64::Engine;
use serde::Deserialize;

use crate::error::AdapterError;

/// Fetches one secret value by fully-specified reference.
#[async_trait]
pub trait SecretResolver: Send + Sync {
    async fn access(&self, project_id: &str, secret_name: &str) -> Result<String, AdapterError>;
}

/// REST client for the secret store's `versions/latest:access` endpoint.
pub struct RestSecretResolver {
    client: reqwest::Client,
    base_url: String,
    bearer_token: Option<String>,
}

#[derive(Deserialize)]
struct AccessResponse {
    payload: AccessPayload,
}

#[derive(Deserialize)]
struct AccessPayload {
    data: String,
}

impl RestSecretResolver {
    pub fn new(base_url: String, bearer_token: Option<String>) -> Self {
        Self { client: reqwest::Client::new(), base_url, bearer_token }
    }
}

#[async_trait]
impl SecretResolver for RestSecretResolver {
    async fn access(&self, project_id: &str, secret_name: &str) -> Result<String, AdapterError> {
        let url = format!(
            "{}/v1/projects/{project_id}/secrets/{secret_name}/versions/latest:access",
            self.base_url.trim_end_matches('/')
        );

        let mut request = self.client.get(&url);
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let secret_err = |reason: String| AdapterError::Secret {
            project_id: project_id.to_string(),
            secret_name: secret_name.to_string(),
            reason,
        };

        let response = request.send().await.map_err(|e| secret_err(e.to_string()))?;
        if !response.status().is_success() {
            return Err(secret_err(format!("status {}", response.status().as_u16())));
        }

        let body: AccessResponse =
            response.json().await.map_err(|e| secret_err(e.to_string()))?;

        // Payload data arrives base64-encoded
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(body.payload.data.as_bytes())
            .map_err(|e| secret_err(format!("payload is not base64: {e}")))?;
        String::from_utf8(bytes).map_err(|e| secret_err(format!("payload is not utf-8: {e}")))
    }
}

/// Canned secrets for tests.
#[cfg(any(test, feature = "test-support"))]
pub struct FakeSecretResolver {
    secrets: parking_lot::Mutex<std::collections::HashMap<(String, String), String>>,
    pub accesses: parking_lot::Mutex<Vec<(String, String)>>,
}

#[cfg(any(test, feature = "test-support"))]
impl FakeSecretResolver {
    pub fn new() -> std::sync::Arc<Self> {
        std::sync::Arc::new(Self {
            secrets: parking_lot::Mutex::new(std::collections::HashMap::new()),
            accesses: parking_lot::Mutex::new(Vec::new()),
        })
    }

    pub fn store(&self, project_id: &str, secret_name: &str, value: &str) {
        self.secrets
            .lock()
            .insert((project_id.to_string(), secret_name.to_string()), value.to_string());
    }
}

#[cfg(any(test, feature = "test-support"))]
#[async_trait]
impl SecretResolver for FakeSecretResolver {
    async fn access(&self, project_id: &str, secret_name: &str) -> Result<String, AdapterError> {
        self.accesses.lock().push((project_id.to_string(), secret_name.to_string()));
        self.secrets
            .lock()
            .get(&(project_id.to_string(), secret_name.to_string()))
            .cloned()
            .ok_or_else(|| AdapterError::Secret {
                project_id: project_id.to_string(),
                secret_name: secret_name.to_string(),
                reason: "not found".to_string(),
            })
    }
}

#[cfg(test)]
#[path = "secret_tests.rs"]
mod tests;
