//! reqwest-backed [`Transport`] for the versioned Admin GraphQL endpoint.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::contract::{ApiError, Transport};

/// Admin API version the endpoint path is pinned to.
pub const API_VERSION: &str = "2025-04";

/// Authenticated client for one shop's Admin GraphQL endpoint.
pub struct AdminClient {
    http: reqwest::Client,
    endpoint: String,
    token: String,
}

impl AdminClient {
    pub fn new(shop: &str, token: impl Into<String>) -> Self {
        AdminClient {
            http: reqwest::Client::new(),
            endpoint: format!("https://{shop}/admin/api/{API_VERSION}/graphql.json"),
            token: token.into(),
        }
    }
}

#[async_trait]
impl Transport for AdminClient {
    async fn execute(
        &self,
        query: &'static str,
        variables: Value,
    ) -> Result<Value, ApiError> {
        tracing::debug!(endpoint = %self.endpoint, "Executing GraphQL operation");
        let response = self
            .http
            .post(&self.endpoint)
            .header("X-Shopify-Access-Token", &self.token)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?
            .error_for_status()?;

        let mut body: Value = response.json().await?;
        if let Some(errors) = body.get("errors").and_then(Value::as_array) {
            if !errors.is_empty() {
                tracing::error!(count = errors.len(), "Admin API reported errors");
                return Err(ApiError::Application(errors.clone()));
            }
        }
        Ok(body.get_mut("data").map(Value::take).unwrap_or(Value::Null))
    }
}
