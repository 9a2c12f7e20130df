//! Transport seam between the sync engine and the remote Admin API.
//!
//! The engine only ever needs one operation: execute a GraphQL query or
//! mutation and get the decoded `data` object back. Everything above this
//! trait (discovery, bulk fetch, register, orchestration) is written against
//! it, so the whole pipeline runs under test with a mocked transport and no
//! network.
//!
//! The trait is annotated for `mockall`; `MockTransport` is available to
//! dependents through the `test-export-mocks` feature.

use async_trait::async_trait;

/// Fatal failures of a remote call. Field-level mutation rejections are not
/// errors; see [`crate::model::UserError`].
#[derive(Debug)]
pub enum ApiError {
    /// The request itself failed or the endpoint returned a non-success
    /// status.
    Transport(reqwest::Error),
    /// The response body reported GraphQL-level errors.
    Application(Vec<serde_json::Value>),
    /// The response body did not match the expected shape.
    Decode(serde_json::Error),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Transport(e) => write!(f, "transport error: {e}"),
            ApiError::Application(errors) => {
                let rendered = serde_json::to_string_pretty(errors)
                    .unwrap_or_else(|_| format!("{errors:?}"));
                write!(f, "Admin API returned errors: {rendered}")
            }
            ApiError::Decode(e) => write!(f, "unexpected response shape: {e}"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Transport(e) => Some(e),
            ApiError::Application(_) => None,
            ApiError::Decode(e) => Some(e),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Transport(e)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e)
    }
}

/// Executes a single GraphQL operation against the Admin API.
///
/// Implementors must surface non-success responses as
/// [`ApiError::Transport`] and a non-empty top-level `errors` array as
/// [`ApiError::Application`]; on success they return the `data` object.
#[cfg_attr(any(test, feature = "test-export-mocks"), mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(
        &self,
        query: &'static str,
        variables: serde_json::Value,
    ) -> Result<serde_json::Value, ApiError>;
}
