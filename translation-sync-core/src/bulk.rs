//! Batched translation reads and writes.
//!
//! Both directions respect server-imposed caps: reads go through
//! `translatableResourcesByIds` at up to [`MAX_IDS_PER_QUERY`] ids per
//! round trip, writes through `translationsRegister` at up to
//! [`MAX_TRANSLATIONS_PER_MUTATION`] inputs per round trip. Batches are
//! slices of the caller's ordering, so nothing is dropped or reordered.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::json;

use crate::contract::{ApiError, Transport};
use crate::model::{Translation, TranslationInput, UserError};

/// Per-query id cap on `translatableResourcesByIds`. Exceeding it is a
/// hard API failure, not recoverable locally.
pub const MAX_IDS_PER_QUERY: usize = 250;

/// Per-mutation input cap on `translationsRegister`; smaller than the read
/// cap because mutation cost is higher per item.
pub const MAX_TRANSLATIONS_PER_MUTATION: usize = 100;

const FETCH_QUERY: &str = "\
query($ids: [ID!]!, $locale: String!, $first: Int!) {
  translatableResourcesByIds(resourceIds: $ids, first: $first) {
    edges { node { resourceId translations(locale: $locale) { key value } } }
  }
}";

const REGISTER_MUTATION: &str = "\
mutation($resourceId: ID!, $translations: [TranslationInput!]!) {
  translationsRegister(resourceId: $resourceId, translations: $translations) {
    userErrors { field message }
  }
}";

#[derive(Deserialize)]
struct FetchData {
    #[serde(rename = "translatableResourcesByIds")]
    by_ids: FetchConnection,
}

#[derive(Deserialize)]
struct FetchConnection {
    edges: Vec<FetchEdge>,
}

#[derive(Deserialize)]
struct FetchEdge {
    node: FetchNode,
}

#[derive(Deserialize)]
struct FetchNode {
    #[serde(rename = "resourceId")]
    resource_id: String,
    translations: Vec<Translation>,
}

/// Current translations in `locale` for every id, one round trip per
/// batch of [`MAX_IDS_PER_QUERY`]. The returned key set is exactly the
/// ids present in the remote responses.
pub async fn fetch_translations<T>(
    transport: &T,
    ids: &[String],
    locale: &str,
) -> Result<HashMap<String, Vec<Translation>>, ApiError>
where
    T: Transport + ?Sized,
{
    let mut translations = HashMap::new();
    for batch in ids.chunks(MAX_IDS_PER_QUERY) {
        let variables = json!({ "ids": batch, "locale": locale, "first": batch.len() });
        let data = transport.execute(FETCH_QUERY, variables).await?;
        let decoded: FetchData = serde_json::from_value(data)?;
        for edge in decoded.by_ids.edges {
            translations.insert(edge.node.resource_id, edge.node.translations);
        }
    }
    Ok(translations)
}

#[derive(Deserialize)]
struct RegisterData {
    #[serde(rename = "translationsRegister")]
    register: RegisterPayload,
}

#[derive(Deserialize)]
struct RegisterPayload {
    #[serde(rename = "userErrors")]
    user_errors: Vec<UserError>,
}

/// Writes `inputs` against one destination resource, one mutation per
/// batch of [`MAX_TRANSLATIONS_PER_MUTATION`].
///
/// No-op with an empty result when the input list is empty or the run is
/// a dry run: zero network calls in either case. Field-level rejections
/// are accumulated and returned, never raised, so partial success within
/// one resource's key set is visible to the caller.
pub async fn register_translations<T>(
    transport: &T,
    resource_id: &str,
    inputs: &[TranslationInput],
    dry_run: bool,
) -> Result<Vec<UserError>, ApiError>
where
    T: Transport + ?Sized,
{
    if dry_run || inputs.is_empty() {
        return Ok(Vec::new());
    }
    let mut user_errors = Vec::new();
    for batch in inputs.chunks(MAX_TRANSLATIONS_PER_MUTATION) {
        let variables = json!({ "resourceId": resource_id, "translations": batch });
        let data = transport.execute(REGISTER_MUTATION, variables).await?;
        let decoded: RegisterData = serde_json::from_value(data)?;
        user_errors.extend(decoded.register.user_errors);
    }
    if !user_errors.is_empty() {
        tracing::warn!(
            resource_id,
            count = user_errors.len(),
            "Register mutation reported user errors"
        );
    }
    Ok(user_errors)
}
