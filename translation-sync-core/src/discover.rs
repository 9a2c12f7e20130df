//! Discovery queries: shop locales and source-theme translatable resources.

use serde::Deserialize;
use serde_json::json;

use crate::contract::{ApiError, Transport};
use crate::model::{belongs_to_theme, ResourceType, ThemeId, TranslatableResource};

/// Page size for walking the `translatableResources` connection.
const DISCOVERY_PAGE_SIZE: u32 = 100;

const SHOP_LOCALES_QUERY: &str = "query { shopLocales { locale } }";

const LIST_RESOURCES_QUERY: &str = "\
query($first: Int!, $after: String, $resourceType: TranslatableResourceType!) {
  translatableResources(first: $first, after: $after, resourceType: $resourceType) {
    pageInfo { hasNextPage endCursor }
    edges { node { resourceId translatableContent { key digest } } }
  }
}";

#[derive(Deserialize)]
struct ShopLocalesData {
    #[serde(rename = "shopLocales")]
    shop_locales: Vec<ShopLocale>,
}

#[derive(Deserialize)]
struct ShopLocale {
    locale: String,
}

/// Locale codes configured on the shop, in shop order.
pub async fn shop_locales<T>(transport: &T) -> Result<Vec<String>, ApiError>
where
    T: Transport + ?Sized,
{
    let data = transport.execute(SHOP_LOCALES_QUERY, json!({})).await?;
    let decoded: ShopLocalesData = serde_json::from_value(data)?;
    Ok(decoded.shop_locales.into_iter().map(|l| l.locale).collect())
}

#[derive(Deserialize)]
struct ListResourcesData {
    #[serde(rename = "translatableResources")]
    translatable_resources: ResourceConnection,
}

#[derive(Deserialize)]
struct ResourceConnection {
    #[serde(rename = "pageInfo")]
    page_info: PageInfo,
    edges: Vec<ResourceEdge>,
}

#[derive(Deserialize)]
struct PageInfo {
    #[serde(rename = "hasNextPage")]
    has_next_page: bool,
    #[serde(rename = "endCursor")]
    end_cursor: Option<String>,
}

#[derive(Deserialize)]
struct ResourceEdge {
    node: TranslatableResource,
}

/// Every translatable resource of `resource_type` owned by `theme`.
///
/// Walks the paginated connection to exhaustion; each page is fully
/// consumed and filtered by theme ownership before the cursor advances.
/// Zero matches is a normal outcome, not an error.
pub async fn list_resources<T>(
    transport: &T,
    resource_type: ResourceType,
    theme: ThemeId,
) -> Result<Vec<TranslatableResource>, ApiError>
where
    T: Transport + ?Sized,
{
    let mut resources = Vec::new();
    let mut cursor: Option<String> = None;
    loop {
        let variables = json!({
            "first": DISCOVERY_PAGE_SIZE,
            "after": cursor,
            "resourceType": resource_type.as_api_str(),
        });
        let data = transport.execute(LIST_RESOURCES_QUERY, variables).await?;
        let decoded: ListResourcesData = serde_json::from_value(data)?;
        let connection = decoded.translatable_resources;
        for edge in connection.edges {
            if belongs_to_theme(&edge.node.resource_id, theme) {
                resources.push(edge.node);
            }
        }
        if connection.page_info.has_next_page {
            cursor = connection.page_info.end_cursor;
        } else {
            break;
        }
    }
    tracing::debug!(
        resource_type = %resource_type,
        theme = %theme,
        count = resources.len(),
        "Discovered source-theme resources"
    );
    Ok(resources)
}
