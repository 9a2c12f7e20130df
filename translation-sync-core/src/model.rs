//! Domain model for theme translation copying.
//!
//! Everything here is plain data or pure functions: resource/type naming,
//! theme ownership of resource gids, digest lookup construction, and the
//! pairing rule that turns fetched translations into write payloads. No
//! networking happens in this module, which keeps the rules unit-testable.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Numeric id of a theme, as embedded in resource gids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeId(pub u64);

impl fmt::Display for ThemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The closed set of translatable resource types a run copies, in the
/// fixed order they are processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceType {
    Theme,
    SectionGroup,
    JsonTemplate,
    SettingsDataSections,
    LocaleContent,
}

impl ResourceType {
    pub const ALL: [ResourceType; 5] = [
        ResourceType::Theme,
        ResourceType::SectionGroup,
        ResourceType::JsonTemplate,
        ResourceType::SettingsDataSections,
        ResourceType::LocaleContent,
    ];

    /// Variant name in the Admin API's `TranslatableResourceType` enum.
    pub fn as_api_str(self) -> &'static str {
        match self {
            ResourceType::Theme => "ONLINE_STORE_THEME",
            ResourceType::SectionGroup => "ONLINE_STORE_THEME_SECTION_GROUP",
            ResourceType::JsonTemplate => "ONLINE_STORE_THEME_JSON_TEMPLATE",
            ResourceType::SettingsDataSections => "ONLINE_STORE_THEME_SETTINGS_DATA_SECTIONS",
            ResourceType::LocaleContent => "ONLINE_STORE_THEME_LOCALE_CONTENT",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_api_str())
    }
}

/// One translatable resource as returned by discovery.
#[derive(Debug, Clone, Deserialize)]
pub struct TranslatableResource {
    #[serde(rename = "resourceId")]
    pub resource_id: String,
    #[serde(rename = "translatableContent")]
    pub content: Vec<TranslatableContent>,
}

/// A translatable key and its content-version digest. The digest may be
/// absent, in which case the key can never be written.
#[derive(Debug, Clone, Deserialize)]
pub struct TranslatableContent {
    pub key: String,
    pub digest: Option<String>,
}

/// A translation currently registered on a resource for one locale; the
/// locale is carried by the enclosing fetch. A null value means "not
/// translated".
#[derive(Debug, Clone, Deserialize)]
pub struct Translation {
    pub key: String,
    pub value: Option<String>,
}

/// Write payload for `translationsRegister`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationInput {
    pub key: String,
    pub locale: String,
    pub value: String,
    pub translatable_content_digest: String,
}

/// Field-level rejection of a single write; non-fatal, surfaced in the
/// run report rather than raised.
#[derive(Debug, Clone, Deserialize)]
pub struct UserError {
    pub field: Option<Vec<String>>,
    pub message: String,
}

/// Digest lookup for one resource type: resource id → key → digest.
pub type DigestMap = HashMap<String, HashMap<String, String>>;

/// Builds the digest lookup from discovery output. Keys whose digest came
/// back null are omitted, so a lookup hit always yields a writable digest.
pub fn build_digest_map(resources: &[TranslatableResource]) -> DigestMap {
    resources
        .iter()
        .map(|resource| {
            let digests = resource
                .content
                .iter()
                .filter_map(|c| c.digest.clone().map(|d| (c.key.clone(), d)))
                .collect();
            (resource.resource_id.clone(), digests)
        })
        .collect()
}

/// Pairs fetched translations with their digests into write payloads.
/// A key is skipped when no digest was recorded for it or its value is
/// null; neither case is an error.
pub fn build_inputs(
    translations: &[Translation],
    digests: &HashMap<String, String>,
    locale: &str,
) -> Vec<TranslationInput> {
    translations
        .iter()
        .filter_map(|t| {
            let digest = digests.get(&t.key)?;
            let value = t.value.as_ref()?;
            Some(TranslationInput {
                key: t.key.clone(),
                locale: locale.to_string(),
                value: value.clone(),
                translatable_content_digest: digest.clone(),
            })
        })
        .collect()
}

/// Byte range of the first path segment equal to the theme id. Segments
/// end at `/`, `?` or end of string, so theme 10 never matches inside
/// theme 100.
fn theme_segment_range(resource_id: &str, theme: ThemeId) -> Option<(usize, usize)> {
    let needle = theme.0.to_string();
    let mut segment_start = 0;
    for (idx, ch) in resource_id
        .char_indices()
        .chain(std::iter::once((resource_id.len(), '/')))
    {
        if ch == '/' || ch == '?' {
            if resource_id[segment_start..idx] == needle {
                return Some((segment_start, idx));
            }
            segment_start = idx + ch.len_utf8();
        }
    }
    None
}

/// Whether the resource gid embeds `theme` as a path segment.
pub fn belongs_to_theme(resource_id: &str, theme: ThemeId) -> bool {
    theme_segment_range(resource_id, theme).is_some()
}

/// Derives the destination gid by swapping the first `source` path segment
/// for `dest`. Returns `None` when the gid has no such segment or the swap
/// would leave the id unchanged; writing to the returned id can therefore
/// never touch the source theme's own content.
pub fn remap_theme_id(resource_id: &str, source: ThemeId, dest: ThemeId) -> Option<String> {
    let (start, end) = theme_segment_range(resource_id, source)?;
    let mut remapped = String::with_capacity(resource_id.len());
    remapped.push_str(&resource_id[..start]);
    remapped.push_str(&dest.0.to_string());
    remapped.push_str(&resource_id[end..]);
    (remapped != resource_id).then_some(remapped)
}

/// Trailing path segment of a gid, for compact console output.
pub fn short_gid(resource_id: &str) -> &str {
    resource_id.rsplit('/').next().unwrap_or(resource_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digests(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, d)| (k.to_string(), d.to_string()))
            .collect()
    }

    #[test]
    fn remap_swaps_exactly_the_theme_segment() {
        let id = "gid://shopify/OnlineStoreThemeSectionGroup/100";
        let remapped = remap_theme_id(id, ThemeId(100), ThemeId(200));
        assert_eq!(
            remapped.as_deref(),
            Some("gid://shopify/OnlineStoreThemeSectionGroup/200")
        );
    }

    #[test]
    fn remap_preserves_trailing_segments() {
        let id = "gid://shopify/OnlineStoreThemeJsonTemplate/100/templates/index";
        let remapped = remap_theme_id(id, ThemeId(100), ThemeId(200));
        assert_eq!(
            remapped.as_deref(),
            Some("gid://shopify/OnlineStoreThemeJsonTemplate/200/templates/index")
        );
    }

    #[test]
    fn remap_returns_none_without_a_matching_segment() {
        let id = "gid://shopify/OnlineStoreTheme/999";
        assert_eq!(remap_theme_id(id, ThemeId(100), ThemeId(200)), None);
    }

    #[test]
    fn remap_to_the_same_theme_is_rejected() {
        let id = "gid://shopify/OnlineStoreTheme/100";
        assert_eq!(remap_theme_id(id, ThemeId(100), ThemeId(100)), None);
    }

    #[test]
    fn theme_matching_is_whole_segment_only() {
        let id = "gid://shopify/OnlineStoreTheme/100";
        assert!(belongs_to_theme(id, ThemeId(100)));
        assert!(!belongs_to_theme(id, ThemeId(10)));
        assert!(!belongs_to_theme(id, ThemeId(0)));
    }

    #[test]
    fn theme_matching_stops_at_query_strings() {
        let id = "gid://shopify/OnlineStoreThemeJsonTemplate/100?name=index";
        assert!(belongs_to_theme(id, ThemeId(100)));
        assert_eq!(
            remap_theme_id(id, ThemeId(100), ThemeId(200)).as_deref(),
            Some("gid://shopify/OnlineStoreThemeJsonTemplate/200?name=index")
        );
    }

    #[test]
    fn inputs_pair_value_with_digest() {
        let translations = vec![Translation {
            key: "title".into(),
            value: Some("Hello".into()),
        }];
        let inputs = build_inputs(&translations, &digests(&[("title", "abc123")]), "fr");
        assert_eq!(
            inputs,
            vec![TranslationInput {
                key: "title".into(),
                locale: "fr".into(),
                value: "Hello".into(),
                translatable_content_digest: "abc123".into(),
            }]
        );
    }

    #[test]
    fn inputs_skip_keys_without_a_digest() {
        let translations = vec![Translation {
            key: "title".into(),
            value: Some("Hello".into()),
        }];
        let inputs = build_inputs(&translations, &digests(&[("subtitle", "zzz")]), "fr");
        assert!(inputs.is_empty());
    }

    #[test]
    fn inputs_skip_null_values() {
        let translations = vec![Translation {
            key: "title".into(),
            value: None,
        }];
        let inputs = build_inputs(&translations, &digests(&[("title", "abc123")]), "fr");
        assert!(inputs.is_empty());
    }

    #[test]
    fn digest_map_drops_null_digests() {
        let resources = vec![TranslatableResource {
            resource_id: "gid://shopify/OnlineStoreTheme/100".into(),
            content: vec![
                TranslatableContent {
                    key: "title".into(),
                    digest: Some("abc123".into()),
                },
                TranslatableContent {
                    key: "body".into(),
                    digest: None,
                },
            ],
        }];
        let map = build_digest_map(&resources);
        let keys = &map["gid://shopify/OnlineStoreTheme/100"];
        assert_eq!(keys.get("title").map(String::as_str), Some("abc123"));
        assert!(!keys.contains_key("body"));
    }

    #[test]
    fn short_gid_is_the_last_segment() {
        assert_eq!(short_gid("gid://shopify/OnlineStoreTheme/100"), "100");
        assert_eq!(short_gid("no-slashes"), "no-slashes");
    }
}
