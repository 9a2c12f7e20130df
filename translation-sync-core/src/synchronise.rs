//! High-level pipeline: discover → fetch → remap → register, per resource
//! type and locale.
//!
//! This module drives the whole copy run. For each resource type in the
//! fixed declared order it discovers the source theme's resources, builds
//! the digest lookup once, then for each locale bulk-fetches every
//! resource's translations and registers the assembled inputs against the
//! remapped destination id.
//!
//! # Major types
//! - [`SyncOptions`]: everything the caller resolved up front (themes,
//!   locales, output flags)
//! - [`SyncReport`]: what the run did (resolved locales, per-locale wall
//!   time, processed count, and every field-level rejection)
//!
//! # Responsibilities
//! - One bulk-fetch call sequence per resource type × locale pair, never
//!   per resource
//! - Fail-fast: the first transport or application error aborts the run;
//!   data already written stays written
//! - All timing state lives in the returned report, not in globals, so the
//!   pipeline is testable without capturing console output
//!
//! User-facing progress goes to stdout; diagnostics go through `tracing`.

use std::collections::HashMap;
use std::io::Write as _;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::bulk::{fetch_translations, register_translations};
use crate::contract::{ApiError, Transport};
use crate::discover::{list_resources, shop_locales};
use crate::model::{
    build_digest_map, build_inputs, remap_theme_id, short_gid, ResourceType, ThemeId, UserError,
};

/// Resources between transient progress updates on timing runs.
const PROGRESS_EVERY: usize = 10;

/// Options for one run, resolved by the caller (CLI flags or tests).
#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub source_theme: ThemeId,
    pub dest_theme: ThemeId,
    /// Explicit locale list; `None` means every locale configured on the
    /// shop, in shop order.
    pub locales: Option<Vec<String>>,
    pub dry_run: bool,
    pub verbose: bool,
    pub show_keys: bool,
    pub timing: bool,
}

/// Outcome of a run, returned rather than printed so callers decide how
/// to render it.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// The locales the run operated on, in run order.
    pub locales: Vec<String>,
    /// Wall time spent per locale, accumulated across all resource types.
    pub locale_times: Vec<(String, Duration)>,
    pub resources_processed: usize,
    /// Field-level rejections, tagged with the destination resource id.
    pub user_errors: Vec<(String, UserError)>,
}

/// Copies every source-theme translation to the destination theme.
///
/// Processing order: resource types in declared order, locales in run
/// order, resources in remote response order (not stable across runs).
pub async fn synchronise<T>(transport: &T, options: &SyncOptions) -> Result<SyncReport, ApiError>
where
    T: Transport + ?Sized,
{
    let locales = match &options.locales {
        Some(list) => list.clone(),
        None => shop_locales(transport).await?,
    };
    println!("Locales: {}", locales.join(", "));
    info!(?locales, dry_run = options.dry_run, "Starting translation sync");

    let mut report = SyncReport {
        locales: locales.clone(),
        ..SyncReport::default()
    };
    let mut locale_times = vec![Duration::ZERO; locales.len()];
    let no_digests: HashMap<String, String> = HashMap::new();

    for resource_type in ResourceType::ALL {
        println!("\n▶ {resource_type} …");
        let resources = list_resources(transport, resource_type, options.source_theme).await?;
        if resources.is_empty() {
            println!("  (none)");
            continue;
        }

        let digest_map = build_digest_map(&resources);
        let ids: Vec<String> = resources.iter().map(|r| r.resource_id.clone()).collect();

        for (locale_index, locale) in locales.iter().enumerate() {
            let start = Instant::now();
            println!("  • {locale}");

            let translations_by_id = fetch_translations(transport, &ids, locale).await?;
            let total = translations_by_id.len();
            let mut processed = 0;

            for (source_id, translations) in &translations_by_id {
                let Some(dest_id) =
                    remap_theme_id(source_id, options.source_theme, options.dest_theme)
                else {
                    warn!(
                        resource_id = %source_id,
                        "No destination id distinct from the source; skipping"
                    );
                    continue;
                };

                let digests = digest_map.get(source_id).unwrap_or(&no_digests);
                let inputs = build_inputs(translations, digests, locale);

                if options.show_keys && !inputs.is_empty() {
                    for input in &inputs {
                        let preview: String = input.value.chars().take(60).collect();
                        println!("     · {} || {}: {preview:?}", short_gid(&dest_id), input.key);
                    }
                } else if options.verbose {
                    let marker = if options.dry_run { " [DRY]" } else { "" };
                    println!("     ↳ {} ({} keys){marker}", short_gid(&dest_id), inputs.len());
                }

                let rejected =
                    register_translations(transport, &dest_id, &inputs, options.dry_run).await?;
                report
                    .user_errors
                    .extend(rejected.into_iter().map(|e| (dest_id.clone(), e)));

                processed += 1;
                report.resources_processed += 1;
                if options.timing && !options.verbose && processed % PROGRESS_EVERY == 0 {
                    let elapsed = start.elapsed().as_secs_f64();
                    print!("     … {processed}/{total} resources processed ({elapsed:.1}s elapsed)\r");
                    let _ = std::io::stdout().flush();
                }
            }

            if options.timing && !options.verbose {
                print!("{}\r", " ".repeat(80));
                let _ = std::io::stdout().flush();
            }
            locale_times[locale_index] += start.elapsed();
        }
    }

    report.locale_times = locales.into_iter().zip(locale_times).collect();
    info!(
        resources = report.resources_processed,
        user_errors = report.user_errors.len(),
        "Translation sync complete"
    );
    Ok(report)
}
