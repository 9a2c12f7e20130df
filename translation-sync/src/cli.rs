//! Command-line surface for translation-sync.
//!
//! This module is strictly CLI glue: argument parsing, credential
//! resolution, and rendering of the final run report. All sync logic lives
//! in the `translation-sync-core` crate; [`run`] is the async entrypoint
//! shared by `main` and the integration tests.

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::warn;

use translation_sync_core::client::AdminClient;
use translation_sync_core::model::ThemeId;
use translation_sync_core::synchronise::{synchronise, SyncOptions, SyncReport};

/// Environment variable consulted when `--token` is not given.
pub const TOKEN_ENV_VAR: &str = "SHOPIFY_ADMIN_TOKEN";

/// Copy theme translations between two themes of one shop.
#[derive(Parser, Debug)]
#[clap(
    name = "translation-sync",
    version,
    about = "Copy theme-scoped translations from a source theme to a destination theme"
)]
pub struct Cli {
    /// Shop domain, e.g. my-shop.myshopify.com
    #[clap(long)]
    pub shop: String,

    /// Numeric id of the theme to copy translations from
    #[clap(long)]
    pub source_theme_id: u64,

    /// Numeric id of the theme to copy translations to
    #[clap(long)]
    pub dest_theme_id: u64,

    /// Admin API access token; defaults to $SHOPIFY_ADMIN_TOKEN
    #[clap(long)]
    pub token: Option<String>,

    /// Comma-separated locales to copy (default: every shop locale)
    #[clap(long)]
    pub locales: Option<String>,

    /// Simulate without writing
    #[clap(long)]
    pub dry_run: bool,

    /// One line per resource (counts)
    #[clap(long)]
    pub verbose: bool,

    /// List every key/value copied (implies --verbose)
    #[clap(long)]
    pub show_keys: bool,

    /// Live and summary timing per locale
    #[clap(long)]
    pub timing: bool,
}

/// Resolves the Admin API token from the flag, falling back to the
/// environment. Fails before any network call when neither is set.
pub fn resolve_token(flag: Option<String>) -> Result<String> {
    match flag.or_else(|| std::env::var(TOKEN_ENV_VAR).ok()) {
        Some(token) if !token.is_empty() => Ok(token),
        _ => bail!("No Admin API token provided; pass --token or set {TOKEN_ENV_VAR}"),
    }
}

fn parse_locales(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    let token = resolve_token(cli.token.clone())?;
    if cli.source_theme_id == cli.dest_theme_id {
        bail!("--source-theme-id and --dest-theme-id must differ");
    }

    let options = SyncOptions {
        source_theme: ThemeId(cli.source_theme_id),
        dest_theme: ThemeId(cli.dest_theme_id),
        locales: cli.locales.as_deref().map(parse_locales),
        dry_run: cli.dry_run,
        verbose: cli.verbose || cli.show_keys,
        show_keys: cli.show_keys,
        timing: cli.timing,
    };

    tracing::info!(
        shop = %cli.shop,
        source_theme_id = cli.source_theme_id,
        dest_theme_id = cli.dest_theme_id,
        dry_run = cli.dry_run,
        "Starting translation sync run"
    );
    let client = AdminClient::new(&cli.shop, token);
    let report = synchronise(&client, &options)
        .await
        .context("translation sync failed")?;
    render_report(&report, cli.timing);
    Ok(())
}

fn render_report(report: &SyncReport, timing: bool) {
    for (resource_id, error) in &report.user_errors {
        warn!(
            resource_id = %resource_id,
            field = ?error.field,
            message = %error.message,
            "Translation rejected by the API"
        );
    }
    if timing {
        println!("\nTiming per locale:");
        for (locale, spent) in &report.locale_times {
            println!("  {locale}: {:.2}s", spent.as_secs_f64());
        }
    }
    println!("\n✓ Done");
}
