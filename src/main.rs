//! Content Guard CLI
//!
//! Evaluates the item security hook against a TOML content fixture.

use anyhow::Context;
use clap::{Args as ClapArgs, Parser, Subcommand};
use content_guard::{
    config::{AppConfig, LogFormat, LoggingConfig, load_config},
    directory::{create_directory, resolve_principal},
    hook::{HookSettings, ItemProvider, RequestContext, SecurityHook},
    host::MemoryHost,
    metrics::GuardMetrics,
    model::{ItemId, PageMode, SecurityCheck, TemplateId},
    templates::{DerivationCache, DerivationResolver},
};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Content Guard - item-level access control for content trees
#[derive(Parser, Debug)]
#[command(name = "content-guard")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "CONTENT_GUARD_CONFIG", global = true)]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error); overrides logging.level
    #[arg(long, env = "CONTENT_GUARD_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check whether a principal can see one item
    Check {
        /// TOML content fixture
        #[arg(long)]
        fixture: PathBuf,

        /// Item id (GUID, braces optional)
        #[arg(long)]
        item: ItemId,

        /// Principal id to resolve in the directory
        #[arg(long)]
        principal: String,

        #[command(flatten)]
        request: RequestArgs,
    },

    /// Check whether a template derives from another
    Derives {
        /// TOML content fixture
        #[arg(long)]
        fixture: PathBuf,

        #[arg(long)]
        template: TemplateId,

        #[arg(long)]
        ancestor: TemplateId,
    },

    /// List every fixture item as visible or hidden for a principal
    Audit {
        /// TOML content fixture
        #[arg(long)]
        fixture: PathBuf,

        /// Principal id to resolve in the directory
        #[arg(long)]
        principal: String,

        #[command(flatten)]
        request: RequestArgs,
    },
}

#[derive(ClapArgs, Debug)]
struct RequestArgs {
    /// Current site name (defaults to the protected site)
    #[arg(long)]
    site: Option<String>,

    /// Page mode (normal, preview, edit, debug)
    #[arg(long, default_value = "normal")]
    mode: PageMode,

    /// Read with security checks disabled
    #[arg(long)]
    no_security_check: bool,
}

impl RequestArgs {
    fn security_check(&self) -> SecurityCheck {
        if self.no_security_check {
            SecurityCheck::Disable
        } else {
            SecurityCheck::Enable
        }
    }
}

type HostProvider = ItemProvider<Arc<MemoryHost>, Arc<MemoryHost>, Arc<MemoryHost>>;

fn init_logging(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}

fn build_provider(
    config: &AppConfig,
    host: Arc<MemoryHost>,
    metrics: Arc<GuardMetrics>,
) -> anyhow::Result<HostProvider> {
    let settings = HookSettings::from_config(&config.guard)?;

    let resolver = match DerivationCache::from_config(&config.cache) {
        Some(cache) => DerivationResolver::with_cache(Arc::clone(&host), cache),
        None => DerivationResolver::new(Arc::clone(&host)),
    };

    let hook = SecurityHook::new(settings, resolver, Arc::clone(&host)).with_metrics(metrics);
    Ok(ItemProvider::new(host, hook))
}

fn load_host(path: &Path) -> anyhow::Result<Arc<MemoryHost>> {
    let host = MemoryHost::load(path)
        .with_context(|| format!("failed to load fixture {}", path.display()))?;
    Ok(Arc::new(host))
}

async fn run_check(
    config: &AppConfig,
    fixture: &Path,
    item_id: ItemId,
    principal_id: &str,
    request: &RequestArgs,
) -> anyhow::Result<serde_json::Value> {
    let host = load_host(fixture)?;
    let directory = create_directory(config, Some(host.directory()))?;
    let principal = resolve_principal(directory.as_ref(), principal_id).await;

    let metrics = Arc::new(GuardMetrics::new());
    let provider = build_provider(config, Arc::clone(&host), metrics)?;

    let capabilities = principal.capabilities(&*host);
    let site = request.site.as_deref().unwrap_or(&config.guard.protected_site);
    let context = RequestContext::new(capabilities.as_ref())
        .with_site(site)
        .with_page_mode(request.mode);
    let mode = request.security_check();

    let (outcome, lookup) = provider.get_item_with_outcome(&item_id, mode, &context);

    Ok(json!({
        "item": item_id.to_string(),
        "principal": principal_id,
        "principal_resolved": principal.is_resolved(),
        "visible": lookup.is_found(),
        "outcome": outcome,
    }))
}

async fn run_audit(
    config: &AppConfig,
    fixture: &Path,
    principal_id: &str,
    request: &RequestArgs,
) -> anyhow::Result<serde_json::Value> {
    let host = load_host(fixture)?;
    let directory = create_directory(config, Some(host.directory()))?;
    let principal = resolve_principal(directory.as_ref(), principal_id).await;

    let metrics = Arc::new(GuardMetrics::new());
    let provider = build_provider(config, Arc::clone(&host), Arc::clone(&metrics))?;

    let capabilities = principal.capabilities(&*host);
    let site = request.site.as_deref().unwrap_or(&config.guard.protected_site);
    let context = RequestContext::new(capabilities.as_ref())
        .with_site(site)
        .with_page_mode(request.mode);
    let mode = request.security_check();

    let items: Vec<_> = host
        .items()
        .into_iter()
        .map(|item| {
            let (outcome, lookup) = provider.get_item_with_outcome(&item.id, mode, &context);
            json!({
                "id": item.id.to_string(),
                "name": item.name,
                "visible": lookup.is_found(),
                "outcome": outcome,
            })
        })
        .collect();

    let cache = provider.hook().resolver().cache().map(|c| c.stats());

    Ok(json!({
        "principal": principal_id,
        "principal_resolved": principal.is_resolved(),
        "items": items,
        "metrics": metrics.snapshot(cache),
    }))
}

fn run_derives(
    fixture: &Path,
    template: TemplateId,
    ancestor: TemplateId,
) -> anyhow::Result<bool> {
    let host = load_host(fixture)?;
    let resolver = DerivationResolver::new(host);
    Ok(resolver.is_derived_from(template, ancestor))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration first so logging can honour logging.format
    let config = load_config(args.config.as_deref());
    let logging = config
        .as_ref()
        .map(|c| c.logging.clone())
        .unwrap_or_else(|_| LoggingConfig::default());
    init_logging(
        args.log_level.as_deref().unwrap_or(&logging.level),
        logging.format,
    );

    info!(version = env!("CARGO_PKG_VERSION"), "Starting content-guard");

    match &args.command {
        Command::Derives {
            fixture,
            template,
            ancestor,
        } => {
            let derived = run_derives(fixture, *template, *ancestor)
                .inspect_err(|e| error!(error = %e, "Derivation check failed"))?;
            println!("{}", derived);
        }
        Command::Check {
            fixture,
            item,
            principal,
            request,
        } => {
            let config =
                config.inspect_err(|e| error!(error = %e, "Failed to load configuration"))?;
            let report = run_check(&config, fixture, *item, principal, request)
                .await
                .inspect_err(|e| error!(error = %e, "Check failed"))?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Audit {
            fixture,
            principal,
            request,
        } => {
            let config =
                config.inspect_err(|e| error!(error = %e, "Failed to load configuration"))?;
            let report = run_audit(&config, fixture, principal, request)
                .await
                .inspect_err(|e| error!(error = %e, "Audit failed"))?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
