//! Fixture loading and end-to-end evaluation tests

use content_guard::config::load_config_from_str;
use content_guard::directory::{DirectoryProvider, create_directory, resolve_principal};
use content_guard::error::FixtureError;
use content_guard::hook::{HookSettings, ItemProvider, RequestContext, SecurityHook};
use content_guard::host::MemoryHost;
use content_guard::metrics::GuardMetrics;
use content_guard::model::{ItemId, SecurityCheck};
use content_guard::templates::{DerivationCache, DerivationResolver};
use std::fs;
use std::sync::Arc;
use tempfile::tempdir;

const CONFIG: &str = r#"
[guard]
protected_site = "website"
protected_template = "{5C8B2F7E-1D3A-4B6C-9E0F-2A4D6B8C0E1F}"

[cache]
ttl_secs = 60
"#;

const FIXTURE: &str = r#"
[[templates]]
id = "{5C8B2F7E-1D3A-4B6C-9E0F-2A4D6B8C0E1F}"
name = "Secured Base"

[[templates]]
id = "{0F7A4C2E-8B1D-4E6F-A3C5-7D9E1B2F4A60}"
name = "Article"
base_templates = ["{5C8B2F7E-1D3A-4B6C-9E0F-2A4D6B8C0E1F}"]

[[items]]
id = "{3E5A7C9B-2D4F-4A6C-8E0B-1C3D5F7A9B2D}"
name = "Q3 payroll"
template = "{0F7A4C2E-8B1D-4E6F-A3C5-7D9E1B2F4A60}"
scope = "/org/emea"
departments = ["finance"]
required_roles = ["payroll-reader"]

[[items]]
id = "{8E0A2C4F-6B8D-4A1C-9E3F-5A7C9E1B3D50}"
name = "Team page"
template = "{0F7A4C2E-8B1D-4E6F-A3C5-7D9E1B2F4A60}"
scope = "/org"

[[principals]]
id = "jdoe"
display_name = "Jane Doe"
scopes = ["/org/emea"]
departments = ["Finance"]
roles = ["payroll-reader"]

[[principals]]
id = "intern"
scopes = ["/org/emea/interns"]
"#;

const PAYROLL: &str = "{3E5A7C9B-2D4F-4A6C-8E0B-1C3D5F7A9B2D}";
const TEAM_PAGE: &str = "{8E0A2C4F-6B8D-4A1C-9E3F-5A7C9E1B3D50}";

fn write_fixture(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("content.toml");
    fs::write(&path, content).unwrap();
    (dir, path)
}

#[test]
fn test_load_fixture_from_file() {
    let (_dir, path) = write_fixture(FIXTURE);
    let host = MemoryHost::load(&path).unwrap();

    assert_eq!(host.templates().count(), 2);
    assert_eq!(host.items().len(), 2);
    assert_eq!(host.directory().len(), 2);
}

#[test]
fn test_missing_fixture_file() {
    let dir = tempdir().unwrap();
    let result = MemoryHost::load(dir.path().join("nope.toml"));
    assert!(matches!(result, Err(FixtureError::Io(_))));
}

#[test]
fn test_duplicate_item_rejected() {
    let duplicate = format!(
        "{}\n[[items]]\nid = \"{}\"\nname = \"Copy\"\ntemplate = \"{{0F7A4C2E-8B1D-4E6F-A3C5-7D9E1B2F4A60}}\"\n",
        FIXTURE, PAYROLL
    );
    assert!(matches!(
        MemoryHost::from_toml_str(&duplicate),
        Err(FixtureError::Invalid(_))
    ));
}

#[test]
fn test_duplicate_principal_rejected() {
    let duplicate = format!("{}\n[[principals]]\nid = \"jdoe\"\n", FIXTURE);
    assert!(matches!(
        MemoryHost::from_toml_str(&duplicate),
        Err(FixtureError::Invalid(_))
    ));
}

#[test]
fn test_item_without_template_is_rejected() {
    let broken = "[[items]]\nid = \"{3E5A7C9B-2D4F-4A6C-8E0B-1C3D5F7A9B2D}\"\nname = \"x\"\n";
    assert!(matches!(
        MemoryHost::from_toml_str(broken),
        Err(FixtureError::Parse(_))
    ));
}

#[tokio::test]
async fn test_end_to_end_visibility() {
    let config = load_config_from_str(CONFIG).unwrap();
    let host = Arc::new(MemoryHost::from_toml_str(FIXTURE).unwrap());
    let metrics = Arc::new(GuardMetrics::new());

    let cache = DerivationCache::from_config(&config.cache).unwrap();
    let hook = SecurityHook::new(
        HookSettings::from_config(&config.guard).unwrap(),
        DerivationResolver::with_cache(Arc::clone(&host), cache),
        Arc::clone(&host),
    )
    .with_metrics(Arc::clone(&metrics));
    let provider = ItemProvider::new(Arc::clone(&host), hook);

    let directory = create_directory(&config, Some(host.directory())).unwrap();
    assert_eq!(directory.provider_name(), "static");

    let payroll: ItemId = PAYROLL.parse().unwrap();
    let team_page: ItemId = TEAM_PAGE.parse().unwrap();

    let jdoe = resolve_principal(directory.as_ref(), "jdoe").await;
    let jdoe_caps = jdoe.capabilities(&*host);
    let ctx = RequestContext::page_view("website", jdoe_caps.as_ref());
    assert!(provider.get_item(&payroll, SecurityCheck::Enable, &ctx).is_found());
    // Scope "/org/emea" does not govern "/org"
    assert!(provider.get_item(&team_page, SecurityCheck::Enable, &ctx).is_hidden());

    let intern = resolve_principal(directory.as_ref(), "intern").await;
    let intern_caps = intern.capabilities(&*host);
    let ctx = RequestContext::page_view("website", intern_caps.as_ref());
    assert!(provider.get_item(&payroll, SecurityCheck::Enable, &ctx).is_hidden());
    assert!(provider.get_item(&payroll, SecurityCheck::Disable, &ctx).is_found());

    let stranger = resolve_principal(directory.as_ref(), "stranger").await;
    assert!(!stranger.is_resolved());
    let stranger_caps = stranger.capabilities(&*host);
    let ctx = RequestContext::page_view("website", stranger_caps.as_ref());
    assert!(provider.get_item(&payroll, SecurityCheck::Enable, &ctx).is_hidden());

    let ctx = RequestContext::page_view("intranet", stranger_caps.as_ref());
    assert!(provider.get_item(&payroll, SecurityCheck::Enable, &ctx).is_found());

    let cache_stats = provider.hook().resolver().cache().map(|c| c.stats());
    let snapshot = metrics.snapshot(cache_stats);
    assert_eq!(snapshot.total_reads, 6);
    assert_eq!(snapshot.authorized, 1);
    assert_eq!(snapshot.hidden, 3);
    assert_eq!(snapshot.not_applicable, 2);
    assert_eq!(snapshot.lookup_failures, 1);

    // One walk for the Article template, every later read is a hit
    let cache_stats = snapshot.cache.unwrap();
    assert_eq!(cache_stats.entries, 1);
    assert_eq!(cache_stats.misses, 1);
    assert_eq!(cache_stats.hits, 3);
}
