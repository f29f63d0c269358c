use anyhow::{Context, Result};
use content_hub_client::{ContentClient, ContentSource, FetchPolicy, HttpTransport, RateLimiter};
use content_hub_core::{ContentKind, HubConfig, load_hub_config};
use std::path::PathBuf;
use std::sync::Arc;

/// Print the effective configuration and query the backend with one request
pub async fn run(config_path: Option<PathBuf>) -> Result<()> {
    match &config_path {
        Some(path) => println!("Checking configuration from: {}", path.display()),
        None => println!("Checking configuration from environment"),
    }

    let config = load_hub_config(config_path.as_deref()).context("Failed to load configuration")?;
    for line in describe(&config) {
        println!("  {}", line);
    }

    let Some(endpoint) = config.endpoint.as_deref() else {
        anyhow::bail!(
            "No content API endpoint configured\nSet CONTENT_API_URL or [content].endpoint"
        );
    };

    // one attempt, no fallback: report exactly what the backend says
    let transport =
        HttpTransport::new(endpoint, config.timeout).context("Failed to create HTTP client")?;
    let policy = FetchPolicy {
        timeout: config.timeout,
        retries: 0,
        fallback_on_error: false,
    };
    let limiter = Arc::new(RateLimiter::unlimited());
    let client = ContentClient::new(Arc::new(transport), limiter, policy);

    println!("\nQuerying {}...", endpoint);
    let services = client
        .slugs(ContentKind::Service)
        .await
        .context("Backend check failed")?;
    let listable = services
        .iter()
        .filter(|s| s.is_listable(config.tenant.as_deref()))
        .count();

    println!("✓ Backend reachable");
    println!("  Services: {} ({} listable)", services.len(), listable);

    Ok(())
}

fn describe(config: &HubConfig) -> Vec<String> {
    vec![
        format!("Endpoint:        {}", config.endpoint.as_deref().unwrap_or("(not set)")),
        format!("Timeout:         {} ms", config.timeout.as_millis()),
        format!("Retries:         {}", config.retries),
        format!("Request delay:   {} ms", config.request_delay.as_millis()),
        format!("Fallback:        {}", config.fallback_on_error),
        format!("Cache TTL:       {} s", config.cache_ttl.as_secs()),
        format!("Site URL:        {}", config.site_url),
        format!("Site name:       {}", config.site_name),
        format!("Tenant:          {}", config.tenant.as_deref().unwrap_or("(all)")),
        format!("Contact URL:     {}", config.contact_url.as_deref().unwrap_or("(not set)")),
        format!("Sitemap timeout: {} ms", config.sitemap_timeout.as_millis()),
    ]
}
