use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_SITE_URL: &str = "http://localhost:8080";
pub const DEFAULT_SITE_NAME: &str = "Content Hub";

const DEFAULT_TIMEOUT_MS: u64 = 15_000;
const DEFAULT_RETRIES: u32 = 2;
const DEFAULT_REQUEST_DELAY_MS: u64 = 300;
const DEFAULT_SITEMAP_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_CACHE_TTL_SECS: u64 = 3_600;

/// Effective runtime configuration
#[derive(Debug, Clone, PartialEq)]
pub struct HubConfig {
    /// Content API endpoint; fetching is impossible without it
    pub endpoint: Option<String>,
    /// Bound on a single attempt
    pub timeout: Duration,
    /// Extra attempts after the first one fails
    pub retries: u32,
    /// Minimum spacing between consecutive outbound calls
    pub request_delay: Duration,
    pub fallback_on_error: bool,
    /// Public origin, always without a trailing slash
    pub site_url: String,
    pub tenant: Option<String>,
    /// Bound on the whole sitemap collection fetch
    pub sitemap_timeout: Duration,
    pub cache_ttl: Duration,
    pub site_name: String,
    pub contact_url: Option<String>,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            retries: DEFAULT_RETRIES,
            request_delay: Duration::from_millis(DEFAULT_REQUEST_DELAY_MS),
            fallback_on_error: false,
            site_url: DEFAULT_SITE_URL.to_string(),
            tenant: None,
            sitemap_timeout: Duration::from_millis(DEFAULT_SITEMAP_TIMEOUT_MS),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            site_name: DEFAULT_SITE_NAME.to_string(),
            contact_url: None,
        }
    }
}

/// Raw TOML configuration structure
/// Every key is optional; missing keys keep their defaults
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    content: RawContent,
    #[serde(default)]
    site: RawSite,
    #[serde(default)]
    sitemap: RawSitemap,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawContent {
    endpoint: Option<String>,
    timeout_ms: Option<u64>,
    retries: Option<u32>,
    request_delay_ms: Option<u64>,
    fallback_on_error: Option<bool>,
    cache_ttl_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSite {
    url: Option<String>,
    tenant: Option<String>,
    name: Option<String>,
    contact_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSitemap {
    timeout_ms: Option<u64>,
}

/// Load configuration: optional hub.toml, then environment overrides
pub fn load_hub_config(path: Option<&Path>) -> Result<HubConfig> {
    let mut config = match path {
        Some(path) => parse_hub_toml(path)?,
        None => HubConfig::default(),
    };
    config.apply_env_with(|key| std::env::var(key).ok())?;
    Ok(config)
}

/// Parse hub.toml from a file path
pub fn parse_hub_toml<P: AsRef<Path>>(path: P) -> Result<HubConfig> {
    let content = fs::read_to_string(path)?;
    parse_hub_toml_str(&content)
}

/// Parse hub.toml from a string (useful for testing)
pub fn parse_hub_toml_str(content: &str) -> Result<HubConfig> {
    let raw: RawConfig = toml::from_str(content)?;
    let mut config = HubConfig::default();

    if let Some(endpoint) = raw.content.endpoint {
        config.endpoint = non_blank(endpoint);
    }
    if let Some(ms) = raw.content.timeout_ms {
        config.timeout = Duration::from_millis(ms);
    }
    if let Some(retries) = raw.content.retries {
        config.retries = retries;
    }
    if let Some(ms) = raw.content.request_delay_ms {
        config.request_delay = Duration::from_millis(ms);
    }
    if let Some(fallback) = raw.content.fallback_on_error {
        config.fallback_on_error = fallback;
    }
    if let Some(secs) = raw.content.cache_ttl_secs {
        config.cache_ttl = Duration::from_secs(secs);
    }
    if let Some(url) = raw.site.url {
        config.site_url = normalize_site_url(&url);
    }
    if let Some(tenant) = raw.site.tenant {
        config.tenant = non_blank(tenant);
    }
    if let Some(name) = raw.site.name.and_then(non_blank) {
        config.site_name = name;
    }
    if let Some(contact) = raw.site.contact_url {
        config.contact_url = non_blank(contact);
    }
    if let Some(ms) = raw.sitemap.timeout_ms {
        config.sitemap_timeout = Duration::from_millis(ms);
    }

    Ok(config)
}

impl HubConfig {
    /// Overlay environment variables read through `lookup`
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).and_then(non_blank);

        if let Some(endpoint) = get("CONTENT_API_URL") {
            self.endpoint = Some(endpoint);
        }
        if let Some(raw) = get("CONTENT_FETCH_TIMEOUT_MS") {
            self.timeout = Duration::from_millis(parse_number("CONTENT_FETCH_TIMEOUT_MS", &raw)?);
        }
        if let Some(raw) = get("CONTENT_FETCH_RETRY") {
            self.retries = parse_number("CONTENT_FETCH_RETRY", &raw)?;
        }
        if let Some(raw) = get("CONTENT_REQUEST_DELAY_MS") {
            self.request_delay =
                Duration::from_millis(parse_number("CONTENT_REQUEST_DELAY_MS", &raw)?);
        }
        if let Some(raw) = get("CONTENT_FALLBACK_ON_ERROR") {
            self.fallback_on_error = parse_flag("CONTENT_FALLBACK_ON_ERROR", &raw)?;
        }
        if let Some(raw) = get("CONTENT_CACHE_TTL_SECS") {
            self.cache_ttl = Duration::from_secs(parse_number("CONTENT_CACHE_TTL_SECS", &raw)?);
        }
        if let Some(url) = get("SITE_URL") {
            self.site_url = normalize_site_url(&url);
        }
        if let Some(tenant) = get("SITE_TENANT") {
            self.tenant = Some(tenant);
        }
        if let Some(name) = get("SITE_NAME") {
            self.site_name = name;
        }
        if let Some(contact) = get("SITE_CONTACT_URL") {
            self.contact_url = Some(contact);
        }
        if let Some(raw) = get("SITEMAP_FETCH_TIMEOUT_MS") {
            self.sitemap_timeout =
                Duration::from_millis(parse_number("SITEMAP_FETCH_TIMEOUT_MS", &raw)?);
        }

        Ok(())
    }
}

fn non_blank(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim().parse().map_err(|_| {
        Error::ConfigParse(format!("Invalid number in '{}': '{}'", key, raw))
    })
}

fn parse_flag(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::ConfigParse(format!(
            "Invalid boolean in '{}': '{}', expected true/false or 1/0",
            key, raw
        ))),
    }
}

/// Reduce a configured site URL to its origin.
///
/// Trailing slashes and any path are dropped. Anything that is not an
/// absolute http(s) URL with a host falls back to [`DEFAULT_SITE_URL`].
///
/// ```text
/// normalize_site_url("https://example.com/")      → "https://example.com"
/// normalize_site_url(" https://example.com/a/b ") → "https://example.com"
/// normalize_site_url("ftp://example.com")         → DEFAULT_SITE_URL
/// ```
pub fn normalize_site_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');

    let Some((scheme, rest)) = trimmed.split_once("://") else {
        return DEFAULT_SITE_URL.to_string();
    };
    let scheme = scheme.to_lowercase();
    if scheme != "http" && scheme != "https" {
        return DEFAULT_SITE_URL.to_string();
    }

    let authority = rest
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    // userinfo is not part of an origin
    let host = authority.rsplit('@').next().unwrap_or_default();
    if host.is_empty() || host.starts_with(':') || host.contains(char::is_whitespace) {
        return DEFAULT_SITE_URL.to_string();
    }

    format!("{}://{}", scheme, host.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = HubConfig::default();
        assert_eq!(config.timeout, Duration::from_millis(15_000));
        assert_eq!(config.retries, 2);
        assert_eq!(config.request_delay, Duration::from_millis(300));
        assert!(!config.fallback_on_error);
        assert_eq!(config.sitemap_timeout, Duration::from_millis(5_000));
        assert_eq!(config.site_url, DEFAULT_SITE_URL);
        assert!(config.endpoint.is_none());
    }

    #[test]
    fn test_normalize_site_url() {
        assert_eq!(normalize_site_url("https://example.com/"), "https://example.com");
        assert_eq!(normalize_site_url("https://example.com///"), "https://example.com");
        assert_eq!(
            normalize_site_url("  https://Example.com/some/path  "),
            "https://example.com"
        );
        assert_eq!(
            normalize_site_url("http://localhost:3000"),
            "http://localhost:3000"
        );
        assert_eq!(
            normalize_site_url("https://user:pw@example.com/x"),
            "https://example.com"
        );
    }

    #[test]
    fn test_normalize_site_url_rejects_garbage() {
        assert_eq!(normalize_site_url(""), DEFAULT_SITE_URL);
        assert_eq!(normalize_site_url("example.com"), DEFAULT_SITE_URL);
        assert_eq!(normalize_site_url("ftp://example.com"), DEFAULT_SITE_URL);
        assert_eq!(normalize_site_url("https://"), DEFAULT_SITE_URL);
        assert_eq!(normalize_site_url("https://:8080"), DEFAULT_SITE_URL);
    }

    #[test]
    fn test_env_overrides() {
        let vars = env(&[
            ("CONTENT_API_URL", "https://cms.example.com/graphql"),
            ("CONTENT_FETCH_TIMEOUT_MS", "2000"),
            ("CONTENT_FETCH_RETRY", "1"),
            ("CONTENT_REQUEST_DELAY_MS", "0"),
            ("CONTENT_FALLBACK_ON_ERROR", "true"),
            ("SITE_URL", "https://shop.example.com/"),
            ("SITE_TENANT", "webuy"),
            ("SITEMAP_FETCH_TIMEOUT_MS", "750"),
        ]);

        let mut config = HubConfig::default();
        config.apply_env_with(|k| vars.get(k).cloned()).unwrap();

        assert_eq!(
            config.endpoint.as_deref(),
            Some("https://cms.example.com/graphql")
        );
        assert_eq!(config.timeout, Duration::from_millis(2000));
        assert_eq!(config.retries, 1);
        assert_eq!(config.request_delay, Duration::ZERO);
        assert!(config.fallback_on_error);
        assert_eq!(config.site_url, "https://shop.example.com");
        assert_eq!(config.tenant.as_deref(), Some("webuy"));
        assert_eq!(config.sitemap_timeout, Duration::from_millis(750));
    }

    #[test]
    fn test_env_blank_values_ignored() {
        let vars = env(&[("CONTENT_API_URL", "   "), ("CONTENT_FETCH_RETRY", "")]);
        let mut config = HubConfig::default();
        config.apply_env_with(|k| vars.get(k).cloned()).unwrap();
        assert!(config.endpoint.is_none());
        assert_eq!(config.retries, 2);
    }

    #[test]
    fn test_env_invalid_number_names_variable() {
        let vars = env(&[("CONTENT_FETCH_RETRY", "many")]);
        let mut config = HubConfig::default();
        let result = config.apply_env_with(|k| vars.get(k).cloned());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("CONTENT_FETCH_RETRY"));
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("X", "1").unwrap());
        assert!(parse_flag("X", "TRUE").unwrap());
        assert!(!parse_flag("X", "0").unwrap());
        assert!(!parse_flag("X", "false").unwrap());
        assert!(parse_flag("X", "maybe").is_err());
    }

    #[test]
    fn test_parse_full_toml() {
        let toml = r##"
[content]
endpoint = "https://cms.example.com/graphql"
timeout_ms = 8000
retries = 1
request_delay_ms = 100
fallback_on_error = true
cache_ttl_secs = 60

[site]
url = "https://shop.example.com/"
tenant = "webuy"
name = "WEBUY HUB"
contact_url = "https://line.me/R/ti/p/@webuy"

[sitemap]
timeout_ms = 2500
        "##;

        let config = parse_hub_toml_str(toml).unwrap();
        assert_eq!(config.timeout, Duration::from_millis(8000));
        assert_eq!(config.retries, 1);
        assert_eq!(config.request_delay, Duration::from_millis(100));
        assert!(config.fallback_on_error);
        assert_eq!(config.cache_ttl, Duration::from_secs(60));
        assert_eq!(config.site_url, "https://shop.example.com");
        assert_eq!(config.site_name, "WEBUY HUB");
        assert_eq!(config.sitemap_timeout, Duration::from_millis(2500));
    }

    #[test]
    fn test_parse_empty_toml_keeps_defaults() {
        assert_eq!(parse_hub_toml_str("").unwrap(), HubConfig::default());
    }

    #[test]
    fn test_parse_toml_rejects_unknown_keys() {
        let result = parse_hub_toml_str("[content]\nendpont = \"x\"\n");
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Configuration parse error")
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[site]\ntenant = \"webuy\"").unwrap();

        let config = parse_hub_toml(file.path()).unwrap();
        assert_eq!(config.tenant.as_deref(), Some("webuy"));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = parse_hub_toml("/nonexistent/hub.toml");
        assert!(matches!(result, Err(Error::IoError(_))));
    }
}
