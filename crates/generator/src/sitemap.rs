//! Sitemap aggregation.
//!
//! Static routes are always present. Four content collections are fetched
//! concurrently and the whole fetch is raced against a timeout; whatever
//! fails or arrives late is left out, so building a sitemap never fails.

use chrono::{DateTime, Utc};
use content_hub_client::ContentSource;
use content_hub_core::{
    ChangeFrequency, ContentItem, ContentKind, HubConfig, SitemapEntry, normalize_url,
};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, warn};

/// Always-present route
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticRoute {
    pub path: &'static str,
    pub change_frequency: ChangeFrequency,
    pub priority: f32,
}

pub const STATIC_ROUTES: &[StaticRoute] = &[
    StaticRoute {
        path: "/",
        change_frequency: ChangeFrequency::Daily,
        priority: 1.0,
    },
    StaticRoute {
        path: "/categories",
        change_frequency: ChangeFrequency::Daily,
        priority: 0.9,
    },
    StaticRoute {
        path: "/locations",
        change_frequency: ChangeFrequency::Weekly,
        priority: 0.7,
    },
    StaticRoute {
        path: "/privacy-policy",
        change_frequency: ChangeFrequency::Monthly,
        priority: 0.3,
    },
    StaticRoute {
        path: "/terms",
        change_frequency: ChangeFrequency::Monthly,
        priority: 0.3,
    },
];

/// Collections discovered from the backend, in merge order
pub const DYNAMIC_KINDS: [ContentKind; 4] = [
    ContentKind::Service,
    ContentKind::LocationPage,
    ContentKind::PriceModel,
    ContentKind::DeviceCategory,
];

fn dynamic_settings(kind: ContentKind) -> (ChangeFrequency, f32) {
    match kind {
        ContentKind::Service => (ChangeFrequency::Weekly, 0.9),
        ContentKind::LocationPage => (ChangeFrequency::Weekly, 0.8),
        ContentKind::PriceModel => (ChangeFrequency::Weekly, 0.7),
        ContentKind::DeviceCategory => (ChangeFrequency::Weekly, 0.6),
        ContentKind::Faq => (ChangeFrequency::Monthly, 0.5),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SitemapOptions {
    /// Public origin without trailing slash
    pub base_url: String,
    pub tenant: Option<String>,
    /// Bound on the combined collection fetch
    pub timeout: Duration,
}

impl SitemapOptions {
    pub fn from_config(config: &HubConfig) -> Self {
        Self {
            base_url: config.site_url.clone(),
            tenant: config.tenant.clone(),
            timeout: config.sitemap_timeout,
        }
    }
}

/// Accumulates entries, dropping URLs already seen (first write wins)
pub struct SitemapBuilder {
    base_url: String,
    now: DateTime<Utc>,
    seen: HashSet<String>,
    entries: Vec<SitemapEntry>,
}

impl SitemapBuilder {
    pub fn new(base_url: &str, now: DateTime<Utc>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            now,
            seen: HashSet::new(),
            entries: Vec::new(),
        }
    }

    /// Returns false when the normalized URL was already present
    pub fn push_url(
        &mut self,
        url: &str,
        change_frequency: ChangeFrequency,
        priority: f32,
    ) -> bool {
        let url = normalize_url(url);
        if !self.seen.insert(url.clone()) {
            return false;
        }
        self.entries
            .push(SitemapEntry::new(url, self.now, change_frequency, priority));
        true
    }

    pub fn push_path(
        &mut self,
        path: &str,
        change_frequency: ChangeFrequency,
        priority: f32,
    ) -> bool {
        let url = format!("{}{}", self.base_url, path);
        self.push_url(&url, change_frequency, priority)
    }

    pub fn push_static(&mut self, routes: &[StaticRoute]) {
        for route in routes {
            self.push_path(route.path, route.change_frequency, route.priority);
        }
    }

    /// Adds listable items with a public path; returns how many were added
    pub fn push_items(
        &mut self,
        items: &[ContentItem],
        tenant: Option<&str>,
        change_frequency: ChangeFrequency,
        priority: f32,
    ) -> usize {
        let mut added = 0;
        for item in items.iter().filter(|i| i.is_listable(tenant)) {
            if let Some(path) = item.path()
                && self.push_path(&path, change_frequency, priority)
            {
                added += 1;
            }
        }
        added
    }

    pub fn finish(self) -> Vec<SitemapEntry> {
        self.entries
    }
}

/// Build the full entry list, stamped with the current time
pub async fn build_sitemap(
    source: &dyn ContentSource,
    options: &SitemapOptions,
) -> Vec<SitemapEntry> {
    build_sitemap_at(source, options, Utc::now()).await
}

pub async fn build_sitemap_at(
    source: &dyn ContentSource,
    options: &SitemapOptions,
    now: DateTime<Utc>,
) -> Vec<SitemapEntry> {
    let mut builder = SitemapBuilder::new(&options.base_url, now);
    builder.push_static(STATIC_ROUTES);

    let fetches = async {
        tokio::join!(
            source.slugs(ContentKind::Service),
            source.slugs(ContentKind::LocationPage),
            source.slugs(ContentKind::PriceModel),
            source.slugs(ContentKind::DeviceCategory),
        )
    };

    match tokio::time::timeout(options.timeout, fetches).await {
        Ok((services, locations, prices, categories)) => {
            let results = [services, locations, prices, categories];
            for (kind, result) in DYNAMIC_KINDS.into_iter().zip(results) {
                match result {
                    Ok(items) => {
                        let (change_frequency, priority) = dynamic_settings(kind);
                        let added = builder.push_items(
                            &items,
                            options.tenant.as_deref(),
                            change_frequency,
                            priority,
                        );
                        debug!(%kind, fetched = items.len(), added, "sitemap collection merged");
                    }
                    Err(err) => {
                        warn!(%kind, error = %err, "sitemap collection unavailable, omitting");
                    }
                }
            }
        }
        Err(_) => {
            warn!(
                timeout_ms = options.timeout.as_millis() as u64,
                "sitemap content fetch timed out, serving static routes only"
            );
        }
    }

    builder.finish()
}

/// Named slice of the sitemap served under `/sitemaps/{name}.xml`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SitemapSegment {
    Pages,
    Locations,
    Services,
    Categories,
    Prices,
}

impl SitemapSegment {
    pub const ALL: [SitemapSegment; 5] = [
        SitemapSegment::Pages,
        SitemapSegment::Locations,
        SitemapSegment::Services,
        SitemapSegment::Categories,
        SitemapSegment::Prices,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SitemapSegment::Pages => "pages",
            SitemapSegment::Locations => "locations",
            SitemapSegment::Services => "services",
            SitemapSegment::Categories => "categories",
            SitemapSegment::Prices => "prices",
        }
    }

    /// Accepts `pages` as well as `pages.xml`
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.strip_suffix(".xml").unwrap_or(name);
        Self::ALL.into_iter().find(|s| s.as_str() == name)
    }

    fn prefix(&self) -> Option<&'static str> {
        match self {
            SitemapSegment::Pages => None,
            SitemapSegment::Locations => ContentKind::LocationPage.path_prefix(),
            SitemapSegment::Services => ContentKind::Service.path_prefix(),
            SitemapSegment::Categories => ContentKind::DeviceCategory.path_prefix(),
            SitemapSegment::Prices => ContentKind::PriceModel.path_prefix(),
        }
    }

    fn matches_path(&self, path: &str) -> bool {
        match self.prefix() {
            Some(prefix) => {
                path == prefix
                    || path
                        .strip_prefix(prefix)
                        .is_some_and(|rest| rest.starts_with('/'))
            }
            None => !Self::ALL
                .iter()
                .filter(|s| s.prefix().is_some())
                .any(|s| s.matches_path(path)),
        }
    }

    /// Whether `url` (absolute, under `base_url`) falls in this segment
    pub fn contains(&self, base_url: &str, url: &str) -> bool {
        let base = base_url.trim_end_matches('/');
        let path = url.strip_prefix(base).unwrap_or(url);
        self.matches_path(path)
    }
}

/// Entries of one segment, in their original order
pub fn segment_entries(
    entries: &[SitemapEntry],
    base_url: &str,
    segment: SitemapSegment,
) -> Vec<SitemapEntry> {
    entries
        .iter()
        .filter(|e| segment.contains(base_url, &e.url))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use content_hub_core::{Error, HubIndex, ItemDetails, PublishStatus, Result};
    use std::collections::HashMap;

    const BASE: &str = "https://shop.example.com";

    fn node(kind: ContentKind, slug: &str, status: &str, site: Option<&str>) -> ContentItem {
        ContentItem {
            kind,
            slug: slug.to_string(),
            status: PublishStatus::from(status),
            title: slug.to_string(),
            site: site.map(str::to_string),
            categories: vec![],
            content: None,
            details: ItemDetails::Service { icon: None },
        }
    }

    /// Canned collections; kinds without an entry fail
    #[derive(Default)]
    struct FakeSource {
        collections: HashMap<ContentKind, Vec<ContentItem>>,
        delay: Option<Duration>,
    }

    impl FakeSource {
        fn with(mut self, kind: ContentKind, items: Vec<ContentItem>) -> Self {
            self.collections.insert(kind, items);
            self
        }
    }

    #[async_trait]
    impl ContentSource for FakeSource {
        async fn slugs(&self, kind: ContentKind) -> Result<Vec<ContentItem>> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.collections
                .get(&kind)
                .cloned()
                .ok_or_else(|| Error::Transport("backend down".to_string()))
        }

        async fn collection(&self, kind: ContentKind) -> Result<Vec<ContentItem>> {
            self.slugs(kind).await
        }

        async fn item(&self, _kind: ContentKind, _slug: &str) -> Result<Option<ContentItem>> {
            Ok(None)
        }

        async fn hub_index(&self) -> Result<HubIndex> {
            Ok(HubIndex::default())
        }
    }

    fn options(tenant: Option<&str>) -> SitemapOptions {
        SitemapOptions {
            base_url: BASE.to_string(),
            tenant: tenant.map(str::to_string),
            timeout: Duration::from_secs(5),
        }
    }

    fn urls(entries: &[SitemapEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.url.as_str()).collect()
    }

    fn full_source() -> FakeSource {
        FakeSource::default()
            .with(ContentKind::Service, vec![])
            .with(ContentKind::LocationPage, vec![])
            .with(ContentKind::PriceModel, vec![])
            .with(ContentKind::DeviceCategory, vec![])
    }

    #[tokio::test]
    async fn test_published_included_draft_excluded() {
        let source = full_source().with(
            ContentKind::Service,
            vec![
                node(ContentKind::Service, "buy-iphone", "publish", None),
                node(ContentKind::Service, "buy-ipad", "draft", None),
            ],
        );

        let entries = build_sitemap(&source, &options(None)).await;
        let urls = urls(&entries);
        assert!(urls.contains(&"https://shop.example.com/services/buy-iphone"));
        assert!(!urls.contains(&"https://shop.example.com/services/buy-ipad"));
        assert!(urls.contains(&"https://shop.example.com"));
        assert!(urls.contains(&"https://shop.example.com/categories"));
        assert!(urls.contains(&"https://shop.example.com/locations"));
    }

    #[tokio::test]
    async fn test_tenant_discriminator_filters() {
        let source = full_source().with(
            ContentKind::PriceModel,
            vec![
                node(ContentKind::PriceModel, "ours", "publish", Some("webuy")),
                node(ContentKind::PriceModel, "untagged", "publish", None),
                node(ContentKind::PriceModel, "theirs", "publish", Some("other")),
            ],
        );

        let entries = build_sitemap(&source, &options(Some("webuy"))).await;
        let urls = urls(&entries);
        assert!(urls.contains(&"https://shop.example.com/prices/ours"));
        assert!(urls.contains(&"https://shop.example.com/prices/untagged"));
        assert!(!urls.contains(&"https://shop.example.com/prices/theirs"));
    }

    #[tokio::test]
    async fn test_priorities_and_frequencies() {
        let source = full_source()
            .with(
                ContentKind::LocationPage,
                vec![node(ContentKind::LocationPage, "bangkok", "publish", None)],
            )
            .with(
                ContentKind::DeviceCategory,
                vec![node(ContentKind::DeviceCategory, "notebook", "publish", None)],
            );

        let entries = build_sitemap(&source, &options(None)).await;
        let find = |url: &str| entries.iter().find(|e| e.url == url).unwrap();

        let home = find(BASE);
        assert_eq!(home.priority, 1.0);
        assert_eq!(home.change_frequency, ChangeFrequency::Daily);

        let terms = find("https://shop.example.com/terms");
        assert_eq!(terms.priority, 0.3);
        assert_eq!(terms.change_frequency, ChangeFrequency::Monthly);

        let location = find("https://shop.example.com/locations/bangkok");
        assert_eq!(location.priority, 0.8);
        assert_eq!(location.change_frequency, ChangeFrequency::Weekly);

        assert_eq!(find("https://shop.example.com/categories/notebook").priority, 0.6);
    }

    #[tokio::test]
    async fn test_duplicates_removed_first_wins() {
        let source = full_source().with(
            ContentKind::Service,
            vec![
                node(ContentKind::Service, "buy-iphone", "publish", None),
                node(ContentKind::Service, "buy-iphone/", "publish", None),
                node(ContentKind::Service, "buy-iphone", "publish", None),
            ],
        );

        let entries = build_sitemap(&source, &options(None)).await;
        let mut normalized: Vec<String> =
            entries.iter().map(|e| normalize_url(&e.url)).collect();
        let total = normalized.len();
        normalized.sort();
        normalized.dedup();
        assert_eq!(normalized.len(), total);
        assert_eq!(
            entries
                .iter()
                .filter(|e| e.url.ends_with("/services/buy-iphone"))
                .count(),
            1
        );
    }

    #[test]
    fn test_builder_static_vs_dynamic_overlap() {
        let now = Utc::now();
        let mut builder = SitemapBuilder::new("https://shop.example.com/", now);
        builder.push_static(STATIC_ROUTES);

        assert!(!builder.push_url(
            "https://shop.example.com/categories/",
            ChangeFrequency::Weekly,
            0.6
        ));
        assert!(!builder.push_path("/", ChangeFrequency::Weekly, 0.1));

        let entries = builder.finish();
        assert_eq!(entries.len(), STATIC_ROUTES.len());
        let categories = entries
            .iter()
            .find(|e| e.url == "https://shop.example.com/categories")
            .unwrap();
        assert_eq!(categories.priority, 0.9);
    }

    #[tokio::test]
    async fn test_failed_collection_is_isolated() {
        // no LocationPage entry: that fetch fails
        let source = FakeSource::default()
            .with(
                ContentKind::Service,
                vec![node(ContentKind::Service, "buy-iphone", "publish", None)],
            )
            .with(ContentKind::PriceModel, vec![])
            .with(ContentKind::DeviceCategory, vec![]);

        let entries = build_sitemap(&source, &options(None)).await;
        assert!(urls(&entries).contains(&"https://shop.example.com/services/buy-iphone"));
        assert_eq!(entries.len(), STATIC_ROUTES.len() + 1);
    }

    #[tokio::test]
    async fn test_backend_down_returns_static_routes() {
        let entries = build_sitemap(&FakeSource::default(), &options(None)).await;
        assert_eq!(entries.len(), STATIC_ROUTES.len());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_backend_bounded_by_timeout() {
        let mut source = full_source().with(
            ContentKind::Service,
            vec![node(ContentKind::Service, "buy-iphone", "publish", None)],
        );
        source.delay = Some(Duration::from_secs(60));

        let start = tokio::time::Instant::now();
        let entries = build_sitemap(&source, &options(None)).await;

        assert_eq!(start.elapsed(), Duration::from_secs(5));
        assert_eq!(entries.len(), STATIC_ROUTES.len());
        assert!(!urls(&entries).iter().any(|u| u.contains("/services/")));
    }

    #[tokio::test]
    async fn test_entries_share_build_timestamp() {
        let now = "2026-01-02T03:04:05Z".parse::<DateTime<Utc>>().unwrap();
        let source = full_source().with(
            ContentKind::Service,
            vec![node(ContentKind::Service, "a", "publish", None)],
        );
        let entries = build_sitemap_at(&source, &options(None), now).await;
        assert!(entries.iter().all(|e| e.last_modified == now));
    }

    #[test]
    fn test_segment_names() {
        assert_eq!(SitemapSegment::from_name("pages.xml"), Some(SitemapSegment::Pages));
        assert_eq!(SitemapSegment::from_name("prices"), Some(SitemapSegment::Prices));
        assert_eq!(SitemapSegment::from_name("faqs.xml"), None);
    }

    #[test]
    fn test_segments_partition_entries() {
        let now = Utc::now();
        let mut builder = SitemapBuilder::new(BASE, now);
        builder.push_static(STATIC_ROUTES);
        for path in [
            "/services/buy-iphone",
            "/locations/bangkok",
            "/prices/macbook-air",
            "/categories/notebook",
            "/servicesextra",
        ] {
            builder.push_path(path, ChangeFrequency::Weekly, 0.5);
        }
        let entries = builder.finish();

        let services = segment_entries(&entries, BASE, SitemapSegment::Services);
        assert_eq!(urls(&services), vec!["https://shop.example.com/services/buy-iphone"]);

        let categories = segment_entries(&entries, BASE, SitemapSegment::Categories);
        assert_eq!(
            urls(&categories),
            vec![
                "https://shop.example.com/categories",
                "https://shop.example.com/categories/notebook"
            ]
        );

        let pages = segment_entries(&entries, BASE, SitemapSegment::Pages);
        assert_eq!(
            urls(&pages),
            vec![
                "https://shop.example.com",
                "https://shop.example.com/privacy-policy",
                "https://shop.example.com/terms",
                "https://shop.example.com/servicesextra"
            ]
        );

        let total: usize = SitemapSegment::ALL
            .iter()
            .map(|s| segment_entries(&entries, BASE, *s).len())
            .sum();
        assert_eq!(total, entries.len());
    }
}
