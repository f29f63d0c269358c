//! Documents served by the hub: sitemaps, robots.txt and HTML pages.

pub mod jsonld;
pub mod pages;
pub mod sitemap;
pub mod xml;

pub use pages::{Page, Rendered, SiteContext};
pub use sitemap::{
    STATIC_ROUTES, SitemapBuilder, SitemapOptions, SitemapSegment, build_sitemap,
    build_sitemap_at, segment_entries,
};

use chrono::{DateTime, Utc};
use content_hub_core::SitemapEntry;

/// Every crawler-facing document derived from one entry list
pub struct GeneratedDocuments {
    pub files: Vec<(String, String)>, // (relative path, content)
}

impl GeneratedDocuments {
    pub fn get(&self, path: &str) -> Option<&str> {
        self.files
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, content)| content.as_str())
    }
}

pub fn generate_documents(
    entries: &[SitemapEntry],
    base_url: &str,
    now: DateTime<Utc>,
) -> GeneratedDocuments {
    let mut files = vec![
        ("sitemap.xml".to_string(), xml::render_urlset(entries)),
        (
            "sitemap-index.xml".to_string(),
            xml::render_index(base_url, &SitemapSegment::ALL, now),
        ),
    ];
    for segment in SitemapSegment::ALL {
        files.push((
            format!("sitemaps/{}.xml", segment.as_str()),
            xml::render_urlset(&segment_entries(entries, base_url, segment)),
        ));
    }
    files.push(("robots.txt".to_string(), xml::render_robots(base_url)));
    GeneratedDocuments { files }
}
