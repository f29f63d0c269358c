//! Serialization of sitemap entries, the sitemap index and robots.txt.

use crate::sitemap::SitemapSegment;
use chrono::{DateTime, SecondsFormat, Utc};
use content_hub_core::SitemapEntry;

pub const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Shortest decimal form with at least one fractional digit (`1.0`, `0.85`)
pub fn format_priority(priority: f32) -> String {
    let mut s = format!("{:.2}", priority);
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.push('0');
    }
    s
}

/// ISO-8601 UTC with milliseconds
pub fn format_lastmod(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn render_urlset(entries: &[SitemapEntry]) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str(&format!("<urlset xmlns=\"{}\">\n", SITEMAP_NS));
    for entry in entries {
        xml.push_str(&format!(
            concat!(
                "  <url>\n",
                "    <loc>{}</loc>\n",
                "    <lastmod>{}</lastmod>\n",
                "    <changefreq>{}</changefreq>\n",
                "    <priority>{}</priority>\n",
                "  </url>\n",
            ),
            escape_xml(&entry.url),
            format_lastmod(entry.last_modified),
            entry.change_frequency.as_str(),
            format_priority(entry.priority),
        ));
    }
    xml.push_str("</urlset>\n");
    xml
}

pub fn segment_url(base_url: &str, segment: SitemapSegment) -> String {
    format!(
        "{}/sitemaps/{}.xml",
        base_url.trim_end_matches('/'),
        segment.as_str()
    )
}

/// Index pointing at every segment sitemap
pub fn render_index(base_url: &str, segments: &[SitemapSegment], now: DateTime<Utc>) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str(&format!("<sitemapindex xmlns=\"{}\">\n", SITEMAP_NS));
    for segment in segments {
        xml.push_str(&format!(
            "  <sitemap>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n  </sitemap>\n",
            escape_xml(&segment_url(base_url, *segment)),
            format_lastmod(now),
        ));
    }
    xml.push_str("</sitemapindex>\n");
    xml
}

pub fn render_robots(base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let host = base
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(base);
    format!(
        "User-agent: *\nAllow: /\n\nHost: {}\nSitemap: {}/sitemap.xml\n",
        host, base
    )
}
