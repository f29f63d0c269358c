//! HTML page renderers.
//!
//! Every renderer is a pure function from already-fetched content to a
//! [`Page`]; [`Page::render`] wraps it in the shared layout. Items that are
//! not listable for the configured tenant never show up in a page.

use crate::jsonld;
use content_hub_core::{
    ContentItem, ContentKind, HubConfig, HubIndex, ItemDetails, related_by_category,
};
use serde_json::Value;
use std::collections::BTreeMap;

/// Cap on related services, locations and prices per page
pub const RELATED_LIMIT: usize = 8;
pub const FAQ_LIMIT: usize = 20;

const DESCRIPTION_MAX_CHARS: usize = 160;
const PRICE_CURRENCY: &str = "THB";
const OTHER_AREAS: &str = "Other areas";

#[derive(Debug, Clone, PartialEq)]
pub struct SiteContext {
    pub base_url: String,
    pub site_name: String,
    pub contact_url: Option<String>,
    pub tenant: Option<String>,
}

impl SiteContext {
    pub fn from_config(config: &HubConfig) -> Self {
        Self {
            base_url: config.site_url.trim_end_matches('/').to_string(),
            site_name: config.site_name.clone(),
            contact_url: config.contact_url.clone(),
            tenant: config.tenant.clone(),
        }
    }

    /// Absolute URL for a site path
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn tenant(&self) -> Option<&str> {
        self.tenant.as_deref()
    }

    fn contact_href(&self) -> &str {
        self.contact_url.as_deref().unwrap_or("/")
    }
}

/// Page content before the shared layout is applied
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub title: String,
    pub description: String,
    /// Site path, used for the canonical link
    pub path: String,
    /// (name, path) from the home page down to this page
    pub breadcrumbs: Vec<(String, String)>,
    pub structured_data: Vec<Value>,
    pub body: String,
    pub noindex: bool,
}

/// Outcome of a detail route lookup
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    Page(Page),
    NotFound,
}

impl Page {
    fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            path: path.into(),
            breadcrumbs: Vec::new(),
            structured_data: Vec::new(),
            body: String::new(),
            noindex: false,
        }
    }

    fn crumbs(mut self, trail: &[(&str, &str)]) -> Self {
        self.breadcrumbs = trail
            .iter()
            .map(|(name, path)| (name.to_string(), path.to_string()))
            .collect();
        self
    }

    /// Full HTML document
    pub fn render(&self, site: &SiteContext) -> String {
        let canonical = site.url(&self.path);

        let mut head_data = String::new();
        if !self.breadcrumbs.is_empty() {
            let trail: Vec<(String, String)> = self
                .breadcrumbs
                .iter()
                .map(|(name, path)| (name.clone(), site.url(path)))
                .collect();
            head_data.push_str(&jsonld::script_tag(&jsonld::breadcrumb(&trail)));
            head_data.push('\n');
        }
        for value in &self.structured_data {
            head_data.push_str(&jsonld::script_tag(value));
            head_data.push('\n');
        }

        let robots = if self.noindex {
            "    <meta name=\"robots\" content=\"noindex\">\n"
        } else {
            ""
        };

        let contact = match &site.contact_url {
            Some(url) => format!(
                "<a class=\"cta\" href=\"{}\">Contact {}</a>",
                html_escape(url),
                html_escape(&site.site_name)
            ),
            None => String::new(),
        };

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} | {site_name}</title>
    <meta name="description" content="{description}">
{robots}    <link rel="canonical" href="{canonical}">
{head_data}</head>
<body>
    <header>
        <a class="brand" href="/">{site_name}</a>
        <nav><a href="/categories">Categories</a> <a href="/locations">Locations</a></nav>
    </header>
    <main>
{breadcrumbs}{body}
    </main>
    <footer>{contact}</footer>
</body>
</html>
"#,
            title = html_escape(&self.title),
            site_name = html_escape(&site.site_name),
            description = html_escape(&self.description),
            robots = robots,
            canonical = html_escape(&canonical),
            head_data = head_data,
            breadcrumbs = render_breadcrumbs(&self.breadcrumbs),
            body = self.body,
            contact = contact,
        )
    }
}

fn render_breadcrumbs(trail: &[(String, String)]) -> String {
    if trail.is_empty() {
        return String::new();
    }
    let last = trail.len() - 1;
    let items: Vec<String> = trail
        .iter()
        .enumerate()
        .map(|(i, (name, path))| {
            if i == last {
                format!("<li>{}</li>", html_escape(name))
            } else {
                format!(
                    "<li><a href=\"{}\">{}</a></li>",
                    html_escape(path),
                    html_escape(name)
                )
            }
        })
        .collect();
    format!(
        "<nav class=\"breadcrumb\"><ol>{}</ol></nav>\n",
        items.join(" / ")
    )
}

/// Escapes: & < > " '
pub fn html_escape(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '&' => "&amp;".to_string(),
            '<' => "&lt;".to_string(),
            '>' => "&gt;".to_string(),
            '"' => "&quot;".to_string(),
            '\'' => "&#x27;".to_string(),
            _ => c.to_string(),
        })
        .collect()
}

/// Plain text of an HTML fragment with whitespace collapsed
pub fn strip_html(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => {
                in_tag = true;
                text.push(' ');
            }
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    let text = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#039;", "'")
        .replace("&amp;", "&");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Meta description from body HTML, truncated on a char boundary
pub fn infer_description(html: Option<&str>, fallback: &str) -> String {
    let text = html.map(strip_html).unwrap_or_default();
    if text.is_empty() {
        return fallback.to_string();
    }
    if text.chars().count() <= DESCRIPTION_MAX_CHARS {
        return text;
    }
    let cut: String = text.chars().take(DESCRIPTION_MAX_CHARS - 3).collect();
    format!("{}...", cut.trim_end())
}

/// Whole amounts with thousands separators (`12,500`)
pub fn format_amount(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if rounded < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

pub fn price_range(min: Option<f64>, max: Option<f64>) -> Option<String> {
    match (min, max) {
        (Some(min), Some(max)) if (min - max).abs() < f64::EPSILON => Some(format_amount(min)),
        (Some(min), Some(max)) => Some(format!(
            "{} - {}",
            format_amount(min.min(max)),
            format_amount(min.max(max))
        )),
        (Some(min), None) => Some(format!("from {}", format_amount(min))),
        (None, Some(max)) => Some(format!("up to {}", format_amount(max))),
        (None, None) => None,
    }
}

fn content_html(content: Option<&str>) -> String {
    match content.map(str::trim) {
        Some(c) if c.contains('<') => format!("<div class=\"content\">{}</div>\n", c),
        Some(c) if !c.is_empty() => {
            format!("<div class=\"content\"><p>{}</p></div>\n", html_escape(c))
        }
        _ => String::new(),
    }
}

fn empty_state(site: &SiteContext, message: &str) -> String {
    format!(
        "<p class=\"empty\">{} <a href=\"{}\">Contact us</a></p>\n",
        html_escape(message),
        html_escape(site.contact_href())
    )
}

fn link_list(site: &SiteContext, items: &[&ContentItem], empty: &str) -> String {
    let links: Vec<String> = items
        .iter()
        .filter_map(|item| {
            item.path().map(|path| {
                format!(
                    "<li><a href=\"{}\">{}</a></li>",
                    html_escape(&path),
                    html_escape(&item.title)
                )
            })
        })
        .collect();
    if links.is_empty() {
        return empty_state(site, empty);
    }
    format!("<ul class=\"links\">\n{}\n</ul>\n", links.join("\n"))
}

fn section(id: &str, heading: &str, inner: &str) -> String {
    format!(
        "<section id=\"{}\">\n<h2>{}</h2>\n{}</section>\n",
        id,
        html_escape(heading),
        inner
    )
}

fn category_badges(item: &ContentItem) -> String {
    let badges: Vec<String> = item
        .categories
        .iter()
        .filter(|c| !c.slug.trim().is_empty())
        .take(6)
        .map(|c| {
            format!(
                "<a class=\"badge\" href=\"/categories/{}\">{}</a>",
                html_escape(c.slug.trim()),
                html_escape(&c.name)
            )
        })
        .collect();
    if badges.is_empty() {
        return String::new();
    }
    format!("<div class=\"badges\">{}</div>\n", badges.join(" "))
}

fn faq_question(faq: &ContentItem) -> String {
    match &faq.details {
        ItemDetails::Faq {
            question: Some(q), ..
        } => q.clone(),
        _ => faq.title.clone(),
    }
}

fn faq_answer(faq: &ContentItem) -> Option<&str> {
    let answer = match &faq.details {
        ItemDetails::Faq { answer, .. } => answer.as_deref(),
        _ => None,
    };
    answer.or(faq.content.as_deref())
}

/// (question, plain-text answer) pairs for structured data
fn faq_pairs(faqs: &[&ContentItem]) -> Vec<(String, String)> {
    faqs.iter()
        .map(|f| (faq_question(f), faq_answer(f).map(strip_html).unwrap_or_default()))
        .collect()
}

/// Backend FAQs followed by plain-text seed pairs
fn faq_section(site: &SiteContext, faqs: &[&ContentItem], seeds: &[(String, String)]) -> String {
    if faqs.is_empty() && seeds.is_empty() {
        return section(
            "faqs",
            "Frequently asked questions",
            &empty_state(site, "No questions answered here yet."),
        );
    }
    let items: Vec<String> = faqs
        .iter()
        .map(|f| {
            format!(
                "<details class=\"faq\"><summary>{}</summary>{}</details>",
                html_escape(&faq_question(f)),
                faq_answer(f).unwrap_or_default()
            )
        })
        .chain(seeds.iter().map(|(question, answer)| {
            format!(
                "<details class=\"faq\"><summary>{}</summary><p>{}</p></details>",
                html_escape(question),
                html_escape(answer)
            )
        }))
        .collect();
    section(
        "faqs",
        "Frequently asked questions",
        &format!("{}\n", items.join("\n")),
    )
}

fn push_faq_data(
    page: &mut Page,
    site: &SiteContext,
    faqs: &[&ContentItem],
    seeds: &[(String, String)],
) {
    let mut pairs = faq_pairs(faqs);
    pairs.extend_from_slice(seeds);
    if let Some(value) = jsonld::faq_page(&site.url(&page.path), &pairs) {
        page.structured_data.push(value);
    }
}

fn by_title<'a>(items: &'a [ContentItem]) -> Vec<&'a ContentItem> {
    let mut sorted: Vec<&ContentItem> = items.iter().collect();
    sorted.sort_by_key(|i| i.title.to_lowercase());
    sorted
}

fn tagged<'a>(items: &'a [ContentItem], category: &str, limit: usize) -> Vec<&'a ContentItem> {
    items
        .iter()
        .filter(|i| i.has_category(category))
        .take(limit)
        .collect()
}

/// Area-specific questions appended to a location page's FAQs.
/// District pages get one extra question about the exact address.
fn location_faq_seeds(area: &str, has_district: bool) -> Vec<(String, String)> {
    let mut seeds = vec![
        (
            format!("Do you collect devices in {}?", area),
            format!(
                "Yes. We pick up phones, tablets and notebooks anywhere in {} \
                 and pay on the spot once the device is checked.",
                area
            ),
        ),
        (
            format!("How fast can you get to me in {}?", area),
            "Most pickups are booked for the same or the next day. \
             Send us your device details for a time slot."
                .to_string(),
        ),
        (
            format!("Is there a fee for pickup in {}?", area),
            "No. Pickup and inspection are free, and you only sell if you accept the quote."
                .to_string(),
        ),
    ];
    if has_district {
        seeds.push((
            format!("Can you meet me at a specific address in {}?", area),
            "Yes. Share a landmark or address when booking and we will meet you there."
                .to_string(),
        ));
    }
    seeds
}

fn location_area(item: &ContentItem) -> (Option<&str>, Option<&str>) {
    match &item.details {
        ItemDetails::Location { province, district } => (province.as_deref(), district.as_deref()),
        _ => (None, None),
    }
}

pub fn home_page(site: &SiteContext, index: &HubIndex) -> Page {
    let index = index.listable(site.tenant());
    let services: Vec<&ContentItem> = index.services.iter().collect();
    let categories = by_title(&index.device_categories);

    let mut page = Page::new(
        site.site_name.clone(),
        format!("{}: device buy-back services, prices and service areas.", site.site_name),
        "/",
    );
    page.body = format!(
        "<h1>{}</h1>\n{}{}",
        html_escape(&site.site_name),
        section(
            "services",
            "Services",
            &link_list(site, &services, "No services are listed yet.")
        ),
        section(
            "categories",
            "Device categories",
            &link_list(site, &categories, "No categories are listed yet.")
        ),
    );
    page
}

/// Listable categories sorted by title
pub fn categories_hub(site: &SiteContext, index: &HubIndex) -> Page {
    let index = index.listable(site.tenant());
    let categories = by_title(&index.device_categories);

    let cards: Vec<String> = categories
        .iter()
        .map(|c| {
            let count = index
                .services
                .iter()
                .filter(|s| s.has_category(&c.slug))
                .count();
            format!(
                concat!(
                    "<li><a href=\"/categories/{}\">{}</a> ",
                    "<span class=\"count\">{} services</span></li>",
                ),
                html_escape(&c.slug),
                html_escape(&c.title),
                count
            )
        })
        .collect();

    let list = if cards.is_empty() {
        empty_state(site, "No categories are listed yet.")
    } else {
        format!("<ul class=\"links\">\n{}\n</ul>\n", cards.join("\n"))
    };

    let mut page = Page::new(
        "Device categories",
        "Browse every device category we buy, with services, prices and FAQs for each.",
        "/categories",
    )
    .crumbs(&[("Home", "/"), ("Categories", "/categories")]);
    page.body = format!("<h1>Device categories</h1>\n{}", list);
    page
}

pub fn category_page(site: &SiteContext, category: &ContentItem, index: &HubIndex) -> Page {
    let index = index.listable(site.tenant());
    let slug = category.slug.as_str();
    let path = format!("/categories/{}", slug);

    let description = match &category.details {
        ItemDetails::Category {
            description: Some(d),
            ..
        } => Some(d.as_str()),
        _ => None,
    };

    let services: Vec<&ContentItem> = index
        .services
        .iter()
        .filter(|i| i.has_category(slug))
        .collect();
    let locations = tagged(&index.location_pages, slug, usize::MAX);
    let prices = tagged(&index.price_models, slug, usize::MAX);
    let faqs = tagged(&index.faqs, slug, FAQ_LIMIT);

    let mut page = Page::new(
        category.title.clone(),
        infer_description(
            description.or(category.content.as_deref()),
            &format!("Sell your {} for cash: services, prices and answers.", category.title),
        ),
        path.clone(),
    )
    .crumbs(&[
        ("Home", "/"),
        ("Categories", "/categories"),
        (category.title.as_str(), path.as_str()),
    ]);
    push_faq_data(&mut page, site, &faqs, &[]);

    let lead = description
        .map(|d| format!("<p class=\"lead\">{}</p>\n", html_escape(&strip_html(d))))
        .unwrap_or_default();

    page.body = format!(
        "<h1>{}</h1>\n{}{}{}{}{}{}",
        html_escape(&category.title),
        lead,
        content_html(category.content.as_deref()),
        section(
            "services",
            "Services",
            &link_list(site, &services, "No services in this category yet.")
        ),
        section(
            "locations",
            "Service areas",
            &link_list(site, &locations, "No service areas in this category yet.")
        ),
        section(
            "prices",
            "Prices",
            &link_list(site, &prices, "No prices published for this category yet.")
        ),
        faq_section(site, &faqs, &[]),
    );
    page
}

/// Listable locations grouped by province
pub fn locations_index(site: &SiteContext, index: &HubIndex) -> Page {
    let index = index.listable(site.tenant());

    let mut groups: BTreeMap<String, Vec<&ContentItem>> = BTreeMap::new();
    for location in by_title(&index.location_pages) {
        let province = location_area(location)
            .0
            .map(str::to_string)
            .unwrap_or_else(|| OTHER_AREAS.to_string());
        groups.entry(province).or_default().push(location);
    }

    let body = if groups.is_empty() {
        empty_state(site, "No service areas are listed yet.")
    } else {
        groups
            .iter()
            .map(|(province, items)| {
                format!(
                    "<section class=\"province\">\n<h2>{}</h2>\n{}</section>\n",
                    html_escape(province),
                    link_list(site, items, "")
                )
            })
            .collect()
    };

    let mut page = Page::new(
        "Service areas",
        "Every area where we collect devices, grouped by province.",
        "/locations",
    )
    .crumbs(&[("Home", "/"), ("Locations", "/locations")]);
    page.body = format!("<h1>Service areas</h1>\n{}", body);
    page
}

pub fn location_page(site: &SiteContext, location: &ContentItem, index: &HubIndex) -> Page {
    let index = index.listable(site.tenant());
    let path = format!("/locations/{}", location.slug);
    let (province, district) = location_area(location);

    let services = related_by_category(&index.services, location, RELATED_LIMIT);
    let prices = related_by_category(&index.price_models, location, RELATED_LIMIT);
    let faqs = related_by_category(&index.faqs, location, FAQ_LIMIT);
    let siblings: Vec<&ContentItem> = match province {
        Some(province) => index
            .location_pages
            .iter()
            .filter(|l| l.slug != location.slug)
            .filter(|l| {
                location_area(l)
                    .0
                    .is_some_and(|p| p.eq_ignore_ascii_case(province))
            })
            .take(RELATED_LIMIT)
            .collect(),
        None => Vec::new(),
    };

    let area: Vec<&str> = [district, province].into_iter().flatten().collect();
    let area_label = area.join(", ");
    let seeds = if area_label.is_empty() {
        Vec::new()
    } else {
        location_faq_seeds(&area_label, district.is_some())
    };
    let fallback_description = format!(
        "Device pickup and buy-back in {}.",
        if area_label.is_empty() { &location.title } else { &area_label }
    );

    let mut page = Page::new(
        location.title.clone(),
        infer_description(
            location.content.as_deref(),
            &fallback_description,
        ),
        path.clone(),
    )
    .crumbs(&[
        ("Home", "/"),
        ("Locations", "/locations"),
        (location.title.as_str(), path.as_str()),
    ]);
    page.structured_data.push(jsonld::local_business(
        &site.site_name,
        &site.url(&path),
        &[province.unwrap_or_default(), district.unwrap_or_default()],
        site.contact_url.as_deref(),
    ));
    push_faq_data(&mut page, site, &faqs, &seeds);

    let area_html = if area_label.is_empty() {
        String::new()
    } else {
        format!("<p class=\"area\">{}</p>\n", html_escape(&area_label))
    };

    page.body = format!(
        "<h1>{}</h1>\n{}{}{}{}{}{}",
        html_escape(&location.title),
        area_html,
        content_html(location.content.as_deref()),
        section(
            "related-services",
            "Services in this area",
            &link_list(site, &services, "No services matched for this area yet.")
        ),
        section(
            "related-prices",
            "Prices",
            &link_list(site, &prices, "No prices matched for this area yet.")
        ),
        section(
            "nearby-locations",
            "Nearby areas",
            &link_list(site, &siblings, "No other areas in this province yet.")
        ),
        faq_section(site, &faqs, &seeds),
    );
    page
}

pub fn price_page(site: &SiteContext, price: &ContentItem, index: &HubIndex) -> Page {
    let index = index.listable(site.tenant());
    let path = format!("/prices/{}", price.slug);

    let (device, brand, condition, min, max) = match &price.details {
        ItemDetails::Price {
            device,
            brand,
            condition,
            buy_price_min,
            buy_price_max,
        } => (
            device.as_deref(),
            brand.as_deref(),
            condition.as_deref(),
            *buy_price_min,
            *buy_price_max,
        ),
        _ => (None, None, None, None, None),
    };
    let range = price_range(min, max);

    let services = related_by_category(&index.services, price, RELATED_LIMIT);
    let locations = related_by_category(&index.location_pages, price, RELATED_LIMIT);

    let fallback = match &range {
        Some(range) => format!("We buy {} for {} {}.", price.title, range, PRICE_CURRENCY),
        None => format!("Get a quote for your {}.", price.title),
    };
    let description = infer_description(price.content.as_deref(), &fallback);

    let mut crumbs: Vec<(&str, String)> = vec![
        ("Home", "/".to_string()),
        ("Categories", "/categories".to_string()),
    ];
    if let Some(category) = price.primary_category() {
        crumbs.push((category.name.as_str(), format!("/categories/{}", category.slug.trim())));
    }
    crumbs.push((price.title.as_str(), path.clone()));
    let trail: Vec<(&str, &str)> = crumbs.iter().map(|(n, p)| (*n, p.as_str())).collect();

    let mut page = Page::new(price.title.clone(), description.clone(), path.clone()).crumbs(&trail);
    page.structured_data.push(jsonld::product_offer(
        &site.url(&path),
        &price.title,
        brand,
        &description,
        min,
        max,
        PRICE_CURRENCY,
    ));

    let facts: Vec<String> = [("Device", device), ("Brand", brand), ("Condition", condition)]
        .into_iter()
        .filter_map(|(label, value)| {
            value.map(|v| format!("<dt>{}</dt><dd>{}</dd>", label, html_escape(v)))
        })
        .collect();
    let facts_html = if facts.is_empty() {
        String::new()
    } else {
        format!("<dl class=\"facts\">{}</dl>\n", facts.join(""))
    };

    let range_html = match &range {
        Some(range) => format!(
            "<p class=\"price\">{} {}</p>\n",
            html_escape(range),
            PRICE_CURRENCY
        ),
        None => empty_state(site, "Price on request."),
    };

    page.body = format!(
        "<h1>{}</h1>\n{}{}{}{}{}{}",
        html_escape(&price.title),
        range_html,
        facts_html,
        category_badges(price),
        content_html(price.content.as_deref()),
        section(
            "related-services",
            "Services",
            &link_list(site, &services, "No related services yet.")
        ),
        section(
            "related-locations",
            "Service areas",
            &link_list(site, &locations, "No related service areas yet.")
        ),
    );
    page
}

pub fn service_page(site: &SiteContext, service: &ContentItem, index: &HubIndex) -> Page {
    let index = index.listable(site.tenant());
    let path = format!("/services/{}", service.slug);
    let primary = service.primary_category();

    let locations = related_by_category(&index.location_pages, service, RELATED_LIMIT);
    let prices = related_by_category(&index.price_models, service, RELATED_LIMIT);
    let faqs = related_by_category(&index.faqs, service, FAQ_LIMIT);

    let mut crumbs: Vec<(&str, String)> = vec![
        ("Home", "/".to_string()),
        ("Categories", "/categories".to_string()),
    ];
    if let Some(category) = primary {
        crumbs.push((category.name.as_str(), format!("/categories/{}", category.slug.trim())));
    }
    crumbs.push((service.title.as_str(), path.clone()));
    let trail: Vec<(&str, &str)> = crumbs.iter().map(|(n, p)| (*n, p.as_str())).collect();

    let mut page = Page::new(
        service.title.clone(),
        infer_description(
            service.content.as_deref(),
            "Fast quotes, pickup at your door and payment on the spot.",
        ),
        path.clone(),
    )
    .crumbs(&trail);
    push_faq_data(&mut page, site, &faqs, &[]);

    let lead = primary
        .and_then(|c| c.description.as_deref())
        .map(strip_html)
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| {
            "Quick quotes, pickup in our service areas and payment on the spot.".to_string()
        });

    page.body = format!(
        concat!(
            "{}<h1>{}</h1>\n<p class=\"lead\">{}</p>\n",
            "<p><a class=\"cta\" href=\"{}\">Get a quote</a></p>\n{}{}{}{}",
        ),
        category_badges(service),
        html_escape(&service.title),
        html_escape(&lead),
        html_escape(site.contact_href()),
        content_html(service.content.as_deref()),
        section(
            "related-locations",
            "Service areas",
            &link_list(site, &locations, "No service areas matched yet.")
        ),
        section(
            "related-prices",
            "Prices",
            &link_list(site, &prices, "No prices matched yet.")
        ),
        faq_section(site, &faqs, &[]),
    );
    page
}

pub fn not_found_page(site: &SiteContext, path: &str) -> Page {
    let mut page = Page::new(
        "Page not found",
        "The page you are looking for does not exist.",
        path.to_string(),
    );
    page.noindex = true;
    page.body = format!(
        "<h1>Page not found</h1>\n<p>Nothing is published at <code>{}</code>.</p>\n{}",
        html_escape(path),
        empty_state(site, "Looking for something specific?")
    );
    page
}

/// Shown when the backend could not be reached for a detail route
pub fn unavailable_page(site: &SiteContext, path: &str) -> Page {
    let mut page = Page::new(
        "Temporarily unavailable",
        "This page cannot be loaded right now.",
        path.to_string(),
    );
    page.noindex = true;
    page.body = format!(
        "<h1>Temporarily unavailable</h1>\n<p>Please try again in a moment.</p>\n{}",
        empty_state(site, "Need an answer now?")
    );
    page
}

/// Detail route: absent, unpublished or foreign-tenant items are not found
pub fn detail_page(
    site: &SiteContext,
    kind: ContentKind,
    item: Option<&ContentItem>,
    index: &HubIndex,
) -> Rendered {
    let Some(item) = item.filter(|i| i.kind == kind && i.is_listable(site.tenant())) else {
        return Rendered::NotFound;
    };
    let page = match kind {
        ContentKind::Service => service_page(site, item, index),
        ContentKind::LocationPage => location_page(site, item, index),
        ContentKind::PriceModel => price_page(site, item, index),
        ContentKind::DeviceCategory => category_page(site, item, index),
        ContentKind::Faq => return Rendered::NotFound,
    };
    Rendered::Page(page)
}
