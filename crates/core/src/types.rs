use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Editorial content types served by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Service,
    LocationPage,
    PriceModel,
    DeviceCategory,
    Faq,
}

impl ContentKind {
    pub const ALL: [ContentKind; 5] = [
        ContentKind::Service,
        ContentKind::LocationPage,
        ContentKind::PriceModel,
        ContentKind::DeviceCategory,
        ContentKind::Faq,
    ];

    /// GraphQL field holding the collection of this kind
    pub fn collection_field(&self) -> &'static str {
        match self {
            ContentKind::Service => "services",
            ContentKind::LocationPage => "locationPages",
            ContentKind::PriceModel => "priceModels",
            ContentKind::DeviceCategory => "deviceCategories",
            ContentKind::Faq => "faqs",
        }
    }

    /// GraphQL field resolving a single item of this kind by slug
    pub fn item_field(&self) -> &'static str {
        match self {
            ContentKind::Service => "service",
            ContentKind::LocationPage => "locationPage",
            ContentKind::PriceModel => "priceModel",
            ContentKind::DeviceCategory => "deviceCategory",
            ContentKind::Faq => "faq",
        }
    }

    /// Public URL prefix. FAQs are rendered inline and have no page of their own.
    pub fn path_prefix(&self) -> Option<&'static str> {
        match self {
            ContentKind::Service => Some("/services"),
            ContentKind::LocationPage => Some("/locations"),
            ContentKind::PriceModel => Some("/prices"),
            ContentKind::DeviceCategory => Some("/categories"),
            ContentKind::Faq => None,
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContentKind::Service => "service",
            ContentKind::LocationPage => "location page",
            ContentKind::PriceModel => "price model",
            ContentKind::DeviceCategory => "device category",
            ContentKind::Faq => "faq",
        };
        f.write_str(name)
    }
}

/// Editorial visibility state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PublishStatus {
    Publish,
    Draft,
    Private,
    Other(String),
}

impl From<&str> for PublishStatus {
    fn from(raw: &str) -> Self {
        let normalized = raw.trim().to_lowercase();
        match normalized.as_str() {
            "publish" => PublishStatus::Publish,
            "draft" => PublishStatus::Draft,
            "private" => PublishStatus::Private,
            _ => PublishStatus::Other(normalized),
        }
    }
}

impl From<String> for PublishStatus {
    fn from(raw: String) -> Self {
        PublishStatus::from(raw.as_str())
    }
}

impl From<PublishStatus> for String {
    fn from(status: PublishStatus) -> Self {
        match status {
            PublishStatus::Publish => "publish".to_string(),
            PublishStatus::Draft => "draft".to_string(),
            PublishStatus::Private => "private".to_string(),
            PublishStatus::Other(s) => s,
        }
    }
}

impl Default for PublishStatus {
    fn default() -> Self {
        PublishStatus::Other(String::new())
    }
}

/// Classification label shared across content types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTag {
    pub slug: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Attributes that only exist on one kind of item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemDetails {
    Service {
        icon: Option<String>,
    },
    Location {
        province: Option<String>,
        district: Option<String>,
    },
    Price {
        device: Option<String>,
        brand: Option<String>,
        condition: Option<String>,
        buy_price_min: Option<f64>,
        buy_price_max: Option<f64>,
    },
    Category {
        description: Option<String>,
        icon: Option<String>,
    },
    Faq {
        question: Option<String>,
        answer: Option<String>,
    },
}

/// One unit of editorial content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub kind: ContentKind,
    pub slug: String,
    pub status: PublishStatus,
    pub title: String,
    /// Tenant discriminator; absent on single-tenant backends
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
    pub categories: Vec<CategoryTag>,
    /// HTML body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub details: ItemDetails,
}

impl ContentItem {
    pub fn is_published(&self) -> bool {
        self.status == PublishStatus::Publish
    }

    /// Items without a discriminator belong to every tenant.
    pub fn belongs_to(&self, tenant: Option<&str>) -> bool {
        let Some(tenant) = tenant else {
            return true;
        };
        match self.site.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(site) => site.eq_ignore_ascii_case(tenant.trim()),
        }
    }

    /// Published and visible for the tenant
    pub fn is_listable(&self, tenant: Option<&str>) -> bool {
        !self.slug.trim().is_empty() && self.is_published() && self.belongs_to(tenant)
    }

    pub fn path(&self) -> Option<String> {
        self.kind
            .path_prefix()
            .map(|prefix| format!("{}/{}", prefix, self.slug))
    }

    pub fn tag_slugs(&self) -> impl Iterator<Item = &str> {
        self.categories
            .iter()
            .map(|c| c.slug.trim())
            .filter(|s| !s.is_empty())
    }

    pub fn has_category(&self, slug: &str) -> bool {
        self.tag_slugs().any(|s| s == slug)
    }

    /// First category with a description, else the first category
    pub fn primary_category(&self) -> Option<&CategoryTag> {
        self.categories
            .iter()
            .find(|c| c.description.as_deref().is_some_and(|d| !d.trim().is_empty()))
            .or_else(|| self.categories.first())
    }
}

/// Every collection the hub pages cross-link between
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HubIndex {
    pub services: Vec<ContentItem>,
    pub location_pages: Vec<ContentItem>,
    pub price_models: Vec<ContentItem>,
    pub device_categories: Vec<ContentItem>,
    pub faqs: Vec<ContentItem>,
}

impl HubIndex {
    /// Copy keeping only publicly listable items
    pub fn listable(&self, tenant: Option<&str>) -> HubIndex {
        let keep = |items: &[ContentItem]| -> Vec<ContentItem> {
            items
                .iter()
                .filter(|i| i.is_listable(tenant))
                .cloned()
                .collect()
        };
        HubIndex {
            services: keep(&self.services),
            location_pages: keep(&self.location_pages),
            price_models: keep(&self.price_models),
            device_categories: keep(&self.device_categories),
            faqs: keep(&self.faqs),
        }
    }

    pub fn collection(&self, kind: ContentKind) -> &[ContentItem] {
        match kind {
            ContentKind::Service => &self.services,
            ContentKind::LocationPage => &self.location_pages,
            ContentKind::PriceModel => &self.price_models,
            ContentKind::DeviceCategory => &self.device_categories,
            ContentKind::Faq => &self.faqs,
        }
    }
}

/// Sitemap `<changefreq>` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeFrequency::Always => "always",
            ChangeFrequency::Hourly => "hourly",
            ChangeFrequency::Daily => "daily",
            ChangeFrequency::Weekly => "weekly",
            ChangeFrequency::Monthly => "monthly",
            ChangeFrequency::Yearly => "yearly",
            ChangeFrequency::Never => "never",
        }
    }
}

impl fmt::Display for ChangeFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeFrequency {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "always" => Ok(ChangeFrequency::Always),
            "hourly" => Ok(ChangeFrequency::Hourly),
            "daily" => Ok(ChangeFrequency::Daily),
            "weekly" => Ok(ChangeFrequency::Weekly),
            "monthly" => Ok(ChangeFrequency::Monthly),
            "yearly" => Ok(ChangeFrequency::Yearly),
            "never" => Ok(ChangeFrequency::Never),
            other => Err(crate::Error::InvalidData(format!(
                "Unknown change frequency '{}'",
                other
            ))),
        }
    }
}

/// One indexable page, built fresh for every sitemap request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SitemapEntry {
    pub url: String,
    pub last_modified: DateTime<Utc>,
    pub change_frequency: ChangeFrequency,
    pub priority: f32,
}

impl SitemapEntry {
    pub fn new(
        url: impl Into<String>,
        last_modified: DateTime<Utc>,
        change_frequency: ChangeFrequency,
        priority: f32,
    ) -> Self {
        Self {
            url: url.into(),
            last_modified,
            change_frequency,
            priority: priority.clamp(0.0, 1.0),
        }
    }
}

/// Strip trailing slashes so `/a/` and `/a` collapse to one URL
pub fn normalize_url(url: &str) -> String {
    let trimmed = url.trim();
    let stripped = trimmed.trim_end_matches('/');
    if stripped.is_empty() {
        trimmed.to_string()
    } else {
        stripped.to_string()
    }
}
