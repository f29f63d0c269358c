//! Decoding of backend payloads into content items.
//!
//! Decoding is lenient: missing collections, null nodes and absent fields are
//! tolerated so that a `{}` fallback payload decodes to empty results.

use content_hub_core::{
    CategoryTag, ContentItem, ContentKind, Error, HubIndex, ItemDetails, PublishStatus, Result,
};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct Connection<T> {
    #[serde(default)]
    nodes: Vec<Option<T>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawTag {
    slug: Option<String>,
    name: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawNode {
    slug: Option<String>,
    status: Option<String>,
    title: Option<String>,
    site: Option<String>,
    content: Option<String>,
    device_categories: Option<Connection<RawTag>>,
    icon: Option<String>,
    province: Option<String>,
    district: Option<String>,
    device: Option<String>,
    brand: Option<String>,
    condition: Option<String>,
    buy_price_min: Option<Value>,
    buy_price_max: Option<Value>,
    description: Option<String>,
    question: Option<String>,
    answer: Option<String>,
}

fn text(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Prices arrive as numbers or as numeric strings depending on the field type
fn number(value: Option<Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse().ok(),
        _ => None,
    }
}

impl RawTag {
    fn into_tag(self) -> Option<CategoryTag> {
        let slug = text(self.slug)?;
        Some(CategoryTag {
            name: text(self.name).unwrap_or_else(|| slug.clone()),
            slug,
            description: text(self.description),
        })
    }
}

impl RawNode {
    fn into_item(self, kind: ContentKind) -> Option<ContentItem> {
        let slug = text(self.slug)?;

        let details = match kind {
            ContentKind::Service => ItemDetails::Service {
                icon: text(self.icon),
            },
            ContentKind::LocationPage => ItemDetails::Location {
                province: text(self.province),
                district: text(self.district),
            },
            ContentKind::PriceModel => ItemDetails::Price {
                device: text(self.device),
                brand: text(self.brand),
                condition: text(self.condition),
                buy_price_min: number(self.buy_price_min),
                buy_price_max: number(self.buy_price_max),
            },
            ContentKind::DeviceCategory => ItemDetails::Category {
                description: text(self.description),
                icon: text(self.icon),
            },
            ContentKind::Faq => ItemDetails::Faq {
                question: text(self.question),
                answer: text(self.answer),
            },
        };

        let categories = self
            .device_categories
            .map(|conn| {
                conn.nodes
                    .into_iter()
                    .flatten()
                    .filter_map(RawTag::into_tag)
                    .collect()
            })
            .unwrap_or_default();

        Some(ContentItem {
            kind,
            title: text(self.title).unwrap_or_else(|| slug.clone()),
            slug,
            status: self
                .status
                .map(PublishStatus::from)
                .unwrap_or_default(),
            site: text(self.site),
            categories,
            content: text(self.content),
            details,
        })
    }
}

fn decode_node(value: &Value, kind: ContentKind) -> Result<Option<ContentItem>> {
    if value.is_null() {
        return Ok(None);
    }
    let node: RawNode = serde_json::from_value(value.clone())
        .map_err(|e| Error::InvalidData(format!("Malformed {} node: {}", kind, e)))?;
    Ok(node.into_item(kind))
}

/// Items of `kind` from `data[collection_field].nodes`
pub(crate) fn decode_collection(data: &Value, kind: ContentKind) -> Result<Vec<ContentItem>> {
    let Some(conn) = data.get(kind.collection_field()) else {
        return Ok(Vec::new());
    };
    if conn.is_null() {
        return Ok(Vec::new());
    }

    let conn: Connection<Value> = serde_json::from_value(conn.clone()).map_err(|e| {
        Error::InvalidData(format!(
            "Malformed {} collection: {}",
            kind.collection_field(),
            e
        ))
    })?;

    let mut items = Vec::with_capacity(conn.nodes.len());
    for node in conn.nodes.iter().flatten() {
        if let Some(item) = decode_node(node, kind)? {
            items.push(item);
        }
    }
    Ok(items)
}

/// The item at `data[item_field]`, if any
pub(crate) fn decode_item(data: &Value, kind: ContentKind) -> Result<Option<ContentItem>> {
    match data.get(kind.item_field()) {
        Some(node) => decode_node(node, kind),
        None => Ok(None),
    }
}

pub(crate) fn decode_hub_index(data: &Value) -> Result<HubIndex> {
    Ok(HubIndex {
        services: decode_collection(data, ContentKind::Service)?,
        location_pages: decode_collection(data, ContentKind::LocationPage)?,
        price_models: decode_collection(data, ContentKind::PriceModel)?,
        device_categories: decode_collection(data, ContentKind::DeviceCategory)?,
        faqs: decode_collection(data, ContentKind::Faq)?,
    })
}
