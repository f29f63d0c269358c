//! Canonical GraphQL documents, one per use case.
//!
//! Every content type is queried through the same field names
//! ([`ContentKind::collection_field`], [`ContentKind::item_field`]) and tags
//! always come from `deviceCategories { nodes { ... } }`.

use content_hub_core::ContentKind;

const LIST_LIMIT: u32 = 1000;

const TAG_FIELDS: &str = "deviceCategories { nodes { slug name description } }";

fn operation_name(kind: ContentKind) -> &'static str {
    match kind {
        ContentKind::Service => "Services",
        ContentKind::LocationPage => "LocationPages",
        ContentKind::PriceModel => "PriceModels",
        ContentKind::DeviceCategory => "DeviceCategories",
        ContentKind::Faq => "Faqs",
    }
}

fn kind_fields(kind: ContentKind) -> &'static str {
    match kind {
        ContentKind::Service => "icon",
        ContentKind::LocationPage => "province district",
        ContentKind::PriceModel => "device brand condition buyPriceMin buyPriceMax",
        ContentKind::DeviceCategory => "description icon",
        ContentKind::Faq => "question answer",
    }
}

fn full_fields(kind: ContentKind) -> String {
    let tags = match kind {
        ContentKind::DeviceCategory => "",
        _ => TAG_FIELDS,
    };
    format!(
        "id slug status site title content {} {}",
        kind_fields(kind),
        tags
    )
    .trim_end()
    .to_string()
}

/// Slug, status, site and title for every item of `kind`
pub fn slug_query(kind: ContentKind) -> String {
    format!(
        concat!(
            "query {name}Slugs {{\n",
            "  {field}(first: {limit}) {{\n    nodes {{ slug status site title }}\n  }}\n",
            "}}\n",
        ),
        name = operation_name(kind),
        field = kind.collection_field(),
        limit = LIST_LIMIT,
    )
}

/// Every field of every item of `kind`
pub fn list_query(kind: ContentKind) -> String {
    format!(
        "query {name}List {{\n  {field}(first: {limit}) {{\n    nodes {{ {fields} }}\n  }}\n}}\n",
        name = operation_name(kind),
        field = kind.collection_field(),
        limit = LIST_LIMIT,
        fields = full_fields(kind),
    )
}

/// One item of `kind`, selected by the `$slug` variable
pub fn item_query(kind: ContentKind) -> String {
    format!(
        concat!(
            "query {name}BySlug($slug: ID!) {{\n",
            "  {field}(id: $slug, idType: SLUG) {{ {fields} }}\n",
            "}}\n",
        ),
        name = operation_name(kind),
        field = kind.item_field(),
        fields = full_fields(kind),
    )
}

/// All five collections in one document
pub fn hub_index_query() -> String {
    let mut query = String::from("query HubIndex {\n");
    for kind in ContentKind::ALL {
        query.push_str(&format!(
            "  {field}(first: {limit}) {{\n    nodes {{ {fields} }}\n  }}\n",
            field = kind.collection_field(),
            limit = LIST_LIMIT,
            fields = full_fields(kind),
        ));
    }
    query.push_str("}\n");
    query
}
