//! schema.org structured data embedded in rendered pages.

use serde_json::{Value, json};

/// `BreadcrumbList` from (name, absolute url) pairs
pub fn breadcrumb(trail: &[(String, String)]) -> Value {
    let items: Vec<Value> = trail
        .iter()
        .enumerate()
        .map(|(i, (name, url))| {
            json!({
                "@type": "ListItem",
                "position": i + 1,
                "name": name,
                "item": url,
            })
        })
        .collect();

    json!({
        "@context": "https://schema.org",
        "@type": "BreadcrumbList",
        "itemListElement": items,
    })
}

/// `FAQPage` from (question, plain-text answer) pairs; `None` when nothing is answerable
pub fn faq_page(page_url: &str, items: &[(String, String)]) -> Option<Value> {
    let entities: Vec<Value> = items
        .iter()
        .filter(|(q, a)| !q.trim().is_empty() && !a.trim().is_empty())
        .map(|(question, answer)| {
            json!({
                "@type": "Question",
                "name": question,
                "acceptedAnswer": {"@type": "Answer", "text": answer},
            })
        })
        .collect();

    if entities.is_empty() {
        return None;
    }

    Some(json!({
        "@context": "https://schema.org",
        "@type": "FAQPage",
        "@id": format!("{}#faq", page_url),
        "mainEntity": entities,
    }))
}

pub fn local_business(
    name: &str,
    page_url: &str,
    areas: &[&str],
    contact_url: Option<&str>,
) -> Value {
    let mut value = json!({
        "@context": "https://schema.org",
        "@type": "LocalBusiness",
        "@id": format!("{}#business", page_url),
        "name": name,
        "url": page_url,
    });
    let areas: Vec<Value> = areas
        .iter()
        .filter(|a| !a.trim().is_empty())
        .map(|a| json!({"@type": "Place", "name": a}))
        .collect();
    if !areas.is_empty() {
        value["areaServed"] = Value::Array(areas);
    }
    if let Some(contact) = contact_url {
        value["sameAs"] = json!([contact]);
    }
    value
}

/// `Product` with an `AggregateOffer` when a price range is known
pub fn product_offer(
    page_url: &str,
    name: &str,
    brand: Option<&str>,
    description: &str,
    price_min: Option<f64>,
    price_max: Option<f64>,
    currency: &str,
) -> Value {
    let mut value = json!({
        "@context": "https://schema.org",
        "@type": "Product",
        "@id": format!("{}#product", page_url),
        "name": name,
        "url": page_url,
        "description": description,
    });
    if let Some(brand) = brand {
        value["brand"] = json!({"@type": "Brand", "name": brand});
    }

    let low = price_min.or(price_max);
    let high = price_max.or(price_min);
    if let (Some(low), Some(high)) = (low, high) {
        value["offers"] = json!({
            "@type": "AggregateOffer",
            "priceCurrency": currency,
            "lowPrice": low.min(high),
            "highPrice": low.max(high),
            "url": page_url,
        });
    }
    value
}

/// `<script type="application/ld+json">` with `</` escaped so content cannot close the tag
pub fn script_tag(value: &Value) -> String {
    let body = value.to_string().replace("</", "<\\/");
    format!("<script type=\"application/ld+json\">{}</script>", body)
}
