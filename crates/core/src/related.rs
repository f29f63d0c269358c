//! Cross-linking of content items that share a device category.
//!
//! Two items are related iff their category tag sets intersect. Results keep
//! the order of the candidate pool; upstream queries already return items in
//! editorial order, so no scoring is applied here.

use crate::types::ContentItem;

/// True iff `a` and `b` share at least one category tag.
pub fn shares_category(a: &ContentItem, b: &ContentItem) -> bool {
    a.tag_slugs().any(|slug| b.has_category(slug))
}

fn is_same_item(a: &ContentItem, b: &ContentItem) -> bool {
    a.kind == b.kind && a.slug == b.slug
}

/// Candidates from `pool` related to `subject`, in pool order, at most `limit`.
///
/// The subject itself is never returned, even when present in the pool.
pub fn related_by_category<'a>(
    pool: &'a [ContentItem],
    subject: &ContentItem,
    limit: usize,
) -> Vec<&'a ContentItem> {
    pool.iter()
        .filter(|candidate| !is_same_item(candidate, subject))
        .filter(|candidate| shares_category(subject, candidate))
        .take(limit)
        .collect()
}
