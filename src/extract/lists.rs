use crate::extract::dom::{self, Dom};
use crate::extract::{List, ListKind};

/// Maximum number of lists kept per document
pub const MAX_LISTS: usize = 30;

/// Maximum number of items kept per list
pub const MAX_ITEMS: usize = 60;

/// Extracts up to [`MAX_LISTS`] non-empty `<ul>`/`<ol>` lists
///
/// Items are the direct `<li>` children with non-empty text. A nested list
/// is reported on its own and its text also appears inside the parent item.
pub fn extract_lists(dom: &Dom) -> Vec<List> {
    dom.query("ul, ol")
        .into_iter()
        .filter_map(|list| {
            let kind = if dom::tag(list) == "ol" {
                ListKind::Ordered
            } else {
                ListKind::Unordered
            };

            let items: Vec<String> = dom::children_named(list, &["li"])
                .into_iter()
                .map(dom::text)
                .filter(|item| !item.is_empty())
                .take(MAX_ITEMS)
                .collect();

            if items.is_empty() {
                return None;
            }

            Some(List {
                kind,
                item_count: items.len(),
                items,
            })
        })
        .take(MAX_LISTS)
        .collect()
}
