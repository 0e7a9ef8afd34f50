use crate::extract::text::truncate_chars;
use crate::extract::{ExtractedDocument, List, ListKind, Table};
use std::fmt::Write;

/// Builds the plain-text digest sent along with a summary prompt
///
/// Sections appear in a fixed order: title, URL, description, paragraphs,
/// tables, lists. Empty sections are left out. The result is cut to
/// `limit` characters.
///
/// # Example
///
/// ```
/// use pagelens::extract::extract_document;
/// use pagelens::summarize::build_digest;
/// use url::Url;
///
/// let url = Url::parse("https://example.com/").unwrap();
/// let doc = extract_document("<title>Hello</title>", &url);
/// let digest = build_digest(&doc, url.as_str(), 4500);
/// assert!(digest.starts_with("Title: Hello\nURL: https://example.com/"));
/// ```
pub fn build_digest(document: &ExtractedDocument, url: &str, limit: usize) -> String {
    let mut digest = String::new();

    let _ = writeln!(digest, "Title: {}", document.title);
    let _ = writeln!(digest, "URL: {}", url);
    if !document.description.is_empty() {
        let _ = writeln!(digest, "Description: {}", document.description);
    }

    if !document.paragraphs.is_empty() {
        digest.push_str("\nContent:\n");
        digest.push_str(&document.paragraphs.join("\n\n"));
        digest.push('\n');
    }

    for (index, table) in document.tables.iter().enumerate() {
        digest.push('\n');
        format_table(&mut digest, index + 1, table);
    }

    for (index, list) in document.lists.iter().enumerate() {
        digest.push('\n');
        format_list(&mut digest, index + 1, list);
    }

    truncate_chars(digest.trim_end(), limit)
}

fn format_table(out: &mut String, number: usize, table: &Table) {
    if table.caption.is_empty() {
        let _ = writeln!(out, "Table {}:", number);
    } else {
        let _ = writeln!(out, "Table {}: {}", number, table.caption);
    }

    if !table.headers.is_empty() {
        let _ = writeln!(out, "{}", table.headers.join(" | "));
    }
    for row in &table.rows {
        let _ = writeln!(out, "{}", row.join(" | "));
    }
}

fn format_list(out: &mut String, number: usize, list: &List) {
    let kind = match list.kind {
        ListKind::Ordered => "ordered",
        ListKind::Unordered => "unordered",
    };
    let _ = writeln!(out, "List {} ({}):", number, kind);
    for item in &list.items {
        let _ = writeln!(out, "- {}", item);
    }
}
