use crate::extract::dom::{self, Dom};
use crate::extract::Table;
use scraper::ElementRef;

/// Maximum number of tables kept per document
pub const MAX_TABLES: usize = 10;

/// Maximum number of data rows kept per table
pub const MAX_ROWS: usize = 50;

/// Maximum number of cells kept per row (and header cells per table)
pub const MAX_COLUMNS: usize = 20;

/// Extracts up to [`MAX_TABLES`] tables from the document
///
/// # Header Detection
///
/// 1. Rows inside `<thead>` form the explicit header section; the first one
///    supplies the headers and none of them become data rows.
/// 2. Without a `<thead>`, a first row containing `<th>` cells is taken as
///    the header row and excluded from the data rows.
///
/// Tables with neither headers nor data rows are skipped. Rows of nested
/// tables belong to the nested table only.
pub fn extract_tables(dom: &Dom) -> Vec<Table> {
    dom.query("table")
        .into_iter()
        .filter_map(parse_table)
        .take(MAX_TABLES)
        .collect()
}

fn parse_table(table: ElementRef<'_>) -> Option<Table> {
    let caption = dom::query_within(table, "caption")
        .into_iter()
        .find(|caption| owned_by(*caption, table))
        .map(dom::text)
        .unwrap_or_default();

    let rows: Vec<ElementRef<'_>> = dom::query_within(table, "tr")
        .into_iter()
        .filter(|row| owned_by(*row, table))
        .collect();

    let (header_row, explicit_section) = match rows.iter().find(|row| in_thead(**row)) {
        Some(row) => (Some(*row), true),
        None => match rows.first() {
            Some(first) if !dom::children_named(*first, &["th"]).is_empty() => (Some(*first), false),
            _ => (None, false),
        },
    };

    let headers: Vec<String> = header_row
        .map(|row| {
            dom::children_named(row, &["th", "td"])
                .into_iter()
                .map(dom::text)
                .take(MAX_COLUMNS)
                .collect()
        })
        .unwrap_or_default();

    let data_rows: Vec<Vec<String>> = rows
        .iter()
        .filter(|row| {
            if explicit_section {
                !in_thead(**row)
            } else {
                Some(row.id()) != header_row.map(|header| header.id())
            }
        })
        .map(|row| row_cells(*row))
        .filter(|cells| !cells.is_empty())
        .take(MAX_ROWS)
        .collect();

    if headers.is_empty() && data_rows.is_empty() {
        return None;
    }

    let widest_row = data_rows.iter().map(Vec::len).max().unwrap_or(0);

    Some(Table {
        caption,
        col_count: headers.len().max(widest_row),
        row_count: data_rows.len(),
        headers,
        rows: data_rows,
    })
}

/// Non-empty cell texts of a row, capped at [`MAX_COLUMNS`]
fn row_cells(row: ElementRef<'_>) -> Vec<String> {
    dom::children_named(row, &["td", "th"])
        .into_iter()
        .map(dom::text)
        .filter(|cell| !cell.is_empty())
        .take(MAX_COLUMNS)
        .collect()
}

/// True if the nearest enclosing `<table>` of `element` is `table`
fn owned_by(element: ElementRef<'_>, table: ElementRef<'_>) -> bool {
    dom::closest(element, "table").map(|t| t.id()) == Some(table.id())
}

fn in_thead(row: ElementRef<'_>) -> bool {
    row.parent()
        .and_then(ElementRef::wrap)
        .map(|parent| dom::tag(parent) == "thead")
        .unwrap_or(false)
}
