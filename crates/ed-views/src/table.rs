//! Paged table model handed to the rendering surface

/// One page of a table, already formatted for display.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableModel {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Zero-based page index
    pub page: usize,
    pub page_count: usize,
    /// Rows across all pages
    pub total_rows: usize,
}

impl TableModel {
    /// Cut page `page` out of `rows`. Out of range pages are clamped.
    pub fn paginate(columns: &[&str], rows: &[Vec<String>], page: usize, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let page_count = page_count(rows.len(), page_size);
        let page = page.min(page_count.saturating_sub(1));
        let start = page * page_size;
        let end = (start + page_size).min(rows.len());

        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: rows.get(start..end).map(<[_]>::to_vec).unwrap_or_default(),
            page,
            page_count,
            total_rows: rows.len(),
        }
    }
}

/// Number of pages needed for `total` rows. An empty table still has one page.
pub fn page_count(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1)).max(1)
}
