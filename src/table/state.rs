use std::collections::HashSet;
use std::ops::Range;

use crate::data::record::{Record, RowId};
use crate::table::pager::Pager;
use crate::table::search::{self, SearchKey};
use crate::table::window::RowWindow;

/// Interaction state for one mounted table: search term, page, scroll,
/// selection, expanded cards. Created when a module is opened and
/// discarded when it is left; the row collection itself stays with the
/// owning module and is only ever read here.
#[derive(Debug, Clone)]
pub struct TableQuery {
    search: String,
    pager: Pager,
    window: RowWindow,
    scroll: usize,
    selected: usize,
    expanded: HashSet<RowId>,
}

impl TableQuery {
    pub fn new(page_size: usize) -> Self {
        Self {
            search: String::new(),
            pager: Pager::new(page_size),
            window: RowWindow::new(1, 0),
            scroll: 0,
            selected: 0,
            expanded: HashSet::new(),
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn page(&self) -> usize {
        self.pager.page()
    }

    pub fn page_size(&self) -> usize {
        self.pager.page_size()
    }

    /// Update the search term. Any actual change resets to page 1 so the
    /// view can never land on a page past the new total.
    pub fn set_search(&mut self, term: impl Into<String>) {
        let term = term.into();
        if term != self.search {
            self.search = term;
            self.pager.reset();
            self.reset_cursor();
        }
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        if page_size != self.pager.page_size() {
            self.pager.set_page_size(page_size);
            self.reset_cursor();
        }
    }

    pub fn go_to(&mut self, page: i64, filtered_len: usize) {
        let before = self.pager.page();
        if self.pager.go_to(page, filtered_len) != before {
            self.reset_cursor();
        }
    }

    pub fn next_page(&mut self, filtered_len: usize) {
        self.go_to(self.pager.page() as i64 + 1, filtered_len);
    }

    pub fn prev_page(&mut self, filtered_len: usize) {
        self.go_to(self.pager.page() as i64 - 1, filtered_len);
    }

    fn reset_cursor(&mut self) {
        self.scroll = 0;
        self.selected = 0;
    }

    /// Render geometry, supplied by the widget each frame (visible budget
    /// from the layout, row height from the viewport class).
    pub fn set_geometry(&mut self, row_height: usize, visible_rows: usize) {
        self.window = RowWindow::new(row_height, visible_rows);
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Move the selection within the current page, scrolling just enough
    /// to keep it inside the materialized window.
    pub fn select_delta(&mut self, delta: i64, page_len: usize) {
        if page_len == 0 {
            self.selected = 0;
            self.scroll = 0;
            return;
        }
        let max = page_len as i64 - 1;
        self.selected = (self.selected as i64 + delta).clamp(0, max) as usize;

        let height = self.window.row_height();
        let visible = self.window.visible_rows().max(1);
        let start = self.window.start_index(self.scroll, page_len);
        if self.selected < start {
            self.scroll = self.selected * height;
        } else if self.selected >= start + visible {
            self.scroll = (self.selected + 1 - visible) * height;
        }
    }

    pub fn scroll_to(&mut self, scroll: usize, page_len: usize) {
        self.scroll = scroll.min(self.window.max_scroll(page_len));
    }

    pub fn is_expanded(&self, id: RowId) -> bool {
        self.expanded.contains(&id)
    }

    pub fn toggle_expanded(&mut self, id: RowId) {
        if !self.expanded.insert(id) {
            self.expanded.remove(&id);
        }
    }

    /// Derive the full filter → paginate → window pipeline for the current
    /// state. Pure over `rows`; the only mutation here is clamping our own
    /// cursor against a collection that may have shrunk since last frame.
    pub fn view<'a>(&mut self, rows: &'a [Record], keys: &[SearchKey]) -> TableView<'a> {
        let filtered = search::filter(rows, keys, &self.search);
        let filtered_len = filtered.as_ref().map_or(rows.len(), Vec::len);

        self.pager.clamp(filtered_len);
        let page_range = self.pager.bounds(filtered_len);
        let page_len = page_range.len();

        self.selected = self.selected.min(page_len.saturating_sub(1));
        self.scroll = self.scroll.min(self.window.max_scroll(page_len));
        let window_range = self.window.window(self.scroll, page_len);

        TableView {
            rows,
            filtered,
            filtered_len,
            page: self.pager.page(),
            total_pages: self.pager.total_pages(filtered_len),
            page_range,
            window_range,
            selected: self.selected,
        }
    }
}

/// One frame's derived slice of the table pipeline.
pub struct TableView<'a> {
    rows: &'a [Record],
    /// `None` means the blank-query passthrough: all rows, no index vec.
    filtered: Option<Vec<usize>>,
    pub filtered_len: usize,
    pub page: usize,
    pub total_pages: usize,
    /// Range into the filtered sequence covered by the current page.
    pub page_range: Range<usize>,
    /// Range into the current page actually materialized.
    pub window_range: Range<usize>,
    pub selected: usize,
}

impl<'a> TableView<'a> {
    pub fn page_len(&self) -> usize {
        self.page_range.len()
    }

    /// Record at a page-relative index.
    pub fn record(&self, page_idx: usize) -> Option<&'a Record> {
        let seq_idx = self.page_range.start + page_idx;
        if seq_idx >= self.page_range.end {
            return None;
        }
        let abs = match &self.filtered {
            Some(indices) => *indices.get(seq_idx)?,
            None => seq_idx,
        };
        self.rows.get(abs)
    }

    /// Materialized rows with their page-relative indices.
    pub fn window_records(&self) -> impl Iterator<Item = (usize, &'a Record)> + '_ {
        self.window_range
            .clone()
            .filter_map(|i| self.record(i).map(|r| (i, r)))
    }

    pub fn selected_record(&self) -> Option<&'a Record> {
        self.record(self.selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::record::Value;

    fn rows(n: usize) -> Vec<Record> {
        (0..n)
            .map(|i| {
                Record::new(i as RowId)
                    .with("nombre", Value::text(format!("Fila {i}")))
                    .with(
                        "estado",
                        Value::status(if i % 2 == 0 { "Activo" } else { "Inactivo" }),
                    )
            })
            .collect()
    }

    fn keys() -> Vec<SearchKey> {
        vec![SearchKey::new("nombre"), SearchKey::new("estado")]
    }

    #[test]
    fn test_search_change_resets_page() {
        let data = rows(50);
        let mut table = TableQuery::new(10);
        table.set_geometry(1, 8);
        table.go_to(3, 50);
        assert_eq!(table.page(), 3);

        table.set_search("activo");
        let view = table.view(&data, &keys());
        assert_eq!(view.page, 1);
        assert_eq!(view.filtered_len, 25);
    }

    #[test]
    fn test_passthrough_view_covers_all_rows() {
        let data = rows(23);
        let mut table = TableQuery::new(8);
        table.set_geometry(1, 8);
        let view = table.view(&data, &keys());
        assert_eq!(view.total_pages, 3);
        assert_eq!(view.page_len(), 8);
        assert_eq!(view.record(0).unwrap().id(), 0);
    }

    #[test]
    fn test_window_follows_selection() {
        let data = rows(30);
        let mut table = TableQuery::new(20);
        table.set_geometry(1, 5);
        let view = table.view(&data, &keys());
        assert_eq!(view.window_range, 0..5);

        for _ in 0..7 {
            table.select_delta(1, 20);
        }
        let view = table.view(&data, &keys());
        assert_eq!(view.selected, 7);
        assert_eq!(view.window_range, 3..8);
        assert!(view.window_range.contains(&view.selected));
    }

    #[test]
    fn test_shrunk_collection_clamps_page() {
        let mut data = rows(23);
        let mut table = TableQuery::new(8);
        table.set_geometry(1, 8);
        table.go_to(3, 23);

        data.truncate(5);
        let view = table.view(&data, &keys());
        assert_eq!(view.page, 1);
        assert_eq!(view.page_len(), 5);
    }

    #[test]
    fn test_filtered_record_mapping() {
        let data = rows(10);
        let mut table = TableQuery::new(8);
        table.set_geometry(1, 8);
        table.set_search("inactivo");
        let view = table.view(&data, &keys());
        assert_eq!(view.filtered_len, 5);
        let ids: Vec<RowId> = (0..view.page_len())
            .map(|i| view.record(i).unwrap().id())
            .collect();
        assert_eq!(ids, vec![1, 3, 5, 7, 9]);
    }
}
