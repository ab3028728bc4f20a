use std::ops::Range;

/// Bounds how many of a page's rows are materialized at once.
///
/// The page keeps its full logical height (`content_height`) so scrollbar
/// proportions stay honest, but only a contiguous window of rows is
/// rendered. Purely a render-cost control: it never changes which rows
/// belong to the page.
#[derive(Debug, Clone, Copy)]
pub struct RowWindow {
    row_height: usize,
    visible_rows: usize,
}

impl RowWindow {
    pub fn new(row_height: usize, visible_rows: usize) -> Self {
        Self {
            row_height: row_height.max(1),
            visible_rows,
        }
    }

    pub fn row_height(&self) -> usize {
        self.row_height
    }

    pub fn visible_rows(&self) -> usize {
        self.visible_rows
    }

    /// Total logical height of the page in terminal rows.
    pub fn content_height(&self, page_len: usize) -> usize {
        page_len * self.row_height
    }

    /// Largest useful scroll offset for the page.
    pub fn max_scroll(&self, page_len: usize) -> usize {
        self.content_height(page_len)
            .saturating_sub(self.visible_rows * self.row_height)
    }

    /// First materialized row for a scroll offset, clamped so the window
    /// never starts past the end of the page.
    pub fn start_index(&self, scroll: usize, page_len: usize) -> usize {
        if page_len == 0 {
            return 0;
        }
        (scroll / self.row_height).min(page_len - 1)
    }

    /// The contiguous window of page rows to materialize. A window near
    /// the end simply yields fewer rows.
    pub fn window(&self, scroll: usize, page_len: usize) -> Range<usize> {
        let start = self.start_index(scroll, page_len);
        start..(start + self.visible_rows).min(page_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_is_contiguous_and_bounded() {
        let w = RowWindow::new(1, 5);
        assert_eq!(w.window(0, 20), 0..5);
        assert_eq!(w.window(7, 20), 7..12);
        assert_eq!(w.window(18, 20), 18..20);
        assert!(w.window(3, 20).len() <= w.visible_rows());
    }

    #[test]
    fn test_row_height_scales_start_index() {
        let w = RowWindow::new(4, 3);
        assert_eq!(w.start_index(0, 10), 0);
        assert_eq!(w.start_index(3, 10), 0);
        assert_eq!(w.start_index(4, 10), 1);
        assert_eq!(w.start_index(11, 10), 2);
    }

    #[test]
    fn test_overscroll_clamps() {
        let w = RowWindow::new(1, 5);
        assert_eq!(w.window(500, 20), 19..20);
        assert_eq!(w.window(500, 0), 0..0);
    }

    #[test]
    fn test_content_height_covers_full_page() {
        let w = RowWindow::new(2, 6);
        assert_eq!(w.content_height(15), 30);
        assert_eq!(w.max_scroll(15), 18);
        assert_eq!(w.max_scroll(3), 0);
    }

    #[test]
    fn test_zero_row_height_is_bumped_to_one() {
        let w = RowWindow::new(0, 5);
        assert_eq!(w.row_height(), 1);
    }
}
