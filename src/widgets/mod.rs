//! Presentation widgets built on ratatui.

pub mod confirm;
pub mod controls;
pub mod datatable;
pub mod detail;
pub mod form;
pub mod text_input;
pub mod toast;

use ratatui::layout::Rect;

/// Centered rectangle of at most `width` × `height` within `area`.
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_clamps_to_area() {
        let area = Rect::new(0, 0, 20, 10);
        let rect = centered_rect(area, 40, 40);
        assert_eq!(rect, area);
        let rect = centered_rect(area, 10, 4);
        assert_eq!(rect, Rect::new(5, 3, 10, 4));
    }
}
