use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Paragraph, Widget},
};

use crate::config::Theme;
use crate::data::record::Record;
use crate::table::ColumnSpec;
use crate::widgets::centered_rect;

/// Read-only record view: every column, regardless of viewport class.
#[derive(Default)]
pub struct DetailModal {
    pub active: bool,
    title: String,
    lines: Vec<(String, String)>,
}

impl DetailModal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, title: impl Into<String>, record: &Record, columns: &[ColumnSpec]) {
        self.active = true;
        self.title = title.into();
        self.lines = columns
            .iter()
            .map(|col| (col.header.clone(), record.display(&col.key)))
            .collect();
    }

    pub fn close(&mut self) {
        self.active = false;
        self.lines.clear();
    }

    pub fn key(&mut self, key: KeyEvent) -> bool {
        matches!(
            key.code,
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('v')
        )
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        if !self.active {
            return;
        }
        let label_width = self
            .lines
            .iter()
            .map(|(label, _)| label.chars().count())
            .max()
            .unwrap_or(0);
        let height = (self.lines.len() as u16 + 4).min(area.height);
        let rect = centered_rect(area, 56, height);
        Clear.render(rect, buf);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.get("modal_border")))
            .title(self.title.as_str())
            .padding(Padding::horizontal(1));
        let inner = block.inner(rect);
        block.render(rect, buf);

        let text: Vec<Line> = self
            .lines
            .iter()
            .map(|(label, value)| {
                Line::from(vec![
                    Span::styled(
                        format!("{label:label_width$}  "),
                        Style::default().fg(theme.get("dimmed")),
                    ),
                    Span::raw(value.as_str()),
                ])
            })
            .collect();
        Paragraph::new(text).render(
            Rect {
                height: inner.height.saturating_sub(1),
                ..inner
            },
            buf,
        );
        Paragraph::new("Esc Cerrar")
            .style(Style::default().fg(theme.get("dimmed")).bold())
            .centered()
            .render(
                Rect {
                    y: inner.y + inner.height.saturating_sub(1),
                    height: 1,
                    ..inner
                },
                buf,
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::record::Value;

    #[test]
    fn test_open_collects_column_values() {
        let record = Record::new(1)
            .with("nombre", Value::text("Juan"))
            .with("estado", Value::status("Activo"));
        let columns = vec![
            ColumnSpec::new("nombre", "Nombre"),
            ColumnSpec::new("estado", "Estado"),
        ];
        let mut modal = DetailModal::new();
        modal.open("Cliente", &record, &columns);
        assert!(modal.active);
        assert_eq!(modal.lines[0], ("Nombre".into(), "Juan".into()));
        assert_eq!(modal.lines[1], ("Estado".into(), "Activo".into()));
    }
}
