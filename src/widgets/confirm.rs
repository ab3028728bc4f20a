use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Style, Stylize},
    widgets::{Block, Borders, Clear, Padding, Paragraph, Widget, Wrap},
};

use crate::config::Theme;
use crate::widgets::centered_rect;

/// Confirmation dialog for destructive actions. The caller stashes the
/// pending action and applies it only on a `Some(true)` outcome.
#[derive(Default)]
pub struct ConfirmModal {
    pub active: bool,
    title: String,
    message: String,
}

impl ConfirmModal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.active = true;
        self.title = title.into();
        self.message = message.into();
    }

    pub fn close(&mut self) {
        self.active = false;
        self.title.clear();
        self.message.clear();
    }

    /// `Some(outcome)` when the dialog resolved, `None` while it stays up.
    pub fn key(&mut self, key: KeyEvent) -> Option<bool> {
        match key.code {
            KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Enter => Some(true),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(false),
            _ => None,
        }
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        if !self.active {
            return;
        }
        let rect = centered_rect(area, 46, 7);
        Clear.render(rect, buf);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.get("warning")))
            .title(self.title.as_str())
            .padding(Padding::horizontal(1));
        let inner = block.inner(rect);
        block.render(rect, buf);

        Paragraph::new(self.message.as_str())
            .wrap(Wrap { trim: true })
            .render(
                Rect {
                    height: inner.height.saturating_sub(2),
                    ..inner
                },
                buf,
            );
        Paragraph::new("[s] Sí    [n] No")
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
    use crossterm::event::KeyModifiers;

    fn press(modal: &mut ConfirmModal, code: KeyCode) -> Option<bool> {
        modal.key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_outcomes() {
        let mut modal = ConfirmModal::new();
        modal.open("Eliminar", "¿Eliminar el registro?");
        assert_eq!(press(&mut modal, KeyCode::Char('x')), None);
        assert_eq!(press(&mut modal, KeyCode::Char('s')), Some(true));
        assert_eq!(press(&mut modal, KeyCode::Esc), Some(false));
        assert_eq!(press(&mut modal, KeyCode::Enter), Some(true));
    }
}
