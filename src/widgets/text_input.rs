use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};
use tui_textarea::TextArea;

/// Event emitted by a [`TextInput`] key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextInputEvent {
    None,
    /// Content changed; caller should re-derive anything bound to it.
    Changed,
    Submit,
    Cancel,
}

/// Single-line text input wrapping tui-textarea.
pub struct TextInput {
    textarea: TextArea<'static>,
    value: String,
    focused: bool,
    text_color: Option<Color>,
    cursor_bg: Option<Color>,
}

impl TextInput {
    pub fn new() -> Self {
        let mut textarea = TextArea::default();
        textarea.set_cursor_line_style(Style::default());
        let mut input = Self {
            textarea,
            value: String::new(),
            focused: false,
            text_color: None,
            cursor_bg: None,
        };
        input.apply_styles();
        input
    }

    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.textarea.set_placeholder_text(placeholder);
        self
    }

    /// Mask every typed character (PIN entry).
    pub fn with_mask(mut self, mask: char) -> Self {
        self.textarea.set_mask_char(mask);
        self
    }

    pub fn with_colors(mut self, text: Color, cursor_bg: Color) -> Self {
        self.text_color = Some(text);
        self.cursor_bg = Some(cursor_bg);
        self.apply_styles();
        self
    }

    fn apply_styles(&mut self) {
        if let Some(color) = self.text_color {
            self.textarea.set_style(Style::default().fg(color));
        }
        let cursor = if self.focused {
            match self.cursor_bg {
                Some(bg) => Style::default().bg(bg),
                None => Style::default().add_modifier(Modifier::REVERSED),
            }
        } else {
            // Hide the cursor while unfocused.
            Style::default()
        };
        self.textarea.set_cursor_style(cursor);
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: &str) {
        self.textarea = TextArea::from([value.to_string()]);
        self.textarea.set_cursor_line_style(Style::default());
        self.textarea.move_cursor(tui_textarea::CursorMove::End);
        self.value = value.to_string();
        self.apply_styles();
    }

    pub fn clear(&mut self) {
        self.set_value("");
    }

    pub fn focused(&self) -> bool {
        self.focused
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        self.apply_styles();
    }

    fn sync(&mut self) {
        self.value = self.textarea.lines().first().cloned().unwrap_or_default();
    }

    pub fn key(&mut self, key: KeyEvent) -> TextInputEvent {
        match key.code {
            KeyCode::Enter => TextInputEvent::Submit,
            KeyCode::Esc => TextInputEvent::Cancel,
            _ => {
                let before = self.value.clone();
                self.textarea.input(key);
                self.sync();
                if self.value != before {
                    TextInputEvent::Changed
                } else {
                    TextInputEvent::None
                }
            }
        }
    }
}

impl Default for TextInput {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for &TextInput {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.textarea.render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(input: &mut TextInput, code: KeyCode) -> TextInputEvent {
        input.key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_typing_updates_value() {
        let mut input = TextInput::new();
        assert_eq!(press(&mut input, KeyCode::Char('h')), TextInputEvent::Changed);
        assert_eq!(press(&mut input, KeyCode::Char('i')), TextInputEvent::Changed);
        assert_eq!(input.value(), "hi");
    }

    #[test]
    fn test_submit_and_cancel() {
        let mut input = TextInput::new();
        assert_eq!(press(&mut input, KeyCode::Enter), TextInputEvent::Submit);
        assert_eq!(press(&mut input, KeyCode::Esc), TextInputEvent::Cancel);
    }

    #[test]
    fn test_set_value_places_cursor_at_end() {
        let mut input = TextInput::new();
        input.set_value("hola");
        press(&mut input, KeyCode::Char('!'));
        assert_eq!(input.value(), "hola!");
    }
}
