use log::{error, info, warn};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::config::Theme;

/// Notification severity. Each maps to a theme color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
    Warning,
    Info,
}

impl ToastLevel {
    fn color_name(&self) -> &'static str {
        match self {
            ToastLevel::Success => "success",
            ToastLevel::Error => "error",
            ToastLevel::Warning => "warning",
            ToastLevel::Info => "info",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
    remaining_ticks: u16,
}

/// Transient notification stack. Lives on the app; expiry is driven by
/// the event loop's tick.
#[derive(Debug)]
pub struct Toasts {
    items: Vec<Toast>,
    ttl_ticks: u16,
}

impl Toasts {
    pub fn new(ttl_ticks: u16) -> Self {
        Self {
            items: Vec::new(),
            ttl_ticks: ttl_ticks.max(1),
        }
    }

    pub fn push(&mut self, level: ToastLevel, message: impl Into<String>) {
        let message = message.into();
        match level {
            ToastLevel::Error => error!("toast: {message}"),
            ToastLevel::Warning => warn!("toast: {message}"),
            _ => info!("toast: {message}"),
        }
        self.items.push(Toast {
            level,
            message,
            remaining_ticks: self.ttl_ticks,
        });
        // Keep the overlay shallow; oldest entries drop first.
        if self.items.len() > 4 {
            self.items.remove(0);
        }
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(ToastLevel::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(ToastLevel::Error, message);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(ToastLevel::Warning, message);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(ToastLevel::Info, message);
    }

    /// Advance expiry by one tick.
    pub fn tick(&mut self) {
        for toast in &mut self.items {
            toast.remaining_ticks = toast.remaining_ticks.saturating_sub(1);
        }
        self.items.retain(|t| t.remaining_ticks > 0);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.items.iter()
    }
}

/// Overlay widget painting the stack in the top-right corner.
pub struct ToastStack<'a> {
    pub toasts: &'a Toasts,
    pub theme: &'a Theme,
}

impl Widget for ToastStack<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = area.width.min(44);
        let x = area.x + area.width - width;
        let mut y = area.y;
        for toast in self.toasts.iter() {
            if y + 3 > area.y + area.height {
                break;
            }
            let rect = Rect {
                x,
                y,
                width,
                height: 3,
            };
            let color = self.theme.get(toast.level.color_name());
            Clear.render(rect, buf);
            Paragraph::new(toast.message.as_str())
                .style(Style::default().fg(color))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(color)),
                )
                .render(rect, buf);
            y += 3;
        }
    }
}
