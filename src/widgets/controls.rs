use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    widgets::{Paragraph, Widget},
};

/// Bottom key-hint strip with an optional row count on the right.
pub struct Controls<'a> {
    pub entries: &'a [(&'a str, &'a str)],
    pub row_count: Option<usize>,
    pub dimmed: bool,
    pub background: Color,
}

impl<'a> Controls<'a> {
    pub fn new(entries: &'a [(&'a str, &'a str)]) -> Self {
        Self {
            entries,
            row_count: None,
            dimmed: false,
            background: Color::Indexed(236),
        }
    }

    pub fn with_row_count(mut self, row_count: usize) -> Self {
        self.row_count = Some(row_count);
        self
    }

    pub fn with_dimmed(mut self, dimmed: bool) -> Self {
        self.dimmed = dimmed;
        self
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }
}

impl Widget for &Controls<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut constraints = self.entries.iter().fold(vec![], |mut acc, (key, action)| {
            acc.push(Constraint::Length(key.chars().count() as u16 + 2));
            acc.push(Constraint::Length(action.chars().count() as u16 + 1));
            acc
        });
        if self.row_count.is_some() {
            constraints.push(Constraint::Length(16));
        }
        constraints.push(Constraint::Fill(1));

        let layout = Layout::new(Direction::Horizontal, constraints).split(area);
        let base_style = if self.dimmed {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        for (i, (key, action)) in self.entries.iter().enumerate() {
            let j = i * 2;
            Paragraph::new(*key)
                .style(base_style.bold())
                .centered()
                .render(layout[j], buf);
            Paragraph::new(*action)
                .style(base_style.bg(self.background))
                .render(layout[j + 1], buf);
        }

        let mut fill_idx = self.entries.len() * 2;
        if let Some(count) = self.row_count {
            Paragraph::new(format!("Filas: {}", count))
                .style(base_style.bg(self.background).fg(if self.dimmed {
                    Color::DarkGray
                } else {
                    Color::White
                }))
                .right_aligned()
                .render(layout[fill_idx], buf);
            fill_idx += 1;
        }

        Paragraph::new("")
            .style(base_style.bg(self.background))
            .render(layout[fill_idx], buf);
    }
}
