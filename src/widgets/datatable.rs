use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{
        Cell, Paragraph, Row, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget,
        Table, TableState, Widget,
    },
};

use crate::config::Theme;
use crate::data::record::Record;
use crate::modules::TailColumn;
use crate::table::columns::{visible_columns, ColumnSpec, Viewport};
use crate::table::search::SearchKey;
use crate::table::state::{TableQuery, TableView};

/// Generic searchable, paginated, virtualized table.
///
/// The widget owns presentation only; all pipeline state lives in the
/// [`TableQuery`] passed to `render`, and the row collection is borrowed
/// read-only from the caller.
pub struct DataTable<'a> {
    pub rows: &'a [Record],
    pub columns: &'a [ColumnSpec],
    pub search_keys: &'a [SearchKey],
    pub viewport: Viewport,
    pub placeholder: &'a str,
    pub create_label: &'a str,
    pub search_active: bool,
    pub tail: Option<&'a TailColumn>,
    pub card_height: u16,
    pub cell_padding: u16,
    pub theme: &'a Theme,
}

impl<'a> DataTable<'a> {
    /// Fit column widths to the materialized window, in the order given.
    /// Declared widths win; the rest grow to their widest visible cell.
    /// Columns that no longer fit are dropped, except that a final
    /// partially-fitting column keeps whatever width remains.
    fn fit_widths(&self, visible: &[usize], view: &TableView, max_width: u16) -> Vec<u16> {
        let mut widths: Vec<u16> = Vec::with_capacity(visible.len());
        let mut used: u16 = 0;
        for &col_idx in visible {
            let col = &self.columns[col_idx];
            let width = col.width.unwrap_or_else(|| {
                let mut w = col.header.chars().count() as u16;
                for (_, record) in view.window_records() {
                    w = w.max(record.display(&col.key).chars().count() as u16);
                }
                w
            });
            if used + width > max_width {
                let remaining = max_width.saturating_sub(used);
                if remaining > 3 {
                    widths.push(remaining);
                }
                break;
            }
            widths.push(width);
            used += width + self.cell_padding;
        }
        widths
    }

    fn render_search_bar(&self, area: Rect, buf: &mut Buffer, state: &TableQuery) {
        let create_hint = format!("[n] {}", self.create_label);
        let layout = Layout::new(
            Direction::Horizontal,
            [
                Constraint::Fill(1),
                Constraint::Length(create_hint.chars().count() as u16 + 1),
            ],
        )
        .split(area);

        let mut spans = vec![Span::styled(
            "Buscar ",
            Style::default().fg(self.theme.get("dimmed")),
        )];
        if state.search().is_empty() && !self.search_active {
            spans.push(Span::styled(
                self.placeholder,
                Style::default().fg(self.theme.get("dimmed")).italic(),
            ));
        } else {
            spans.push(Span::raw(state.search().to_string()));
        }
        if self.search_active {
            spans.push(Span::styled("█", Style::default().fg(self.theme.get("primary"))));
        }
        Paragraph::new(Line::from(spans)).render(layout[0], buf);

        Paragraph::new(create_hint)
            .style(Style::default().fg(self.theme.get("secondary")))
            .right_aligned()
            .render(layout[1], buf);
    }

    fn render_wide(&self, area: Rect, buf: &mut Buffer, view: &TableView) {
        let visible = visible_columns(self.columns, Viewport::Wide);
        let tail_width = self.tail.map(|t| t.header.chars().count().max(3) as u16 + 1);
        let table_width = area.width.saturating_sub(1 + tail_width.unwrap_or(0));
        let mut widths = self.fit_widths(&visible, view, table_width);
        let shown = widths.len();

        let header_style = Style::default()
            .bg(self.theme.get("controls_bg"))
            .fg(self.theme.get("table_header"));
        let mut headers: Vec<Cell> = visible
            .iter()
            .take(shown)
            .map(|&i| Cell::from(self.columns[i].header.as_str()))
            .collect();
        if let Some(tail) = self.tail {
            headers.push(Cell::from(tail.header));
            widths.push(tail_width.unwrap_or(0));
        }

        let rows: Vec<Row> = view
            .window_records()
            .map(|(_, record)| {
                let mut cells: Vec<Cell> = visible
                    .iter()
                    .take(shown)
                    .map(|&i| Cell::from(record.display(&self.columns[i].key)))
                    .collect();
                if let Some(tail) = self.tail {
                    cells.push(Cell::from(format!("[{}]", tail.action.key())));
                }
                Row::new(cells)
            })
            .collect();

        let mut table_state = TableState::default();
        if view.window_range.contains(&view.selected) {
            table_state.select(Some(view.selected - view.window_range.start));
        }

        let constraints: Vec<Constraint> = widths.iter().map(|w| Constraint::Length(*w)).collect();
        StatefulWidget::render(
            Table::new(rows, constraints)
                .column_spacing(self.cell_padding)
                .header(Row::new(headers).style(header_style))
                .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED)),
            Rect {
                width: area.width.saturating_sub(1),
                ..area
            },
            buf,
            &mut table_state,
        );
    }

    fn render_cards(&self, area: Rect, buf: &mut Buffer, state: &TableQuery, view: &TableView) {
        let compact = visible_columns(self.columns, Viewport::Narrow);
        let hidden: Vec<usize> = (0..self.columns.len())
            .filter(|i| !compact.contains(i))
            .collect();
        let card_height = self.card_height.max(2);

        let mut y = area.y;
        for (page_idx, record) in view.window_records() {
            if y >= area.y + area.height {
                break;
            }
            let selected = page_idx == view.selected;
            let expanded = state.is_expanded(record.id());

            // Title line: marker + leading compact field.
            let marker = if expanded { "▾ " } else { "▸ " };
            let title = compact
                .first()
                .map(|&i| record.display(&self.columns[i].key))
                .unwrap_or_default();
            let title_style = if selected {
                Style::default().add_modifier(Modifier::REVERSED).bold()
            } else {
                Style::default().fg(self.theme.get("primary")).bold()
            };
            if y < area.y + area.height {
                Paragraph::new(format!("{marker}{title}"))
                    .style(title_style)
                    .render(Rect { y, height: 1, ..area }, buf);
            }

            // Remaining compact fields on the second line.
            if card_height >= 2 && y + 1 < area.y + area.height {
                let summary = join_fields(record, self.columns, compact.iter().skip(1).copied());
                Paragraph::new(summary).render(
                    Rect {
                        x: area.x + 2,
                        y: y + 1,
                        width: area.width.saturating_sub(2),
                        height: 1,
                    },
                    buf,
                );
            }

            // The rest of the card: hidden columns when expanded, a hint
            // otherwise. Card height is fixed either way so the window
            // math stays valid.
            for extra in 2..card_height {
                let line_y = y + extra;
                if line_y >= area.y + area.height {
                    break;
                }
                let rect = Rect {
                    x: area.x + 2,
                    y: line_y,
                    width: area.width.saturating_sub(2),
                    height: 1,
                };
                if expanded {
                    let per_line = hidden.len().div_ceil((card_height - 2) as usize).max(1);
                    let chunk = hidden
                        .iter()
                        .skip((extra as usize - 2) * per_line)
                        .take(per_line)
                        .copied();
                    Paragraph::new(join_fields(record, self.columns, chunk))
                        .style(Style::default().fg(self.theme.get("dimmed")))
                        .render(rect, buf);
                } else if extra == card_height - 1 && !hidden.is_empty() {
                    Paragraph::new("␣ expandir")
                        .style(Style::default().fg(self.theme.get("dimmed")).italic())
                        .render(rect, buf);
                }
            }

            y += card_height;
        }
    }

    fn render_footer(&self, area: Rect, buf: &mut Buffer, view: &TableView) {
        let left = format!("◂ Página {}/{} ▸", view.page, view.total_pages);
        let right = match view.filtered_len {
            1 => "1 resultado".to_string(),
            n => format!("{n} resultados"),
        };
        let style = Style::default().fg(self.theme.get("dimmed"));
        Paragraph::new(left).style(style).render(area, buf);
        Paragraph::new(right)
            .style(style)
            .right_aligned()
            .render(area, buf);
    }
}

fn join_fields<'a>(
    record: &Record,
    columns: &[ColumnSpec],
    indices: impl Iterator<Item = usize> + 'a,
) -> String {
    indices
        .map(|i| format!("{}: {}", columns[i].header, record.display(&columns[i].key)))
        .collect::<Vec<_>>()
        .join(" · ")
}

impl StatefulWidget for DataTable<'_> {
    type State = TableQuery;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let layout = Layout::new(
            Direction::Vertical,
            [
                Constraint::Length(1),
                Constraint::Fill(1),
                Constraint::Length(1),
            ],
        )
        .split(area);
        let body = layout[1];

        // Geometry first: the view derivation clamps scroll and selection
        // against whatever fits this frame.
        let (row_height, budget_rows) = if self.viewport.is_narrow() {
            let h = self.card_height.max(2) as usize;
            (h, (body.height as usize) / h)
        } else {
            (1, body.height.saturating_sub(1) as usize)
        };
        state.set_geometry(row_height, budget_rows);
        let view = state.view(self.rows, self.search_keys);

        self.render_search_bar(layout[0], buf, state);
        self.render_footer(layout[2], buf, &view);

        if view.page_len() == 0 {
            let message = if view.filtered_len == 0 && !state.search().is_empty() {
                "Sin resultados para la búsqueda"
            } else {
                "Sin registros"
            };
            Paragraph::new(message)
                .style(Style::default().fg(self.theme.get("dimmed")))
                .centered()
                .render(
                    Rect {
                        y: body.y + body.height / 2,
                        height: 1,
                        ..body
                    },
                    buf,
                );
            return;
        }

        if self.viewport.is_narrow() {
            self.render_cards(body, buf, state, &view);
        } else {
            self.render_wide(body, buf, &view);
        }

        // Scrollbar over the page's full logical height, so proportions
        // reflect rows that exist but are not materialized.
        let content_height = view.page_len() * row_height;
        let viewport_height = budget_rows * row_height;
        if content_height > viewport_height {
            let mut scrollbar_state = ScrollbarState::new(content_height.saturating_sub(viewport_height))
                .position(view.window_range.start * row_height);
            StatefulWidget::render(
                Scrollbar::new(ScrollbarOrientation::VerticalRight),
                body,
                buf,
                &mut scrollbar_state,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, Theme};
    use crate::data::record::Value;
    use crate::table::TableQuery;

    fn sample_rows(n: usize) -> Vec<Record> {
        (0..n)
            .map(|i| {
                Record::new(i as u64)
                    .with("nombre", Value::text(format!("Cliente {i}")))
                    .with("estado", Value::status("Activo"))
            })
            .collect()
    }

    fn render_to_buffer(viewport: Viewport, rows: &[Record], state: &mut TableQuery) -> Buffer {
        let theme = Theme::from_config(&AppConfig::default().theme).unwrap();
        let columns = vec![
            ColumnSpec::new("nombre", "Nombre"),
            ColumnSpec::new("estado", "Estado"),
        ];
        let keys = vec![SearchKey::new("nombre")];
        let table = DataTable {
            rows,
            columns: &columns,
            search_keys: &keys,
            viewport,
            placeholder: "Buscar...",
            create_label: "Nuevo",
            search_active: false,
            tail: None,
            card_height: 3,
            cell_padding: 2,
            theme: &theme,
        };
        let area = Rect::new(0, 0, 60, 12);
        let mut buf = Buffer::empty(area);
        table.render(area, &mut buf, state);
        buf
    }

    fn buffer_text(buf: &Buffer) -> String {
        let mut out = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                out.push_str(buf[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn test_wide_render_shows_header_and_rows() {
        let rows = sample_rows(5);
        let mut state = TableQuery::new(10);
        let text = buffer_text(&render_to_buffer(Viewport::Wide, &rows, &mut state));
        assert!(text.contains("Nombre"));
        assert!(text.contains("Cliente 0"));
        assert!(text.contains("Página 1/1"));
        assert!(text.contains("5 resultados"));
    }

    #[test]
    fn test_window_bounds_materialized_rows() {
        // 12-row area: 1 search + 1 footer + 10 body = 9 table rows after
        // the header. Page size 20 keeps 20 rows on the page; only the
        // window should be painted.
        let rows = sample_rows(20);
        let mut state = TableQuery::new(20);
        let text = buffer_text(&render_to_buffer(Viewport::Wide, &rows, &mut state));
        assert!(text.contains("Cliente 0"));
        assert!(!text.contains("Cliente 15"));
    }

    #[test]
    fn test_empty_search_message() {
        let rows = sample_rows(3);
        let mut state = TableQuery::new(10);
        state.set_search("zzz");
        let text = buffer_text(&render_to_buffer(Viewport::Wide, &rows, &mut state));
        assert!(text.contains("Sin resultados"));
    }

    #[test]
    fn test_narrow_render_uses_cards() {
        let rows = sample_rows(4);
        let mut state = TableQuery::new(10);
        let text = buffer_text(&render_to_buffer(Viewport::Narrow, &rows, &mut state));
        assert!(text.contains("▸ Cliente 0"));
    }
}
