//! Sample table component
//!
//! Renders the loaded samples with a radio marker per row. The cursor
//! (where `j`/`k` point) is separate from the selection (the row that will
//! be scored); only an explicit select moves the selection.

use crate::model::{DomainState, FetchStatus, SampleRecord, Selection};
use anyhow::Result;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};
use std::ops::Range;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Widest a single column may render
const MAX_COLUMN_WIDTH: usize = 24;
/// Header and separator lines above the rows
const HEADER_LINES: usize = 2;

const SELECTED_MARKER: &str = "(•)";
const UNSELECTED_MARKER: &str = "( )";

/// Cursor and scroll state for the sample table
#[derive(Debug, Default)]
pub struct SampleTable {
    pub cursor: usize,
    scroll: usize,
}

impl SampleTable {
    pub fn next(&mut self, len: usize) {
        if len > 0 {
            self.cursor = (self.cursor + 1).min(len - 1);
        }
    }

    pub fn previous(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn first(&mut self) {
        self.cursor = 0;
    }

    pub fn last(&mut self, len: usize) {
        self.cursor = len.saturating_sub(1);
    }

    /// Keep the cursor visible within `visible` rows
    fn scroll_to_cursor(&mut self, visible: usize) {
        if visible == 0 {
            return;
        }
        if self.cursor < self.scroll {
            self.scroll = self.cursor;
        } else if self.cursor >= self.scroll + visible {
            self.scroll = self.cursor + 1 - visible;
        }
    }

    /// Build table lines for the rows in `range`
    ///
    /// Column widths are computed over all rows so they stay stable while
    /// scrolling.
    pub fn build_table_lines(
        columns: &[String],
        samples: &[SampleRecord],
        selection: &Selection,
        cursor: usize,
        range: Range<usize>,
    ) -> Vec<Line<'static>> {
        let mut col_widths: Vec<usize> = columns.iter().map(|c| c.width()).collect();
        for row in samples {
            for (i, col) in columns.iter().enumerate() {
                col_widths[i] = col_widths[i].max(row.display_value(col).width());
            }
        }
        for width in &mut col_widths {
            *width = (*width).min(MAX_COLUMN_WIDTH);
        }

        let mut lines = Vec::with_capacity(range.len() + HEADER_LINES);

        let header_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let mut header = vec![Span::raw("  "), Span::styled("Sel ", header_style)];
        for (col, width) in columns.iter().zip(&col_widths) {
            header.push(Span::styled(pad(col, *width), header_style));
            header.push(Span::raw(" │ "));
        }
        lines.push(Line::from(header));

        let separator = col_widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("─┼─");
        lines.push(Line::from(Span::styled(
            format!("{}{}", "─".repeat(6), separator),
            Style::default().fg(Color::DarkGray),
        )));

        for (index, row) in samples.iter().enumerate().take(range.end).skip(range.start) {
            let selected = selection.is_selected(index);
            let row_style = if selected {
                Style::default().fg(Color::White).bg(Color::Blue)
            } else {
                Style::default().fg(Color::White)
            };
            let row_style = if index == cursor {
                row_style.add_modifier(Modifier::BOLD)
            } else {
                row_style
            };

            let mut spans = vec![
                Span::styled(
                    if index == cursor { "› " } else { "  " },
                    Style::default().fg(Color::Yellow),
                ),
                Span::styled(
                    format!("{} ", if selected { SELECTED_MARKER } else { UNSELECTED_MARKER }),
                    row_style,
                ),
            ];
            for (col, width) in columns.iter().zip(&col_widths) {
                spans.push(Span::styled(pad(&row.display_value(col), *width), row_style));
                spans.push(Span::raw(" │ "));
            }
            lines.push(Line::from(spans));
        }

        lines
    }

    /// Draw the sample area for the current fetch state
    pub fn draw_with_samples(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        domain: &DomainState,
    ) -> Result<()> {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" Samples ({}) ", domain.samples.len()))
            .border_style(Style::default().fg(Color::DarkGray));

        let message = match &domain.fetch_status {
            FetchStatus::Loading => Some(("Loading samples...", Color::Yellow)),
            FetchStatus::Failed(err) => Some((err.as_str(), Color::Red)),
            FetchStatus::Ready if domain.samples.is_empty() => {
                Some(("No samples available.", Color::DarkGray))
            }
            FetchStatus::Ready => None,
        };

        if let Some((text, color)) = message {
            let paragraph = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(text.to_string(), Style::default().fg(color))),
            ])
            .alignment(Alignment::Center)
            .block(block);
            frame.render_widget(paragraph, area);
            return Ok(());
        }

        let total = domain.samples.len();
        self.cursor = self.cursor.min(total.saturating_sub(1));
        let visible = (area.height as usize).saturating_sub(2 + HEADER_LINES);
        self.scroll_to_cursor(visible);
        let end = (self.scroll + visible).min(total);

        let lines = Self::build_table_lines(
            &domain.columns,
            &domain.samples,
            &domain.selection,
            self.cursor,
            self.scroll..end,
        );
        frame.render_widget(Paragraph::new(lines).block(block), area);

        if total > visible {
            let mut scrollbar_state =
                ScrollbarState::new(total.saturating_sub(visible)).position(self.scroll);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .begin_symbol(Some("↑"))
                    .end_symbol(Some("↓")),
                area.inner(ratatui::layout::Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }

        Ok(())
    }
}

/// Pad or truncate `text` to exactly `width` display columns
fn pad(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    if text.width() > width {
        let budget = width.saturating_sub(1);
        for c in text.chars() {
            let w = c.width().unwrap_or(0);
            if used + w > budget {
                break;
            }
            out.push(c);
            used += w;
        }
        if width > 0 {
            out.push('…');
            used += 1;
        }
    } else {
        out.push_str(text);
        used = text.width();
    }
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn samples() -> Vec<SampleRecord> {
        serde_json::from_str(
            r#"[{"id": 1, "age": 30}, {"id": 2, "age": 45}, {"id": 3, "age": 52}]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_cursor_is_bounded() {
        let mut table = SampleTable::default();
        table.previous();
        assert_eq!(table.cursor, 0);

        table.next(3);
        table.next(3);
        table.next(3);
        assert_eq!(table.cursor, 2);

        table.first();
        assert_eq!(table.cursor, 0);
        table.last(3);
        assert_eq!(table.cursor, 2);

        table.next(0);
        table.last(0);
        assert_eq!(table.cursor, 0);
    }

    #[test]
    fn test_scroll_follows_cursor() {
        let mut table = SampleTable::default();
        table.last(10);
        table.scroll_to_cursor(4);
        assert_eq!(table.scroll, 6);

        table.first();
        table.scroll_to_cursor(4);
        assert_eq!(table.scroll, 0);
    }

    #[test]
    fn test_build_lines_marks_selection_and_cursor() {
        let rows = samples();
        let columns = vec!["id".to_string(), "age".to_string()];
        let mut selection = Selection::default();
        selection.select(1);

        let lines = SampleTable::build_table_lines(&columns, &rows, &selection, 2, 0..3);
        assert_eq!(lines.len(), 5);
        assert!(text(&lines[0]).contains("id"));
        assert!(text(&lines[0]).contains("age"));
        assert!(text(&lines[2]).starts_with("  ( ) 1 "));
        assert!(text(&lines[3]).starts_with("  (•) 2 "));
        assert!(text(&lines[4]).starts_with("› ( ) 3 "));
    }

    #[test]
    fn test_build_lines_respects_range() {
        let rows = samples();
        let columns = vec!["id".to_string()];
        let lines =
            SampleTable::build_table_lines(&columns, &rows, &Selection::default(), 0, 1..2);
        assert_eq!(lines.len(), 3);
        assert!(text(&lines[2]).contains("2"));
    }

    #[test]
    fn test_pad_truncates_wide_values() {
        assert_eq!(pad("abc", 5), "abc  ");
        assert_eq!(pad("abcdefgh", 5), "abcd…");
        assert_eq!(pad("", 2), "  ");
    }
}
