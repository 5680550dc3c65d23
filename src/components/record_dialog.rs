//! Record detail dialog
//!
//! Lists every field of one sample record; the table only shows the first
//! few columns.

use crate::action::Action;
use crate::component::Component;
use crate::components::layout::inset;
use crate::model::SampleRecord;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

/// Record detail dialog
#[derive(Default)]
pub struct RecordDialog {
    pub scroll_offset: usize,
}

impl Component for RecordDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => Some(Action::ScrollDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::ScrollUp),
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter | KeyCode::Char('v') => {
                Some(Action::CloseModal)
            }
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::ScrollUp => self.scroll_offset = self.scroll_offset.saturating_sub(1),
            Action::ScrollDown => self.scroll_offset = self.scroll_offset.saturating_add(1),
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Needs the record, see draw_with_record
        Ok(())
    }
}

impl RecordDialog {
    pub fn reset(&mut self) {
        self.scroll_offset = 0;
    }

    /// One line per field, names aligned
    pub fn build_lines(record: &SampleRecord) -> Vec<Line<'static>> {
        let name_width = record.keys().map(|k| k.width()).max().unwrap_or(0);
        record
            .fields()
            .iter()
            .map(|(name, value)| {
                let padding = " ".repeat(name_width.saturating_sub(name.width()));
                Line::from(vec![
                    Span::styled(
                        format!("  {}{}", name, padding),
                        Style::default().fg(Color::Cyan),
                    ),
                    Span::raw("  "),
                    Span::raw(value.to_string()),
                ])
            })
            .collect()
    }

    pub fn draw_with_record(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        index: usize,
        record: &SampleRecord,
    ) -> Result<()> {
        frame.render_widget(Clear, area);
        let overlay_area = inset(area, 2);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(3)])
            .split(overlay_area);

        let lines = Self::build_lines(record);
        let visible = chunks[0].height.saturating_sub(2) as usize;
        self.scroll_offset = self.scroll_offset.min(lines.len().saturating_sub(visible));

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" Row {} · {} fields ", index, record.fields().len()))
                    .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .scroll((self.scroll_offset as u16, 0));
        frame.render_widget(paragraph, chunks[0]);

        let help = Paragraph::new(Line::from(vec![
            Span::styled("j/k", Style::default().fg(Color::Cyan)),
            Span::raw(" Scroll  "),
            Span::styled("q/Esc", Style::default().fg(Color::Cyan)),
            Span::raw(" Close"),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[1]);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_lines_lists_all_fields_in_order() {
        let record: SampleRecord =
            serde_json::from_str(r#"{"id": 1, "campaign_id": 13, "flag": null}"#).unwrap();
        let lines: Vec<String> = RecordDialog::build_lines(&record)
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect();

        assert_eq!(
            lines,
            vec![
                "  id           1",
                "  campaign_id  13",
                "  flag         null",
            ]
        );
    }

    #[test]
    fn test_scroll_actions() {
        let mut dialog = RecordDialog::default();
        dialog.update(Action::ScrollUp).unwrap();
        assert_eq!(dialog.scroll_offset, 0);
        dialog.update(Action::ScrollDown).unwrap();
        assert_eq!(dialog.scroll_offset, 1);
        dialog.reset();
        assert_eq!(dialog.scroll_offset, 0);
    }
}
