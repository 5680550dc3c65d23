//! Predict bar and business interpretation panel

use crate::model::interpretation::{interpret, SCORE_NOTE};
use crate::model::PredictStatus;
use anyhow::Result;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Build the predict bar: trigger button followed by the outcome or error
///
/// `enabled` is whether the trigger accepts a press right now.
pub fn predict_bar_line(status: &PredictStatus, enabled: bool) -> Line<'static> {
    let mut spans = Vec::new();

    if status.is_predicting() {
        spans.push(Span::styled(
            "[ Predicting... ]",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
    } else if enabled {
        spans.push(Span::styled(
            "[ PREDICT ]",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ));
    } else {
        spans.push(Span::styled(
            "[ PREDICT ]",
            Style::default().fg(Color::DarkGray),
        ));
    }

    match status {
        PredictStatus::Succeeded { .. } => {
            if let Some(interpretation) = interpret(status.outcome()) {
                spans.push(Span::raw("  "));
                spans.push(Span::styled(
                    "Prediction: ",
                    Style::default().add_modifier(Modifier::BOLD),
                ));
                spans.push(Span::raw(interpretation.prediction));
                if let Some(probability) = interpretation.probability {
                    spans.push(Span::raw("  "));
                    spans.push(Span::styled(
                        "Probability: ",
                        Style::default().add_modifier(Modifier::BOLD),
                    ));
                    spans.push(Span::raw(probability));
                }
            }
        }
        PredictStatus::Failed { message, .. } => {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(message.clone(), Style::default().fg(Color::Red)));
        }
        PredictStatus::Idle if !enabled => {
            spans.push(Span::styled(
                "  Select a row with Space, then press p",
                Style::default().fg(Color::DarkGray),
            ));
        }
        _ => {}
    }

    Line::from(spans)
}

pub fn draw_predict_bar(
    frame: &mut Frame,
    area: Rect,
    status: &PredictStatus,
    enabled: bool,
) -> Result<()> {
    let title = match status.completed_at() {
        Some(at) => format!(" Predict · {} ", at.format("%H:%M:%S")),
        None => " Predict ".to_string(),
    };
    let paragraph = Paragraph::new(predict_bar_line(status, enabled)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(paragraph, area);
    Ok(())
}

/// Interpretation text for a successful outcome
pub fn interpretation_lines(status: &PredictStatus) -> Vec<Line<'static>> {
    let Some(interpretation) = interpret(status.outcome()) else {
        return Vec::new();
    };
    vec![
        Line::from(interpretation.narrative),
        Line::from(""),
        Line::from(Span::styled(SCORE_NOTE, Style::default().fg(Color::DarkGray))),
    ]
}

pub fn draw_interpretation(frame: &mut Frame, area: Rect, status: &PredictStatus) -> Result<()> {
    let paragraph = Paragraph::new(interpretation_lines(status))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Business interpretation ")
                .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                .border_style(Style::default().fg(Color::Cyan)),
        );
    frame.render_widget(paragraph, area);
    Ok(())
}
