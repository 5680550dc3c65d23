//! Home component - Main application screen
//!
//! Shows the explainer, the sample table, the predict bar and, after a
//! successful prediction, the business interpretation.

use crate::action::Action;
use crate::component::Component;
use crate::components::result_panel::{draw_interpretation, draw_predict_bar};
use crate::components::{calculate_main_layout, SampleTable};
use crate::model::{DomainState, PredictStatus};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Home component for the main application view
/// Owns the table cursor; selection itself lives in the domain state
#[derive(Default)]
pub struct HomeComponent {
    pub table: SampleTable,
}

/// Everything the home screen renders but does not own
pub struct HomeRenderContext<'a> {
    pub domain: &'a DomainState,
    pub predict_status: &'a PredictStatus,
    /// Whether the predict trigger accepts a press
    pub can_predict: bool,
    pub api_url: &'a str,
}

impl HomeComponent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Row under the cursor, if any rows are loaded
    pub fn cursor_row(&self, domain: &DomainState) -> Option<usize> {
        domain.has_rows().then(|| self.table.cursor.min(domain.samples.len() - 1))
    }

    pub fn next(&mut self, domain: &DomainState) {
        self.table.next(domain.samples.len());
    }

    pub fn previous(&mut self) {
        self.table.previous();
    }

    pub fn select_first(&mut self) {
        self.table.first();
    }

    pub fn select_last(&mut self, domain: &DomainState) {
        self.table.last(domain.samples.len());
    }
}

impl Component for HomeComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => Some(Action::NextItem),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::PrevItem),
            KeyCode::Char('g') | KeyCode::Home => Some(Action::FirstItem),
            KeyCode::Char('G') | KeyCode::End => Some(Action::LastItem),
            KeyCode::Char(' ') => Some(Action::SelectCurrent),
            KeyCode::Char('p') => Some(Action::Predict),
            KeyCode::Enter | KeyCode::Char('v') => Some(Action::OpenRecordDetail),
            KeyCode::Char('?') => Some(Action::OpenHelp),
            KeyCode::Char('q') => Some(Action::OpenQuitDialog),
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Needs domain state, see draw_home_screen
        Ok(())
    }
}

/// Draw the full home screen
pub fn draw_home_screen(
    frame: &mut Frame,
    area: Rect,
    home: &mut HomeComponent,
    ctx: &HomeRenderContext,
) -> Result<()> {
    let layout = calculate_main_layout(area, ctx.predict_status.outcome().is_some());

    draw_header(frame, layout.header, ctx.api_url);
    draw_explainer(frame, layout.explainer);
    home.table.draw_with_samples(frame, layout.samples, ctx.domain)?;
    draw_predict_bar(
        frame,
        layout.predict_bar,
        ctx.predict_status,
        ctx.can_predict,
    )?;
    if let Some(panel) = layout.interpretation {
        draw_interpretation(frame, panel, ctx.predict_status)?;
    }
    draw_help_bar(frame, layout.help);

    Ok(())
}

fn draw_header(frame: &mut Frame, area: Rect, api_url: &str) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " Try the Model ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            " Pick a sample row from the test dataset and press p to predict.",
            Style::default().fg(Color::White),
        ),
        Span::styled(format!("  [{}]", api_url), Style::default().fg(Color::DarkGray)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(header, area);
}

fn draw_explainer(frame: &mut Frame, area: Rect) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let lines = vec![
        Line::from(
            "Each row is a customer-campaign snapshot with engineered features. \
             Predicting estimates how likely this customer is to redeem the coupon if targeted.",
        ),
        Line::from(vec![
            Span::styled("Prediction", bold),
            Span::raw(": 1 = likely to redeem, 0 = unlikely to redeem.  "),
            Span::styled("Probability", bold),
            Span::raw(": the model's confidence for redemption (class 1)."),
        ]),
    ];
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" What this prediction means ")
                .border_style(Style::default().fg(Color::Blue)),
        );
    frame.render_widget(paragraph, area);
}

fn draw_help_bar(frame: &mut Frame, area: Rect) {
    let key = Style::default().fg(Color::Cyan);
    let help = Paragraph::new(Line::from(vec![
        Span::styled("j/k", key),
        Span::raw(" Move  "),
        Span::styled("Space", key),
        Span::raw(" Select  "),
        Span::styled("p", key),
        Span::raw(" Predict  "),
        Span::styled("Enter", key),
        Span::raw(" Fields  "),
        Span::styled("?", key),
        Span::raw(" Help  "),
        Span::styled("q", key),
        Span::raw(" Quit"),
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, area);
}
