//! Root application component
//!
//! The App struct implements the Component trait, acting as the root component
//! that delegates event handling and rendering to child components. It owns
//! the sample loader and the prediction client and polls both on every tick;
//! all state changes happen on the UI thread.

use crate::action::Action;
use crate::component::Component;
use crate::components::{
    draw_home_screen, HelpDialog, HomeComponent, HomeRenderContext, QuitDialog, RecordDialog,
};
use crate::config::Config;
use crate::model::modal::{Modal, ModalStack};
use crate::model::DomainState;
use crate::services::{HttpScoringApi, PredictionClient, SampleLoader, ScoringApi};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{layout::Rect, Frame};
use std::sync::Arc;

/// Main application state - coordinates between components
pub struct App {
    /// Loaded samples and selection
    pub domain: DomainState,

    /// Modal overlay stack
    pub modals: ModalStack,

    /// One-shot sample fetch
    pub sample_loader: SampleLoader,

    /// Predict lifecycle
    pub prediction: PredictionClient,

    /// Flag to indicate the app should quit
    pub should_quit: bool,

    api: Arc<dyn ScoringApi>,
    api_url: String,

    // ─────────────────────────────────────────────────────────────────────────
    // Child Components
    // ─────────────────────────────────────────────────────────────────────────
    pub home: HomeComponent,
    pub quit_dialog: QuitDialog,
    pub record_dialog: RecordDialog,
    pub help_dialog: HelpDialog,
}

impl App {
    /// Create an App talking to the configured backend
    pub fn new(config: &Config) -> App {
        let api = Arc::new(HttpScoringApi::new(
            &config.api_base_url,
            config.max_response_bytes,
        ));
        Self::with_api(api, config.api_base_url.clone())
    }

    pub fn with_api(api: Arc<dyn ScoringApi>, api_url: String) -> App {
        App {
            domain: DomainState::new(),
            modals: ModalStack::new(),
            sample_loader: SampleLoader::new(),
            prediction: PredictionClient::new(Arc::clone(&api)),
            should_quit: false,
            api,
            api_url,
            home: HomeComponent::new(),
            quit_dialog: QuitDialog::default(),
            record_dialog: RecordDialog::default(),
            help_dialog: HelpDialog::default(),
        }
    }

    /// Discard all pending work before the terminal is torn down
    pub fn shutdown(&mut self) {
        tracing::info!("shutting down");
        self.sample_loader.shutdown();
        self.prediction.shutdown();
    }

    /// Choose the row that will be scored
    fn select_row(&mut self, index: usize) {
        if !self.domain.has_rows() || index >= self.domain.samples.len() {
            tracing::debug!(row = index, "ignoring selection outside the loaded rows");
            return;
        }
        if self.domain.selection.select(index) {
            tracing::debug!(row = index, "row selected");
            self.prediction.selection_changed();
        }
    }

    fn predict_selected(&mut self) {
        if !self.prediction.can_predict(self.domain.selection.current()) {
            tracing::debug!("predict ignored, trigger unavailable");
            return;
        }
        if let Some((index, record)) = self.domain.selected_record() {
            self.prediction.predict(index, record);
        }
    }

    fn handle_modal_key_event(&mut self, modal: &Modal, key: KeyEvent) -> Result<Option<Action>> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.handle_key_event(key),
            Modal::RecordDetail { .. } => self.record_dialog.handle_key_event(key),
            Modal::Help => self.help_dialog.handle_key_event(key),
        }
    }

    fn draw_modal(&mut self, frame: &mut Frame, area: Rect, modal: &Modal) -> Result<()> {
        match modal {
            Modal::QuitConfirm => {
                self.quit_dialog.request_pending = self.prediction.status().is_predicting();
                self.quit_dialog.draw(frame, area)?;
            }
            Modal::RecordDetail { index } => {
                if let Some(record) = self.domain.samples.get(*index) {
                    self.record_dialog
                        .draw_with_record(frame, area, *index, record)?;
                }
            }
            Modal::Help => self.help_dialog.draw(frame, area)?,
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Component Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl Component for App {
    fn init(&mut self) -> Result<()> {
        self.sample_loader.start(Arc::clone(&self.api));
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(Some(Action::ForceQuit));
        }

        if let Some(modal) = self.modals.top().cloned() {
            self.handle_modal_key_event(&modal, key)
        } else {
            self.home.handle_key_event(key)
        }
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            // ─────────────────────────────────────────────────────────────────
            // App Lifecycle
            // ─────────────────────────────────────────────────────────────────
            Action::Tick => {
                self.sample_loader.poll(&mut self.domain);
                self.prediction.poll(self.domain.selection.current());
            }
            Action::ForceQuit => {
                self.should_quit = true;
            }
            Action::Resize(_, _) => {}

            // ─────────────────────────────────────────────────────────────────
            // Navigation (delegate to HomeComponent)
            // ─────────────────────────────────────────────────────────────────
            Action::NextItem => self.home.next(&self.domain),
            Action::PrevItem => self.home.previous(),
            Action::FirstItem => self.home.select_first(),
            Action::LastItem => self.home.select_last(&self.domain),

            // ─────────────────────────────────────────────────────────────────
            // Prediction
            // ─────────────────────────────────────────────────────────────────
            Action::SelectCurrent => {
                if let Some(row) = self.home.cursor_row(&self.domain) {
                    return Ok(Some(Action::SelectRow(row)));
                }
            }
            Action::SelectRow(index) => self.select_row(index),
            Action::Predict => self.predict_selected(),

            // ─────────────────────────────────────────────────────────────────
            // Modals
            // ─────────────────────────────────────────────────────────────────
            Action::OpenQuitDialog => self.modals.push(Modal::QuitConfirm),
            Action::OpenHelp => self.modals.toggle(Modal::Help),
            Action::OpenRecordDetail => {
                if let Some(index) = self.home.cursor_row(&self.domain) {
                    self.record_dialog.reset();
                    self.modals.push(Modal::RecordDetail { index });
                }
            }
            Action::CloseModal => {
                self.modals.pop();
            }
            Action::ScrollUp | Action::ScrollDown => match self.modals.top() {
                Some(Modal::RecordDetail { .. }) => {
                    self.record_dialog.update(action)?;
                }
                Some(Modal::Help) => {
                    self.help_dialog.update(action)?;
                }
                _ => {}
            },
        }

        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let ctx = HomeRenderContext {
            domain: &self.domain,
            predict_status: self.prediction.status(),
            can_predict: self.prediction.can_predict(self.domain.selection.current()),
            api_url: &self.api_url,
        };
        draw_home_screen(frame, area, &mut self.home, &ctx)?;

        if let Some(modal) = self.modals.top().cloned() {
            self.draw_modal(frame, area, &modal)?;
        }
        Ok(())
    }
}
