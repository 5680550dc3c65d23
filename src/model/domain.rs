//! Domain state - loaded samples and the current selection

use super::columns;
use super::lifecycle::FetchStatus;
use super::sample::SampleRecord;
use super::selection::Selection;

/// Domain state containing the sample working set
#[derive(Debug, Default)]
pub struct DomainState {
    /// Sample records, replaced as a whole
    pub samples: Vec<SampleRecord>,

    /// Visible columns, derived once per batch
    pub columns: Vec<String>,

    /// Lifecycle of the sample fetch
    pub fetch_status: FetchStatus,

    /// Currently chosen row
    pub selection: Selection,
}

impl DomainState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a freshly fetched batch
    pub fn load_samples(&mut self, samples: Vec<SampleRecord>) {
        self.columns = columns::project(samples.first());
        self.samples = samples;
        self.fetch_status = FetchStatus::Ready;
    }

    /// Record a failed fetch; no rows remain selectable
    pub fn fail_samples(&mut self, message: String) {
        self.samples.clear();
        self.columns.clear();
        self.fetch_status = FetchStatus::Failed(message);
    }

    /// The record under the current selection
    pub fn selected_record(&self) -> Option<(usize, &SampleRecord)> {
        let index = self.selection.current()?;
        self.samples.get(index).map(|record| (index, record))
    }

    /// Whether rows can be selected at all
    pub fn has_rows(&self) -> bool {
        self.fetch_status == FetchStatus::Ready && !self.samples.is_empty()
    }
}
