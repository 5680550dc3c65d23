//! Single-row selection state

/// Holds at most one selected row index
///
/// Callers are responsible for passing an index within the bounds of the
/// current sample collection; the table only offers existing rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    index: Option<usize>,
}

impl Selection {
    pub fn current(&self) -> Option<usize> {
        self.index
    }

    /// Select a row, returning true if the selection changed
    pub fn select(&mut self, index: usize) -> bool {
        if self.index == Some(index) {
            return false;
        }
        self.index = Some(index);
        true
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.index == Some(index)
    }
}
