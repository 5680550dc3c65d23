//! Model layer - centralized state and pure derivations
//!
//! This module contains:
//! - `SampleRecord` - typed open map of scalar features
//! - `DomainState` - loaded samples, columns and selection
//! - `FetchStatus` / `PredictStatus` - request lifecycles
//! - `interpret` - outcome interpretation for display
//! - `ModalStack` - modal overlay management

pub mod columns;
pub mod domain;
pub mod interpretation;
pub mod lifecycle;
pub mod modal;
pub mod prediction;
pub mod sample;
pub mod selection;

pub use domain::DomainState;
pub use lifecycle::{FetchStatus, PredictStatus};
pub use prediction::PredictionOutcome;
pub use sample::{SampleBatch, SampleRecord};
pub use selection::Selection;
