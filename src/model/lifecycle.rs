//! Request lifecycles for the sample fetch and the predict call
//!
//! Each lifecycle is an explicit state machine so that combinations such as
//! "predicting and failed" cannot be represented.

use super::prediction::PredictionOutcome;
use chrono::{DateTime, Local};

/// Lifecycle of the one-shot sample fetch
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchStatus {
    #[default]
    Loading,
    Ready,
    Failed(String),
}

impl FetchStatus {
    #[cfg(test)]
    pub fn error(&self) -> Option<&str> {
        match self {
            FetchStatus::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Lifecycle of the predict call
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PredictStatus {
    #[default]
    Idle,
    Predicting,
    Succeeded {
        outcome: PredictionOutcome,
        completed_at: DateTime<Local>,
    },
    Failed {
        message: String,
        completed_at: DateTime<Local>,
    },
}

impl PredictStatus {
    pub fn is_predicting(&self) -> bool {
        matches!(self, PredictStatus::Predicting)
    }

    /// The outcome to display, only present after a success
    pub fn outcome(&self) -> Option<&PredictionOutcome> {
        match self {
            PredictStatus::Succeeded { outcome, .. } => Some(outcome),
            _ => None,
        }
    }

    #[cfg(test)]
    pub fn error(&self) -> Option<&str> {
        match self {
            PredictStatus::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn completed_at(&self) -> Option<DateTime<Local>> {
        match self {
            PredictStatus::Succeeded { completed_at, .. }
            | PredictStatus::Failed { completed_at, .. } => Some(*completed_at),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::prediction::PredictedLabel;

    #[test]
    fn test_fetch_status_error() {
        assert_eq!(FetchStatus::Loading.error(), None);
        assert_eq!(FetchStatus::Ready.error(), None);
        assert_eq!(
            FetchStatus::Failed("Failed to fetch samples: 404".to_string()).error(),
            Some("Failed to fetch samples: 404")
        );
    }

    #[test]
    fn test_predict_status_accessors() {
        let now = Local::now();
        let succeeded = PredictStatus::Succeeded {
            outcome: PredictionOutcome::new(PredictedLabel::from(0_i64), Some(0.23)),
            completed_at: now,
        };
        assert!(succeeded.outcome().is_some());
        assert_eq!(succeeded.error(), None);
        assert_eq!(succeeded.completed_at(), Some(now));

        let failed = PredictStatus::Failed {
            message: "Prediction failed: 500".to_string(),
            completed_at: now,
        };
        assert!(failed.outcome().is_none());
        assert_eq!(failed.error(), Some("Prediction failed: 500"));

        assert!(PredictStatus::Predicting.is_predicting());
        assert!(!PredictStatus::Idle.is_predicting());
        assert_eq!(PredictStatus::Idle.completed_at(), None);
    }
}
