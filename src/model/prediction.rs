//! Prediction request/response types

use super::sample::SampleRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Class label returned by the model, numeric or textual
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredictedLabel {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for PredictedLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredictedLabel::Number(n) => write!(f, "{}", n),
            PredictedLabel::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for PredictedLabel {
    fn from(value: i64) -> Self {
        PredictedLabel::Number(value.into())
    }
}

/// Classification result for one record
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionOutcome {
    pub label: PredictedLabel,
    /// Probability of the positive class, always within [0, 1]
    pub confidence: Option<f64>,
}

impl PredictionOutcome {
    pub fn new(label: PredictedLabel, confidence: Option<f64>) -> Self {
        Self { label, confidence }
    }
}

/// Body of `POST /predict`
#[derive(Debug, Serialize)]
pub struct PredictRequest<'a> {
    pub row: &'a SampleRecord,
}

/// Raw response of `POST /predict`
#[derive(Debug, Clone, Deserialize)]
pub struct PredictResponse {
    pub prediction: PredictedLabel,
    #[serde(default)]
    pub probability: Option<f64>,
}

impl TryFrom<PredictResponse> for PredictionOutcome {
    type Error = String;

    fn try_from(response: PredictResponse) -> Result<Self, Self::Error> {
        if let Some(p) = response.probability {
            if !(0.0..=1.0).contains(&p) {
                return Err(format!("probability {} is outside [0, 1]", p));
            }
        }
        Ok(PredictionOutcome::new(response.prediction, response.probability))
    }
}
