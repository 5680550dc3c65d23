//! Human-readable interpretation of a prediction outcome

use super::prediction::PredictionOutcome;

/// Standing caveat shown under every interpretation
pub const SCORE_NOTE: &str = "Note: Scores are probabilistic, not guarantees. Consider business \
constraints (budget, inventory, fairness) alongside the score.";

/// Rendered interpretation of one outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpretation {
    /// Predicted label as displayed
    pub prediction: String,
    /// Confidence as a percentage literal, e.g. `84.32%`
    pub probability: Option<String>,
    /// Business narrative
    pub narrative: String,
}

/// Format a probability in [0, 1] as a two-decimal percentage
pub fn format_probability(probability: f64) -> String {
    format!("{:.2}%", probability * 100.0)
}

/// Interpret an outcome; nothing to say when there is no outcome
pub fn interpret(outcome: Option<&PredictionOutcome>) -> Option<Interpretation> {
    let outcome = outcome?;
    let prediction = outcome.label.to_string();

    let (probability, narrative) = match outcome.confidence {
        Some(p) => {
            let percent = format_probability(p);
            let narrative = format!(
                "The model estimates a {} chance this customer will redeem the coupon. \
                 If your campaign cost per coupon is lower than the expected margin uplift \
                 for this customer, targeting them is likely profitable.",
                percent
            );
            (Some(percent), narrative)
        }
        None => {
            let narrative = format!(
                "The model predicts class {}. Use this classification to prioritize coupon \
                 allocation toward predicted class 1 customers for higher expected ROI.",
                prediction
            );
            (None, narrative)
        }
    };

    Some(Interpretation {
        prediction,
        probability,
        narrative,
    })
}
