//! External service interactions
//!
//! This module contains services for talking to the scoring backend:
//! - HTTP API client and error taxonomy
//! - One-shot sample loading
//! - Single-flight prediction requests

pub mod api;
pub mod prediction_client;
pub mod sample_loader;

pub use api::{HttpScoringApi, ScoringApi};
pub use prediction_client::PredictionClient;
pub use sample_loader::SampleLoader;
