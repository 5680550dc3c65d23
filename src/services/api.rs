//! Scoring backend API
//!
//! `GET <base>/samples` returns the candidate records, `POST <base>/predict`
//! scores one of them. Calls are blocking and are expected to run on a
//! background thread.

use crate::model::prediction::{PredictRequest, PredictResponse};
use crate::model::{PredictionOutcome, SampleBatch, SampleRecord};
use serde::de::DeserializeOwned;
use std::io::{self, Read};

/// Errors crossing the API boundary
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// Server answered with a non-2xx status
    #[error("{status}")]
    Status { status: u16 },
    /// Connection or IO failure before a status was available
    #[error("{0}")]
    Transport(String),
    /// Body could not be decoded
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Message stored in the fetch lifecycle
    pub fn fetch_message(&self) -> String {
        format!("Failed to fetch samples: {}", self)
    }

    /// Message stored in the predict lifecycle
    pub fn predict_message(&self) -> String {
        format!("Prediction failed: {}", self)
    }

    #[cfg(test)]
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status } => Some(*status),
            _ => None,
        }
    }
}

impl From<ureq::Error> for ApiError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(status, _) => ApiError::Status { status },
            ureq::Error::Transport(transport) => ApiError::Transport(transport.to_string()),
        }
    }
}

/// Operations offered by the scoring backend
pub trait ScoringApi: Send + Sync {
    /// Retrieve the sample catalog
    fn fetch_samples(&self) -> Result<Vec<SampleRecord>, ApiError>;

    /// Score a single record
    fn predict(&self, row: &SampleRecord) -> Result<PredictionOutcome, ApiError>;
}

/// `ScoringApi` over HTTP
pub struct HttpScoringApi {
    agent: ureq::Agent,
    samples_url: String,
    predict_url: String,
    max_response_bytes: usize,
}

impl HttpScoringApi {
    /// Build a client for the given base URL, e.g. `http://127.0.0.1:8000/api`
    ///
    /// No request timeout is configured; failures surface only through
    /// transport errors or the server's status.
    pub fn new(base_url: &str, max_response_bytes: usize) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().build(),
            samples_url: endpoint(base_url, "samples"),
            predict_url: endpoint(base_url, "predict"),
            max_response_bytes,
        }
    }

}

impl ScoringApi for HttpScoringApi {
    fn fetch_samples(&self) -> Result<Vec<SampleRecord>, ApiError> {
        tracing::debug!(url = %self.samples_url, "GET samples");
        let response = self.agent.get(&self.samples_url).call()?;
        let batch: SampleBatch = read_json(response, self.max_response_bytes)?;
        Ok(batch.samples)
    }

    fn predict(&self, row: &SampleRecord) -> Result<PredictionOutcome, ApiError> {
        tracing::debug!(url = %self.predict_url, fields = row.fields().len(), "POST predict");
        let response = self
            .agent
            .post(&self.predict_url)
            .send_json(PredictRequest { row })?;
        let body: PredictResponse = read_json(response, self.max_response_bytes)?;
        PredictionOutcome::try_from(body).map_err(ApiError::Decode)
    }
}

/// Join a base URL and a path segment, tolerating a trailing slash
pub fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path)
}

fn read_json<T: DeserializeOwned>(
    response: ureq::Response,
    max_bytes: usize,
) -> Result<T, ApiError> {
    let bytes = read_response_bytes(response, max_bytes).map_err(|e| match e.kind() {
        io::ErrorKind::InvalidData => ApiError::Decode(e.to_string()),
        _ => ApiError::Transport(e.to_string()),
    })?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Read a response into memory, enforcing a maximum byte size
fn read_response_bytes(response: ureq::Response, max_bytes: usize) -> io::Result<Vec<u8>> {
    if let Some(length) = response
        .header("Content-Length")
        .and_then(|l| l.parse::<u64>().ok())
    {
        if length > max_bytes as u64 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("response too large: {length} bytes"),
            ));
        }
    }

    let mut limited = response.into_reader().take(max_bytes as u64 + 1);
    let mut bytes = Vec::new();
    limited.read_to_end(&mut bytes)?;
    if bytes.len() > max_bytes {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("response exceeded {max_bytes} bytes"),
        ));
    }
    Ok(bytes)
}
