//! Single-flight prediction requests
//!
//! At most one predict call is current at a time. Every call is tagged with
//! the row it was issued for and a generation counter; a response is applied
//! only while its tag still matches, otherwise it is dropped without touching
//! the visible state.

use crate::model::{PredictStatus, PredictionOutcome, SampleRecord};
use crate::services::api::{ApiError, ScoringApi};
use chrono::Local;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

type PredictResult = Result<PredictionOutcome, ApiError>;

/// Abandoned calls allowed to wait on the backend at once
const MAX_ABANDONED: usize = 8;

/// Identifies one predict call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTag {
    /// Selected row when the call was issued
    pub index: usize,
    /// Monotonic per-client counter
    pub generation: u64,
}

struct PendingRequest {
    tag: RequestTag,
    receiver: Receiver<PredictResult>,
    started: Instant,
}

/// Drives the predict lifecycle against a [`ScoringApi`]
pub struct PredictionClient {
    api: Arc<dyn ScoringApi>,
    status: PredictStatus,
    generation: u64,
    current: Option<PendingRequest>,
    /// Abandoned calls whose late responses still have to be drained
    stale: Vec<PendingRequest>,
}

impl PredictionClient {
    pub fn new(api: Arc<dyn ScoringApi>) -> Self {
        Self {
            api,
            status: PredictStatus::Idle,
            generation: 0,
            current: None,
            stale: Vec::new(),
        }
    }

    pub fn status(&self) -> &PredictStatus {
        &self.status
    }

    /// Whether the predict trigger is available for the given selection
    ///
    /// Unavailable while a call is in flight or while too many abandoned
    /// calls are still waiting on the backend.
    pub fn can_predict(&self, selected: Option<usize>) -> bool {
        selected.is_some() && !self.status.is_predicting() && self.stale.len() < MAX_ABANDONED
    }

    #[cfg(test)]
    pub fn stale_count(&self) -> usize {
        self.stale.len()
    }

    /// Score `record`, the row at `index`
    ///
    /// A no-op while a call is already in flight. Returns the tag of the new
    /// call otherwise.
    pub fn predict(&mut self, index: usize, record: &SampleRecord) -> Option<RequestTag> {
        if self.status.is_predicting() {
            tracing::debug!(row = index, "predict ignored, request already in flight");
            return None;
        }
        if self.stale.len() >= MAX_ABANDONED {
            tracing::warn!(
                row = index,
                abandoned = self.stale.len(),
                "predict ignored, backend has not answered abandoned requests"
            );
            return None;
        }

        self.generation += 1;
        let tag = RequestTag {
            index,
            generation: self.generation,
        };

        let (tx, rx) = mpsc::channel();
        let api = Arc::clone(&self.api);
        let row = record.clone();
        thread::spawn(move || {
            let result = api.predict(&row);
            // Receiver is gone after teardown
            let _ = tx.send(result);
        });

        tracing::info!(row = index, generation = tag.generation, "prediction requested");
        self.current = Some(PendingRequest {
            tag,
            receiver: rx,
            started: Instant::now(),
        });
        self.status = PredictStatus::Predicting;
        Some(tag)
    }

    /// The selection moved; anything in flight no longer applies
    pub fn selection_changed(&mut self) {
        if let Some(pending) = self.current.take() {
            tracing::info!(
                row = pending.tag.index,
                generation = pending.tag.generation,
                "selection changed, abandoning in-flight prediction"
            );
            self.stale.push(pending);
        }
        self.status = PredictStatus::Idle;
    }

    /// Drain finished calls, returns true if the visible state changed
    pub fn poll(&mut self, selected: Option<usize>) -> bool {
        self.drain_stale();

        let Some(ref pending) = self.current else {
            return false;
        };
        let result = match pending.receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => Err(ApiError::Transport(
                "prediction worker stopped unexpectedly".to_string(),
            )),
        };
        let Some(pending) = self.current.take() else {
            return false;
        };

        if !self.is_current(pending.tag, selected) {
            tracing::info!(
                row = pending.tag.index,
                generation = pending.tag.generation,
                "discarding stale prediction response"
            );
            self.status = PredictStatus::Idle;
            return true;
        }

        let elapsed_ms = pending.started.elapsed().as_millis();
        let completed_at = Local::now();
        self.status = match result {
            Ok(outcome) => {
                tracing::info!(
                    row = pending.tag.index,
                    prediction = %outcome.label,
                    probability = ?outcome.confidence,
                    elapsed_ms,
                    "prediction succeeded"
                );
                PredictStatus::Succeeded {
                    outcome,
                    completed_at,
                }
            }
            Err(err) => {
                let message = err.predict_message();
                tracing::warn!(row = pending.tag.index, elapsed_ms, "{}", message);
                PredictStatus::Failed {
                    message,
                    completed_at,
                }
            }
        };
        true
    }

    /// Abandon everything before teardown
    pub fn shutdown(&mut self) {
        let dropped = self.stale.len() + usize::from(self.current.is_some());
        if dropped > 0 {
            tracing::debug!(dropped, "discarding pending predictions");
        }
        self.current = None;
        self.stale.clear();
        self.status = PredictStatus::Idle;
    }

    fn is_current(&self, tag: RequestTag, selected: Option<usize>) -> bool {
        tag.generation == self.generation && selected == Some(tag.index)
    }

    fn drain_stale(&mut self) {
        self.stale.retain(|pending| match pending.receiver.try_recv() {
            Ok(_) => {
                tracing::info!(
                    row = pending.tag.index,
                    generation = pending.tag.generation,
                    "discarding stale prediction response"
                );
                false
            }
            Err(TryRecvError::Empty) => true,
            Err(TryRecvError::Disconnected) => false,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::prediction::PredictedLabel;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Records every payload and answers from a scripted queue
    struct ScriptedApi {
        payloads: Mutex<Vec<SampleRecord>>,
        replies: Mutex<Receiver<PredictResult>>,
    }

    impl ScoringApi for ScriptedApi {
        fn fetch_samples(&self) -> Result<Vec<SampleRecord>, ApiError> {
            Ok(Vec::new())
        }

        fn predict(&self, row: &SampleRecord) -> PredictResult {
            // Hold the reply queue before recording so replies pair with calls in order
            let replies = self.replies.lock().unwrap();
            self.payloads.lock().unwrap().push(row.clone());
            replies
                .recv()
                .unwrap_or_else(|_| Err(ApiError::Transport("closed".to_string())))
        }
    }

    fn scripted() -> (Arc<ScriptedApi>, mpsc::Sender<PredictResult>) {
        let (tx, rx) = mpsc::channel();
        let api = Arc::new(ScriptedApi {
            payloads: Mutex::new(Vec::new()),
            replies: Mutex::new(rx),
        });
        (api, tx)
    }

    fn samples() -> Vec<SampleRecord> {
        serde_json::from_str(r#"[{"id": 1, "age": 30}, {"id": 2, "age": 45}]"#).unwrap()
    }

    fn outcome(label: i64, probability: f64) -> PredictionOutcome {
        PredictionOutcome::new(PredictedLabel::from(label), Some(probability))
    }

    fn wait_until(mut done: impl FnMut() -> bool) {
        for _ in 0..400 {
            if done() {
                return;
            }
            thread::sleep(Duration::from_millis(5));
        }
        panic!("condition not reached in time");
    }

    fn wait_for_payloads(api: &ScriptedApi, count: usize) {
        wait_until(|| api.payloads.lock().unwrap().len() >= count);
    }

    #[test]
    fn test_predict_sends_selected_record() {
        let (api, replies) = scripted();
        let mut client = PredictionClient::new(api.clone());
        let rows = samples();

        for (index, row) in rows.iter().enumerate() {
            let tag = client.predict(index, row).unwrap();
            assert_eq!(tag.index, index);
            replies.send(Ok(outcome(1, 0.5))).unwrap();
            wait_until(|| client.poll(Some(index)));
        }

        assert_eq!(*api.payloads.lock().unwrap(), rows);
    }

    #[test]
    fn test_predict_is_single_flight() {
        let (api, replies) = scripted();
        let mut client = PredictionClient::new(api.clone());
        let rows = samples();

        assert!(client.predict(0, &rows[0]).is_some());
        assert!(client.status().is_predicting());
        assert!(!client.can_predict(Some(0)));
        assert!(client.predict(0, &rows[0]).is_none());
        assert!(client.predict(1, &rows[1]).is_none());

        wait_for_payloads(&api, 1);
        replies.send(Ok(outcome(1, 0.9))).unwrap();
        wait_until(|| client.poll(Some(0)));

        assert_eq!(api.payloads.lock().unwrap().len(), 1);
        assert!(client.can_predict(Some(0)));
    }

    #[test]
    fn test_success_scenario() {
        let (api, replies) = scripted();
        let mut client = PredictionClient::new(api);
        let rows = samples();

        client.predict(1, &rows[1]);
        replies.send(Ok(outcome(0, 0.23))).unwrap();
        wait_until(|| client.poll(Some(1)));

        let shown = client.status().outcome().unwrap();
        assert_eq!(shown.label.to_string(), "0");
        assert_eq!(shown.confidence, Some(0.23));
    }

    #[test]
    fn test_server_error_scenario() {
        let (api, replies) = scripted();
        let mut client = PredictionClient::new(api);
        let rows = samples();

        client.predict(0, &rows[0]);
        replies.send(Ok(outcome(1, 0.7))).unwrap();
        wait_until(|| client.poll(Some(0)));
        assert!(client.status().outcome().is_some());

        client.predict(0, &rows[0]);
        assert!(client.status().outcome().is_none());
        replies.send(Err(ApiError::Status { status: 500 })).unwrap();
        wait_until(|| client.poll(Some(0)));

        assert_eq!(client.status().error(), Some("Prediction failed: 500"));
        assert!(client.status().outcome().is_none());
        assert!(client.can_predict(Some(0)));
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let (api, replies) = scripted();
        let mut client = PredictionClient::new(api.clone());
        let rows = samples();

        client.predict(0, &rows[0]);
        wait_for_payloads(&api, 1);
        client.selection_changed();
        assert_eq!(client.status(), &PredictStatus::Idle);

        replies.send(Ok(outcome(1, 0.99))).unwrap();
        wait_until(|| {
            client.poll(Some(1));
            client.stale_count() == 0
        });

        assert_eq!(client.status(), &PredictStatus::Idle);
    }

    #[test]
    fn test_stale_failure_is_discarded() {
        let (api, replies) = scripted();
        let mut client = PredictionClient::new(api.clone());
        let rows = samples();

        client.predict(0, &rows[0]);
        wait_for_payloads(&api, 1);
        client.selection_changed();

        replies.send(Err(ApiError::Status { status: 500 })).unwrap();
        wait_until(|| {
            client.poll(Some(1));
            client.stale_count() == 0
        });

        assert_eq!(client.status(), &PredictStatus::Idle);
        assert_eq!(client.status().error(), None);
    }

    #[test]
    fn test_late_response_does_not_clobber_newer_request() {
        let (api, replies) = scripted();
        let mut client = PredictionClient::new(api.clone());
        let rows = samples();

        client.predict(0, &rows[0]);
        wait_for_payloads(&api, 1);
        client.selection_changed();
        client.predict(1, &rows[1]);

        // First reply answers row 0, second answers row 1
        replies.send(Ok(outcome(1, 0.99))).unwrap();
        wait_until(|| {
            client.poll(Some(1));
            client.stale_count() == 0
        });
        assert!(client.status().is_predicting());

        replies.send(Ok(outcome(0, 0.12))).unwrap();
        wait_until(|| client.poll(Some(1)));

        let shown = client.status().outcome().unwrap();
        assert_eq!(shown.confidence, Some(0.12));
    }

    #[test]
    fn test_mismatched_selection_is_discarded() {
        let (api, replies) = scripted();
        let mut client = PredictionClient::new(api);
        let rows = samples();

        client.predict(0, &rows[0]);
        replies.send(Ok(outcome(1, 0.8))).unwrap();
        wait_until(|| client.poll(Some(1)));

        assert!(client.status().outcome().is_none());
        assert_eq!(client.status(), &PredictStatus::Idle);
    }

    #[test]
    fn test_abandoned_requests_are_capped() {
        let (api, replies) = scripted();
        let mut client = PredictionClient::new(api.clone());
        let rows = samples();

        for _ in 0..MAX_ABANDONED {
            assert!(client.predict(0, &rows[0]).is_some());
            client.selection_changed();
        }
        assert_eq!(client.stale_count(), MAX_ABANDONED);
        assert!(!client.can_predict(Some(1)));
        assert!(client.predict(1, &rows[1]).is_none());
        assert_eq!(client.status(), &PredictStatus::Idle);

        for _ in 0..MAX_ABANDONED {
            replies.send(Ok(outcome(1, 0.5))).unwrap();
        }
        wait_until(|| {
            client.poll(Some(1));
            client.stale_count() == 0
        });
        assert!(client.can_predict(Some(1)));
        assert!(client.predict(1, &rows[1]).is_some());
    }

    #[test]
    fn test_shutdown_discards_in_flight() {
        let (api, replies) = scripted();
        let mut client = PredictionClient::new(api.clone());
        let rows = samples();

        client.predict(0, &rows[0]);
        wait_for_payloads(&api, 1);
        client.shutdown();
        replies.send(Ok(outcome(1, 0.8))).unwrap();
        thread::sleep(Duration::from_millis(20));

        assert!(!client.poll(Some(0)));
        assert_eq!(client.status(), &PredictStatus::Idle);
    }
}
