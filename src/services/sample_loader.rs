//! One-shot background fetch of the sample catalog

use crate::model::{DomainState, SampleRecord};
use crate::services::api::{ApiError, ScoringApi};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

type FetchResult = Result<Vec<SampleRecord>, ApiError>;

/// Loads samples exactly once per lifetime
///
/// No polling, no retry. The result is applied to [`DomainState`] on the
/// UI thread when [`SampleLoader::poll`] observes it.
#[derive(Default)]
pub struct SampleLoader {
    receiver: Option<Receiver<FetchResult>>,
    started: Option<Instant>,
}

impl SampleLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the fetch; later calls are ignored
    pub fn start(&mut self, api: Arc<dyn ScoringApi>) -> bool {
        if self.started.is_some() {
            tracing::debug!("sample fetch already issued");
            return false;
        }

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let result = api.fetch_samples();
            // Receiver is gone after teardown
            let _ = tx.send(result);
        });

        tracing::info!("fetching samples");
        self.receiver = Some(rx);
        self.started = Some(Instant::now());
        true
    }

    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.receiver.is_some()
    }

    /// Apply the fetch result if it has arrived, returns true on a transition
    pub fn poll(&mut self, domain: &mut DomainState) -> bool {
        let Some(ref receiver) = self.receiver else {
            return false;
        };

        let result = match receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => Err(ApiError::Transport(
                "sample worker stopped unexpectedly".to_string(),
            )),
        };
        self.receiver = None;

        let elapsed_ms = self
            .started
            .map(|s| s.elapsed().as_millis())
            .unwrap_or_default();

        match result {
            Ok(samples) => {
                tracing::info!(count = samples.len(), elapsed_ms, "samples loaded");
                domain.load_samples(samples);
            }
            Err(err) => {
                let message = err.fetch_message();
                tracing::warn!(elapsed_ms, "{}", message);
                domain.fail_samples(message);
            }
        }
        true
    }

    /// Drop any pending result so it is never applied
    pub fn shutdown(&mut self) {
        if self.receiver.take().is_some() {
            tracing::debug!("discarding pending sample fetch");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FetchStatus, PredictionOutcome};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    struct CatalogApi {
        calls: AtomicUsize,
        reply: Mutex<Receiver<FetchResult>>,
    }

    impl ScoringApi for CatalogApi {
        fn fetch_samples(&self) -> FetchResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply
                .lock()
                .unwrap()
                .recv()
                .unwrap_or_else(|_| Err(ApiError::Transport("closed".to_string())))
        }

        fn predict(&self, _row: &SampleRecord) -> Result<PredictionOutcome, ApiError> {
            unreachable!("loader never predicts")
        }
    }

    fn catalog() -> (Arc<CatalogApi>, mpsc::Sender<FetchResult>) {
        let (tx, rx) = mpsc::channel();
        let api = Arc::new(CatalogApi {
            calls: AtomicUsize::new(0),
            reply: Mutex::new(rx),
        });
        (api, tx)
    }

    fn wait_for(loader: &mut SampleLoader, domain: &mut DomainState) {
        for _ in 0..400 {
            if loader.poll(domain) {
                return;
            }
            thread::sleep(Duration::from_millis(5));
        }
        panic!("sample fetch did not complete");
    }

    #[test]
    fn test_fetch_success_populates_domain() {
        let (api, reply) = catalog();
        let mut loader = SampleLoader::new();
        let mut domain = DomainState::new();

        assert!(loader.start(api.clone()));
        assert!(loader.is_pending());
        assert_eq!(domain.fetch_status, FetchStatus::Loading);

        let samples: Vec<SampleRecord> =
            serde_json::from_str(r#"[{"id": 1, "age": 30}, {"id": 2, "age": 45}]"#).unwrap();
        reply.send(Ok(samples)).unwrap();
        wait_for(&mut loader, &mut domain);

        assert_eq!(domain.fetch_status, FetchStatus::Ready);
        assert_eq!(domain.samples.len(), 2);
        assert_eq!(domain.columns, vec!["id", "age"]);
        assert!(!loader.is_pending());
    }

    #[test]
    fn test_fetch_failure_reports_status() {
        let (api, reply) = catalog();
        let mut loader = SampleLoader::new();
        let mut domain = DomainState::new();

        loader.start(api);
        reply.send(Err(ApiError::Status { status: 404 })).unwrap();
        wait_for(&mut loader, &mut domain);

        assert_eq!(
            domain.fetch_status,
            FetchStatus::Failed("Failed to fetch samples: 404".to_string())
        );
        assert!(domain.samples.is_empty());
        assert!(!domain.has_rows());
    }

    #[test]
    fn test_fetch_runs_once() {
        let (api, reply) = catalog();
        let mut loader = SampleLoader::new();
        let mut domain = DomainState::new();

        assert!(loader.start(api.clone()));
        assert!(!loader.start(api.clone()));
        reply.send(Ok(Vec::new())).unwrap();
        wait_for(&mut loader, &mut domain);
        assert!(!loader.start(api.clone()));

        assert_eq!(api.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_shutdown_discards_pending_result() {
        let (api, reply) = catalog();
        let mut loader = SampleLoader::new();
        let mut domain = DomainState::new();

        loader.start(api);
        loader.shutdown();
        reply.send(Ok(Vec::new())).unwrap();
        thread::sleep(Duration::from_millis(20));

        assert!(!loader.poll(&mut domain));
        assert_eq!(domain.fetch_status, FetchStatus::Loading);
    }
}
