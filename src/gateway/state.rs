use std::sync::Arc;
use std::time::Duration;

use crate::agent::ConfidenceRouter;
use crate::constants::DEFAULT_REQUEST_TIMEOUT_SECS;
use crate::retrieval::InMemoryPassageIndex;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct HandlerState {
    pub router: Arc<ConfidenceRouter>,

    /// Index that `POST /v1/documents` writes into and the router reads from.
    pub index: Arc<InMemoryPassageIndex>,

    /// Upper bound on one router run.
    pub request_timeout: Duration,
}

impl HandlerState {
    pub fn new(router: Arc<ConfidenceRouter>, index: Arc<InMemoryPassageIndex>) -> Self {
        Self {
            router,
            index,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}
