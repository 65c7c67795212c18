//! Fire-and-forget dispatch
//!
//! The webhook handler that triggers fulfillment must acknowledge the
//! payment system immediately; it cannot wait out a run that makes half a
//! dozen network calls. The dispatcher validates synchronously, claims the
//! payment session against duplicate triggers, then runs the pipeline on an
//! independent task whose failure is observable only via logs and the
//! best-effort result cache, never via the acknowledgment already sent.

use crate::orchestrator::FulfillmentPipeline;
use parking_lot::Mutex;
use proofmark_core::{FulfillmentRequest, PipelineError};
use std::collections::HashSet;
use std::sync::Arc;

/// Synchronous acknowledgment returned to the triggering caller.
#[derive(Debug)]
pub enum DispatchAck {
    /// Run accepted and spawned
    Accepted,
    /// This payment session was already dispatched; nothing re-run
    Duplicate,
    /// Request failed fail-fast validation and no run was started
    Rejected(PipelineError),
}

/// First-write-wins guard keyed by payment session id.
///
/// In-process only: duplicate webhook deliveries to this process are
/// absorbed, duplicate deliveries to another process are not. Cross-process
/// deduplication is a deliberate extension seam.
#[derive(Default)]
struct DispatchGuard {
    claimed: Mutex<HashSet<String>>,
}

impl DispatchGuard {
    /// Claim a session. Returns `false` if it was already claimed.
    fn try_claim(&self, session_id: &str) -> bool {
        self.claimed.lock().insert(session_id.to_string())
    }
}

/// Validates, deduplicates, and spawns fulfillment runs.
pub struct Dispatcher {
    pipeline: Arc<FulfillmentPipeline>,
    guard: DispatchGuard,
}

impl Dispatcher {
    /// Create a dispatcher over a shared pipeline.
    pub fn new(pipeline: Arc<FulfillmentPipeline>) -> Self {
        Self {
            pipeline,
            guard: DispatchGuard::default(),
        }
    }

    /// Validate and spawn one run, returning immediately.
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&self, request: FulfillmentRequest) -> DispatchAck {
        if let Err(err) = request.validate() {
            tracing::warn!(session = %request.session_id, error = %err, "dispatch rejected");
            return DispatchAck::Rejected(err);
        }
        if !self.guard.try_claim(&request.session_id) {
            tracing::warn!(session = %request.session_id, "duplicate trigger ignored");
            return DispatchAck::Duplicate;
        }

        let pipeline = self.pipeline.clone();
        let session_id = request.session_id.clone();
        tokio::spawn(async move {
            match pipeline.process(request).await {
                Ok(result) => {
                    tracing::info!(session = %session_id, request_ref = %result.request_ref, "dispatched run complete");
                }
                Err(err) => {
                    // At-most-one-attempt: no retry, no dead letter.
                    // Recovery is manual re-invocation with the same input.
                    tracing::error!(session = %session_id, error = %err, "dispatched run failed");
                }
            }
        });
        DispatchAck::Accepted
    }
}
