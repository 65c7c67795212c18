//! Outbound email effects

use crate::errors::PipelineError;
use async_trait::async_trait;

/// Sends the final human-readable confirmation.
///
/// Fire-and-forget from the pipeline's perspective: the orchestrator logs
/// and swallows failures because every privacy- and money-critical step has
/// already succeeded by the time email is sent.
#[async_trait]
pub trait EmailEffects: Send + Sync {
    /// Send one message with both HTML and plain-text bodies.
    async fn send(
        &self,
        to: &str,
        subject: &str,
        html: &str,
        text: &str,
    ) -> Result<(), PipelineError>;
}
