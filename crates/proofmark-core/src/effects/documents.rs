//! Document composition effects
//!
//! The composer is a black box producing bytes: the pipeline owns
//! sequencing and error propagation, not rendering. Individual field
//! failures during a form fill are best-effort (logged and skipped); only
//! a template that cannot be loaded is fatal.

use crate::config::JurisdictionConfig;
use crate::errors::PipelineError;
use crate::identifiers::RequestRef;
use crate::request::ApplicantRecord;
use async_trait::async_trait;

/// Renders the official form, the consent letter, and the merged packet.
#[async_trait]
pub trait DocumentEffects: Send + Sync {
    /// Fill the jurisdiction's official application form. `today` is the
    /// civil date in the format the form expects (`MM/DD/YYYY`).
    async fn fill_official_form(
        &self,
        config: &JurisdictionConfig,
        applicant: &ApplicantRecord,
        signature_data_url: &str,
        copies: u32,
        today: &str,
    ) -> Result<Vec<u8>, PipelineError>;

    /// Generate the agent authorization / consent letter. `today` is the
    /// long-form civil date (`Month D, YYYY`).
    async fn generate_consent_letter(
        &self,
        config: &JurisdictionConfig,
        applicant: &ApplicantRecord,
        signature_data_url: &str,
        request_ref: &RequestRef,
        today: &str,
    ) -> Result<Vec<u8>, PipelineError>;

    /// Merge letter, form, and identity document into one mailable packet,
    /// in that page order. Fails if an input is not a well-formed document
    /// of its claimed type.
    async fn merge_packet(
        &self,
        form_bytes: &[u8],
        letter_bytes: &[u8],
        id_bytes: &[u8],
        id_content_type: &str,
    ) -> Result<Vec<u8>, PipelineError>;
}
