//! Proofmark Documents - PDF composition
//!
//! Builds the three artifacts the mail gateway needs: the agent
//! authorization letter, the filled official form, and the merged packet.
//! All composition happens in memory; nothing here persists plaintext.

#![forbid(unsafe_code)]

use async_trait::async_trait;
use proofmark_core::config::JurisdictionConfig;
use proofmark_core::effects::DocumentEffects;
use proofmark_core::{ApplicantRecord, PipelineError, RequestRef};
use std::path::PathBuf;

/// Consent letter rendering
mod letter;

/// Official form fill
mod form;

/// Packet merge
mod packet;

/// Page construction helpers
mod render;

/// Production document composer backed by lopdf.
pub struct PdfComposer {
    /// Root directory holding blank form templates
    asset_root: PathBuf,
}

impl PdfComposer {
    /// Composer loading templates relative to `asset_root`.
    pub fn new(asset_root: impl Into<PathBuf>) -> Self {
        Self {
            asset_root: asset_root.into(),
        }
    }
}

#[async_trait]
impl DocumentEffects for PdfComposer {
    async fn fill_official_form(
        &self,
        config: &JurisdictionConfig,
        applicant: &ApplicantRecord,
        signature_data_url: &str,
        copies: u32,
        today: &str,
    ) -> Result<Vec<u8>, PipelineError> {
        let path = self.asset_root.join(&config.form.template_path);
        // Templates are small and read rarely; a blocking read is fine here
        let template = std::fs::read(&path).map_err(|err| {
            PipelineError::document(format!(
                "form template {} failed to load: {err}",
                path.display()
            ))
        })?;
        form::fill(&template, config, applicant, signature_data_url, copies, today)
    }

    async fn generate_consent_letter(
        &self,
        config: &JurisdictionConfig,
        applicant: &ApplicantRecord,
        signature_data_url: &str,
        request_ref: &RequestRef,
        today: &str,
    ) -> Result<Vec<u8>, PipelineError> {
        letter::render(config, applicant, signature_data_url, request_ref, today)
    }

    async fn merge_packet(
        &self,
        form_bytes: &[u8],
        letter_bytes: &[u8],
        id_bytes: &[u8],
        id_content_type: &str,
    ) -> Result<Vec<u8>, PipelineError> {
        packet::build(form_bytes, letter_bytes, id_bytes, id_content_type)
    }
}
