//! Physical mail gateway effects

use crate::config::JurisdictionConfig;
use crate::errors::PipelineError;
use crate::identifiers::RequestRef;
use crate::request::ApplicantRecord;
use async_trait::async_trait;

/// Result of submitting the packet for physical delivery.
#[derive(Debug, Clone)]
pub struct MailedLetter {
    /// Gateway identifier for the mailed letter
    pub mail_id: String,
    /// Carrier tracking number, when already assigned
    pub tracking_number: Option<String>,
    /// Expected delivery date, when the gateway estimates one
    pub expected_delivery: Option<String>,
}

/// Whether the fee instrument was actually created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    /// Check created and mailed
    Created,
    /// No funding account configured; the check was stubbed, which is a
    /// degradation, not an error
    Stubbed,
}

/// Result of mailing the agency fee check.
#[derive(Debug, Clone)]
pub struct MailedCheck {
    /// Gateway identifier for the check (or a stub marker)
    pub check_id: String,
    /// Printed check number, when created
    pub check_number: Option<u64>,
    pub status: CheckStatus,
}

/// Sends the packet and the fee instrument to the receiving agency.
///
/// Both calls are fatal on failure; both may return a stubbed status when
/// the sending account is not configured, which is not an error.
#[async_trait]
pub trait MailEffects: Send + Sync {
    /// Mail the merged packet to the jurisdiction's records agency.
    async fn mail_packet(
        &self,
        packet_pdf: &[u8],
        config: &JurisdictionConfig,
        applicant: &ApplicantRecord,
        request_ref: &RequestRef,
    ) -> Result<MailedLetter, PipelineError>;

    /// Mail a check for the agency fee, computed from the jurisdiction's
    /// fee schedule and the requested copy count.
    async fn mail_fee_check(
        &self,
        config: &JurisdictionConfig,
        copies: u32,
        applicant: &ApplicantRecord,
        request_ref: &RequestRef,
    ) -> Result<MailedCheck, PipelineError>;
}
