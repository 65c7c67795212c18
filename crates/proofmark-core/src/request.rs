//! The immutable fulfillment request
//!
//! Built once from confirmed payment metadata and never persisted beyond
//! process memory. The request carries the only client-supplied,
//! unauthenticated claim in the pipeline: the content fingerprint committed
//! at upload time, which the tamper verifier checks against the fetched
//! bytes before anything else happens.

use crate::errors::PipelineError;
use serde::{Deserialize, Serialize};

/// Relationship of the requestor to the registrant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relationship {
    /// Requesting their own record
    Own,
    Parent,
    Grandparent,
    Stepparent,
    Sibling,
    Spouse,
    Child,
    Stepchild,
    LegalGuardian,
}

impl Relationship {
    /// Human-readable label used on printed documents.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Own => "Self",
            Self::Parent => "Parent",
            Self::Grandparent => "Grandparent",
            Self::Stepparent => "Stepparent",
            Self::Sibling => "Sibling",
            Self::Spouse => "Spouse",
            Self::Child => "Child",
            Self::Stepchild => "Stepchild",
            Self::LegalGuardian => "Legal Guardian",
        }
    }
}

/// Stated purpose of the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Purpose {
    Passport,
    PassportRenewal,
    VoterRegistration,
    Legal,
    Benefits,
    Other,
}

impl Purpose {
    /// Human-readable label used on printed documents.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Passport => "Passport",
            Self::PassportRenewal => "Passport Renewal",
            Self::VoterRegistration => "Voter Registration",
            Self::Legal => "Legal",
            Self::Benefits => "Government Benefits",
            Self::Other => "Other",
        }
    }
}

/// Structured applicant data collected by the intake wizard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicantRecord {
    /// Full legal name of the requestor (also the registrant name at birth)
    pub full_name: String,
    /// Date of birth, `YYYY-MM-DD`
    pub date_of_birth: String,
    /// City or county of birth
    pub place_of_birth: String,
    /// Mother's name at birth
    pub mother_name_at_birth: String,
    /// Father's name, may be empty
    pub father_name: String,
    /// Relationship to the registrant
    pub relationship: Relationship,
    /// Stated purpose of the request
    pub purpose: Purpose,
    /// Free-text detail when `purpose` is `Other`
    pub purpose_detail: String,
    /// Mailing street address, line 1
    pub mailing_address1: String,
    /// Mailing street address, line 2 (apartment/unit), may be empty
    pub mailing_address2: String,
    pub city: String,
    /// Two-letter state abbreviation
    pub state: String,
    pub zip: String,
    /// Contact email for the confirmation message
    pub email: String,
}

impl ApplicantRecord {
    /// Single-line street address for mail gateways.
    pub fn street_line(&self) -> String {
        if self.mailing_address2.is_empty() {
            self.mailing_address1.clone()
        } else {
            format!("{} {}", self.mailing_address1, self.mailing_address2)
        }
    }
}

/// Immutable input to one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FulfillmentRequest {
    /// Originating payment-session identifier; the correlation key for the
    /// result cache and the dispatch dedup guard
    pub session_id: String,
    /// Jurisdiction code, e.g. `CO`
    pub jurisdiction: String,
    /// Number of certified copies requested
    pub copies: u32,
    /// Short-lived URL of the uploaded identity document
    pub stored_object_url: String,
    /// Hex SHA-256 fingerprint committed at upload time, before payment
    pub committed_fingerprint: String,
    /// Signature image as a base64 data-URL string
    pub signature_data_url: String,
    /// Structured applicant data
    pub applicant: ApplicantRecord,
}

impl FulfillmentRequest {
    /// Fail-fast validation of required fields, run before any I/O.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.session_id.is_empty() {
            return Err(PipelineError::config("missing payment session id"));
        }
        if self.jurisdiction.is_empty() {
            return Err(PipelineError::config("missing jurisdiction code"));
        }
        if self.copies == 0 {
            return Err(PipelineError::config("copy count must be at least 1"));
        }
        if self.stored_object_url.is_empty() {
            return Err(PipelineError::config("missing stored object url"));
        }
        if self.committed_fingerprint.len() != 64
            || !self
                .committed_fingerprint
                .chars()
                .all(|c| c.is_ascii_hexdigit())
        {
            return Err(PipelineError::config(
                "committed fingerprint is not a 64-char hex digest",
            ));
        }
        if self.signature_data_url.is_empty() {
            return Err(PipelineError::config("missing signature image"));
        }
        if self.applicant.full_name.is_empty() {
            return Err(PipelineError::config("missing applicant name"));
        }
        if self.applicant.email.is_empty() {
            return Err(PipelineError::config("missing contact email"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn request() -> FulfillmentRequest {
        FulfillmentRequest {
            session_id: "cs_test_123".into(),
            jurisdiction: "CO".into(),
            copies: 1,
            stored_object_url: "https://blobs.example/id.jpg".into(),
            committed_fingerprint: "ab".repeat(32),
            signature_data_url: "data:image/png;base64,aGk=".into(),
            applicant: ApplicantRecord {
                full_name: "Avery Quinn".into(),
                date_of_birth: "1990-04-02".into(),
                place_of_birth: "Denver".into(),
                mother_name_at_birth: "Riley Quinn".into(),
                father_name: "".into(),
                relationship: Relationship::Own,
                purpose: Purpose::Passport,
                purpose_detail: "".into(),
                mailing_address1: "100 Main St".into(),
                mailing_address2: "Apt 4".into(),
                city: "Denver".into(),
                state: "CO".into(),
                zip: "80202".into(),
                email: "avery@example.com".into(),
            },
        }
    }

    #[test]
    fn valid_request_passes() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn zero_copies_rejected() {
        let mut bad = request();
        bad.copies = 0;
        assert_matches!(bad.validate(), Err(PipelineError::Config { .. }));
    }

    #[test]
    fn malformed_fingerprint_rejected() {
        let mut bad = request();
        bad.committed_fingerprint = "not-hex".into();
        assert_matches!(bad.validate(), Err(PipelineError::Config { .. }));
    }

    #[test]
    fn street_line_joins_address_lines() {
        assert_eq!(request().applicant.street_line(), "100 Main St Apt 4");
    }
}
