//! Postal mail gateway client
//!
//! Talks to a Lob-style print-and-mail API: the packet goes out as a
//! certified letter addressed to the jurisdiction's records agency, and the
//! agency fee as a mailed check drawn on a configured funding account.
//! Without a funding account the check is stubbed, not failed, so staging
//! environments can exercise the full pipeline without moving money.

use async_trait::async_trait;
use base64::Engine;
use proofmark_core::config::{JurisdictionConfig, MailingAddress};
use proofmark_core::effects::{CheckStatus, MailEffects, MailedCheck, MailedLetter};
use proofmark_core::{ApplicantRecord, PipelineError, RequestRef};
use serde::Deserialize;

/// Gateway connection settings.
#[derive(Debug, Clone)]
pub struct MailerConfig {
    /// API root, e.g. `https://api.lob.com/v1`
    pub base_url: String,
    /// Gateway API key, sent as HTTP basic auth username
    pub api_key: String,
    /// Return address printed on every mailing
    pub return_address: MailingAddress,
    /// Funding account for fee checks; `None` stubs the check
    pub funding_account: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LetterResponse {
    id: String,
    #[serde(default)]
    tracking_number: Option<String>,
    #[serde(default)]
    expected_delivery_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CheckResponse {
    id: String,
    #[serde(default)]
    check_number: Option<u64>,
}

/// Production mail gateway client.
pub struct PostalMailer {
    client: reqwest::Client,
    config: MailerConfig,
}

impl PostalMailer {
    /// Client over the given gateway settings.
    pub fn new(config: MailerConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn address_json(address: &MailingAddress) -> serde_json::Value {
        serde_json::json!({
            "name": address.name,
            "address_line1": address.street,
            "address_city": address.city,
            "address_state": address.state,
            "address_zip": address.zip,
        })
    }

    fn applicant_return_json(&self, applicant: &ApplicantRecord) -> serde_json::Value {
        // The applicant is the sender of record; undeliverable packets go
        // back to them, not to the service
        serde_json::json!({
            "name": applicant.full_name,
            "address_line1": applicant.mailing_address1,
            "address_line2": applicant.mailing_address2,
            "address_city": applicant.city,
            "address_state": applicant.state,
            "address_zip": applicant.zip,
        })
    }

    async fn post(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<reqwest::Response, PipelineError> {
        let url = format!("{}/{path}", self.config.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(url)
            .basic_auth(&self.config.api_key, None::<&str>)
            .json(&body)
            .send()
            .await
            .map_err(|err| PipelineError::mailing(format!("mail gateway unreachable: {err}")))?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(PipelineError::mailing(format!(
                "mail gateway returned {status}: {detail}"
            )));
        }
        Ok(response)
    }
}

#[async_trait]
impl MailEffects for PostalMailer {
    async fn mail_packet(
        &self,
        packet_pdf: &[u8],
        config: &JurisdictionConfig,
        applicant: &ApplicantRecord,
        request_ref: &RequestRef,
    ) -> Result<MailedLetter, PipelineError> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(packet_pdf);
        let body = serde_json::json!({
            "description": format!("Records request {request_ref}"),
            "to": Self::address_json(&config.agency.mailing_address),
            "from": self.applicant_return_json(applicant),
            "file": format!("data:application/pdf;base64,{encoded}"),
            "color": false,
            "address_placement": "insert_blank_page",
            "extra_service": "certified",
            "use_type": "operational",
        });

        let response = self.post("letters", body).await?;
        let letter: LetterResponse = response
            .json()
            .await
            .map_err(|err| PipelineError::mailing(format!("malformed letter response: {err}")))?;
        tracing::info!(request_ref = %request_ref, mail_id = %letter.id, "packet submitted for delivery");
        Ok(MailedLetter {
            mail_id: letter.id,
            tracking_number: letter.tracking_number,
            expected_delivery: letter.expected_delivery_date,
        })
    }

    async fn mail_fee_check(
        &self,
        config: &JurisdictionConfig,
        copies: u32,
        _applicant: &ApplicantRecord,
        request_ref: &RequestRef,
    ) -> Result<MailedCheck, PipelineError> {
        let Some(funding_account) = &self.config.funding_account else {
            tracing::warn!(request_ref = %request_ref, "no funding account configured, stubbing fee check");
            return Ok(MailedCheck {
                check_id: format!("STUB_{request_ref}"),
                check_number: None,
                status: CheckStatus::Stubbed,
            });
        };

        let amount_cents = config.fees.agency_fee_cents(copies);
        let mut payee = Self::address_json(&config.agency.mailing_address);
        payee["name"] = serde_json::Value::String(config.fees.check_payee.clone());
        let body = serde_json::json!({
            "description": format!("Agency fee for {request_ref}"),
            "bank_account": funding_account,
            // Gateway amounts are in dollars
            "amount": amount_cents as f64 / 100.0,
            "memo": format!("{request_ref} - {} certified copies", copies),
            "to": payee,
            // Checks come back to the service, not the applicant
            "from": Self::address_json(&self.config.return_address),
            "use_type": "operational",
        });

        let response = self.post("checks", body).await?;
        let check: CheckResponse = response
            .json()
            .await
            .map_err(|err| PipelineError::mailing(format!("malformed check response: {err}")))?;
        tracing::info!(
            request_ref = %request_ref,
            check_id = %check.id,
            amount_cents,
            "fee check submitted"
        );
        Ok(MailedCheck {
            check_id: check.id,
            check_number: check.check_number,
            status: CheckStatus::Created,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mailer(funding_account: Option<String>) -> PostalMailer {
        PostalMailer::new(MailerConfig {
            base_url: "https://mail.invalid/v1".to_string(),
            api_key: "test_key".to_string(),
            return_address: MailingAddress {
                name: "Proofmark Returns".to_string(),
                street: "1 Service Way".to_string(),
                city: "Denver".to_string(),
                state: "CO".to_string(),
                zip: "80202".to_string(),
            },
            funding_account,
        })
    }

    #[tokio::test]
    async fn unfunded_check_is_stubbed_without_touching_the_network() {
        let mailer = mailer(None);
        let config = proofmark_core::config::jurisdiction("CO").unwrap();
        let applicant = proofmark_testkit::builders::sample_applicant();
        let request_ref = proofmark_testkit::builders::sample_request_ref();

        // base_url is unresolvable, so reaching the network would error
        let check = mailer
            .mail_fee_check(config, 2, &applicant, &request_ref)
            .await
            .unwrap();
        assert_eq!(check.status, CheckStatus::Stubbed);
        assert_eq!(check.check_id, format!("STUB_{request_ref}"));
        assert!(check.check_number.is_none());
    }

    #[test]
    fn agency_address_carries_the_check_payee_name() {
        let config = proofmark_core::config::jurisdiction("CO").unwrap();
        let mut payee = PostalMailer::address_json(&config.agency.mailing_address);
        payee["name"] = serde_json::Value::String(config.fees.check_payee.clone());
        assert_eq!(payee["name"], serde_json::json!(config.fees.check_payee));
        assert_eq!(
            payee["address_zip"],
            serde_json::json!(config.agency.mailing_address.zip)
        );
    }
}
