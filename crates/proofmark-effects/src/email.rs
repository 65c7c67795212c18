//! Outbound email sender

use async_trait::async_trait;
use proofmark_core::effects::EmailEffects;
use proofmark_core::PipelineError;

/// Sends confirmation email through a transactional email API.
pub struct HttpEmailSender {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    /// Verified sender, e.g. `Proofmark <receipts@proofmark.dev>`
    from: String,
}

impl HttpEmailSender {
    /// Sender for the API at `base_url`, sending as `from`.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        from: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            from: from.into(),
        }
    }
}

#[async_trait]
impl EmailEffects for HttpEmailSender {
    async fn send(
        &self,
        to: &str,
        subject: &str,
        html: &str,
        text: &str,
    ) -> Result<(), PipelineError> {
        let url = format!("{}/emails", self.base_url.trim_end_matches('/'));
        let body = serde_json::json!({
            "from": self.from,
            "to": [to],
            "subject": subject,
            "html": html,
            "text": text,
        });
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| PipelineError::notification(format!("email API unreachable: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(PipelineError::notification(format!(
                "email API returned {status}: {detail}"
            )));
        }
        tracing::info!(%subject, "confirmation email accepted");
        Ok(())
    }
}
