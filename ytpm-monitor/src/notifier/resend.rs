//! Resend e-mail notifier
//!
//! Posts one e-mail per notification to the Resend HTTP API.

use super::{format, Notifier};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use ytpm_common::config::NotifierConfig;
use ytpm_common::{Result, Transition};

const USER_AGENT: &str = concat!("ytpm-monitor/", env!("CARGO_PKG_VERSION"));

/// Resend client errors
#[derive(Debug, Error)]
pub enum ResendError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Invalid API key (HTTP {0})")]
    InvalidApiKey(u16),

    #[error("Parse error: {0}")]
    ParseError(String),
}

impl From<ResendError> for ytpm_common::Error {
    fn from(e: ResendError) -> Self {
        ytpm_common::Error::Notifier(e.to_string())
    }
}

/// Request body for `POST /emails`
#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendEmailResponse {
    id: Option<String>,
}

/// E-mail notifier backed by Resend
pub struct ResendNotifier {
    http_client: reqwest::Client,
    api_key: String,
    from_email: String,
    to_email: String,
    endpoint: String,
}

impl ResendNotifier {
    pub fn new(config: &NotifierConfig) -> std::result::Result<Self, ResendError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10).min(config.timeout))
            .build()
            .map_err(|e| ResendError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key: config.resend_api_key.clone(),
            from_email: config.from_email.clone(),
            to_email: config.to_email.clone(),
            endpoint: format!("{}/emails", config.api_base_url.trim_end_matches('/')),
        })
    }

    /// Send an already rendered notification, returning the message id
    pub async fn send(
        &self,
        notification: &format::Notification,
    ) -> std::result::Result<Option<String>, ResendError> {
        let body = SendEmailRequest {
            from: &self.from_email,
            to: [&self.to_email],
            subject: &notification.subject,
            html: &notification.html,
            text: &notification.text,
        };

        tracing::debug!(to = %self.to_email, "Sending e-mail via Resend");

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ResendError::NetworkError(e.to_string()))?;

        let status = response.status();

        if status == 401 || status == 403 {
            return Err(ResendError::InvalidApiKey(status.as_u16()));
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ResendError::ApiError(status.as_u16(), error_text));
        }

        let parsed: SendEmailResponse = response
            .json()
            .await
            .map_err(|e| ResendError::ParseError(e.to_string()))?;

        Ok(parsed.id)
    }
}

#[async_trait]
impl Notifier for ResendNotifier {
    fn name(&self) -> &'static str {
        "resend"
    }

    async fn notify(&self, transitions: &[Transition]) -> Result<()> {
        if transitions.is_empty() {
            return Ok(());
        }

        let notification = format::render(transitions);
        let id = self.send(&notification).await?;

        tracing::info!(
            to = %self.to_email,
            transitions = transitions.len(),
            message_id = id.as_deref().unwrap_or("-"),
            "E-mail sent: {}",
            notification.subject
        );
        Ok(())
    }
}
