//! Mail delivery.
//!
//! [`MailTransport`] is the seam between the reminder core and the outside
//! world. A failed delivery is returned as a [`DeliveryError`] value; callers
//! decide whether to log it, retry, or give up.

use crate::libs::config::{MailConfig, MailTransportKind, MAIL_TOKEN_ENV};
use crate::libs::mail::Mail;
use crate::libs::messages::Message;
use crate::msg_info;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::future::Future;
use std::time::Duration;

include!(concat!(env!("OUT_DIR"), "/app_metadata.rs"));

/// Upper bound for one relay request.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    #[error("mail transport is not configured: {0}")]
    NotConfigured(String),
    #[error("mail transport failed: {0}")]
    Transport(String),
    #[error("mail relay rejected the message with status {status}")]
    Rejected { status: u16 },
}

pub trait MailTransport: Send + Sync {
    fn send(&self, mail: &Mail) -> impl Future<Output = Result<(), DeliveryError>> + Send;
}

impl<T: MailTransport> MailTransport for &T {
    fn send(&self, mail: &Mail) -> impl Future<Output = Result<(), DeliveryError>> + Send {
        (**self).send(mail)
    }
}

/// Writes mails to the log. The default when no relay is configured.
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

impl MailTransport for LogMailer {
    async fn send(&self, mail: &Mail) -> Result<(), DeliveryError> {
        tracing::debug!(to = %mail.to, body = %mail.body, "mail body");
        msg_info!(Message::MailLogged {
            to: mail.to.clone(),
            subject: mail.subject.clone(),
        });
        Ok(())
    }
}

#[derive(Serialize)]
struct OutgoingMail<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

/// Posts mails as JSON to an HTTP relay, authenticating with a bearer token.
#[derive(Debug, Clone)]
pub struct HttpMailer {
    client: Client,
    api_url: String,
    api_token: Option<String>,
    from: String,
}

impl HttpMailer {
    pub fn new(api_url: &str, api_token: Option<String>, from: &str) -> Result<Self, DeliveryError> {
        let client = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| DeliveryError::NotConfigured(e.to_string()))?;
        Ok(Self {
            client,
            api_url: api_url.to_string(),
            api_token,
            from: from.to_string(),
        })
    }
}

impl MailTransport for HttpMailer {
    async fn send(&self, mail: &Mail) -> Result<(), DeliveryError> {
        let payload = OutgoingMail {
            from: &self.from,
            to: &mail.to,
            subject: &mail.subject,
            text: &mail.body,
        };

        let mut request = self.client.post(&self.api_url).json(&payload);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| DeliveryError::Transport(e.to_string()))?;
        let status: StatusCode = response.status();
        if !status.is_success() {
            return Err(DeliveryError::Rejected { status: status.as_u16() });
        }
        Ok(())
    }
}

/// The transport selected in the configuration.
#[derive(Debug, Clone)]
pub enum Mailer {
    Log(LogMailer),
    Http(HttpMailer),
}

impl Mailer {
    pub fn from_config(config: &MailConfig) -> Result<Self, DeliveryError> {
        match config.transport {
            MailTransportKind::Log => Ok(Mailer::Log(LogMailer)),
            MailTransportKind::Http => {
                let api_url = config
                    .api_url
                    .as_deref()
                    .filter(|url| !url.trim().is_empty())
                    .ok_or_else(|| DeliveryError::NotConfigured(Message::MailApiUrlMissing.to_string()))?;
                let api_token = std::env::var(MAIL_TOKEN_ENV).ok().or_else(|| config.api_token.clone());
                let from = config.from_address.as_deref().unwrap_or(APP_METADATA_FROM_ADDRESS);
                Ok(Mailer::Http(HttpMailer::new(api_url, api_token, from)?))
            }
        }
    }
}

impl MailTransport for Mailer {
    async fn send(&self, mail: &Mail) -> Result<(), DeliveryError> {
        match self {
            Mailer::Log(mailer) => mailer.send(mail).await,
            Mailer::Http(mailer) => mailer.send(mail).await,
        }
    }
}
