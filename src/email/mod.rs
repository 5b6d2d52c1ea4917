pub mod templates;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::SmtpConfig;
use crate::models::PasswordToken;

/// Delivery seam for reset notifications. Fire-and-forget from the reset
/// service's point of view; failures are logged, never surfaced to callers.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, recipient: &str, token: &PasswordToken) -> Result<(), String>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
    base_url: String,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig, base_url: &str) -> Result<Self, String> {
        let creds = Credentials::new(config.user.clone(), config.pass.clone());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| format!("SMTP error: {e}"))?
            .port(config.port)
            .credentials(creds)
            .build();

        Ok(Self {
            transport,
            from: config.from.clone(),
            base_url: base_url.to_string(),
        })
    }
}

#[async_trait]
impl Notifier for SmtpMailer {
    async fn send(&self, recipient: &str, token: &PasswordToken) -> Result<(), String> {
        let reset_url = format!("{}/forgot-password/{}", self.base_url, token.token);
        let html = templates::render_password_reset(&reset_url);

        let message = Message::builder()
            .from(
                self.from
                    .parse()
                    .map_err(|e| format!("Invalid from address: {e}"))?,
            )
            .to(recipient
                .parse()
                .map_err(|e| format!("Invalid recipient address: {e}"))?)
            .subject("Password reset")
            .header(ContentType::TEXT_HTML)
            .body(html)
            .map_err(|e| format!("Failed to build email: {e}"))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| format!("Failed to send email: {e}"))?;

        Ok(())
    }
}

/// Fallback when SMTP is unconfigured; surfaces the token in the logs so
/// local setups can still complete the flow.
pub struct LogMailer;

#[async_trait]
impl Notifier for LogMailer {
    async fn send(&self, recipient: &str, token: &PasswordToken) -> Result<(), String> {
        tracing::warn!(
            "SMTP not configured. Reset token for {recipient}: {}",
            token.token
        );
        Ok(())
    }
}
