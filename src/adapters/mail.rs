use crate::config::DigestConfig;
use crate::core::Notifier;
use crate::domain::model::DigestEmail;
use crate::utils::error::Result;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// Sends the digest through an authenticated SMTP relay.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpNotifier {
    pub fn new(
        relay: &str,
        sender_email: &str,
        sender_password: &str,
        receiver_email: &str,
    ) -> Result<Self> {
        let credentials = Credentials::new(sender_email.to_string(), sender_password.to_string());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(relay)?
            .credentials(credentials)
            .build();

        Ok(Self {
            transport,
            from: sender_email.parse()?,
            to: receiver_email.parse()?,
        })
    }

    pub fn from_config(config: &DigestConfig) -> Result<Self> {
        Self::new(
            &config.smtp_relay,
            &config.sender_email,
            &config.sender_password,
            &config.receiver_email,
        )
    }

    pub fn build_message(&self, email: &DigestEmail) -> Result<Message> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .date_now()
            .subject(email.subject.as_str())
            .header(ContentType::TEXT_HTML)
            .body(email.html_body.clone())?;
        Ok(message)
    }
}

impl Notifier for SmtpNotifier {
    async fn send(&self, email: &DigestEmail) -> Result<String> {
        let message = self.build_message(email)?;
        let response = self.transport.send(message).await?;

        let receipt = response
            .first_line()
            .map(str::to_string)
            .unwrap_or_else(|| response.code().to_string());
        Ok(receipt)
    }
}
