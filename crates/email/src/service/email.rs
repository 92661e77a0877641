use crate::abstract_trait::EmailServiceTrait;
use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Tokio1Executor,
    message::{Mailbox, Message, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use shared::{domain::EmailRequest, errors::ServiceError, utils::render_ticket_email};
use tracing::{error, info};

type SmtpTransport = AsyncSmtpTransport<Tokio1Executor>;

#[derive(Clone)]
pub struct EmailService {
    mailer: SmtpTransport,
    from: Mailbox,
}

impl EmailService {
    pub fn new(
        username: &str,
        password: &str,
        host: &str,
        port: u16,
        sender: &str,
    ) -> Result<Self, ServiceError> {
        let creds = Credentials::new(username.to_string(), password.to_string());

        let mailer = SmtpTransport::starttls_relay(host)
            .map_err(|e| ServiceError::Internal(format!("Failed to create SMTP relay: {e}")))?
            .credentials(creds)
            .port(port)
            .build();

        let from: Mailbox = sender
            .parse()
            .map_err(|e| ServiceError::Internal(format!("Invalid sender address: {e}")))?;

        Ok(Self { mailer, from })
    }
}

#[async_trait]
impl EmailServiceTrait for EmailService {
    async fn send(&self, req: &EmailRequest) -> Result<(), ServiceError> {
        let body = render_ticket_email(&req.data).map_err(|e| {
            error!("❌ Failed to render ticket email: {}", e);
            ServiceError::Internal(format!("Failed to render ticket email: {e}"))
        })?;

        let to: Mailbox = req.to.parse().map_err(|e| {
            error!("❌ Invalid recipient email: {}", e);
            ServiceError::Internal(format!("Invalid recipient email: {e}"))
        })?;

        let email = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(&req.subject)
            .header(ContentType::TEXT_HTML)
            .body(body)
            .map_err(|e| {
                error!("❌ Failed to build email: {}", e);
                ServiceError::Internal(format!("Failed to build email: {e}"))
            })?;

        match self.mailer.send(email).await {
            Ok(_) => {
                info!("✅ Ticket {} sent to {}", req.data.ticket_id, req.to);
                Ok(())
            }
            Err(e) => {
                error!("❌ Failed to send email to {}: {}", req.to, e);
                Err(ServiceError::Internal(format!("Failed to send email: {e}")))
            }
        }
    }
}
