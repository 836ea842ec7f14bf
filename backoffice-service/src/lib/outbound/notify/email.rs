use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::message::MultiPart;
use lettre::message::SinglePart;
use lettre::transport::smtp::authentication::Credentials;
use lettre::AsyncSmtpTransport;
use lettre::AsyncTransport;
use lettre::Message;
use lettre::Tokio1Executor;

use crate::config::SmtpConfig;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::ports::MailSender;

/// SMTP mailer for login codes and password-reset links.
pub struct SmtpMailSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    /// Frontend base URL the reset token is appended to.
    reset_url_base: String,
}

impl SmtpMailSender {
    pub fn new(config: &SmtpConfig) -> Result<Self, AuthError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            .map_err(|e| AuthError::SendFailed(e.to_string()))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        let from = format!("{} <{}>", config.from_name, config.from_address)
            .parse()
            .map_err(|_| {
                AuthError::SendFailed(format!("invalid from address: {}", config.from_address))
            })?;

        Ok(Self {
            transport,
            from,
            reset_url_base: config.reset_url_base.clone(),
        })
    }

    async fn send(
        &self,
        to: &str,
        subject: &str,
        text_body: String,
        html_body: String,
    ) -> Result<(), AuthError> {
        let to: Mailbox = to
            .parse()
            .map_err(|_| AuthError::SendFailed(format!("invalid recipient: {to}")))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body),
                    ),
            )
            .map_err(|e| AuthError::SendFailed(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| AuthError::SendFailed(e.to_string()))?;

        tracing::info!(subject = %subject, "Email sent");

        Ok(())
    }
}

#[async_trait]
impl MailSender for SmtpMailSender {
    async fn send_verification_code(&self, to: &str, code: &str) -> Result<(), AuthError> {
        self.send(
            to,
            "Your login code",
            render_code_text(code),
            render_code_html(code),
        )
        .await
    }

    async fn send_password_reset(&self, to: &str, token: &str) -> Result<(), AuthError> {
        let reset_url = format!("{}/{token}", self.reset_url_base.trim_end_matches('/'));
        self.send(
            to,
            "Reset your password",
            render_reset_text(&reset_url),
            render_reset_html(&reset_url),
        )
        .await
    }
}

fn render_code_text(code: &str) -> String {
    format!(
        "Your login code is {code}.\n\n\
         It expires in 10 minutes. If you didn't request it, you can ignore this email."
    )
}

fn render_code_html(code: &str) -> String {
    format!(
        r#"<html><body style="font-family: sans-serif; color: #374151;">
<p>Your login code is:</p>
<p style="font-size: 32px; font-weight: 700; letter-spacing: 4px;">{code}</p>
<p>It expires in 10 minutes. If you didn't request it, you can ignore this email.</p>
</body></html>"#
    )
}

fn render_reset_text(reset_url: &str) -> String {
    format!(
        "We received a request to reset your password.\n\n\
         To choose a new one, visit:\n{reset_url}\n\n\
         The link expires in 1 hour. If you didn't request this, you can ignore this email."
    )
}

fn render_reset_html(reset_url: &str) -> String {
    format!(
        r#"<html><body style="font-family: sans-serif; color: #374151;">
<p>We received a request to reset your password.</p>
<p><a href="{reset_url}" style="background: #2563eb; color: #ffffff; padding: 12px 24px; border-radius: 6px; text-decoration: none;">Choose a new password</a></p>
<p>The link expires in 1 hour. If you didn't request this, you can ignore this email.</p>
</body></html>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_code_bodies_contain_code() {
        assert!(render_code_text("123456").contains("123456"));
        assert!(render_code_html("123456").contains("123456"));
    }

    #[test]
    fn test_render_reset_bodies_contain_link() {
        let url = "https://shop.example.com/reset/abcdef";
        assert!(render_reset_text(url).contains(url));
        assert!(render_reset_html(url).contains(url));
    }
}
