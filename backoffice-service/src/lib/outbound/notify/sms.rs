use async_trait::async_trait;
use serde::Deserialize;

use crate::config::TwilioConfig;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::ports::SmsSender;

/// Twilio REST SMS sender.
pub struct TwilioSmsSender {
    client: reqwest::Client,
    account_sid: String,
    auth_token: String,
    from_number: String,
}

#[derive(Deserialize)]
struct TwilioErrorBody {
    message: String,
}

impl TwilioSmsSender {
    pub fn new(config: &TwilioConfig, client: reqwest::Client) -> Self {
        Self {
            client,
            account_sid: config.account_sid.clone(),
            auth_token: config.auth_token.clone(),
            from_number: config.from_number.clone(),
        }
    }
}

#[async_trait]
impl SmsSender for TwilioSmsSender {
    async fn send(&self, to: &str, body: &str) -> Result<(), AuthError> {
        let url = format!(
            "https://api.twilio.com/2010-04-01/Accounts/{}/Messages.json",
            self.account_sid
        );

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[("To", to), ("From", &self.from_number), ("Body", body)])
            .send()
            .await
            .map_err(|e| AuthError::SendFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response
                .json::<TwilioErrorBody>()
                .await
                .map(|e| e.message)
                .unwrap_or_else(|_| status.to_string());
            return Err(AuthError::SendFailed(detail));
        }

        tracing::info!("SMS sent");

        Ok(())
    }
}
