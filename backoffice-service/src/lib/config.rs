use std::env;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub jwt: JwtConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub smtp: SmtpConfig,
    #[serde(default)]
    pub twilio: TwilioConfig,
    #[serde(default)]
    pub google: GoogleConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct JwtConfig {
    #[serde(default)]
    pub secret: String,
    #[serde(default = "default_expiration_hours")]
    pub expiration_hours: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    #[serde(default = "default_code_ttl_minutes")]
    pub code_ttl_minutes: i64,
    #[serde(default = "default_reset_ttl_minutes")]
    pub reset_ttl_minutes: i64,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SmtpConfig {
    #[serde(default)]
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_from_name")]
    pub from_name: String,
    #[serde(default)]
    pub from_address: String,
    /// Frontend URL the reset token is appended to.
    #[serde(default)]
    pub reset_url_base: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct TwilioConfig {
    #[serde(default)]
    pub account_sid: String,
    #[serde(default)]
    pub auth_token: String,
    #[serde(default)]
    pub from_number: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct GoogleConfig {
    /// Absent means federated login answers 503.
    pub client_id: Option<String>,
}

fn default_http_port() -> u16 {
    3000
}

fn default_expiration_hours() -> i64 {
    24
}

fn default_code_ttl_minutes() -> i64 {
    10
}

fn default_reset_ttl_minutes() -> i64 {
    60
}

fn default_smtp_port() -> u16 {
    587
}

fn default_from_name() -> String {
    "Back Office".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: default_http_port(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            code_ttl_minutes: default_code_ttl_minutes(),
            reset_ttl_minutes: default_reset_ttl_minutes(),
        }
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, SMTP__HOST, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(Environment::with_prefix("").separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Check every required value and report all the missing ones at once,
    /// so a fresh deployment fixes its environment in one pass.
    fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("database.url", self.database.url.is_empty()),
            ("jwt.secret", self.jwt.secret.is_empty()),
            ("smtp.host", self.smtp.host.is_empty()),
            ("smtp.username", self.smtp.username.is_empty()),
            ("smtp.password", self.smtp.password.is_empty()),
            ("smtp.from_address", self.smtp.from_address.is_empty()),
            ("smtp.reset_url_base", self.smtp.reset_url_base.is_empty()),
            ("twilio.account_sid", self.twilio.account_sid.is_empty()),
            ("twilio.auth_token", self.twilio.auth_token.is_empty()),
            ("twilio.from_number", self.twilio.from_number.is_empty()),
        ];

        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, is_missing)| *is_missing)
            .map(|(name, _)| *name)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(format!(
                "Missing required configuration values: {}",
                missing.join(", ")
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_config() -> Config {
        Config {
            database: DatabaseConfig {
                url: "postgres://localhost/backoffice".to_string(),
            },
            server: ServerConfig::default(),
            jwt: JwtConfig {
                secret: "secret".to_string(),
                expiration_hours: 24,
            },
            auth: AuthConfig::default(),
            smtp: SmtpConfig {
                host: "smtp.example.com".to_string(),
                port: 587,
                username: "mailer".to_string(),
                password: "hunter2".to_string(),
                from_name: "Back Office".to_string(),
                from_address: "noreply@example.com".to_string(),
                reset_url_base: "https://shop.example.com/reset".to_string(),
            },
            twilio: TwilioConfig {
                account_sid: "AC123".to_string(),
                auth_token: "token".to_string(),
                from_number: "+15005550006".to_string(),
            },
            google: GoogleConfig::default(),
        }
    }

    #[test]
    fn test_complete_config_validates() {
        assert!(minimal_config().validate().is_ok());
    }

    #[test]
    fn test_validation_lists_every_missing_value() {
        let mut config = minimal_config();
        config.database.url.clear();
        config.jwt.secret.clear();
        config.twilio.auth_token.clear();

        let message = config.validate().unwrap_err().to_string();
        assert!(message.contains("database.url"));
        assert!(message.contains("jwt.secret"));
        assert!(message.contains("twilio.auth_token"));
        assert!(!message.contains("smtp.host"));
    }

    #[test]
    fn test_google_client_id_is_optional() {
        let config = minimal_config();
        assert!(config.google.client_id.is_none());
        assert!(config.validate().is_ok());
    }
}
