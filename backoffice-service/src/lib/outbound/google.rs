use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::GoogleProfile;
use crate::domain::auth::ports::GoogleTokenVerifier;

const TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

/// Verifies Google id tokens against the tokeninfo endpoint.
///
/// Google validates the signature and expiry server-side; the audience check
/// against our client id happens here, so a token minted for another
/// application is rejected.
pub struct GoogleTokeninfoVerifier {
    client: reqwest::Client,
    client_id: Option<String>,
}

#[derive(Deserialize)]
struct TokeninfoResponse {
    aud: String,
    sub: String,
    email: String,
    given_name: Option<String>,
    family_name: Option<String>,
    picture: Option<String>,
}

impl GoogleTokeninfoVerifier {
    pub fn new(client_id: Option<String>, client: reqwest::Client) -> Self {
        Self { client, client_id }
    }
}

#[async_trait]
impl GoogleTokenVerifier for GoogleTokeninfoVerifier {
    async fn verify(&self, credential: &str) -> Result<GoogleProfile, AuthError> {
        let client_id = self
            .client_id
            .as_deref()
            .ok_or(AuthError::FederationNotConfigured)?;

        let response = self
            .client
            .get(TOKENINFO_URL)
            .query(&[("id_token", credential)])
            .send()
            .await
            .map_err(|e| AuthError::FederationRejected(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AuthError::FederationRejected(
                "Google rejected the credential".to_string(),
            ));
        }

        let info = response
            .json::<TokeninfoResponse>()
            .await
            .map_err(|e| AuthError::FederationRejected(e.to_string()))?;

        if info.aud != client_id {
            return Err(AuthError::FederationRejected(
                "credential issued for a different application".to_string(),
            ));
        }

        Ok(GoogleProfile {
            google_id: info.sub,
            email: info.email,
            given_name: info.given_name,
            family_name: info.family_name,
            picture: info.picture,
        })
    }
}
