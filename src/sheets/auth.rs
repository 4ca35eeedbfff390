use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::credentials::ServiceAccountKey;
use crate::error::TrackerError;

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Sign the RS256 assertion a service account exchanges for an access token.
pub fn build_assertion(
    key: &ServiceAccountKey,
    scopes: &[String],
    issued_at: i64,
) -> Result<String, TrackerError> {
    let claims = AssertionClaims {
        iss: key.client_email.clone(),
        scope: scopes.join(" "),
        aud: key.token_uri.clone(),
        iat: issued_at,
        exp: issued_at + ASSERTION_LIFETIME_SECS,
    };

    let mut header = Header::new(Algorithm::RS256);
    header.kid = key.private_key_id.clone();

    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())?;
    Ok(encode(&header, &claims, &encoding_key)?)
}

/// Exchange a signed assertion for an OAuth access token.
pub async fn fetch_access_token(
    client: &Client,
    key: &ServiceAccountKey,
    scopes: &[String],
) -> Result<AccessToken, TrackerError> {
    let assertion = build_assertion(key, scopes, chrono::Utc::now().timestamp())?;
    debug!("Requesting access token for {}", key.client_email);

    let response = client
        .post(&key.token_uri)
        .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
        .send()
        .await
        .map_err(|e| TrackerError::Auth(format!("token request failed: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(TrackerError::Auth(format!(
            "token endpoint returned {}: {}",
            status, body
        )));
    }

    response
        .json()
        .await
        .map_err(|e| TrackerError::Auth(format!("invalid token response: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{decode, decode_header, DecodingKey, Validation};

    const PRIVATE_KEY: &str = include_str!("../../tests/fixtures/test_key.pem");
    const PUBLIC_KEY: &str = include_str!("../../tests/fixtures/test_key.pub.pem");

    fn key() -> ServiceAccountKey {
        ServiceAccountKey {
            client_email: "logger@caltrack-test.iam.gserviceaccount.com".to_string(),
            private_key: PRIVATE_KEY.to_string(),
            private_key_id: Some("test-key-id".to_string()),
            token_uri: "https://oauth2.googleapis.com/token".to_string(),
            project_id: None,
        }
    }

    #[test]
    fn test_assertion_claims() {
        let scopes = vec![
            "https://spreadsheets.google.com/feeds".to_string(),
            "https://www.googleapis.com/auth/drive".to_string(),
        ];
        let now = chrono::Utc::now().timestamp();
        let assertion = build_assertion(&key(), &scopes, now).unwrap();

        let header = decode_header(&assertion).unwrap();
        assert_eq!(header.alg, Algorithm::RS256);
        assert_eq!(header.kid.as_deref(), Some("test-key-id"));

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&["https://oauth2.googleapis.com/token"]);
        let decoded = decode::<AssertionClaims>(
            &assertion,
            &DecodingKey::from_rsa_pem(PUBLIC_KEY.as_bytes()).unwrap(),
            &validation,
        )
        .unwrap();

        assert_eq!(decoded.claims.iss, "logger@caltrack-test.iam.gserviceaccount.com");
        assert_eq!(
            decoded.claims.scope,
            "https://spreadsheets.google.com/feeds https://www.googleapis.com/auth/drive"
        );
        assert_eq!(decoded.claims.exp - decoded.claims.iat, 3600);
    }

    #[test]
    fn test_invalid_private_key() {
        let mut key = key();
        key.private_key = "not a pem".to_string();
        let result = build_assertion(&key, &[], 0);
        assert!(matches!(result, Err(TrackerError::Auth(_))));
    }
}
