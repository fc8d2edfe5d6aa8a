use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::auth::{AuthError, Authenticator};
use crate::extractors::CurrentUser;

const ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Caller's user id
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

/// HS256 bearer tokens signed with a shared secret.
pub struct JwtAuthenticator {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_lifetime: Duration,
}

impl JwtAuthenticator {
    pub fn new(secret: &str, token_hours: i64) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 30;
        validation.validate_exp = true;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            token_lifetime: Duration::hours(token_hours),
        }
    }

    /// Sign a token for `user` valid for the configured lifetime.
    pub fn issue(&self, user: &CurrentUser) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.clone(),
            name: user.name.clone(),
            avatar: user.avatar.clone(),
            iat: now.timestamp(),
            exp: (now + self.token_lifetime).timestamp(),
        };
        self.encode(&claims)
    }

    fn encode(&self, claims: &Claims) -> Result<String, AuthError> {
        Ok(jsonwebtoken::encode(
            &Header::new(ALGORITHM),
            claims,
            &self.encoding_key,
        )?)
    }
}

impl Authenticator for JwtAuthenticator {
    fn authenticate(&self, token: &str) -> Result<CurrentUser, AuthError> {
        let data =
            jsonwebtoken::decode::<Claims>(token.trim(), &self.decoding_key, &self.validation)
                .map_err(|e| match *e.kind() {
                    ErrorKind::ExpiredSignature => AuthError::Expired,
                    _ => AuthError::Invalid(e),
                })?;

        let claims = data.claims;
        Ok(CurrentUser {
            id: claims.sub,
            name: claims.name,
            avatar: claims.avatar,
        })
    }
}

/// Random 32-byte hex secret for when none is configured.
pub fn generate_secret() -> String {
    let bytes: [u8; 32] = rand::thread_rng().gen();
    hex::encode(bytes)
}
