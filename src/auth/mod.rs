pub mod password;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::SecurityConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: Uuid,
    pub username: String,
    pub token_type: TokenType,
    pub jti: Uuid,
    pub exp: i64,
    pub iat: i64,
}

/// Access + refresh pair handed out on login
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub refresh: String,
    pub access: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("JWT generation error: {0}")]
    Generation(String),
    #[error("Token has expired")]
    Expired,
    #[error("Invalid token: {0}")]
    Invalid(String),
    #[error("Expected an {expected:?} token")]
    WrongType { expected: TokenType },
}

/// HS256 signing keys and token lifetimes, built once at startup
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenKeys {
    pub fn new(secret: &str, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl,
            refresh_ttl,
        }
    }

    pub fn from_config(security: &SecurityConfig) -> Self {
        Self::new(
            &security.jwt_secret,
            Duration::minutes(security.access_token_minutes as i64),
            Duration::days(security.refresh_token_days as i64),
        )
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    /// Issue a fresh access + refresh pair for a user
    pub fn issue_pair(&self, user_id: Uuid, username: &str) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            refresh: self.issue(user_id, username, TokenType::Refresh)?,
            access: self.issue(user_id, username, TokenType::Access)?,
        })
    }

    pub fn issue(&self, user_id: Uuid, username: &str, token_type: TokenType) -> Result<String, TokenError> {
        let now = Utc::now();
        let ttl = match token_type {
            TokenType::Access => self.access_ttl,
            TokenType::Refresh => self.refresh_ttl,
        };
        let claims = Claims {
            sub: user_id,
            username: username.to_string(),
            token_type,
            jti: Uuid::new_v4(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        };
        self.sign(&claims)
    }

    pub fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| TokenError::Generation(e.to_string()))
    }

    /// Verify signature, expiry and token type; no store lookup involved
    pub fn verify(&self, token: &str, expected: TokenType) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let claims = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            })?
            .claims;

        if claims.token_type != expected {
            return Err(TokenError::WrongType { expected });
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> TokenKeys {
        TokenKeys::new("test-secret", Duration::minutes(5), Duration::days(1))
    }

    #[test]
    fn access_token_round_trips_to_same_user() {
        let keys = keys();
        let user_id = Uuid::new_v4();
        let pair = keys.issue_pair(user_id, "alice").unwrap();

        let claims = keys.verify(&pair.access, TokenType::Access).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.username, "alice");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn refresh_token_is_not_an_access_token() {
        let keys = keys();
        let pair = keys.issue_pair(Uuid::new_v4(), "alice").unwrap();

        assert!(matches!(
            keys.verify(&pair.refresh, TokenType::Access),
            Err(TokenError::WrongType { expected: TokenType::Access })
        ));
        assert!(keys.verify(&pair.refresh, TokenType::Refresh).is_ok());
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = keys();
        let now = Utc::now();
        let claims = Claims {
            sub: Uuid::new_v4(),
            username: "alice".to_string(),
            token_type: TokenType::Access,
            jti: Uuid::new_v4(),
            exp: (now - Duration::minutes(1)).timestamp(),
            iat: (now - Duration::minutes(6)).timestamp(),
        };
        let token = keys.sign(&claims).unwrap();

        assert!(matches!(keys.verify(&token, TokenType::Access), Err(TokenError::Expired)));
    }

    #[test]
    fn tampered_or_foreign_tokens_are_rejected() {
        let keys = keys();
        let token = keys.issue(Uuid::new_v4(), "alice", TokenType::Access).unwrap();

        // Payload of one token with the signature of another
        let other_token = keys.issue(Uuid::new_v4(), "mallory", TokenType::Access).unwrap();
        let (body, _) = token.rsplit_once('.').unwrap();
        let (_, signature) = other_token.rsplit_once('.').unwrap();
        let tampered = format!("{body}.{signature}");
        assert!(matches!(keys.verify(&tampered, TokenType::Access), Err(TokenError::Invalid(_))));

        let other = TokenKeys::new("other-secret", Duration::minutes(5), Duration::days(1));
        assert!(matches!(other.verify(&token, TokenType::Access), Err(TokenError::Invalid(_))));

        assert!(matches!(keys.verify("not.a.jwt", TokenType::Access), Err(TokenError::Invalid(_))));
    }
}
