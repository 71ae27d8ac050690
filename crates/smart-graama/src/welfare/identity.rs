//! Bearer-token identity for callers of the welfare API.
//!
//! Tokens are HS256 JWTs carrying the account id and role. Registration and password
//! login live with the identity collaborator; this module only issues development
//! tokens and verifies incoming ones.

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::domain::UserId;
use super::lifecycle::Role;
use crate::config::IdentityConfig;

/// Authenticated caller resolved from a bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: UserId,
    pub role: Role,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    role: String,
    iat: i64,
    exp: i64,
}

pub struct TokenVerifier {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_minutes: i64,
}

impl TokenVerifier {
    pub fn new(config: &IdentityConfig) -> Self {
        Self::from_secret(&config.jwt_secret, config.token_ttl_minutes)
    }

    pub fn from_secret(secret: &str, ttl_minutes: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_minutes,
        }
    }

    pub fn issue(&self, user_id: &UserId, role: Role) -> Result<String, IdentityError> {
        let now = Utc::now().timestamp();
        let exp = self
            .ttl_minutes
            .checked_mul(60)
            .and_then(|seconds| now.checked_add(seconds))
            .ok_or(IdentityError::TokenLifetime(self.ttl_minutes))?;
        let claims = Claims {
            sub: user_id.0.clone(),
            role: role.label().to_string(),
            iat: now,
            exp,
        };

        encode(&Header::default(), &claims, &self.encoding).map_err(IdentityError::Signing)
    }

    pub fn verify(&self, token: &str) -> Result<Caller, IdentityError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(IdentityError::InvalidToken)?;
        let role = data
            .claims
            .role
            .parse::<Role>()
            .map_err(|_| IdentityError::UnknownRole(data.claims.role.clone()))?;

        Ok(Caller {
            user_id: UserId(data.claims.sub),
            role,
        })
    }

    /// Resolve the caller from a raw `Authorization` header value.
    pub fn authenticate(&self, header: Option<&str>) -> Result<Caller, IdentityError> {
        let header = header.ok_or(IdentityError::MissingToken)?;
        let token = header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(IdentityError::MalformedHeader)?;
        self.verify(token)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("no token, authorization denied")]
    MissingToken,
    #[error("authorization header must use the Bearer scheme")]
    MalformedHeader,
    #[error("token is not valid")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),
    #[error("token carries unknown role '{0}'")]
    UnknownRole(String),
    #[error("token lifetime of {0} minutes is out of range")]
    TokenLifetime(i64),
    #[error("unable to sign token")]
    Signing(#[source] jsonwebtoken::errors::Error),
}
