//! Session token generation and validation
//!
//! Tokens are self-contained signed bearer artifacts. The server keeps no
//! session table: a token is valid until its expiry, and the authority set
//! inside it is a snapshot taken at issuance time. Authority changes made
//! after issuance are not visible until the token is re-minted.

use crate::{config::AppConfig, error::AppError};
use chrono::{DateTime, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Claims carried by a session token
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Issuer
    pub iss: String,

    /// Subject (username)
    pub sub: String,

    /// Username, mirrors `sub`
    pub username: String,

    /// Authority snapshot at issuance time
    pub authorities: Vec<String>,

    /// Issued at
    pub iat: i64,

    /// Expiration
    pub exp: i64,
}

/// Why a token was rejected
///
/// The distinction is diagnostic only; every variant surfaces to clients as
/// a plain 401.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token expired")]
    Expired,

    #[error("token signature invalid")]
    Forged,

    #[error("token malformed")]
    Malformed,
}

/// Session token codec
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    ttl_secs: u64,
}

impl TokenCodec {
    /// Create codec from config
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let secret = config.security.jwt_secret.expose_secret();

        // Ensure secret is at least 32 bytes for HS256
        if secret.len() < 32 {
            return Err(AppError::Config("JWT secret too short (min 32 chars)".to_string()));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer: config.security.issuer.clone(),
            ttl_secs: config.security.token_ttl_secs,
        })
    }

    /// Token lifetime in seconds
    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    /// Issue a token for the given identity and authority snapshot
    pub fn issue(&self, username: &str, authorities: Vec<String>) -> Result<String, AppError> {
        self.issue_at(username, authorities, Utc::now())
    }

    /// Issue a token with an explicit clock
    pub fn issue_at(
        &self,
        username: &str,
        authorities: Vec<String>,
        now: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let claims = Claims {
            iss: self.issuer.clone(),
            sub: username.to_string(),
            username: username.to_string(),
            authorities,
            iat: now.timestamp(),
            exp: now.timestamp() + self.ttl_secs as i64,
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode session token: {:?}", e);
            AppError::Internal(format!("Failed to encode session token: {}", e))
        })
    }

    /// Validate and decode a token
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Validate and decode a token with an explicit clock
    ///
    /// Expiry is compared against `now` at second granularity with no leeway
    /// window. Signature and structural checks are delegated to the JWT
    /// library.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // 过期检查用调用方时钟手动比较
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::Forged,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            })?;

        if now.timestamp() > data.claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(data.claims)
    }
}
