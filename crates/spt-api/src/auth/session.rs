//! HS256 session tokens
//!
//! A session is a JWT signed with `SESSION_SECRET`. The login flows that mint
//! it live outside this service; here it is only decoded into a
//! [`RequestContext`].

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use spt_core::{AccessLevel, AppError, AuthProvider, RequestContext};

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String, // user_id
    pub access_level: AccessLevel,
    pub provider: AuthProvider,
    pub exp: i64, // expiration timestamp
    pub iat: i64, // issued at timestamp
}

impl From<SessionClaims> for RequestContext {
    fn from(claims: SessionClaims) -> Self {
        RequestContext {
            user_id: claims.sub,
            access_level: claims.access_level,
            provider: claims.provider,
        }
    }
}

pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl SessionKeys {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Sign a session for `ctx`, valid for `ttl`
    pub fn issue(&self, ctx: &RequestContext, ttl: Duration) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: ctx.user_id.clone(),
            access_level: ctx.access_level,
            provider: ctx.provider,
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("Failed to sign session: {}", e)))
    }

    /// Verify a session token and return its context
    pub fn decode(&self, token: &str) -> Result<RequestContext, AppError> {
        let token_data =
            decode::<SessionClaims>(token, &self.decoding, &self.validation).map_err(|e| {
                tracing::debug!("Session validation failed: {}", e);
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::Unauthorized("Session has expired".to_string())
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AppError::Unauthorized("Invalid session signature".to_string())
                    }
                    _ => AppError::Unauthorized(format!("Invalid session: {}", e)),
                }
            })?;

        Ok(token_data.claims.into())
    }
}
