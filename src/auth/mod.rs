//! JWT bearer authentication and role guards.
//!
//! Login exchanges admin credentials for a signed token; protected routes
//! run the token through an axum middleware which injects the verified
//! identity into request extensions as an [`AuthSession`]. There is no
//! ambient token storage anywhere; the session value lives and dies with
//! the request.

use std::collections::HashMap;

use axum::extract::Request;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use axum::Extension;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::rest::error::ApiError;

/// Roles carried in token claims.
pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_MEMBER: &str = "member";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("missing bearer token")]
    MissingToken,
    #[error("invalid or expired token")]
    InvalidToken,
    #[error("requires role `{0}`")]
    MissingRole(&'static str),
}

/// JWT claims: subject (user email), roles, expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub roles: Vec<String>,
    pub exp: i64,
}

/// Signing and verification material plus token lifetime.
#[derive(Clone)]
pub struct JwtConfig {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_minutes: i64,
}

impl JwtConfig {
    pub fn from_secret(secret: &[u8], ttl_minutes: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl_minutes: ttl_minutes.max(1),
        }
    }

    /// Issue a signed token for a subject with the given roles.
    pub fn issue(&self, subject: &str, roles: &[&str]) -> Result<String, AuthError> {
        let claims = Claims {
            sub: subject.to_string(),
            roles: roles.iter().map(ToString::to_string).collect(),
            exp: (Utc::now() + chrono::Duration::minutes(self.ttl_minutes)).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding).map_err(|_| AuthError::InvalidToken)
    }

    /// Verify a token and return its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| AuthError::InvalidToken)
    }
}

/// The verified identity for one request.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub subject: String,
    pub roles: Vec<String>,
}

impl AuthSession {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn require_admin(&self) -> Result<(), AuthError> {
        if self.has_role(ROLE_ADMIN) {
            Ok(())
        } else {
            Err(AuthError::MissingRole(ROLE_ADMIN))
        }
    }
}

impl From<Claims> for AuthSession {
    fn from(claims: Claims) -> Self {
        Self {
            subject: claims.sub,
            roles: claims.roles,
        }
    }
}

/// Axum middleware: validate the bearer token and stash the session in
/// request extensions for handlers to extract.
pub async fn jwt_auth(
    Extension(jwt): Extension<JwtConfig>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&request).ok_or(ApiError::Unauthorized(
        "missing bearer token".to_string(),
    ))?;
    let claims = jwt
        .verify(&token)
        .map_err(|e| ApiError::Unauthorized(e.to_string()))?;
    request.extensions_mut().insert(AuthSession::from(claims));
    Ok(next.run(request).await)
}

fn bearer_token(request: &Request) -> Option<String> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(ToString::to_string)
}

/// Admin accounts keyed by email, passwords stored as sha256 digests.
#[derive(Debug, Clone, Default)]
pub struct AdminDirectory {
    accounts: HashMap<String, String>,
}

impl AdminDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bootstrap directory with a single admin account.
    pub fn with_admin(email: &str, password: &str) -> Self {
        let mut directory = Self::new();
        directory.add(email, password);
        directory
    }

    pub fn add(&mut self, email: &str, password: &str) {
        self.accounts
            .insert(email.to_lowercase(), password_digest(password));
    }

    /// Check credentials; constant shape regardless of which part failed.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let stored = self
            .accounts
            .get(&email.to_lowercase())
            .ok_or(AuthError::InvalidCredentials)?;
        if *stored == password_digest(password) {
            Ok(())
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

pub fn password_digest(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}
