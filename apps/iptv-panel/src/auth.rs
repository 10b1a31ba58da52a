//! Login and bearer-token gate for the protected routes.
//!
//! A successful login yields an HS256 JWT carrying the user id and role,
//! valid for one hour. There is no refresh and no revocation: once the token
//! expires the client has to log in again.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use iptv_db::models::User;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::debug;

use crate::AppState;
use crate::error::ApiError;

pub const TOKEN_TTL_SECS: i64 = 60 * 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,  // user id
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

/// Verified against when the account has no usable hash, so a failed login
/// costs one bcrypt round whether or not the user exists.
const DUMMY_PASSWORD: &str = "no-such-account";

/// Signing keys plus the password hashing cost.
#[derive(Clone)]
pub struct AuthService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    bcrypt_cost: u32,
    dummy_hash: Arc<OnceCell<String>>,
}

impl AuthService {
    pub fn new(secret: &[u8], bcrypt_cost: u32) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            bcrypt_cost,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    pub fn issue_token(&self, user_id: &str, role: &str) -> Result<String, ApiError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            iat: now,
            exp: now + TOKEN_TTL_SECS,
        };
        self.sign(&claims)
    }

    pub fn sign(&self, claims: &Claims) -> Result<String, ApiError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| ApiError::Internal(format!("Failed to sign token: {e}")))
    }

    /// Decodes a token, rejecting bad signatures and expired tokens.
    pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!("Token rejected: {}", e);
                ApiError::Forbidden
            })
    }

    pub async fn hash_password(&self, password: &str) -> Result<String, ApiError> {
        hash_password(password, self.bcrypt_cost).await
    }

    /// Checks `password` against the stored hash. Missing users and accounts
    /// without a password both count as a mismatch, after the same bcrypt work
    /// as a real check.
    pub async fn check_credentials(&self, user: Option<&User>, password: &str) -> bool {
        let (hash, has_hash) = match user.and_then(|u| u.password_hash.clone()) {
            Some(hash) => (hash, true),
            None => (self.fallback_hash().await, false),
        };
        let password = password.to_string();
        let matched =
            tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash).unwrap_or(false))
                .await
                .unwrap_or(false);
        matched && has_hash
    }

    /// Hash of `DUMMY_PASSWORD` at the configured cost, computed on first use.
    async fn fallback_hash(&self) -> String {
        self.dummy_hash
            .get_or_try_init(|| hash_password(DUMMY_PASSWORD, self.bcrypt_cost))
            .await
            .cloned()
            .unwrap_or_default()
    }
}

/// bcrypt runs on the blocking pool so a high cost never stalls the runtime.
pub async fn hash_password(password: &str, cost: u32) -> Result<String, ApiError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .map_err(|e| ApiError::Internal(format!("Failed to hash password: {e}")))
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Rejects the request with 401 when no bearer token is sent and 403 when the
/// token does not verify. Verified claims go into the request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = {
        let token = bearer_token(req.headers()).ok_or(ApiError::Unauthorized)?;
        state.auth.verify(token)?
    };

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
