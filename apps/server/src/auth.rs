//! Bearer token verification.
//!
//! Identity is issued by an external provider; the server only checks the
//! HS256 signature and expiry and turns the claims into an [`Actor`].

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use xportfoy_core::Actor;

use crate::main_lib::AppState;

const ADMIN_ROLE: &str = "admin";
const MIN_SECRET_LEN: usize = 32;

pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

#[derive(Debug)]
pub enum AuthError {
    Unauthorized,
    Internal(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    code: u16,
    message: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: usize,
    #[serde(default)]
    iat: Option<usize>,
    #[serde(default)]
    role: Option<String>,
}

impl AuthManager {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        // Provider tokens carry an audience we do not pin.
        validation.validate_aud = false;
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Signs a token for `user_id`. Used by tooling and tests that share the
    /// provider secret.
    pub fn issue_token(
        &self,
        user_id: &str,
        is_admin: bool,
        ttl: Duration,
    ) -> Result<String, AuthError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| AuthError::Internal("System clock is before UNIX_EPOCH".into()))?;
        let claims = Claims {
            sub: user_id.to_string(),
            iat: Some(now.as_secs() as usize),
            exp: (now + ttl).as_secs() as usize,
            role: is_admin.then(|| ADMIN_ROLE.to_string()),
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Failed to sign token: {e}")))
    }

    pub fn validate_token(&self, token: &str) -> Result<Actor, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|err| {
            tracing::debug!("Rejected bearer token: {}", err);
            AuthError::Unauthorized
        })?;
        let claims = data.claims;
        if claims.sub.trim().is_empty() {
            return Err(AuthError::Unauthorized);
        }
        let is_admin = claims.role.as_deref() == Some(ADMIN_ROLE);
        Ok(Actor {
            user_id: claims.sub,
            is_admin,
        })
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AuthError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        let body = Json(AuthErrorBody {
            code: status.as_u16(),
            message,
        });
        (status, body).into_response()
    }
}

/// Reads the signing secret. A `base64:` prefix marks an encoded value;
/// anything else is used as raw bytes.
pub fn decode_secret_key(raw: &str) -> anyhow::Result<Vec<u8>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        anyhow::bail!("JWT secret cannot be empty");
    }
    let decoded = match trimmed.strip_prefix("base64:") {
        Some(encoded) => BASE64
            .decode(encoded.trim())
            .map_err(|e| anyhow::anyhow!("JWT secret is not valid base64: {e}"))?,
        None => trimmed.as_bytes().to_vec(),
    };
    if decoded.len() < MIN_SECRET_LEN {
        anyhow::bail!("JWT secret must be at least {MIN_SECRET_LEN} bytes");
    }
    Ok(decoded)
}

/// Verifies the bearer token and stores the caller's [`Actor`] in the
/// request extensions.
pub async fn require_jwt(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AuthError::Unauthorized)?;

    let mut parts = header.splitn(2, ' ');
    let (Some(scheme), Some(token)) = (parts.next(), parts.next()) else {
        return Err(AuthError::Unauthorized);
    };

    if !scheme.eq_ignore_ascii_case("Bearer") {
        return Err(AuthError::Unauthorized);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::Unauthorized);
    }

    let actor = state.auth.validate_token(token)?;
    request.extensions_mut().insert(actor);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

    #[test]
    fn test_round_trip_claims() {
        let auth = AuthManager::new(SECRET);
        let token = auth
            .issue_token("user-1", false, Duration::from_secs(60))
            .unwrap();
        assert_eq!(auth.validate_token(&token).unwrap(), Actor::user("user-1"));

        let admin = auth
            .issue_token("root", true, Duration::from_secs(60))
            .unwrap();
        assert!(auth.validate_token(&admin).unwrap().is_admin);
    }

    #[test]
    fn test_rejects_foreign_signature() {
        let other = AuthManager::new(b"ffffffffffffffffffffffffffffffff");
        let token = other
            .issue_token("user-1", true, Duration::from_secs(60))
            .unwrap();
        assert!(matches!(
            AuthManager::new(SECRET).validate_token(&token),
            Err(AuthError::Unauthorized)
        ));
    }

    #[test]
    fn test_decode_secret_key() {
        assert_eq!(
            decode_secret_key("0123456789abcdef0123456789abcdef").unwrap(),
            SECRET.to_vec()
        );
        let encoded = format!("base64:{}", BASE64.encode(SECRET));
        assert_eq!(decode_secret_key(&encoded).unwrap(), SECRET.to_vec());
        assert!(decode_secret_key("short").is_err());
        assert!(decode_secret_key("   ").is_err());
    }
}
