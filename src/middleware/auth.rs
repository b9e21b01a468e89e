// SPDX-License-Identifier: MIT
// Copyright 2026 Playnest Developers

//! JWT session authentication middleware.

use crate::models::Role;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Session cookie name.
const SESSION_COOKIE: &str = "playnest_token";

/// JWT claims structure.
///
/// The role is copied from the account's custom claims at mint time. It can
/// go stale after a role change (tokens are not revoked); admin-gated
/// handlers re-read the caller's profile instead of trusting it.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    /// Role at mint time
    pub role: Role,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Authenticated user extracted from a session token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub uid: String,
    pub role: Role,
}

/// Optionally-authenticated viewer, inserted by [`optional_auth`].
///
/// `None` means anonymous; content handlers serve the public view.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

/// Pull the bearer token from the session cookie or Authorization header.
fn extract_token(jar: &CookieJar, request: &Request) -> Option<String> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        return Some(cookie.value().to_string());
    }

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())?;

    auth_header
        .strip_prefix("Bearer ")
        .map(|token| token.to_string())
}

/// Decode and validate a session token.
fn decode_token(token: &str, signing_key: &[u8]) -> Option<AuthUser> {
    let key = DecodingKey::from_secret(signing_key);
    let validation = Validation::new(Algorithm::HS256);

    let token_data = decode::<Claims>(token, &key, &validation).ok()?;

    Some(AuthUser {
        uid: token_data.claims.sub,
        role: token_data.claims.role,
    })
}

/// Middleware that requires a valid session token.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = extract_token(&jar, &request).ok_or(StatusCode::UNAUTHORIZED)?;

    let auth_user =
        decode_token(&token, &state.config.jwt_signing_key).ok_or(StatusCode::UNAUTHORIZED)?;

    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Middleware that accepts anonymous callers but upgrades valid tokens.
///
/// Content routes use this: an invalid or missing token degrades to the
/// anonymous view rather than failing the request.
pub async fn optional_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let viewer = extract_token(&jar, &request)
        .and_then(|token| decode_token(&token, &state.config.jwt_signing_key));

    request.extensions_mut().insert(MaybeAuthUser(viewer));

    next.run(request).await
}

/// Create a JWT for a user session.
pub fn create_jwt(uid: &str, role: Role, signing_key: &[u8]) -> anyhow::Result<String> {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as usize;

    let claims = Claims {
        sub: uid.to_string(),
        role,
        iat: now,
        exp: now + 30 * 24 * 60 * 60, // 30 days
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &[u8] = b"test_jwt_key_32_bytes_minimum!!";

    #[test]
    fn create_and_decode_round_trip() {
        let token = create_jwt("user-1", Role::Subscriber, KEY).unwrap();
        let user = decode_token(&token, KEY).expect("token should decode");
        assert_eq!(user.uid, "user-1");
        assert_eq!(user.role, Role::Subscriber);
    }

    #[test]
    fn wrong_key_is_rejected() {
        let token = create_jwt("user-1", Role::Free, KEY).unwrap();
        assert!(decode_token(&token, b"another_key_entirely_32_bytes!!").is_none());
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(decode_token("not.a.jwt", KEY).is_none());
    }
}
