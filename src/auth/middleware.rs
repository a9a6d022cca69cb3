// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Sliding-session authentication gate for Axum.
//!
//! Every protected request must carry a session token in `Authorization`.
//! The gate verifies it, pushes the expiry to `now + window` and hands the
//! re-signed token back in the `Authorization` response header. Clients are
//! expected to present the newest token on their next call; an older token
//! keeps its original expiry and stops working once that passes.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let auth_config = AuthConfig::new(jwt_key, 15);
//!
//! let app = Router::new()
//!     .route("/protected", get(protected_handler))
//!     .layer(axum::middleware::from_fn_with_state(
//!         auth_config.clone(),
//!         auth_middleware,
//!     ));
//! ```

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use super::claims::UserClaim;
use super::codec::{CodecError, TokenCodec};
use super::AuthError;

/// Optional scheme prefix accepted in front of the token.
const BEARER_PREFIX: &str = "Bearer ";

/// Authentication configuration.
///
/// Built once at startup and shared read-only by every request.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    codec: TokenCodec,
    window: Duration,
}

/// Outcome of a successful pass through the gate.
#[derive(Debug, Clone)]
pub struct RenewedSession {
    /// Freshly signed token for the client's next request
    pub token: String,
    /// Verified user claim, unchanged from the presented token
    pub user: UserClaim,
    /// New expiry (Unix seconds)
    pub expires_at: i64,
}

impl AuthConfig {
    /// Create a new auth configuration.
    ///
    /// # Arguments
    /// - `jwt_key`: shared HS256 secret
    /// - `token_minutes`: sliding window added to "now" on every request
    pub fn new(jwt_key: impl AsRef<[u8]>, token_minutes: u32) -> Self {
        Self {
            codec: TokenCodec::new(jwt_key.as_ref()),
            window: Duration::minutes(i64::from(token_minutes)),
        }
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Sliding window length.
    pub fn window(&self) -> Duration {
        self.window
    }
}

/// Read the session token from the request headers.
///
/// A leading `Bearer ` is tolerated; the token itself is returned verbatim.
pub fn extract_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Err(AuthError::MissingToken);
    };

    let raw = value
        .to_str()
        .map_err(|_| AuthError::DecodeError("authorization header is not visible ASCII".into()))?
        .trim();

    let token = raw.strip_prefix(BEARER_PREFIX).map(str::trim).unwrap_or(raw);
    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }
    Ok(token)
}

/// Verify `token` and re-sign its claim with expiry `now + window`.
///
/// Only the expiry changes; the user claim is copied through as-is.
pub fn renew_session(
    token: &str,
    config: &AuthConfig,
    now: DateTime<Utc>,
) -> Result<RenewedSession, AuthError> {
    let claim = config.codec.decode(token).map_err(|e| match e {
        CodecError::SignatureInvalid => AuthError::SignatureInvalid,
        other => AuthError::DecodeError(other.to_string()),
    })?;

    if claim.is_expired_at(now) {
        return Err(AuthError::DecodeError(format!(
            "token expired at {}",
            claim.expires_at()
        )));
    }

    let renewed = claim.renewed(now + config.window);
    let token = config
        .codec
        .encode(&renewed)
        .map_err(|e| AuthError::RenewError(e.to_string()))?;

    Ok(RenewedSession {
        token,
        expires_at: renewed.expires_at(),
        user: renewed.user,
    })
}

/// Authentication middleware function.
///
/// On success the verified [`UserClaim`] is inserted into the request
/// extensions (read it with the `Auth` extractor) and the rotated token is
/// written to the `Authorization` response header.
pub async fn auth_middleware(
    State(config): State<AuthConfig>,
    mut request: Request,
    next: Next,
) -> Response {
    let session = match extract_token(request.headers())
        .and_then(|token| renew_session(token, &config, Utc::now()))
    {
        Ok(session) => session,
        Err(e) => {
            warn!(
                category = e.category(),
                error = %e,
                method = %request.method(),
                path = request.uri().path(),
                "request rejected by auth gate"
            );
            return e.into_response();
        }
    };

    let token_header = match HeaderValue::from_str(&session.token) {
        Ok(value) => value,
        Err(e) => return AuthError::RenewError(e.to_string()).into_response(),
    };

    debug!(
        login = session.user.login(),
        expires_at = session.expires_at,
        "session renewed"
    );

    request.extensions_mut().insert(session.user);
    let mut response = next.run(request).await;
    response.headers_mut().insert(AUTHORIZATION, token_header);
    response
}
