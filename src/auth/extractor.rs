// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for the user claim published by the auth gate.
//!
//! ```rust,ignore
//! async fn my_handler(Auth(user): Auth) -> impl IntoResponse {
//!     // user is UserClaim
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use super::{AuthError, UserClaim};

/// Extractor for the verified caller.
///
/// Only meaningful behind `auth_middleware`; without the gate there is no
/// claim and the request is rejected as if it carried no token.
pub struct Auth(pub UserClaim);

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<UserClaim>()
            .cloned()
            .map(Auth)
            .ok_or(AuthError::MissingToken)
    }
}

/// Optional variant for endpoints mounted both inside and outside the gate.
pub struct OptionalAuth(pub Option<UserClaim>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalAuth(parts.extensions.get::<UserClaim>().cloned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::claims::User;
    use axum::http::Request;

    fn parts() -> Parts {
        Request::builder().uri("/test").body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn auth_requires_gate_claim() {
        let mut parts = parts();
        let result = Auth::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AuthError::MissingToken)));
    }

    #[tokio::test]
    async fn auth_reads_extension() {
        let mut parts = parts();
        parts.extensions.insert(UserClaim::new(User::new("alice")));

        let Auth(user) = Auth::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(user.login(), "alice");
    }

    #[tokio::test]
    async fn optional_auth_returns_none_without_claim() {
        let mut parts = parts();
        let OptionalAuth(user) = OptionalAuth::from_request_parts(&mut parts, &()).await.unwrap();
        assert!(user.is_none());
    }
}
