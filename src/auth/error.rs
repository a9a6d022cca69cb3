// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication gate errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Reasons the auth gate rejects a request.
///
/// Every variant ends the request at the gate; the downstream handler never
/// runs and nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No token in the `Authorization` header
    #[error("authorization token is missing")]
    MissingToken,
    /// Token parsed but the signature does not verify
    #[error("token signature is invalid")]
    SignatureInvalid,
    /// Token could not be decoded or has expired
    #[error("token could not be decoded: {0}")]
    DecodeError(String),
    /// The verified claim could not be re-signed
    #[error("token could not be renewed: {0}")]
    RenewError(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    message: &'static str,
}

impl AuthError {
    /// Short category name used in logs.
    pub fn category(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "missing_token",
            AuthError::SignatureInvalid => "signature_invalid",
            AuthError::DecodeError(_) => "decode_error",
            AuthError::RenewError(_) => "renew_error",
        }
    }

    /// Get the HTTP status code for this error.
    ///
    /// A missing token answers 500 while a bad token answers 401; clients of
    /// the existing services branch on that difference.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingToken => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::SignatureInvalid | AuthError::DecodeError(_) | AuthError::RenewError(_) => {
                StatusCode::UNAUTHORIZED
            }
        }
    }

    /// Message returned to the client. Causes stay in the logs.
    pub fn client_message(&self) -> &'static str {
        match self {
            AuthError::MissingToken | AuthError::SignatureInvalid => "unauthorized",
            AuthError::DecodeError(_) => "cannot parse token claim",
            AuthError::RenewError(_) => "cannot renew token",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            message: self.client_message(),
        });
        (status, body).into_response()
    }
}
