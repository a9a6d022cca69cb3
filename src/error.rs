// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Russian message used when the caller did not provide one.
pub const DEFAULT_MESSAGE_RU: &str = "Необходимо обратиться к Администратору системы";

/// Bilingual API error with a numeric application code.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: i32,
    pub message: String,
    pub message_ru: Option<String>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub code: i32,
    pub message: String,
    pub message_ru: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: i32, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            message_ru: None,
        }
    }

    pub fn full(
        status: StatusCode,
        code: i32,
        message: impl Into<String>,
        message_ru: impl Into<String>,
    ) -> Self {
        Self {
            message_ru: Some(message_ru.into()),
            ..Self::new(status, code, message)
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, 404, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, 400, message)
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, 422, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, 500, message)
    }

    /// Response body; falls back to [`DEFAULT_MESSAGE_RU`].
    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            code: self.code,
            message: self.message.clone(),
            message_ru: self
                .message_ru
                .clone()
                .unwrap_or_else(|| DEFAULT_MESSAGE_RU.to_string()),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message_ru.as_deref() {
            None | Some("") => write!(f, "{}", self.message),
            Some(ru) => write!(f, "En: {}; Ru: {}", self.message, ru),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(self.body());
        (self.status, body).into_response()
    }
}
