// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! CORS gate.
//!
//! Must be the outermost layer so that pre-flight `OPTIONS` requests are
//! answered (200, empty body) before the auth gate ever sees them. Every
//! other response carries the same five `Access-Control-*` headers as the
//! pre-flight answer.

use std::time::Duration;

use axum::http::{
    header::{
        ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_MAX_AGE,
    },
    HeaderName, HeaderValue, Method,
};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;

/// `Access-Control-Max-Age` in seconds.
pub const MAX_AGE: Duration = Duration::from_secs(3600);

/// Request headers browsers may send cross-origin.
pub const ALLOWED_HEADERS: [&str; 7] = [
    "x-requested-with",
    "authorization",
    "accesstoken",
    "content-type",
    "deviceid",
    "ip",
    "fingerprint",
];

/// Methods browsers may use cross-origin.
pub const ALLOWED_METHODS: [Method; 5] = [
    Method::POST,
    Method::GET,
    Method::OPTIONS,
    Method::DELETE,
    Method::PUT,
];

const MAX_AGE_VALUE: &str = "3600";
const ALLOW_HEADERS_VALUE: &str =
    "x-requested-with,authorization,accesstoken,content-type,deviceid,ip,fingerprint";
const ALLOW_METHODS_VALUE: &str = "POST,GET,OPTIONS,DELETE,PUT";

/// Build the CORS layer.
///
/// The request `Origin` is echoed back and credentials are allowed.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_credentials(true)
        .max_age(MAX_AGE)
        .allow_headers(ALLOWED_HEADERS.map(HeaderName::from_static))
        .allow_methods(ALLOWED_METHODS)
}

/// Wrap `router` in the CORS gate.
///
/// `CorsLayer` only sends max-age and the allow lists on pre-flight
/// answers, so they are added to the remaining responses underneath it.
pub fn with_cors<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(SetResponseHeaderLayer::if_not_present(
            ACCESS_CONTROL_MAX_AGE,
            HeaderValue::from_static(MAX_AGE_VALUE),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS_VALUE),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS_VALUE),
        ))
        .layer(cors_layer())
}
