// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{middleware, routing::get, Json, Router};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;

use crate::{
    auth::{auth_middleware, Module, Role, User, UserClaim},
    cors::with_cors,
    state::AppState,
};

pub mod health;
pub mod profile;

/// Build the service router.
///
/// Layer order, outermost first: CORS, request id, tracing, then the auth
/// gate on the `/v1` routes only.
pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/profile", get(profile::profile))
        .route("/profile/roles", get(profile::roles))
        .route("/profile/modules/{id}", get(profile::module))
        .route_layer(middleware::from_fn_with_state(
            state.auth_config.clone(),
            auth_middleware,
        ));

    let app = Router::new()
        .nest("/v1", v1_routes)
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .route("/api-doc/openapi.json", get(openapi_json))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

    with_cors(app)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::liveness,
        health::readiness,
        profile::profile,
        profile::roles,
        profile::module
    ),
    components(
        schemas(
            User,
            UserClaim,
            Role,
            Module,
            profile::RolesPage,
            health::HealthResponse,
            health::ReadyResponse,
            health::HealthChecks
        )
    ),
    tags(
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "Profile", description = "The authenticated caller")
    )
)]
pub struct ApiDoc;
