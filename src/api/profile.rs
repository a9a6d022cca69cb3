// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Endpoints describing the authenticated caller.

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::{Auth, Module, Role, UserClaim};
use crate::error::ApiError;
use crate::logging::ActionLogger;
use crate::pagination::total_page_number;

const SERVICE: &str = "profile";

/// Page size used when `pageSize` is not given.
pub const DEFAULT_PAGE_SIZE: usize = 20;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RolesQuery {
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RolesPage {
    pub roles: Vec<Role>,
    pub page: usize,
    pub total_pages: usize,
}

fn action_logger(action: &str, user: &UserClaim) -> ActionLogger {
    ActionLogger::new(SERVICE, action).with_manager(user.login())
}

/// The verified user claim of the caller.
#[utoipa::path(
    get,
    path = "/v1/profile",
    tag = "Profile",
    responses(
        (status = 200, description = "Caller profile", body = UserClaim),
        (status = 401, description = "Invalid or expired session token")
    )
)]
pub async fn profile(Auth(user): Auth) -> Json<UserClaim> {
    let logger = action_logger("profile", &user);
    logger.start();
    logger.end("ok", user.login());
    Json(user)
}

/// One page of the caller's roles.
///
/// `page` is 1-based; `pageSize=0` returns every role on a single page.
#[utoipa::path(
    get,
    path = "/v1/profile/roles",
    tag = "Profile",
    params(
        ("page" = Option<usize>, Query, description = "1-based page number"),
        ("pageSize" = Option<usize>, Query, description = "Roles per page")
    ),
    responses(
        (status = 200, description = "Roles page", body = RolesPage),
        (status = 400, description = "Invalid page number")
    )
)]
pub async fn roles(
    Auth(user): Auth,
    Query(query): Query<RolesQuery>,
) -> Result<Json<RolesPage>, ApiError> {
    let logger = action_logger("roles", &user);
    logger.start();

    let page = query.page.unwrap_or(1);
    if page == 0 {
        logger.warn(400, "invalid page", page);
        return Err(ApiError::full(
            StatusCode::BAD_REQUEST,
            400,
            "page must be at least 1",
            "Номер страницы должен быть не меньше 1",
        ));
    }

    let page_size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
    let total_pages = total_page_number(user.roles.len(), page_size);
    let roles: Vec<Role> = if page_size == 0 {
        user.roles
    } else {
        user.roles
            .into_iter()
            .skip((page - 1).saturating_mul(page_size))
            .take(page_size)
            .collect()
    };

    logger.end("ok", roles.len());
    Ok(Json(RolesPage {
        roles,
        page,
        total_pages,
    }))
}

/// A single module grant of the caller.
#[utoipa::path(
    get,
    path = "/v1/profile/modules/{id}",
    tag = "Profile",
    params(("id" = i64, Path, description = "Module identifier")),
    responses(
        (status = 200, description = "Module grant", body = Module),
        (status = 404, description = "Module not granted to the caller")
    )
)]
pub async fn module(Auth(user): Auth, Path(id): Path<i64>) -> Result<Json<Module>, ApiError> {
    let logger = action_logger("module", &user);
    logger.start();

    match user.module(id) {
        Some(module) => {
            logger.end("ok", id);
            Ok(Json(module.clone()))
        }
        None => {
            logger.warn(404, "module not granted", id);
            Err(ApiError::full(
                StatusCode::NOT_FOUND,
                404,
                format!("module {id} is not granted"),
                format!("Модуль {id} недоступен"),
            ))
        }
    }
}
