// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use sqlx::PgPool;

use crate::auth::AuthConfig;
use crate::http_client::HttpClient;

#[derive(Clone)]
pub struct AppState {
    pub auth_config: AuthConfig,
    /// Present when a database block is configured.
    pub pool: Option<PgPool>,
    /// Outbound client for calls to other services.
    pub http_client: Option<HttpClient>,
}

impl AppState {
    pub fn new(auth_config: AuthConfig) -> Self {
        Self {
            auth_config,
            pool: None,
            http_client: None,
        }
    }

    pub fn with_pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn with_http_client(mut self, client: HttpClient) -> Self {
        self.http_client = Some(client);
        self
    }
}
