// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Oracle connection to the Colvir core banking database.
//!
//! The driver is blocking and loads the Oracle client library at runtime,
//! so the pool is opened on tokio's blocking thread pool.

use std::fmt;
use std::time::Duration;

use oracle::pool::{Pool, PoolBuilder};
use tracing::info;

use super::ConnectionError;

/// Lifetime of a pooled connection before it is recycled.
pub const CONNECTION_MAX_LIFETIME: Duration = Duration::from_secs(3600);

#[derive(Clone, Default)]
pub struct ColvirConfig {
    pub host: String,
    pub port: u16,
    pub db_name: String,
    pub username: String,
    pub password: String,
    /// TNS descriptor or easy-connect string handed to the Oracle client.
    pub tns_string: String,
    pub max_idle_conns: u32,
    pub max_open_conns: u32,
}

impl fmt::Debug for ColvirConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColvirConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("db_name", &self.db_name)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("tns_string", &self.tns_string)
            .field("max_idle_conns", &self.max_idle_conns)
            .field("max_open_conns", &self.max_open_conns)
            .finish()
    }
}

impl ColvirConfig {
    /// `user="..." password="..." connectString="..."`
    pub fn connection_string(&self) -> String {
        format!(
            r#"user="{}" password="{}" connectString="{}""#,
            self.username, self.password, self.tns_string
        )
    }

    /// `(min, max)` pool size; idle connections are capped by the maximum.
    fn pool_bounds(&self) -> (u32, u32) {
        let max = self.max_open_conns.max(1);
        (self.max_idle_conns.min(max), max)
    }

    fn open_pool(&self) -> Result<Pool, ConnectionError> {
        let (min, max) = self.pool_bounds();
        let pool = PoolBuilder::new(
            self.username.clone(),
            self.password.clone(),
            self.tns_string.clone(),
        )
        .min_connections(min)
        .max_connections(max)
        .max_lifetime_connection(CONNECTION_MAX_LIFETIME)?
        .build()?;

        pool.get()?.ping()?;
        Ok(pool)
    }

    /// Open a session pool and ping it.
    pub async fn configure(&self) -> Result<Pool, ConnectionError> {
        let config = self.clone();
        let pool = tokio::task::spawn_blocking(move || config.open_pool())
            .await
            .map_err(|e| ConnectionError::Blocking(e.to_string()))??;

        info!(
            host = %self.host,
            database = %self.db_name,
            user = %self.username,
            "Connected to Colvir"
        );
        Ok(pool)
    }
}
