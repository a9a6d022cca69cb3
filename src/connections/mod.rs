// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Connection builders for the shared backing services.
//!
//! Each config struct is plain data loaded by [`crate::config`]; the
//! `configure` methods open the connection and verify it before returning.

pub mod colvir;
pub mod postgres;
pub mod rabbitmq;
pub mod redis;

pub use colvir::ColvirConfig;
pub use postgres::{DbCredentials, DbUser, PostgresConfig};
pub use rabbitmq::RabbitMqConfig;
pub use redis::RedisConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("unknown database user {0:?} (expected staff, dsr or commons)")]
    UnknownDbUser(String),

    #[error("invalid sslmode {0:?}")]
    InvalidSslMode(String),

    #[error("invalid connection url: {0}")]
    Url(String),

    #[error("postgres error: {0}")]
    Postgres(#[from] sqlx::Error),

    #[error("redis error: {0}")]
    Redis(#[from] ::redis::RedisError),

    #[error("rabbitmq error: {0}")]
    RabbitMq(#[from] lapin::Error),

    #[error("oracle error: {0}")]
    Oracle(#[from] oracle::Error),

    #[error("blocking connect task failed: {0}")]
    Blocking(String),
}
