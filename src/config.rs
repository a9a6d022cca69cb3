// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment once at startup. Values are
//! trimmed and an empty value counts as unset.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `LOG_LEVEL` | `trace`, `debug`, `info`, `warn` or `error` | `info` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `JWT_KEY` | Shared HS256 session secret | Required |
//! | `JWT_TOKEN_MINUTE` | Sliding session window in minutes | `15` |
//! | `DB_HOST` | Postgres host; enables the database block | Optional |
//! | `DB_PORT`, `DB_NAME`, `DB_SSLMODE` | Postgres target | `5432`, `postgres`, `disable` |
//! | `DB_USERNAME_{STAFF,DSR,COMMONS}` | Per-role user | Empty |
//! | `DB_PASSWORD_{STAFF,DSR,COMMONS}` | Per-role password | Empty |
//! | `DB_USER` | Role the service itself connects as (`staff`, `dsr`, `commons`) | `commons` |
//! | `DB_MAX_IDLE_CONNS`, `DB_MAX_OPEN_CONNS` | Pool sizing | `2`, `10` |
//! | `DB_TNSSTRING_COLVIR` | Oracle connect string; enables the Colvir block | Optional |
//! | `DB_HOST_COLVIR`, `DB_PORT_COLVIR`, `DB_NAME_COLVIR` | Colvir target | Required with the block |
//! | `DB_USERNAME_COLVIR`, `DB_PASSWORD_COLVIR` | Colvir credentials | Required with the block |
//! | `REDIS_HOST` | Redis host; enables the Redis block | Optional |
//! | `REDIS_PORT`, `REDIS_PASSWORD`, `REDIS_DB` | Redis target | `6379`, none, `0` |
//! | `RABBIT_CRM_HOST` | Broker host; enables the RabbitMQ block | Optional |
//! | `RABBIT_CRM_PORT`, `RABBIT_CRM_USR`, `RABBIT_CRM_PASSW` | Broker target | `5672`, required, required |
//! | `RABBIT_CRM_VHOST` | Broker vhost | Default vhost |
//! | `HTTP_CLIENT_INSECURE_TLS` | Skip TLS verification on outbound calls | `false` |
//! | `RUST_LOG` | Overrides `LOG_LEVEL` with a full filter | Unset |

use std::fmt;
use std::str::FromStr;

use crate::connections::{
    ColvirConfig, DbCredentials, DbUser, PostgresConfig, RabbitMqConfig, RedisConfig,
};
use crate::http_client::HttpClientConfig;
use crate::logging::LogFormat;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";
pub const JWT_KEY_ENV: &str = "JWT_KEY";
pub const JWT_TOKEN_MINUTE_ENV: &str = "JWT_TOKEN_MINUTE";
pub const HTTP_CLIENT_INSECURE_TLS_ENV: &str = "HTTP_CLIENT_INSECURE_TLS";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Sliding session window when `JWT_TOKEN_MINUTE` is unset.
pub const DEFAULT_TOKEN_MINUTES: u32 = 15;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(String),

    #[error("invalid value {value:?} for {name}")]
    Invalid { name: String, value: String },
}

#[derive(Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub log_format: LogFormat,
    pub jwt_key: String,
    pub token_minutes: u32,
    pub postgres: Option<PostgresConfig>,
    pub db_user: DbUser,
    pub colvir: Option<ColvirConfig>,
    pub redis: Option<RedisConfig>,
    pub rabbitmq: Option<RabbitMqConfig>,
    pub http_client: HttpClientConfig,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("log_level", &self.log_level)
            .field("log_format", &self.log_format)
            .field("jwt_key", &"<redacted>")
            .field("token_minutes", &self.token_minutes)
            .field("postgres", &self.postgres)
            .field("db_user", &self.db_user)
            .field("colvir", &self.colvir)
            .field("redis", &self.redis)
            .field("rabbitmq", &self.rabbitmq)
            .field("http_client", &self.http_client)
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let log_format = match env.optional(LOG_FORMAT_ENV) {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                name: LOG_FORMAT_ENV.to_string(),
                value: raw,
            })?,
            None => LogFormat::default(),
        };

        let token_minutes: u32 = env.parsed(JWT_TOKEN_MINUTE_ENV, DEFAULT_TOKEN_MINUTES)?;
        if token_minutes == 0 {
            return Err(ConfigError::Invalid {
                name: JWT_TOKEN_MINUTE_ENV.to_string(),
                value: "0".to_string(),
            });
        }

        Ok(Self {
            host: env.or_default(HOST_ENV, DEFAULT_HOST),
            port: env.parsed(PORT_ENV, DEFAULT_PORT)?,
            log_level: env.or_default(LOG_LEVEL_ENV, DEFAULT_LOG_LEVEL),
            log_format,
            jwt_key: env.required(JWT_KEY_ENV)?,
            token_minutes,
            postgres: postgres_config(&env)?,
            db_user: env.parsed("DB_USER", DbUser::Commons)?,
            colvir: colvir_config(&env)?,
            redis: redis_config(&env)?,
            rabbitmq: rabbitmq_config(&env)?,
            http_client: HttpClientConfig {
                accept_invalid_certs: env.parsed(HTTP_CLIENT_INSECURE_TLS_ENV, false)?,
                ..HttpClientConfig::default()
            },
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn postgres_config<F>(env: &Env<F>) -> Result<Option<PostgresConfig>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(host) = env.optional("DB_HOST") else {
        return Ok(None);
    };

    let credentials = |role: &str| DbCredentials {
        username: env.or_default(&format!("DB_USERNAME_{role}"), ""),
        password: env.or_default(&format!("DB_PASSWORD_{role}"), ""),
    };

    Ok(Some(PostgresConfig {
        host,
        port: env.parsed("DB_PORT", 5432)?,
        database: env.or_default("DB_NAME", "postgres"),
        ssl_mode: env.or_default("DB_SSLMODE", "disable"),
        staff: credentials("STAFF"),
        dsr: credentials("DSR"),
        commons: credentials("COMMONS"),
        max_idle_conns: env.parsed("DB_MAX_IDLE_CONNS", 2)?,
        max_open_conns: env.parsed("DB_MAX_OPEN_CONNS", 10)?,
    }))
}

fn colvir_config<F>(env: &Env<F>) -> Result<Option<ColvirConfig>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(tns_string) = env.optional("DB_TNSSTRING_COLVIR") else {
        return Ok(None);
    };

    Ok(Some(ColvirConfig {
        host: env.required("DB_HOST_COLVIR")?,
        port: env.required_parsed("DB_PORT_COLVIR")?,
        db_name: env.required("DB_NAME_COLVIR")?,
        username: env.required("DB_USERNAME_COLVIR")?,
        password: env.required("DB_PASSWORD_COLVIR")?,
        tns_string,
        max_idle_conns: env.parsed("DB_MAX_IDLE_CONNS", 2)?,
        max_open_conns: env.parsed("DB_MAX_OPEN_CONNS", 10)?,
    }))
}

fn redis_config<F>(env: &Env<F>) -> Result<Option<RedisConfig>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(host) = env.optional("REDIS_HOST") else {
        return Ok(None);
    };

    Ok(Some(RedisConfig {
        host,
        port: env.parsed("REDIS_PORT", 6379)?,
        password: env.optional("REDIS_PASSWORD"),
        db: env.parsed("REDIS_DB", 0)?,
    }))
}

fn rabbitmq_config<F>(env: &Env<F>) -> Result<Option<RabbitMqConfig>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(host) = env.optional("RABBIT_CRM_HOST") else {
        return Ok(None);
    };

    Ok(Some(RabbitMqConfig {
        host,
        port: env.parsed("RABBIT_CRM_PORT", 5672)?,
        username: env.required("RABBIT_CRM_USR")?,
        password: env.required("RABBIT_CRM_PASSW")?,
        vhost: env.or_default("RABBIT_CRM_VHOST", ""),
    }))
}

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, name: &str) -> Option<String> {
        (self.0)(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn required(&self, name: &str) -> Result<String, ConfigError> {
        self.optional(name)
            .ok_or_else(|| ConfigError::Missing(name.to_string()))
    }

    fn or_default(&self, name: &str, default: &str) -> String {
        self.optional(name).unwrap_or_else(|| default.to_string())
    }

    fn required_parsed<T: FromStr>(&self, name: &str) -> Result<T, ConfigError> {
        let raw = self.required(name)?;
        raw.parse().map_err(|_| ConfigError::Invalid {
            name: name.to_string(),
            value: raw,
        })
    }

    fn parsed<T: FromStr>(&self, name: &str, default: T) -> Result<T, ConfigError> {
        match self.optional(name) {
            None => Ok(default),
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                name: name.to_string(),
                value: raw,
            }),
        }
    }
}
