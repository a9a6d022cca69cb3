// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgSslMode};
use tracing::info;

use super::ConnectionError;

/// Lifetime of a pooled connection before it is recycled.
pub const CONNECTION_MAX_LIFETIME: Duration = Duration::from_secs(3600);

/// Which of the three database roles to connect as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbUser {
    Staff,
    Dsr,
    Commons,
}

impl FromStr for DbUser {
    type Err = ConnectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "staff" => Ok(DbUser::Staff),
            "dsr" => Ok(DbUser::Dsr),
            "commons" => Ok(DbUser::Commons),
            other => Err(ConnectionError::UnknownDbUser(other.to_string())),
        }
    }
}

impl fmt::Display for DbUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DbUser::Staff => "staff",
            DbUser::Dsr => "dsr",
            DbUser::Commons => "commons",
        })
    }
}

#[derive(Clone, Default, PartialEq, Eq)]
pub struct DbCredentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for DbCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub ssl_mode: String,
    pub staff: DbCredentials,
    pub dsr: DbCredentials,
    pub commons: DbCredentials,
    /// Connections kept open while idle (pool minimum).
    pub max_idle_conns: u32,
    pub max_open_conns: u32,
}

impl PostgresConfig {
    pub fn credentials(&self, user: DbUser) -> &DbCredentials {
        match user {
            DbUser::Staff => &self.staff,
            DbUser::Dsr => &self.dsr,
            DbUser::Commons => &self.commons,
        }
    }

    pub fn connect_options(&self, user: DbUser) -> Result<PgConnectOptions, ConnectionError> {
        let ssl_mode = PgSslMode::from_str(&self.ssl_mode)
            .map_err(|_| ConnectionError::InvalidSslMode(self.ssl_mode.clone()))?;
        let credentials = self.credentials(user);

        Ok(PgConnectOptions::new_without_pgpass()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&credentials.username)
            .password(&credentials.password)
            .ssl_mode(ssl_mode))
    }

    fn pool_options(&self) -> PgPoolOptions {
        let max = self.max_open_conns.max(1);
        PgPoolOptions::new()
            .max_connections(max)
            .min_connections(self.max_idle_conns.min(max))
            .max_lifetime(CONNECTION_MAX_LIFETIME)
    }

    /// Open a pool as `user` and ping it with `SELECT 1`.
    pub async fn configure(&self, user: DbUser) -> Result<PgPool, ConnectionError> {
        let options = self.connect_options(user)?;
        let pool = self.pool_options().connect_with(options).await?;
        sqlx::query("SELECT 1").execute(&pool).await?;

        info!(
            host = %self.host,
            database = %self.database,
            user = %user,
            "Connected to Postgres"
        );
        Ok(pool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PostgresConfig {
        PostgresConfig {
            host: "db.internal".into(),
            port: 5433,
            database: "crm".into(),
            ssl_mode: "disable".into(),
            staff: DbCredentials {
                username: "staff_user".into(),
                password: "s".into(),
            },
            dsr: DbCredentials {
                username: "dsr_user".into(),
                password: "d".into(),
            },
            commons: DbCredentials {
                username: "commons_user".into(),
                password: "c".into(),
            },
            max_idle_conns: 2,
            max_open_conns: 10,
        }
    }

    #[test]
    fn db_user_parses_known_names_only() {
        assert_eq!("staff".parse::<DbUser>().unwrap(), DbUser::Staff);
        assert_eq!("dsr".parse::<DbUser>().unwrap(), DbUser::Dsr);
        assert_eq!("commons".parse::<DbUser>().unwrap(), DbUser::Commons);
        assert!(matches!(
            "admin".parse::<DbUser>(),
            Err(ConnectionError::UnknownDbUser(name)) if name == "admin"
        ));
    }

    #[test]
    fn each_user_gets_its_own_credentials() {
        let cfg = config();
        for (user, expected) in [
            (DbUser::Staff, "staff_user"),
            (DbUser::Dsr, "dsr_user"),
            (DbUser::Commons, "commons_user"),
        ] {
            let options = cfg.connect_options(user).unwrap();
            assert_eq!(options.get_username(), expected);
            assert_eq!(options.get_host(), "db.internal");
            assert_eq!(options.get_port(), 5433);
            assert_eq!(options.get_database(), Some("crm"));
            assert!(matches!(options.get_ssl_mode(), PgSslMode::Disable));
        }
    }

    #[test]
    fn invalid_ssl_mode_is_rejected() {
        let mut cfg = config();
        cfg.ssl_mode = "sometimes".into();
        assert!(matches!(
            cfg.connect_options(DbUser::Staff),
            Err(ConnectionError::InvalidSslMode(_))
        ));
    }

    #[test]
    fn pool_sizing_follows_settings() {
        let mut cfg = config();
        let options = cfg.pool_options();
        assert_eq!(options.get_max_connections(), 10);
        assert_eq!(options.get_min_connections(), 2);
        assert_eq!(options.get_max_lifetime(), Some(CONNECTION_MAX_LIFETIME));

        cfg.max_open_conns = 0;
        cfg.max_idle_conns = 5;
        let options = cfg.pool_options();
        assert_eq!(options.get_max_connections(), 1);
        assert_eq!(options.get_min_connections(), 1);
    }

    #[test]
    fn credentials_debug_hides_password() {
        let rendered = format!("{:?}", config().staff);
        assert!(rendered.contains("staff_user"));
        assert!(!rendered.contains("\"s\""));
    }
}
