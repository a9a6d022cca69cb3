// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::fmt;

use redis::Client;
use tracing::info;
use url::Url;

use super::ConnectionError;

#[derive(Clone, Default)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
    pub db: i64,
}

impl fmt::Debug for RedisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("db", &self.db)
            .finish()
    }
}

impl RedisConfig {
    /// `host:port`
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// `redis://[:password@]host:port/db`
    pub fn connection_url(&self) -> Result<Url, ConnectionError> {
        let mut url = Url::parse(&format!("redis://{}/{}", self.address(), self.db))
            .map_err(|e| ConnectionError::Url(e.to_string()))?;
        if let Some(password) = self.password.as_deref() {
            url.set_password(Some(password))
                .map_err(|_| ConnectionError::Url("cannot set redis password".to_string()))?;
        }
        Ok(url)
    }

    /// Open a client and verify it answers `PING`.
    pub async fn configure(&self) -> Result<Client, ConnectionError> {
        let client = Client::open(self.connection_url()?)?;
        let mut connection = client.get_multiplexed_async_connection().await?;
        redis::cmd("PING").query_async::<String>(&mut connection).await?;

        info!(address = %self.address(), db = self.db, "Connected to Redis");
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(password: Option<&str>) -> RedisConfig {
        RedisConfig {
            host: "cache".into(),
            port: 6379,
            password: password.map(str::to_string),
            db: 2,
        }
    }

    #[test]
    fn address_is_host_and_port() {
        assert_eq!(config(None).address(), "cache:6379");
    }

    #[test]
    fn url_without_password() {
        assert_eq!(
            config(None).connection_url().unwrap().as_str(),
            "redis://cache:6379/2"
        );
    }

    #[test]
    fn url_with_password_escapes_it() {
        let url = config(Some("p@ss word")).connection_url().unwrap();
        assert_eq!(url.username(), "");
        assert_eq!(url.password(), Some("p%40ss%20word"));
        assert_eq!(url.host_str(), Some("cache"));
        assert_eq!(url.path(), "/2");
    }

    #[test]
    fn debug_hides_password() {
        let rendered = format!("{:?}", config(Some("hunter2")));
        assert!(!rendered.contains("hunter2"));
    }
}
