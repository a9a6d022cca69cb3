// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Logging setup and the per-action structured logger.
//!
//! `init` installs a global `tracing` subscriber; `RUST_LOG` still wins over
//! the configured level when it is set. [`ActionLogger`] stamps every event
//! with `service`, `action`, `client_id` and `manager_id` so log lines can
//! be correlated across services.

use std::fmt::Debug;
use std::str::FromStr;

use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Timestamp layout of the human-readable format (`17.10.2026 15:04:05`).
pub const TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("invalid log level {0:?}")]
    InvalidLevel(String),

    #[error("invalid log format {0:?} (expected `json` or `pretty`)")]
    InvalidFormat(String),

    #[error("failed to install log subscriber: {0}")]
    Install(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl FromStr for LogFormat {
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" | "text" => Ok(LogFormat::Pretty),
            _ => Err(LoggingError::InvalidFormat(s.to_string())),
        }
    }
}

/// Parse a level name. `warning`, `fatal` and `panic` are accepted as
/// aliases since existing deployments still use them.
pub fn parse_level(level: &str) -> Result<Level, LoggingError> {
    match level.trim().to_ascii_lowercase().as_str() {
        "warning" => Ok(Level::WARN),
        "fatal" | "panic" => Ok(Level::ERROR),
        other => Level::from_str(other).map_err(|_| LoggingError::InvalidLevel(level.to_string())),
    }
}

/// Install the global subscriber.
pub fn init(level: &str, format: LogFormat) -> Result<(), LoggingError> {
    let level = parse_level(level)?;
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    let registry = tracing_subscriber::registry().with(filter);
    let result = match format {
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_timer(ChronoLocal::new(TIMESTAMP_FORMAT.to_string())),
            )
            .try_init(),
    };

    result.map_err(|e| LoggingError::Install(e.to_string()))
}

/// Structured logger for one service action.
#[derive(Debug, Clone, Default)]
pub struct ActionLogger {
    service: String,
    action: String,
    client_id: String,
    manager_id: String,
}

macro_rules! action_event {
    ($lvl:expr, $logger:expr, $($arg:tt)+) => {
        tracing::event!(
            $lvl,
            service = %$logger.service,
            action = %$logger.action,
            client_id = %$logger.client_id,
            manager_id = %$logger.manager_id,
            $($arg)+
        )
    };
}

impl ActionLogger {
    pub fn new(service: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            action: action.into(),
            ..Self::default()
        }
    }

    pub fn with_client(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self
    }

    pub fn with_manager(mut self, manager_id: impl Into<String>) -> Self {
        self.manager_id = manager_id.into();
        self
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    /// Endpoint entered.
    pub fn start(&self) {
        action_event!(Level::INFO, self, "Start {} in {}", self.action, self.service);
    }

    /// Endpoint finished.
    pub fn end(&self, message: &str, data: impl Debug) {
        action_event!(
            Level::INFO,
            self,
            "End {} in {}, message: {}, data: {:?}",
            self.action,
            self.service,
            message,
            data
        );
    }

    pub fn info(&self, message: &str, data: impl Debug) {
        action_event!(Level::INFO, self, "message: {}, data: {:?}", message, data);
    }

    pub fn trace(&self, message: &str) {
        action_event!(Level::TRACE, self, "{}", message);
    }

    pub fn debug(&self, message: &str, data: impl Debug) {
        action_event!(Level::DEBUG, self, "message: {}, data: {:?}", message, data);
    }

    pub fn warn(&self, code: i32, message: &str, data: impl Debug) {
        action_event!(
            Level::WARN,
            self,
            code,
            "message: {}, data: {:?}",
            message,
            data
        );
    }

    pub fn error(&self, code: i32, message: &str, error: impl Debug) {
        action_event!(
            Level::ERROR,
            self,
            code,
            "message: {}, error: {:?}",
            message,
            error
        );
    }

    /// Unrecoverable failure. Logged at ERROR with `fatal = true`; the
    /// caller decides how to shut down.
    pub fn fatal(&self, message: &str, error: impl Debug) {
        action_event!(
            Level::ERROR,
            self,
            fatal = true,
            "message: {}, error: {:?}",
            message,
            error
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture(f: impl FnOnce()) -> String {
        let sink = Captured::default();
        let writer = sink.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::TRACE)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, f);
        let bytes = sink.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn parse_level_accepts_names_and_aliases() {
        assert_eq!(parse_level("info").unwrap(), Level::INFO);
        assert_eq!(parse_level("DEBUG").unwrap(), Level::DEBUG);
        assert_eq!(parse_level("warning").unwrap(), Level::WARN);
        assert_eq!(parse_level("fatal").unwrap(), Level::ERROR);
        assert!(matches!(parse_level("loud"), Err(LoggingError::InvalidLevel(_))));
    }

    #[test]
    fn log_format_parsing() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!(" Pretty ".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert_eq!(LogFormat::default(), LogFormat::Pretty);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn events_carry_correlation_fields() {
        let logger = ActionLogger::new("deals", "create")
            .with_client("c-17")
            .with_manager("m-3");

        let output = capture(|| {
            logger.start();
            logger.warn(409, "duplicate deal", "D-1");
        });

        assert!(output.contains("Start create in deals"));
        assert!(output.contains("service=deals"));
        assert!(output.contains("action=create"));
        assert!(output.contains("client_id=c-17"));
        assert!(output.contains("manager_id=m-3"));
        assert!(output.contains("code=409"));
        assert!(output.contains("duplicate deal"));
    }

    #[test]
    fn error_includes_cause() {
        let logger = ActionLogger::new("deals", "delete");
        let output = capture(|| logger.error(500, "delete failed", "connection reset"));

        assert!(output.contains("ERROR"));
        assert!(output.contains("connection reset"));
    }

    #[test]
    fn fatal_is_flagged_and_returns() {
        let logger = ActionLogger::new("deals", "import").with_client("c-9");
        let output = capture(|| {
            logger.fatal("import aborted", "disk full");
            logger.info("still running", ());
        });

        assert!(output.contains("ERROR"));
        assert!(output.contains("fatal=true"));
        assert!(output.contains("client_id=c-9"));
        assert!(output.contains("disk full"));
        assert!(output.contains("still running"));
    }

    #[test]
    fn trace_and_debug_respect_subscriber_level() {
        let logger = ActionLogger::new("deals", "list");
        let output = capture(|| {
            logger.trace("entering");
            logger.debug("page", 2);
            logger.end("ok", vec![1, 2]);
        });

        assert!(output.contains("entering"));
        assert!(output.contains("data: 2"));
        assert!(output.contains("End list in deals, message: ok, data: [1, 2]"));
    }
}
