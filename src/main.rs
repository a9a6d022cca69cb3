// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::process::ExitCode;

use ocrm_commons::{
    api::router,
    auth::AuthConfig,
    config::AppConfig,
    connections::rabbitmq::open_channel,
    http_client::HttpClient,
    logging,
    state::AppState,
};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

type BoxError = Box<dyn std::error::Error>;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init(&config.log_level, config.log_format) {
        eprintln!("logging error: {e}");
        return ExitCode::FAILURE;
    }

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "server failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: AppConfig) -> Result<(), BoxError> {
    let http_client = HttpClient::new(&config.http_client)?;
    if config.http_client.accept_invalid_certs {
        warn!("outbound TLS certificate verification is disabled");
    }

    let mut state = AppState::new(AuthConfig::new(&config.jwt_key, config.token_minutes))
        .with_http_client(http_client);

    if let Some(postgres) = &config.postgres {
        let pool = postgres.configure(config.db_user).await?;
        state = state.with_pool(pool);
    }

    // Fail fast on unreachable backing services.
    if let Some(colvir) = &config.colvir {
        colvir.configure().await?;
    }
    if let Some(redis) = &config.redis {
        redis.configure().await?;
    }
    if let Some(rabbitmq) = &config.rabbitmq {
        let connection = rabbitmq.configure().await?;
        let channel = open_channel(&connection).await?;
        if let Err(e) = channel.close(200, "startup check").await {
            warn!(error = %e, "failed to close RabbitMQ channel");
        }
        if let Err(e) = connection.close(200, "startup check").await {
            warn!(error = %e, "failed to close RabbitMQ connection");
        }
    }

    let app = router(state);
    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr).await?;

    info!(
        %addr,
        token_minutes = config.token_minutes,
        "OCRM commons listening (OpenAPI at /api-doc/openapi.json)"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(e) => {
            error!(error = %e, "failed to listen for shutdown signal");
            std::future::pending::<()>().await
        }
    }
}
