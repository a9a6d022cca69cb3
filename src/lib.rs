// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! OCRM Commons - shared building blocks for the operational CRM services
//!
//! The centrepiece is the session gate: an HS256 sliding-session token is
//! verified on every request, its expiry is pushed forward, and the re-signed
//! token is returned in the `Authorization` response header.
//!
//! ## Modules
//!
//! - `auth` - Claim model, token codec and the auth gate middleware
//! - `cors` - CORS layer answering browser pre-flights
//! - `api` - Demo router wiring the gates around profile and health routes
//! - `error` - Bilingual JSON API error
//! - `http_client` - Outbound JSON / XML / multipart client
//! - `connections` - Postgres, Redis and RabbitMQ connection builders
//! - `config` - Environment configuration
//! - `logging` - Subscriber setup and the per-action logger

pub mod api;
pub mod auth;
pub mod config;
pub mod connections;
pub mod cors;
pub mod error;
pub mod http_client;
pub mod logging;
pub mod pagination;
pub mod state;
