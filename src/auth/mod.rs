// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Stateless sliding-session authentication. All authority lives in an
//! HS256-signed token; nothing is stored server side.
//!
//! ## Auth Flow
//!
//! 1. The login service issues a token whose payload is a [`TokenClaim`]
//! 2. The client sends it in `Authorization` on every request
//! 3. The gate:
//!    - verifies the signature with the shared secret
//!    - rejects tokens whose `exp` is not in the future
//!    - re-signs the same claim with `exp = now + window`
//!    - returns the new token in the `Authorization` response header
//!    - exposes the [`UserClaim`] to handlers through [`Auth`]
//!
//! ## Failure categories
//!
//! | Error | Status | Body message |
//! |-------|--------|--------------|
//! | `MissingToken` | 500 | `unauthorized` |
//! | `SignatureInvalid` | 401 | `unauthorized` |
//! | `DecodeError` | 401 | `cannot parse token claim` |
//! | `RenewError` | 401 | `cannot renew token` |

pub mod claims;
pub mod codec;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod roles;

pub use claims::{RegisteredClaims, TokenClaim, User, UserClaim};
pub use codec::{CodecError, TokenCodec};
pub use error::AuthError;
pub use extractor::{Auth, OptionalAuth};
pub use middleware::{auth_middleware, renew_session, AuthConfig, RenewedSession};
pub use roles::{Module, Role};
