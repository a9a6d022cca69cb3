// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Claims embedded in the session token.
//!
//! The JSON layout matches what the login service issues:
//!
//! ```json
//! {
//!   "user": {
//!     "login": "alice", "email": null, "fullName": null, ...,
//!     "roles": [{ "authority": null, "code": "MANAGER", ... }],
//!     "modules": [{ "id": 7, "name": "clients", "description": null }]
//!   },
//!   "exp": 1700000900
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use super::roles::{Module, Role};

/// Identity record of the calling user.
///
/// Optional attributes are `null` when unknown; an empty string is a
/// different value and is kept as such.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Login, unique within the issuing system
    pub login: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub title: Option<String>,
    /// Department code
    pub dep_code: Option<String>,
    /// Department id
    pub dep_id: Option<String>,
    /// Department name
    pub dep_name: Option<String>,
    /// Authentication method used at login
    pub auth_type: Option<String>,
    /// Avatar reference
    pub photo: Option<String>,
    /// Branch code
    pub filial_code: Option<String>,
    /// Branch name
    pub filial_name: Option<String>,
}

/// "Who is calling and what may they do".
///
/// User fields are serialized at the top level of the object, next to
/// `roles` and `modules`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserClaim {
    #[serde(flatten)]
    pub user: User,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub roles: Vec<Role>,

    /// Module grants, order preserved
    #[serde(default, deserialize_with = "null_as_empty")]
    pub modules: Vec<Module>,
}

/// Registered JWT claims carried next to the user claim.
///
/// Only `exp` is required; the rest are passed through untouched when the
/// issuer set them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredClaims {
    /// Expiration timestamp (Unix seconds)
    pub exp: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

/// Full token payload: the user claim plus registered claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaim {
    pub user: UserClaim,

    #[serde(flatten)]
    pub registered: RegisteredClaims,
}

impl User {
    /// User with only a login; every optional attribute is unknown.
    pub fn new(login: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            email: None,
            full_name: None,
            title: None,
            dep_code: None,
            dep_id: None,
            dep_name: None,
            auth_type: None,
            photo: None,
            filial_code: None,
            filial_name: None,
        }
    }
}

impl UserClaim {
    pub fn new(user: User) -> Self {
        Self {
            user,
            roles: Vec::new(),
            modules: Vec::new(),
        }
    }

    pub fn login(&self) -> &str {
        &self.user.login
    }
}

impl TokenClaim {
    /// Create a claim expiring at `expires_at` (truncated to whole seconds).
    pub fn new(user: UserClaim, expires_at: DateTime<Utc>) -> Self {
        Self {
            user,
            registered: RegisteredClaims {
                exp: expires_at.timestamp(),
                iat: None,
                nbf: None,
                iss: None,
                sub: None,
                aud: None,
                jti: None,
            },
        }
    }

    /// Expiration as Unix seconds.
    pub fn expires_at(&self) -> i64 {
        self.registered.exp
    }

    /// A claim is usable only while its expiry is strictly in the future.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.registered.exp <= now.timestamp()
    }

    /// Copy of this claim with only the expiry replaced.
    pub fn renewed(&self, expires_at: DateTime<Utc>) -> Self {
        let mut claim = self.clone();
        claim.registered.exp = expires_at.timestamp();
        claim
    }
}

/// Issuers that build the token from nil slices send `null` instead of `[]`.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
