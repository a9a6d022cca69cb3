// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Role and module grants carried inside the user claim.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::claims::UserClaim;

/// Authorization grant attached to a user.
///
/// Every field is optional. A user may carry the same role several times;
/// the gate copies the list through as issued and never de-duplicates it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Role {
    /// Authority identifier (e.g. `ROLE_MANAGER`)
    pub authority: Option<String>,
    /// Short role code
    pub code: Option<String>,
    /// Free-form comment from the issuing system
    pub comments: Option<String>,
    /// Human-readable description
    pub description: Option<String>,
}

/// Application feature grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Module {
    /// Numeric module identifier
    pub id: i64,
    /// Module name
    pub name: Option<String>,
    /// Module description
    pub description: Option<String>,
}

impl Role {
    /// Role with only a code set.
    pub fn with_code(code: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            ..Self::default()
        }
    }
}

impl Module {
    pub fn new(id: i64, name: Option<String>) -> Self {
        Self {
            id,
            name,
            description: None,
        }
    }
}

impl UserClaim {
    /// Check whether any attached role matches `code` (case-insensitive).
    pub fn has_role(&self, code: &str) -> bool {
        self.roles.iter().any(|role| {
            role.code
                .as_deref()
                .is_some_and(|c| c.eq_ignore_ascii_case(code))
        })
    }

    /// Look up a module grant by id.
    pub fn module(&self, id: i64) -> Option<&Module> {
        self.modules.iter().find(|m| m.id == id)
    }
}
