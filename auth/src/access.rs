use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

/// Coarse-grained role carried in access tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(AccessError::UnknownRole(other.to_string())),
        }
    }
}

/// Identity proven by a verified access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i64,
    pub role: Role,
}

impl Principal {
    pub fn new(user_id: i64, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Ownership check for this principal against a resource owner.
    pub fn check_ownership(&self, resource_owner_id: Option<i64>) -> Result<(), AccessError> {
        check_ownership(resource_owner_id, self.user_id, self.role)
    }
}

/// Error type for authorization decisions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccessError {
    #[error("Forbidden")]
    Forbidden,

    #[error("Unknown role: {0}")]
    UnknownRole(String),
}

/// Owner-or-admin rule shared by every owned resource (topics, posts, ...).
///
/// * admins are always allowed
/// * a resource without an owner (author deleted or anonymous) is denied to
///   everyone else
/// * the owner is allowed
/// * anyone else gets `Forbidden`
pub fn check_ownership(
    resource_owner_id: Option<i64>,
    requester_id: i64,
    role: Role,
) -> Result<(), AccessError> {
    if role == Role::Admin {
        return Ok(());
    }

    match resource_owner_id {
        Some(owner_id) if owner_id == requester_id => Ok(()),
        _ => Err(AccessError::Forbidden),
    }
}
