use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use utoipa::ToSchema;

/// Access level of an authenticated user. Ordered: `Public < User < Admin`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    Public,
    User,
    Admin,
}

impl AccessLevel {
    /// Whether this level satisfies a route that requires `required`
    pub fn satisfies(&self, required: AccessLevel) -> bool {
        *self >= required
    }
}

impl Display for AccessLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            AccessLevel::Public => write!(f, "public"),
            AccessLevel::User => write!(f, "user"),
            AccessLevel::Admin => write!(f, "admin"),
        }
    }
}

impl FromStr for AccessLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(AccessLevel::Public),
            "user" => Ok(AccessLevel::User),
            "admin" => Ok(AccessLevel::Admin),
            other => Err(format!("Invalid access level: {}", other)),
        }
    }
}

/// Identity provider that authenticated the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    Local,
    Google,
    Microsoft,
}

impl Display for AuthProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            AuthProvider::Local => write!(f, "local"),
            AuthProvider::Google => write!(f, "google"),
            AuthProvider::Microsoft => write!(f, "microsoft"),
        }
    }
}

/// Authenticated caller, passed explicitly into every handler that needs it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RequestContext {
    pub user_id: String,
    pub access_level: AccessLevel,
    pub provider: AuthProvider,
}
