//! Caller identity and roles.

use std::fmt;
use std::str::FromStr;

/// Role granted by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    User,
    Vendor,
    Admin,
    Delivery,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Vendor => "VENDOR",
            Self::Admin => "ADMIN",
            Self::Delivery => "DELIVERY",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses `USER`, `user` and `ROLE_USER` alike.
impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let name = upper.strip_prefix("ROLE_").unwrap_or(&upper);
        match name {
            "USER" => Ok(Self::User),
            "VENDOR" => Ok(Self::Vendor),
            "ADMIN" => Ok(Self::Admin),
            "DELIVERY" | "DELIVERY_PARTNER" => Ok(Self::Delivery),
            _ => Err(()),
        }
    }
}

/// Authenticated caller, inserted into request extensions by the JWT middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub email: String,
    pub roles: Vec<Role>,
}

impl CallerIdentity {
    pub fn new(email: impl Into<String>, roles: Vec<Role>) -> Self {
        Self {
            email: email.into(),
            roles,
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// True when the caller holds at least one of `allowed`
    pub fn has_any_role(&self, allowed: &[Role]) -> bool {
        allowed.iter().any(|r| self.has_role(*r))
    }
}
