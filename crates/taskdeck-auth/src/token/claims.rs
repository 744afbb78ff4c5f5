use serde::{Deserialize, Serialize};
use std::fmt;
use taskdeck_commons::UserId;

/// Which of the two token flavors to verify against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Access => write!(f, "access"),
            TokenKind::Refresh => write!(f, "refresh"),
        }
    }
}

/// Verified payload of an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    #[serde(rename = "ownerId")]
    pub owner_id: UserId,
    pub email: String,
    /// Issued at (Unix seconds)
    pub iat: u64,
    /// Expiration time (Unix seconds)
    pub exp: u64,
}

/// Verified payload of a refresh token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshClaims {
    #[serde(rename = "ownerId")]
    pub owner_id: UserId,
    pub iat: u64,
    pub exp: u64,
}

/// Result of [`super::TokenService::verify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Claims {
    Access(AccessClaims),
    Refresh(RefreshClaims),
}

impl Claims {
    pub fn owner_id(&self) -> &UserId {
        match self {
            Claims::Access(c) => &c.owner_id,
            Claims::Refresh(c) => &c.owner_id,
        }
    }

    pub fn expires_at(&self) -> u64 {
        match self {
            Claims::Access(c) => c.exp,
            Claims::Refresh(c) => c.exp,
        }
    }
}

/// Shared view over both claim sets used by the verifier.
pub(crate) trait ExpiringClaims {
    fn exp(&self) -> u64;
    fn owner(&self) -> &UserId;
}

impl ExpiringClaims for AccessClaims {
    fn exp(&self) -> u64 {
        self.exp
    }

    fn owner(&self) -> &UserId {
        &self.owner_id
    }
}

impl ExpiringClaims for RefreshClaims {
    fn exp(&self) -> u64 {
        self.exp
    }

    fn owner(&self) -> &UserId {
        &self.owner_id
    }
}
