//! User record

use super::UserId;
use chrono::{DateTime, Utc};

/// A registered account.
///
/// The password hash never leaves the server, so this type is deliberately
/// not `Serialize`; HTTP responses use a dedicated view model.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    /// Lowercased, unique across all users.
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}
