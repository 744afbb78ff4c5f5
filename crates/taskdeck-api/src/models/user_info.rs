//! Public view of a user

use serde::Serialize;
use taskdeck_commons::{User, UserId};

/// User fields safe to return to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserInfo {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}
