use crate::error::{AuthError, AuthResult};
use parking_lot::RwLock;
use std::collections::HashMap;
use taskdeck_commons::{User, UserId};

/// Abstraction over user persistence for authentication flows.
///
/// Emails are compared after [`normalize_email`]; implementations must keep
/// them unique.
#[async_trait::async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user. Fails with `EmailTaken` on a duplicate email.
    async fn create_user(&self, user: User) -> AuthResult<User>;

    async fn get_by_email(&self, email: &str) -> AuthResult<User>;

    async fn get_by_id(&self, id: &UserId) -> AuthResult<User>;
}

/// Trim and lowercase an email for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Default)]
struct UserTables {
    by_id: HashMap<UserId, User>,
    email_index: HashMap<String, UserId>,
}

/// Process-local user store.
#[derive(Default)]
pub struct InMemoryUserRepository {
    tables: RwLock<UserTables>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tables.read().by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait::async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create_user(&self, mut user: User) -> AuthResult<User> {
        user.email = normalize_email(&user.email);

        let mut tables = self.tables.write();
        if tables.email_index.contains_key(&user.email) {
            return Err(AuthError::EmailTaken);
        }
        if tables.by_id.contains_key(&user.id) {
            return Err(AuthError::DatabaseError(format!("Duplicate user id '{}'", user.id)));
        }

        tables.email_index.insert(user.email.clone(), user.id.clone());
        tables.by_id.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn get_by_email(&self, email: &str) -> AuthResult<User> {
        let email = normalize_email(email);
        let tables = self.tables.read();
        tables
            .email_index
            .get(&email)
            .and_then(|id| tables.by_id.get(id))
            .cloned()
            .ok_or_else(|| AuthError::UserNotFound(format!("User '{}' not found", email)))
    }

    async fn get_by_id(&self, id: &UserId) -> AuthResult<User> {
        self.tables
            .read()
            .by_id
            .get(id)
            .cloned()
            .ok_or_else(|| AuthError::UserNotFound(format!("User '{}' not found", id)))
    }
}
