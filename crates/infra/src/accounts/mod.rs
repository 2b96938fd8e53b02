//! User account storage.
//!
//! Injected wherever accounts are needed, so the in-memory list used in
//! dev/tests and the SQLite table are interchangeable at the call sites.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use garage_auth::{Credentials, Registration, User};
use garage_core::{DomainError, RecordId};

use crate::store::{StoreError, StoreResult};

pub mod sqlite;

pub use sqlite::SqliteUserStore;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `Conflict` when the login is already taken.
    async fn register(&self, registration: Registration) -> StoreResult<User>;

    async fn find_by_login(&self, login: &str) -> StoreResult<Option<User>>;

    async fn list_all(&self) -> StoreResult<Vec<User>>;

    /// The user whose login and password both match, if any.
    async fn authenticate(&self, credentials: &Credentials) -> StoreResult<Option<User>> {
        let user = self.find_by_login(&credentials.login).await?;
        Ok(user.filter(|u| u.matches(credentials)))
    }
}

#[async_trait]
impl<S> UserStore for Arc<S>
where
    S: UserStore + ?Sized,
{
    async fn register(&self, registration: Registration) -> StoreResult<User> {
        (**self).register(registration).await
    }

    async fn find_by_login(&self, login: &str) -> StoreResult<Option<User>> {
        (**self).find_by_login(login).await
    }

    async fn list_all(&self) -> StoreResult<Vec<User>> {
        (**self).list_all().await
    }

    async fn authenticate(&self, credentials: &Credentials) -> StoreResult<Option<User>> {
        (**self).authenticate(credentials).await
    }
}

pub(crate) fn login_taken(login: &str) -> StoreError {
    StoreError::Domain(DomainError::conflict(format!("login `{login}` is already taken")))
}

/// In-memory user list for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    inner: RwLock<Vec<User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> StoreError {
    StoreError::Storage("user list lock poisoned".to_string())
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn register(&self, registration: Registration) -> StoreResult<User> {
        let mut users = self.inner.write().map_err(|_| poisoned())?;
        if users.iter().any(|u| u.login == registration.login) {
            return Err(login_taken(&registration.login));
        }

        let next = users.iter().map(|u| u.id.get()).max().unwrap_or(0) + 1;
        let user = User::from_registration(RecordId::new(next), registration);
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_login(&self, login: &str) -> StoreResult<Option<User>> {
        let users = self.inner.read().map_err(|_| poisoned())?;
        Ok(users.iter().find(|u| u.login == login).cloned())
    }

    async fn list_all(&self) -> StoreResult<Vec<User>> {
        let users = self.inner.read().map_err(|_| poisoned())?;
        Ok(users.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(login: &str) -> Registration {
        Registration {
            name: "Ana Souza".to_string(),
            login: login.to_string(),
            password: "s3cret".to_string(),
        }
    }

    #[tokio::test]
    async fn register_then_authenticate() {
        let store = InMemoryUserStore::new();
        let user = store.register(registration("ana")).await.unwrap();
        assert_eq!(user.id, RecordId::new(1));

        let found = store
            .authenticate(&Credentials::new("ana", "s3cret"))
            .await
            .unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));

        let wrong = store
            .authenticate(&Credentials::new("ana", "nope"))
            .await
            .unwrap();
        assert!(wrong.is_none());
    }

    #[tokio::test]
    async fn duplicate_login_conflicts() {
        let store = InMemoryUserStore::new();
        store.register(registration("ana")).await.unwrap();

        let err = store.register(registration("ana")).await.unwrap_err();
        assert!(matches!(err, StoreError::Domain(DomainError::Conflict(_))));
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn works_behind_a_trait_object() {
        let store: Arc<dyn UserStore> = Arc::new(InMemoryUserStore::new());
        store.register(registration("bob")).await.unwrap();
        assert!(store.find_by_login("bob").await.unwrap().is_some());
        assert!(store.find_by_login("carol").await.unwrap().is_none());
    }
}
