//! SQLite-backed user store (`usuarios` table).

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use garage_auth::{ACCOUNTS, Registration, User};
use garage_core::RecordId;

use super::{UserStore, login_taken};
use crate::store::{StoreError, StoreResult};

/// `login` uniqueness; the columns come from the `ACCOUNTS` descriptor.
const LOGIN_UNIQUE_INDEX: &str =
    "CREATE UNIQUE INDEX IF NOT EXISTS usuarios_login_unique ON usuarios (login)";

#[derive(Debug, Clone)]
pub struct SqliteUserStore {
    pool: SqlitePool,
}

impl SqliteUserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the `usuarios` table and its login index if missing.
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        sqlx::query(&ACCOUNTS.create_table_sql())
            .execute(&self.pool)
            .await?;
        sqlx::query(LOGIN_UNIQUE_INDEX).execute(&self.pool).await?;
        Ok(())
    }
}

fn decode(row: &SqliteRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: RecordId::new(row.try_get("id")?),
        name: row.try_get("name")?,
        login: row.try_get("login")?,
        password: row.try_get("password")?,
    })
}

#[async_trait]
impl UserStore for SqliteUserStore {
    async fn register(&self, registration: Registration) -> StoreResult<User> {
        let result = sqlx::query("INSERT INTO usuarios (name, login, password) VALUES (?, ?, ?)")
            .bind(&registration.name)
            .bind(&registration.login)
            .bind(&registration.password)
            .execute(&self.pool)
            .await;

        match result {
            Ok(done) => Ok(User::from_registration(
                RecordId::new(done.last_insert_rowid()),
                registration,
            )),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(login_taken(&registration.login))
            }
            Err(e) => Err(StoreError::Database(e)),
        }
    }

    async fn find_by_login(&self, login: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query("SELECT id, name, login, password FROM usuarios WHERE login = ?")
            .bind(login)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(decode).transpose()?)
    }

    async fn list_all(&self) -> StoreResult<Vec<User>> {
        let rows = sqlx::query("SELECT id, name, login, password FROM usuarios ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(decode).collect::<Result<Vec<_>, _>>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use garage_auth::Credentials;
    use garage_core::DomainError;

    async fn store() -> SqliteUserStore {
        let pool = db::connect_in_memory().await.unwrap();
        let store = SqliteUserStore::new(pool);
        store.ensure_schema().await.unwrap();
        store.ensure_schema().await.unwrap();
        store
    }

    fn registration(login: &str) -> Registration {
        Registration {
            name: "Ana Souza".to_string(),
            login: login.to_string(),
            password: "s3cret".to_string(),
        }
    }

    #[tokio::test]
    async fn register_and_login() {
        let store = store().await;
        let ana = store.register(registration("ana")).await.unwrap();
        let bob = store.register(registration("bob")).await.unwrap();
        assert!(bob.id > ana.id);

        let found = store
            .authenticate(&Credentials::new("bob", "s3cret"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.login, "bob");

        let logins: Vec<_> = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.login)
            .collect();
        assert_eq!(logins, vec!["ana", "bob"]);
    }

    #[tokio::test]
    async fn unique_login_maps_to_conflict() {
        let store = store().await;
        store.register(registration("ana")).await.unwrap();

        let err = store.register(registration("ana")).await.unwrap_err();
        assert!(matches!(err, StoreError::Domain(DomainError::Conflict(_))));
    }

    #[tokio::test]
    async fn schema_follows_accounts_descriptor() {
        let store = store().await;

        let columns: Vec<String> = sqlx::query("SELECT name FROM pragma_table_info('usuarios') ORDER BY cid")
            .fetch_all(&store.pool)
            .await
            .unwrap()
            .iter()
            .map(|row| row.try_get("name").unwrap())
            .collect();
        let expected: Vec<String> = std::iter::once("id")
            .chain(ACCOUNTS.fields.iter().map(|f| f.name))
            .map(str::to_string)
            .collect();
        assert_eq!(columns, expected);

        let unique = sqlx::query(
            "SELECT COUNT(*) AS n FROM pragma_index_list('usuarios') WHERE name = 'usuarios_login_unique' AND \"unique\" = 1",
        )
        .fetch_one(&store.pool)
        .await
        .unwrap();
        assert_eq!(unique.try_get::<i64, _>("n").unwrap(), 1);
    }
}
