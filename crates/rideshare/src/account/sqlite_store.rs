//! SQLite-backed credential store.
//!
//! One database file holds the `account` and `driver_profile` tables. All
//! queries are parameterized; multi-statement changes run in a transaction.

use super::store::{
    AccountChanges, Availability, CredentialStore, NewAccount, StoreError, StoredAccount,
};
use crate::model::{Account, AccountId, DriverProfile, Role};
use async_trait::async_trait;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow, SqliteSynchronous,
};
use sqlx::{Row, SqlitePool};
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Schema, applied on every open.
pub const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS account (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        role TEXT NOT NULL DEFAULT '',
        username TEXT NOT NULL,
        username_key TEXT NOT NULL UNIQUE,
        secret_hash TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
    );

    CREATE TABLE IF NOT EXISTS driver_profile (
        driver_id INTEGER PRIMARY KEY REFERENCES account(id) ON DELETE CASCADE,
        plate_number TEXT NOT NULL DEFAULT '',
        availability INTEGER NOT NULL DEFAULT 0 CHECK (availability IN (0, 1))
    );
"#;

const MAX_CONNECTIONS: u32 = 5;
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const ACCOUNT_COLUMNS: &str = "id, username, role, created_at";
const PROFILE_COLUMNS: &str = "driver_id, plate_number, availability";

#[derive(Debug, Clone)]
pub struct SqliteCredentialStore {
    pool: SqlitePool,
}

impl SqliteCredentialStore {
    /// Opens (creating if needed) the database at `path` and applies [`SCHEMA`].
    pub async fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await?;

        sqlx::raw_sql(SCHEMA).execute(&pool).await?;
        info!(path = %path.display(), "Credential store ready");
        Ok(Self { pool })
    }

    /// Waits for open connections to finish and closes the pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    fn row_to_account(row: &SqliteRow) -> Result<Account, StoreError> {
        let role: String = row.try_get("role")?;
        let role = role
            .parse::<Role>()
            .map_err(|_| StoreError::Corrupt(format!("unknown role {role:?}")))?;

        Ok(Account {
            id: AccountId(row.try_get("id")?),
            username: row.try_get("username")?,
            role,
            created_at: row.try_get("created_at")?,
        })
    }

    fn row_to_profile(row: &SqliteRow) -> Result<DriverProfile, StoreError> {
        Ok(DriverProfile {
            driver_id: AccountId(row.try_get("driver_id")?),
            plate_number: row.try_get("plate_number")?,
            available: row.try_get("availability")?,
        })
    }
}

/// Unique-index violations become [`StoreError::Duplicate`].
fn map_write_error(e: sqlx::Error) -> StoreError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Duplicate,
        _ => StoreError::Database(e),
    }
}

#[async_trait]
impl CredentialStore for SqliteCredentialStore {
    async fn insert(&self, account: NewAccount) -> Result<Account, StoreError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(&format!(
            "INSERT INTO account (role, username, username_key, secret_hash) \
             VALUES (?, ?, ?, ?) RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(account.role.as_str())
        .bind(&account.username)
        .bind(&account.username_key)
        .bind(&account.secret_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_write_error)?;
        let created = Self::row_to_account(&row)?;

        if created.role == Role::Driver {
            sqlx::query("INSERT INTO driver_profile (driver_id) VALUES (?)")
                .bind(created.id.0)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(created)
    }

    async fn find_by_username(
        &self,
        username_key: &str,
    ) -> Result<Option<StoredAccount>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {ACCOUNT_COLUMNS}, secret_hash FROM account WHERE username_key = ?"
        ))
        .bind(username_key)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(r) => Ok(Some(StoredAccount {
                account: Self::row_to_account(&r)?,
                secret_hash: r.try_get("secret_hash")?,
            })),
            None => Ok(None),
        }
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query(&format!("SELECT {ACCOUNT_COLUMNS} FROM account WHERE id = ?"))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::row_to_account).transpose()
    }

    async fn update(
        &self,
        id: AccountId,
        changes: AccountChanges,
    ) -> Result<Option<Account>, StoreError> {
        let (username, username_key) = match &changes.username {
            Some((name, key)) => (Some(name.as_str()), Some(key.as_str())),
            None => (None, None),
        };

        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(&format!(
            "UPDATE account SET \
                username = COALESCE(?, username), \
                username_key = COALESCE(?, username_key), \
                secret_hash = COALESCE(?, secret_hash), \
                role = COALESCE(?, role) \
             WHERE id = ? RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(username)
        .bind(username_key)
        .bind(changes.secret_hash.as_deref())
        .bind(changes.role.map(|r| r.as_str()))
        .bind(id.0)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_write_error)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let updated = Self::row_to_account(&row)?;

        match updated.role {
            Role::Driver => {
                sqlx::query("INSERT OR IGNORE INTO driver_profile (driver_id) VALUES (?)")
                    .bind(id.0)
                    .execute(&mut *tx)
                    .await?;
            }
            Role::Rider => {
                sqlx::query("DELETE FROM driver_profile WHERE driver_id = ?")
                    .bind(id.0)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;
        Ok(Some(updated))
    }

    async fn driver_profile(&self, id: AccountId) -> Result<Option<DriverProfile>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {PROFILE_COLUMNS} FROM driver_profile WHERE driver_id = ?"
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::row_to_profile).transpose()
    }

    async fn set_plate_number(
        &self,
        id: AccountId,
        plate_number: &str,
    ) -> Result<Option<DriverProfile>, StoreError> {
        let row = sqlx::query(&format!(
            "UPDATE driver_profile SET plate_number = ? WHERE driver_id = ? \
             RETURNING {PROFILE_COLUMNS}"
        ))
        .bind(plate_number)
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::row_to_profile).transpose()
    }

    async fn set_availability(
        &self,
        id: AccountId,
        availability: Availability,
    ) -> Result<Option<DriverProfile>, StoreError> {
        let assignment = match availability {
            Availability::Toggle => "1 - availability",
            Availability::Set(_) => "?",
        };
        let sql = format!(
            "UPDATE driver_profile SET availability = {assignment} WHERE driver_id = ? \
             RETURNING {PROFILE_COLUMNS}"
        );

        let mut query = sqlx::query(&sql);
        if let Availability::Set(available) = availability {
            query = query.bind(available);
        }
        let row = query.bind(id.0).fetch_optional(&self.pool).await?;

        row.as_ref().map(Self::row_to_profile).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn open_temp() -> (SqliteCredentialStore, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteCredentialStore::open(&dir.path().join("nested/app.db"))
            .await
            .unwrap();
        (store, dir)
    }

    fn new_account(username: &str, role: Role) -> NewAccount {
        NewAccount {
            username: username.to_string(),
            username_key: username.to_lowercase(),
            secret_hash: "$argon2id$placeholder".to_string(),
            role,
        }
    }

    #[tokio::test]
    async fn insert_sets_id_and_created_at() {
        let (store, _dir) = open_temp().await;
        let account = store.insert(new_account("Alice", Role::Rider)).await.unwrap();

        assert_eq!(account.username, "Alice");
        assert_eq!(account.role, Role::Rider);
        assert!(account.created_at <= chrono::Utc::now());

        let found = store.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(found.account, account);
        assert_eq!(found.secret_hash, "$argon2id$placeholder");
    }

    #[tokio::test]
    async fn username_key_is_unique() {
        let (store, _dir) = open_temp().await;
        store.insert(new_account("Alice", Role::Rider)).await.unwrap();

        let err = store
            .insert(new_account("ALICE", Role::Driver))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate));
    }

    #[tokio::test]
    async fn driver_profile_follows_role() {
        let (store, _dir) = open_temp().await;
        let driver = store.insert(new_account("dana", Role::Driver)).await.unwrap();

        let profile = store.driver_profile(driver.id).await.unwrap().unwrap();
        assert_eq!(profile.plate_number, "");
        assert!(!profile.available);

        let changes = AccountChanges {
            role: Some(Role::Rider),
            ..Default::default()
        };
        store.update(driver.id, changes).await.unwrap().unwrap();
        assert!(store.driver_profile(driver.id).await.unwrap().is_none());

        let changes = AccountChanges {
            role: Some(Role::Driver),
            ..Default::default()
        };
        store.update(driver.id, changes).await.unwrap().unwrap();
        assert!(store.driver_profile(driver.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn availability_toggles_and_sets() {
        let (store, _dir) = open_temp().await;
        let driver = store.insert(new_account("dana", Role::Driver)).await.unwrap();

        let on = store
            .set_availability(driver.id, Availability::Toggle)
            .await
            .unwrap()
            .unwrap();
        assert!(on.available);

        let off = store
            .set_availability(driver.id, Availability::Set(false))
            .await
            .unwrap()
            .unwrap();
        assert!(!off.available);

        let plate = store
            .set_plate_number(driver.id, "7ABC123")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(plate.plate_number, "7ABC123");
    }

    #[tokio::test]
    async fn update_of_missing_account_is_none() {
        let (store, _dir) = open_temp().await;
        let changes = AccountChanges {
            secret_hash: Some("x".into()),
            ..Default::default()
        };
        assert!(store.update(AccountId(99), changes).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn rename_onto_taken_username_is_duplicate() {
        let (store, _dir) = open_temp().await;
        store.insert(new_account("alice", Role::Rider)).await.unwrap();
        let bob = store.insert(new_account("bob", Role::Rider)).await.unwrap();

        let changes = AccountChanges {
            username: Some(("Alice".into(), "alice".into())),
            ..Default::default()
        };
        let err = store.update(bob.id, changes).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate));
    }
}
