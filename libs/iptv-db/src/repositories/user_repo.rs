use serde_json::Value;
use sqlx::SqlitePool;

use crate::error::StoreResult;
use crate::models::{User, UserStatus};
use crate::value::Loose;

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Adds a subscriber account without credentials. Values are stored as
    /// sent; the column types decide how they are coerced.
    pub async fn create(
        &self,
        user_id: &Value,
        user_code: &Value,
        expiry_date: &Value,
    ) -> StoreResult<()> {
        sqlx::query("INSERT INTO users (user_id, user_code, expiry_date) VALUES (?, ?, ?)")
            .bind(Loose(user_id))
            .bind(Loose(user_code))
            .bind(Loose(expiry_date))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Adds an account that can log in. `password_hash` must already be hashed.
    pub async fn register(
        &self,
        user_id: &Value,
        user_code: &Value,
        role: &Value,
        password_hash: &str,
    ) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO users (user_id, user_code, role, password_hash) VALUES (?, ?, ?, ?)",
        )
        .bind(Loose(user_id))
        .bind(Loose(user_code))
        .bind(Loose(role))
        .bind(password_hash)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get_by_id(&self, user_id: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn list(&self) -> StoreResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY user_id")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    /// Returns the number of rows touched; zero when the user does not exist.
    pub async fn set_status(&self, user_id: &Value, status: UserStatus) -> StoreResult<u64> {
        let result = sqlx::query("UPDATE users SET status = ? WHERE user_id = ?")
            .bind(status.as_str())
            .bind(Loose(user_id))
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn set_expiry(&self, user_id: &Value, expiry_date: &Value) -> StoreResult<u64> {
        let result = sqlx::query("UPDATE users SET expiry_date = ? WHERE user_id = ?")
            .bind(Loose(expiry_date))
            .bind(Loose(user_id))
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Sets the password and role of an account, creating it when missing.
    /// Returns `true` when a new account was created.
    pub async fn upsert_credentials(
        &self,
        user_id: &str,
        role: &str,
        password_hash: &str,
    ) -> StoreResult<bool> {
        let updated = sqlx::query("UPDATE users SET role = ?, password_hash = ? WHERE user_id = ?")
            .bind(role)
            .bind(password_hash)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        if updated.rows_affected() > 0 {
            return Ok(false);
        }

        let user_id = Value::from(user_id);
        self.register(&user_id, &user_id, &Value::from(role), password_hash)
            .await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connect_in_memory;
    use crate::error::StoreError;
    use serde_json::json;

    async fn repo() -> UserRepository {
        UserRepository::new(connect_in_memory().await.unwrap())
    }

    #[tokio::test]
    async fn created_user_defaults_to_active() {
        let repo = repo().await;
        repo.create(&json!("u1"), &json!("CODE1"), &json!("2030-01-01"))
            .await
            .unwrap();

        let user = repo.get_by_id("u1").await.unwrap().unwrap();
        assert_eq!(user.user_code.as_deref(), Some("CODE1"));
        assert_eq!(user.expiry_date.as_deref(), Some("2030-01-01"));
        assert_eq!(user.status, "active");
        assert_eq!(user.role, "user");
        assert!(user.password_hash.is_none());
    }

    #[tokio::test]
    async fn numeric_values_land_as_text() {
        let repo = repo().await;
        repo.create(&json!(42), &json!(7), &json!(1893456000))
            .await
            .unwrap();

        let user = repo.get_by_id("42").await.unwrap().unwrap();
        assert_eq!(user.user_code.as_deref(), Some("7"));
        assert_eq!(user.expiry_date.as_deref(), Some("1893456000"));
        assert_eq!(repo.set_status(&json!(42), UserStatus::Banned).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn duplicate_user_id_is_a_constraint_error() {
        let repo = repo().await;
        repo.create(&json!("u1"), &json!("A"), &Value::Null).await.unwrap();

        let err = repo
            .create(&json!("u1"), &json!("B"), &Value::Null)
            .await
            .unwrap_err();
        match err {
            StoreError::Constraint(msg) => assert!(msg.contains("UNIQUE"), "{msg}"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn ban_is_idempotent_and_unban_restores() {
        let repo = repo().await;
        let id = json!("u1");
        repo.create(&id, &json!("A"), &Value::Null).await.unwrap();

        repo.set_status(&id, UserStatus::Banned).await.unwrap();
        repo.set_status(&id, UserStatus::Banned).await.unwrap();
        assert!(repo.get_by_id("u1").await.unwrap().unwrap().is_banned());

        repo.set_status(&id, UserStatus::Active).await.unwrap();
        assert!(!repo.get_by_id("u1").await.unwrap().unwrap().is_banned());
    }

    #[tokio::test]
    async fn updates_on_missing_user_touch_nothing() {
        let repo = repo().await;
        let ghost = json!("ghost");
        assert_eq!(repo.set_status(&ghost, UserStatus::Banned).await.unwrap(), 0);
        assert_eq!(repo.set_expiry(&ghost, &json!("2031-01-01")).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn upsert_credentials_creates_then_updates() {
        let repo = repo().await;
        assert!(repo.upsert_credentials("admin", "admin", "h1").await.unwrap());
        assert!(!repo.upsert_credentials("admin", "superadmin", "h2").await.unwrap());

        let user = repo.get_by_id("admin").await.unwrap().unwrap();
        assert_eq!(user.role, "superadmin");
        assert_eq!(user.password_hash.as_deref(), Some("h2"));
    }
}
