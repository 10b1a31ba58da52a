use serde_json::Value;
use sqlx::SqlitePool;

use crate::error::StoreResult;
use crate::models::Reseller;
use crate::value::Loose;

#[derive(Debug, Clone)]
pub struct ResellerRepository {
    pool: SqlitePool,
}

impl ResellerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, reseller_id: &str, credit: f64) -> StoreResult<Reseller> {
        let reseller = sqlx::query_as::<_, Reseller>(
            "INSERT INTO resellers (reseller_id, credit) VALUES (?, ?) RETURNING reseller_id, credit",
        )
        .bind(reseller_id)
        .bind(credit)
        .fetch_one(&self.pool)
        .await?;
        Ok(reseller)
    }

    pub async fn get_by_id(&self, reseller_id: &str) -> StoreResult<Option<Reseller>> {
        let reseller =
            sqlx::query_as::<_, Reseller>("SELECT reseller_id, credit FROM resellers WHERE reseller_id = ?")
                .bind(reseller_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(reseller)
    }

    /// Adds `amount` to the balance in a single statement. The amount is bound
    /// as sent, so SQLite arithmetic applies: `"50"` adds 50 and non-numeric
    /// text adds 0. Unknown resellers are left untouched.
    pub async fn add_credit(&self, reseller_id: &Value, amount: &Value) -> StoreResult<u64> {
        let result = sqlx::query("UPDATE resellers SET credit = credit + ? WHERE reseller_id = ?")
            .bind(Loose(amount))
            .bind(Loose(reseller_id))
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connect_in_memory;
    use serde_json::json;

    #[tokio::test]
    async fn credit_top_ups_accumulate() {
        let repo = ResellerRepository::new(connect_in_memory().await.unwrap());
        repo.create("r1", 0.0).await.unwrap();

        repo.add_credit(&json!("r1"), &json!(50)).await.unwrap();
        repo.add_credit(&json!("r1"), &json!(25.5)).await.unwrap();

        let reseller = repo.get_by_id("r1").await.unwrap().unwrap();
        assert_eq!(reseller.credit, 75.5);
    }

    #[tokio::test]
    async fn textual_amounts_follow_sqlite_arithmetic() {
        let repo = ResellerRepository::new(connect_in_memory().await.unwrap());
        repo.create("r1", 0.0).await.unwrap();

        repo.add_credit(&json!("r1"), &json!("50")).await.unwrap();
        repo.add_credit(&json!("r1"), &json!("lots")).await.unwrap();

        let reseller = repo.get_by_id("r1").await.unwrap().unwrap();
        assert_eq!(reseller.credit, 50.0);
    }

    #[tokio::test]
    async fn credit_for_unknown_reseller_is_a_no_op() {
        let repo = ResellerRepository::new(connect_in_memory().await.unwrap());
        assert_eq!(repo.add_credit(&json!("nobody"), &json!(10)).await.unwrap(), 0);
        assert!(repo.get_by_id("nobody").await.unwrap().is_none());
    }
}
