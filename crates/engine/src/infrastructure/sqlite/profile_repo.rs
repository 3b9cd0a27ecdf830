//! Member profiles in SQLite.

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

use tablehost_domain::{
    DomainError, PaymentHandle, PaymentMethod, ProfileUpdate, TableName, UserId, UserProfile,
};

use crate::infrastructure::ports::{ClockPort, ProfileRepo, RepoError};

pub struct SqliteProfileRepo {
    pool: SqlitePool,
    clock: Arc<dyn ClockPort>,
}

impl SqliteProfileRepo {
    pub fn new(pool: SqlitePool, clock: Arc<dyn ClockPort>) -> Self {
        Self { pool, clock }
    }
}

fn stored_handle(
    method: PaymentMethod,
    raw: Option<String>,
) -> Result<Option<PaymentHandle>, RepoError> {
    raw.map(|raw| PaymentHandle::new(method, &raw))
        .transpose()
        .map_err(|e| RepoError::corrupt("profiles", e))
}

#[async_trait]
impl ProfileRepo for SqliteProfileRepo {
    async fn get_profile(&self, user_id: &UserId) -> Result<Option<UserProfile>, RepoError> {
        let row = sqlx::query(
            "SELECT display_name, venmo, cashapp, zelle, table_name FROM profiles WHERE user_id = ?",
        )
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::database("get_profile", e))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let display_name: String = row.get("display_name");
        let mut profile = UserProfile::new(user_id.clone(), display_name);
        for (column, method) in [
            ("venmo", PaymentMethod::Venmo),
            ("cashapp", PaymentMethod::CashApp),
            ("zelle", PaymentMethod::Zelle),
        ] {
            if let Some(handle) = stored_handle(method, row.get(column))? {
                profile.set_payment_handle(handle);
            }
        }
        let table_name: Option<String> = row.get("table_name");
        if let Some(name) = table_name {
            profile.set_table_name(
                TableName::new(name)
                    .map_err(|e: DomainError| RepoError::corrupt("profiles", e))?,
            );
        }
        Ok(Some(profile))
    }

    async fn upsert_profile(&self, user_id: &UserId, display_name: &str) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO profiles (user_id, display_name, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                display_name = excluded.display_name,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(user_id.as_str())
        .bind(display_name)
        .bind(self.clock.now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("upsert_profile", e))?;
        Ok(())
    }

    async fn update_profile(
        &self,
        user_id: &UserId,
        update: ProfileUpdate,
    ) -> Result<(), RepoError> {
        let result = sqlx::query(
            r#"
            UPDATE profiles SET
                venmo = COALESCE(?, venmo),
                cashapp = COALESCE(?, cashapp),
                zelle = COALESCE(?, zelle),
                table_name = COALESCE(?, table_name),
                updated_at = ?
            WHERE user_id = ?
            "#,
        )
        .bind(update.venmo.as_ref().map(|h| h.as_str().to_string()))
        .bind(update.cashapp.as_ref().map(|h| h.as_str().to_string()))
        .bind(update.zelle.as_ref().map(|h| h.as_str().to_string()))
        .bind(update.table_name.as_ref().map(|n| n.as_str().to_string()))
        .bind(self.clock.now().to_rfc3339())
        .bind(user_id.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("update_profile", e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("UserProfile", user_id));
        }
        Ok(())
    }
}
