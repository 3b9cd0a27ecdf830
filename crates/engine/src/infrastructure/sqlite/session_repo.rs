//! Game records and memberships in SQLite.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use tablehost_domain::{
    DomainError, GameSession, Money, PlayerMembership, SessionStatus, SessionUrl, TableName, UserId,
};

use super::parse_timestamp;
use crate::infrastructure::ports::{RepoError, SessionRepo};

pub struct SqliteSessionRepo {
    pool: SqlitePool,
}

impl SqliteSessionRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Load a game record by URL.
    pub async fn get_game(&self, url: &SessionUrl) -> Result<Option<GameSession>, RepoError> {
        let row = sqlx::query("SELECT url, status, created_at, ended_at FROM games WHERE url = ?")
            .bind(url.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("get_game", e))?;

        row.map(|row| -> Result<GameSession, RepoError> {
            let status: String = row.get("status");
            let created_at: String = row.get("created_at");
            let ended_at: Option<String> = row.get("ended_at");
            Ok(GameSession::from_parts(
                url.clone(),
                status
                    .parse::<SessionStatus>()
                    .map_err(|e| RepoError::corrupt("games", e))?,
                parse_timestamp("games", &created_at)?,
                ended_at
                    .as_deref()
                    .map(|raw| parse_timestamp("games", raw))
                    .transpose()?,
            ))
        })
        .transpose()
    }
}

fn membership_from_row(row: &SqliteRow) -> Result<PlayerMembership, RepoError> {
    let corrupt = |e: DomainError| RepoError::corrupt("memberships", e);

    let user_id: String = row.get("user_id");
    let session_url: String = row.get("session_url");
    let table_name: String = row.get("table_name");
    let amount_cents: i64 = row.get("amount_cents");
    let joined_at: String = row.get("joined_at");
    let playing: bool = row.get("playing");
    let buyout_cents: Option<i64> = row.get("buyout_cents");
    let left_at: Option<String> = row.get("left_at");

    Ok(PlayerMembership {
        user_id: UserId::new(user_id).map_err(corrupt)?,
        session_url: SessionUrl::new(session_url).map_err(corrupt)?,
        table_name: TableName::new(table_name).map_err(corrupt)?,
        amount: Money::from_cents(amount_cents).map_err(corrupt)?,
        joined_at: parse_timestamp("memberships", &joined_at)?,
        playing,
        buyout: buyout_cents
            .map(Money::from_cents)
            .transpose()
            .map_err(corrupt)?,
        left_at: left_at
            .as_deref()
            .map(|raw| parse_timestamp("memberships", raw))
            .transpose()?,
    })
}

#[async_trait]
impl SessionRepo for SqliteSessionRepo {
    async fn create_game_record(&self, session: &GameSession) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO games (url, status, created_at, ended_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(url) DO UPDATE SET
                status = excluded.status,
                ended_at = excluded.ended_at
            "#,
        )
        .bind(session.url().as_str())
        .bind(session.status().as_str())
        .bind(session.created_at().to_rfc3339())
        .bind(session.ended_at().map(|t| t.to_rfc3339()))
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("create_game_record", e))?;
        Ok(())
    }

    async fn update_game_status(
        &self,
        url: &SessionUrl,
        status: SessionStatus,
        at: DateTime<Utc>,
    ) -> Result<(), RepoError> {
        let ended_at = (status == SessionStatus::Ended).then(|| at.to_rfc3339());
        let result = sqlx::query(
            "UPDATE games SET status = ?, ended_at = COALESCE(?, ended_at) WHERE url = ?",
        )
        .bind(status.as_str())
        .bind(ended_at)
        .bind(url.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("update_game_status", e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("GameSession", url));
        }
        Ok(())
    }

    async fn add_membership(&self, membership: &PlayerMembership) -> Result<(), RepoError> {
        let result = sqlx::query(
            r#"
            INSERT INTO memberships
                (user_id, session_url, table_name, amount_cents, joined_at, playing, buyout_cents, left_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(membership.user_id.as_str())
        .bind(membership.session_url.as_str())
        .bind(membership.table_name.as_str())
        .bind(membership.amount.cents())
        .bind(membership.joined_at.to_rfc3339())
        .bind(membership.playing)
        .bind(membership.buyout.map(|b| b.cents()))
        .bind(membership.left_at.map(|t| t.to_rfc3339()))
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(RepoError::constraint(format!(
                    "{} already has a seat in {}",
                    membership.user_id, membership.session_url
                )))
            }
            Err(e) => Err(RepoError::database("add_membership", e)),
        }
    }

    async fn remove_membership(
        &self,
        user_id: &UserId,
        url: &SessionUrl,
        buyout: Money,
        at: DateTime<Utc>,
    ) -> Result<bool, RepoError> {
        let result = sqlx::query(
            r#"
            UPDATE memberships
            SET playing = 0, buyout_cents = ?, left_at = ?
            WHERE user_id = ? AND session_url = ? AND playing = 1
            "#,
        )
        .bind(buyout.cents())
        .bind(at.to_rfc3339())
        .bind(user_id.as_str())
        .bind(url.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("remove_membership", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_active_membership(
        &self,
        url: &SessionUrl,
        user_id: &UserId,
    ) -> Result<Option<PlayerMembership>, RepoError> {
        let row = sqlx::query(
            r#"
            SELECT user_id, session_url, table_name, amount_cents, joined_at,
                   playing, buyout_cents, left_at
            FROM memberships
            WHERE session_url = ? AND user_id = ? AND playing = 1
            "#,
        )
        .bind(url.as_str())
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::database("find_active_membership", e))?;

        row.as_ref().map(membership_from_row).transpose()
    }
}
