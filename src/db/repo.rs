use async_trait::async_trait;
use sqlx::{
    Sqlite, SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use std::str::FromStr;
use uuid::Uuid;

use crate::db::models::{NewUser, UserFilter, UserRecord};
use crate::db::store::{StoreResult, UserStore};

const COLUMNS: &str = "id, name, username, password";

/// `UserStore` backed by SQLite through sqlx.
#[derive(Clone)]
pub struct SqliteUserStore {
    pool: SqlitePool,
}

impl SqliteUserStore {
    /// Opens a pool on `db_url` and makes sure the users table exists.
    pub async fn connect(db_url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(db_url)?.create_if_missing(true);

        let pool = if db_url.contains(":memory:") {
            // A memory database lives and dies with its connection, so keep
            // exactly one open for the life of the pool.
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(options)
                .await?
        };

        create_user_table(&pool).await?;

        Ok(Self { pool })
    }
}

pub async fn create_user_table(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // username is deliberately not UNIQUE: uniqueness is checked on create only.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            username TEXT NOT NULL,
            password TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// SQL predicate for `filter` plus the values it binds, in order.
fn where_clause(filter: &UserFilter) -> (&'static str, Vec<Option<String>>) {
    match filter {
        UserFilter::All => ("1 = 1", vec![]),
        UserFilter::Username(username) => ("username = ?", vec![Some(username.clone())]),
        // NULL never compares equal, so an absent half matches nothing.
        UserFilter::IdOrName { id, name } => {
            ("id = ? OR name = ?", vec![id.clone(), name.clone()])
        }
    }
}

#[async_trait]
impl UserStore for SqliteUserStore {
    async fn find(&self, filter: &UserFilter) -> StoreResult<Vec<UserRecord>> {
        let (predicate, binds) = where_clause(filter);
        let sql = format!("SELECT {COLUMNS} FROM users WHERE {predicate}");

        let mut query = sqlx::query_as::<Sqlite, UserRecord>(&sql);
        for value in binds {
            query = query.bind(value);
        }

        Ok(query.fetch_all(&self.pool).await?)
    }

    async fn find_one(&self, filter: &UserFilter) -> StoreResult<Option<UserRecord>> {
        let (predicate, binds) = where_clause(filter);
        let sql = format!("SELECT {COLUMNS} FROM users WHERE {predicate} LIMIT 1");

        let mut query = sqlx::query_as::<Sqlite, UserRecord>(&sql);
        for value in binds {
            query = query.bind(value);
        }

        Ok(query.fetch_optional(&self.pool).await?)
    }

    async fn create(&self, user: NewUser) -> StoreResult<UserRecord> {
        let record = UserRecord {
            id: Uuid::new_v4().to_string(),
            name: user.name,
            username: user.username,
            password: user.password,
        };

        sqlx::query(
            r#"
            INSERT INTO users (id, name, username, password)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.name)
        .bind(&record.username)
        .bind(&record.password)
        .execute(&self.pool)
        .await?;

        Ok(record)
    }

    async fn find_one_and_update(
        &self,
        filter: &UserFilter,
        new_name: &str,
    ) -> StoreResult<Option<UserRecord>> {
        let (predicate, binds) = where_clause(filter);
        let sql = format!(
            "UPDATE users SET name = ? \
             WHERE rowid = (SELECT rowid FROM users WHERE {predicate} LIMIT 1) \
             RETURNING {COLUMNS}"
        );

        let mut query = sqlx::query_as::<Sqlite, UserRecord>(&sql).bind(new_name);
        for value in binds {
            query = query.bind(value);
        }

        Ok(query.fetch_optional(&self.pool).await?)
    }

    async fn find_one_and_delete(&self, filter: &UserFilter) -> StoreResult<Option<UserRecord>> {
        let (predicate, binds) = where_clause(filter);
        let sql = format!(
            "DELETE FROM users \
             WHERE rowid = (SELECT rowid FROM users WHERE {predicate} LIMIT 1) \
             RETURNING {COLUMNS}"
        );

        let mut query = sqlx::query_as::<Sqlite, UserRecord>(&sql);
        for value in binds {
            query = query.bind(value);
        }

        Ok(query.fetch_optional(&self.pool).await?)
    }

    async fn count(&self) -> StoreResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count as u64)
    }

    async fn is_alive(&self) -> bool {
        if self.pool.is_closed() {
            return false;
        }
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}
