use async_trait::async_trait;
use thiserror::Error;

use crate::db::models::{NewUser, UserFilter, UserRecord};

/// Failure reported by the backing store. The message is the driver's own.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct StoreError(pub String);

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError(err.to_string())
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Document-store style access to user records.
///
/// Each call is one unit of work on the store; nothing here spans calls, so
/// a check followed by a write is not atomic.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// All records matching `filter`, in storage order.
    async fn find(&self, filter: &UserFilter) -> StoreResult<Vec<UserRecord>>;

    async fn find_one(&self, filter: &UserFilter) -> StoreResult<Option<UserRecord>>;

    async fn create(&self, user: NewUser) -> StoreResult<UserRecord>;

    /// Renames the first match and returns it as it reads after the update.
    async fn find_one_and_update(
        &self,
        filter: &UserFilter,
        new_name: &str,
    ) -> StoreResult<Option<UserRecord>>;

    /// Removes the first match, returning what was removed.
    async fn find_one_and_delete(&self, filter: &UserFilter) -> StoreResult<Option<UserRecord>>;

    async fn count(&self) -> StoreResult<u64>;

    async fn is_alive(&self) -> bool;
}
