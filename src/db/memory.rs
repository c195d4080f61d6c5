use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::db::models::{NewUser, UserFilter, UserRecord};
use crate::db::store::{StoreResult, UserStore};

#[derive(Default)]
struct Inner {
    records: Vec<UserRecord>,
    next_id: u64,
}

/// In-process `UserStore`. Ids are handed out as "1", "2", ... and records
/// are kept in insertion order.
#[derive(Default)]
pub struct MemoryUserStore {
    inner: RwLock<Inner>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every record. Id numbering carries on from where it was.
    pub async fn clear(&self) {
        self.inner.write().await.records.clear();
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find(&self, filter: &UserFilter) -> StoreResult<Vec<UserRecord>> {
        let inner = self.inner.read().await;
        Ok(inner
            .records
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect())
    }

    async fn find_one(&self, filter: &UserFilter) -> StoreResult<Option<UserRecord>> {
        let inner = self.inner.read().await;
        Ok(inner.records.iter().find(|r| filter.matches(r)).cloned())
    }

    async fn create(&self, user: NewUser) -> StoreResult<UserRecord> {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;

        let record = UserRecord {
            id: inner.next_id.to_string(),
            name: user.name,
            username: user.username,
            password: user.password,
        };
        inner.records.push(record.clone());

        Ok(record)
    }

    async fn find_one_and_update(
        &self,
        filter: &UserFilter,
        new_name: &str,
    ) -> StoreResult<Option<UserRecord>> {
        let mut inner = self.inner.write().await;
        Ok(inner
            .records
            .iter_mut()
            .find(|r| filter.matches(r))
            .map(|record| {
                record.name = new_name.to_string();
                record.clone()
            }))
    }

    async fn find_one_and_delete(&self, filter: &UserFilter) -> StoreResult<Option<UserRecord>> {
        let mut inner = self.inner.write().await;
        let position = inner.records.iter().position(|r| filter.matches(r));
        Ok(position.map(|i| inner.records.remove(i)))
    }

    async fn count(&self) -> StoreResult<u64> {
        Ok(self.inner.read().await.records.len() as u64)
    }

    async fn is_alive(&self) -> bool {
        true
    }
}
