pub mod memory;
pub mod models;
pub mod repo;
pub mod store;

pub use memory::MemoryUserStore;
pub use models::{NewUser, UserFilter, UserRecord};
pub use repo::SqliteUserStore;
pub use store::{StoreError, StoreResult, UserStore};
