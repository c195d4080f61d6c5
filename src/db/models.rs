use serde::{Deserialize, Serialize};

/// One stored user document.
///
/// `password` is kept exactly as submitted; nothing in this service hashes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub username: String,
    pub password: String,
}

/// Fields supplied when inserting a record. The id is assigned by the store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub username: String,
    pub password: String,
}

/// Which records a store call should touch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserFilter {
    All,
    Username(String),
    /// Inclusive OR: a record matches if its id equals `id` or its name
    /// equals `name`. A `None` half matches nothing.
    IdOrName {
        id: Option<String>,
        name: Option<String>,
    },
}

impl UserFilter {
    pub fn id_or_name(id: Option<&str>, name: Option<&str>) -> Self {
        UserFilter::IdOrName {
            id: id.map(str::to_owned),
            name: name.map(str::to_owned),
        }
    }

    pub fn matches(&self, record: &UserRecord) -> bool {
        match self {
            UserFilter::All => true,
            UserFilter::Username(username) => record.username == *username,
            UserFilter::IdOrName { id, name } => {
                id.as_deref() == Some(record.id.as_str())
                    || name.as_deref() == Some(record.name.as_str())
            }
        }
    }
}
