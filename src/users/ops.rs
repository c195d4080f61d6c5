use serde::{Deserialize, Serialize};

use crate::db::{NewUser, UserFilter, UserRecord, UserStore};
use crate::error::{ApiError, Result};

/// Confirmation body returned by a delete.
pub const USER_DELETED: &str = "user deleted";

/// Public shape of a user. The password never leaves the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserView {
    pub id: String,
    pub name: String,
    pub username: String,
}

impl From<UserRecord> for UserView {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            username: record.username,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateUserInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RetrieveUserInput {
    pub id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateUserInput {
    pub id: Option<String>,
    pub old_name: Option<String>,
    pub new_name: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct DeleteUserInput {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// Empty strings count as missing, same as an omitted field.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn required(value: Option<String>, missing: &str) -> Result<String> {
    present(value).ok_or_else(|| ApiError::invalid_input(missing))
}

/// POST /user/create
pub async fn create_user(store: &dyn UserStore, input: CreateUserInput) -> Result<UserView> {
    let name = required(input.name, "Name is missing")?;
    let username = required(input.username, "username is missing")?;
    let password = required(input.password, "password is missing")?;

    // Check and insert are separate store calls; two racing creates can both pass.
    let existing = store
        .find_one(&UserFilter::Username(username.clone()))
        .await?;
    if existing.is_some() {
        return Err(ApiError::Conflict("user already exist".to_string()));
    }

    let record = store
        .create(NewUser {
            name,
            username,
            password,
        })
        .await?;

    tracing::info!(id = %record.id, username = %record.username, "user created");
    Ok(record.into())
}

/// GET /user/retrieve/{id}?name=
pub async fn retrieve_users(
    store: &dyn UserStore,
    input: RetrieveUserInput,
) -> Result<Vec<UserView>> {
    let id = present(input.id);
    let name = present(input.name);

    let filter = if id.is_none() && name.is_none() {
        UserFilter::All
    } else {
        UserFilter::id_or_name(id.as_deref(), name.as_deref())
    };

    let records = store.find(&filter).await?;
    if records.is_empty() {
        return Err(ApiError::user_not_found());
    }

    Ok(records.into_iter().map(UserView::from).collect())
}

/// PUT /user/update/{id}?oldName=  body `{"newName": ...}`
pub async fn update_user(store: &dyn UserStore, input: UpdateUserInput) -> Result<UserView> {
    let id = present(input.id);
    let old_name = present(input.old_name);
    // Truthiness decides the checks below; the raw value is what gets written.
    let new_name = present(input.new_name.clone());

    if old_name.is_none() && new_name.is_none() {
        return Err(ApiError::invalid_input(
            "oldName query and newName json are missing",
        ));
    }
    if id.is_none() && new_name.is_none() {
        return Err(ApiError::invalid_input("id and newName json are missing"));
    }
    if old_name == new_name {
        return Err(ApiError::invalid_input("oldName and newName are the same"));
    }

    let filter = UserFilter::id_or_name(id.as_deref(), old_name.as_deref());

    let record = match input.new_name {
        Some(new_name) => store.find_one_and_update(&filter, &new_name).await?,
        // id and oldName given without newName: nothing to write, report the match.
        None => store.find_one(&filter).await?,
    }
    .ok_or_else(ApiError::user_not_found)?;

    tracing::info!(id = %record.id, name = %record.name, "user renamed");
    Ok(record.into())
}

/// DELETE /user/delete/{id}?name=
///
/// Reports success whether or not anything matched.
pub async fn delete_user(store: &dyn UserStore, input: DeleteUserInput) -> Result<&'static str> {
    let id = present(input.id);
    let name = present(input.name);

    if id.is_none() && name.is_none() {
        return Err(ApiError::invalid_input("name or id query is missing"));
    }

    match store
        .find_one_and_delete(&UserFilter::id_or_name(id.as_deref(), name.as_deref()))
        .await?
    {
        Some(record) => tracing::info!(id = %record.id, "user deleted"),
        None => tracing::debug!("delete matched no user"),
    }

    Ok(USER_DELETED)
}
