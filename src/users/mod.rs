//! User operations: validate the request, run one store call, shape the reply.
//!
//! Every function takes the store explicitly so handlers and tests can hand
//! in whichever backend they hold.

mod ops;

pub use ops::{
    CreateUserInput, DeleteUserInput, RetrieveUserInput, UpdateUserInput, UserView,
    USER_DELETED, create_user, delete_user, retrieve_users, update_user,
};
