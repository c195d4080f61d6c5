//! User service
//!
//! Create, retrieve, rename and delete user records over HTTP, plus status
//! and stats endpoints. Storage sits behind the `UserStore` trait so the
//! SQLite backend and the in-memory one are interchangeable.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod users;

pub use api::server::{AppState, router};
pub use config::AppConfig;
pub use error::{ApiError, Result};
