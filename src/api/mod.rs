pub mod extract;
pub mod server;
pub mod status;
pub mod users;
