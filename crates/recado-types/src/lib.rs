pub mod api;
pub mod models;
pub mod snapshot;

pub use models::UserId;
