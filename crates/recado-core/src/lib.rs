//! Relationship and messaging core of the recado social network.
//!
//! [`Network`] owns all state. Operations are synchronous and leave the state
//! untouched when they fail; callers serving the network concurrently must
//! hold a single lock around every call.

pub mod communities;
pub mod directory;
pub mod error;
pub mod inbox;
pub mod messaging;
pub mod network;
pub mod relations;

pub use directory::SYSTEM_SENDER;
pub use error::{CoreError, Relation, Result};
pub use network::Network;
pub use relations::FriendRequest;
