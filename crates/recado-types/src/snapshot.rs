use serde::{Deserialize, Serialize};

use crate::models::{Community, Message, Profile, Relations};

/// Plain-data capture of the whole network, used to persist and restore it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Users in directory order.
    pub users: Vec<UserSnapshot>,
    /// Communities in creation order.
    pub communities: Vec<Community>,
}

/// Everything owned by one user: profile, outgoing relations and inbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSnapshot {
    pub profile: Profile,
    pub relations: Relations,
    /// Unread messages, oldest first.
    pub inbox: Vec<Message>,
}

impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.users.is_empty() && self.communities.is_empty()
    }
}
