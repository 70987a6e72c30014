use std::fmt;

use chrono::{DateTime, Utc};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Users are identified by their login.
pub type UserId = String;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub login: UserId,
    pub display_name: String,
    /// Opaque password hash; the directory never inspects it.
    pub password_hash: String,
    /// Free-form profile attributes. The reserved keys `nome` and `login`
    /// are never stored here.
    pub attributes: IndexMap<String, String>,
    pub created_at: DateTime<Utc>,
}

/// Outgoing relations of a single user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relations {
    pub friends: IndexSet<UserId>,
    /// Users who invited this user and are waiting for a reciprocal invite.
    pub invites: IndexSet<UserId>,
    /// Users this user is a fan of.
    pub idols: IndexSet<UserId>,
    pub crushes: IndexSet<UserId>,
    pub enemies: IndexSet<UserId>,
}

impl Relations {
    /// True if `id` appears in any of the sets.
    pub fn mentions(&self, id: &str) -> bool {
        self.friends.contains(id)
            || self.invites.contains(id)
            || self.idols.contains(id)
            || self.crushes.contains(id)
            || self.enemies.contains(id)
    }

    /// Drop `id` from every set, keeping the order of the remaining entries.
    pub fn forget(&mut self, id: &str) {
        self.friends.shift_remove(id);
        self.invites.shift_remove(id);
        self.idols.shift_remove(id);
        self.crushes.shift_remove(id);
        self.enemies.shift_remove(id);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Direct,
    Community,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Community => "community",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A queued message. `recipient` is a login for direct messages and a
/// community name for broadcasts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub kind: MessageKind,
    pub sender: UserId,
    pub recipient: String,
    pub content: String,
    pub sent_at: DateTime<Utc>,
}

impl Message {
    pub fn new(kind: MessageKind, sender: &str, recipient: &str, content: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            sender: sender.to_string(),
            recipient: recipient.to_string(),
            content: content.to_string(),
            sent_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Community {
    pub name: String,
    pub owner: UserId,
    pub description: String,
    /// Members in join order; the owner is always first.
    pub members: IndexSet<UserId>,
    pub created_at: DateTime<Utc>,
}
