//! Messaging engine: direct messages ("recados") and community broadcasts.

use indexmap::IndexMap;
use recado_types::UserId;
use recado_types::models::{Message, MessageKind};
use tracing::debug;

use crate::communities::CommunityRegistry;
use crate::directory::{Directory, SYSTEM_SENDER};
use crate::error::{CoreError, Relation, Result};
use crate::inbox::Inbox;
use crate::relations::{Notifier, RelationshipGraph, ensure_exists};

#[derive(Debug, Default)]
pub struct MessagingEngine {
    inboxes: IndexMap<UserId, Inbox>,
}

impl MessagingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_inboxes(inboxes: impl IntoIterator<Item = (UserId, Inbox)>) -> Self {
        Self {
            inboxes: inboxes.into_iter().collect(),
        }
    }

    pub fn open_inbox(&mut self, user: &str) {
        self.inboxes.entry(user.to_string()).or_default();
    }

    pub fn inbox(&self, user: &str) -> Option<&Inbox> {
        self.inboxes.get(user)
    }

    pub fn send_direct(
        &mut self,
        dir: &impl Directory,
        graph: &RelationshipGraph,
        sender: &str,
        recipient: &str,
        content: &str,
    ) -> Result<()> {
        if sender == recipient {
            return Err(CoreError::SelfReference(Relation::Recado));
        }
        ensure_exists(dir, sender)?;
        ensure_exists(dir, recipient)?;
        if graph.is_enemy(recipient, sender) {
            return Err(CoreError::BlockedByEnemy(recipient.to_string()));
        }

        self.enqueue(recipient, Message::new(MessageKind::Direct, sender, recipient, content));
        debug!("{} sent a recado to {}", sender, recipient);
        Ok(())
    }

    /// Oldest unread recado, formatted as `sender: content`.
    pub fn read_direct(&mut self, user: &str) -> Result<String> {
        self.take(user, MessageKind::Direct)
            .map(|m| format!("{}: {}", m.sender, m.content))
    }

    /// Deliver `content` to every current member of `community`. Members who
    /// join or leave later are not affected.
    pub fn send_community(
        &mut self,
        dir: &impl Directory,
        registry: &impl CommunityRegistry,
        sender: &str,
        community: &str,
        content: &str,
    ) -> Result<usize> {
        ensure_exists(dir, sender)?;
        let members = registry
            .members(community)
            .ok_or_else(|| CoreError::UnknownCommunity(community.to_string()))?;

        for member in members {
            self.enqueue(member, Message::new(MessageKind::Community, sender, community, content));
        }
        debug!("{} broadcast to {} members of {}", sender, members.len(), community);
        Ok(members.len())
    }

    /// Oldest unread community message, raw content only.
    pub fn read_community(&mut self, user: &str) -> Result<String> {
        self.take(user, MessageKind::Community).map(|m| m.content)
    }

    /// System-authored recado; skips the self and enemy checks.
    pub fn deliver_system_notice(&mut self, recipient: &str, content: &str) {
        self.enqueue(recipient, Message::new(MessageKind::Direct, SYSTEM_SENDER, recipient, content));
    }

    /// Drop `user`'s inbox and everything they sent that is still unread.
    pub fn purge_user(&mut self, user: &str) {
        self.inboxes.shift_remove(user);
        for inbox in self.inboxes.values_mut() {
            inbox.discard_from(user);
        }
    }

    pub fn reset(&mut self) {
        self.inboxes.clear();
    }

    fn enqueue(&mut self, owner: &str, message: Message) {
        self.inboxes.entry(owner.to_string()).or_default().push(message);
    }

    fn take(&mut self, user: &str, kind: MessageKind) -> Result<Message> {
        self.inboxes
            .get_mut(user)
            .and_then(|inbox| inbox.pop_first(kind))
            .ok_or(CoreError::NoMessage(kind))
    }
}

impl Notifier for MessagingEngine {
    fn notify(&mut self, recipient: &str, content: &str) {
        self.deliver_system_notice(recipient, content);
    }
}
