//! The single owned state object tying the directory, the community registry,
//! the relationship graph and the messaging engine together.

use recado_types::UserId;
use recado_types::models::{Community, Profile};
use recado_types::snapshot::{Snapshot, UserSnapshot};
use tracing::{debug, info};

use crate::communities::Communities;
use crate::directory::{Directory, UserDirectory};
use crate::error::{CoreError, Result};
use crate::inbox::Inbox;
use crate::messaging::MessagingEngine;
use crate::relations::{FriendRequest, RelationshipGraph};

#[derive(Debug, Default)]
pub struct Network {
    directory: UserDirectory,
    communities: Communities,
    graph: RelationshipGraph,
    messaging: MessagingEngine,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the network from a previously captured snapshot.
    pub fn restore(snapshot: Snapshot) -> Self {
        let mut profiles = Vec::with_capacity(snapshot.users.len());
        let mut records = Vec::with_capacity(snapshot.users.len());
        let mut inboxes = Vec::with_capacity(snapshot.users.len());

        for UserSnapshot { profile, relations, inbox } in snapshot.users {
            records.push((profile.login.clone(), relations));
            inboxes.push((profile.login.clone(), inbox.into_iter().collect::<Inbox>()));
            profiles.push(profile);
        }

        let network = Self {
            directory: UserDirectory::from_profiles(profiles),
            communities: Communities::from_communities(snapshot.communities),
            graph: RelationshipGraph::from_records(records),
            messaging: MessagingEngine::from_inboxes(inboxes),
        };
        info!(
            "Restored network with {} users and {} communities",
            network.directory.len(),
            network.communities.iter().count()
        );
        network
    }

    /// Capture the whole state as plain data.
    pub fn snapshot(&self) -> Snapshot {
        let users = self
            .directory
            .profiles()
            .map(|profile| UserSnapshot {
                profile: profile.clone(),
                relations: self.graph.record(&profile.login).cloned().unwrap_or_default(),
                inbox: self
                    .messaging
                    .inbox(&profile.login)
                    .map(|inbox| inbox.iter().cloned().collect())
                    .unwrap_or_default(),
            })
            .collect();

        Snapshot {
            users,
            communities: self.communities.iter().cloned().collect(),
        }
    }

    // -- Accounts --

    pub fn create_user(&mut self, login: &str, password_hash: &str, display_name: &str) -> Result<()> {
        self.directory.create(login, password_hash, display_name)?;
        self.graph.open_record(login);
        self.messaging.open_inbox(login);
        Ok(())
    }

    pub fn profile(&self, login: &str) -> Result<&Profile> {
        self.directory
            .get(login)
            .ok_or_else(|| CoreError::UnknownUser(login.to_string()))
    }

    pub fn user_exists(&self, login: &str) -> bool {
        self.directory.exists(login)
    }

    pub fn attribute(&self, login: &str, key: &str) -> Result<String> {
        self.directory.attribute(login, key)
    }

    pub fn edit_profile(&mut self, login: &str, key: &str, value: &str) -> Result<()> {
        self.directory.set_attribute(login, key, value)
    }

    /// Delete an account together with its relations, its inbox, every
    /// unread message it sent and the communities it owns. Never fails for
    /// ids that are already gone.
    pub fn remove_user(&mut self, login: &str) {
        if self.directory.remove(login).is_none() {
            debug!("remove_user: {} not registered", login);
        }
        let deleted = self.communities.remove_user(login);
        self.graph.remove_user(login);
        self.messaging.purge_user(login);
        info!("Removed user {} and {} owned communities", login, deleted.len());
    }

    /// Clear everything. Only used by a full system reset.
    pub fn reset(&mut self) {
        self.directory.reset();
        self.communities.reset();
        self.graph.reset();
        self.messaging.reset();
        info!("Network reset");
    }

    // -- Relations --

    pub fn is_friend(&self, a: &str, b: &str) -> bool {
        self.graph.is_friend(a, b)
    }

    pub fn request_friend(&mut self, a: &str, b: &str) -> Result<FriendRequest> {
        self.graph.request_friend(&self.directory, a, b)
    }

    pub fn friends(&self, login: &str) -> Result<Vec<UserId>> {
        self.graph.list_friends(&self.directory, login)
    }

    pub fn is_fan(&self, a: &str, idol: &str) -> bool {
        self.graph.is_fan(a, idol)
    }

    pub fn add_idol(&mut self, a: &str, idol: &str) -> Result<()> {
        self.graph.add_idol(&self.directory, a, idol)
    }

    pub fn fans(&self, idol: &str) -> Result<Vec<UserId>> {
        self.graph.list_fans(&self.directory, idol)
    }

    pub fn idols(&self, login: &str) -> Result<Vec<UserId>> {
        self.graph.list_idols(&self.directory, login)
    }

    pub fn is_crush(&self, a: &str, b: &str) -> bool {
        self.graph.is_crush(a, b)
    }

    /// Returns true when the crush became mutual and both parties were sent
    /// a system notice.
    pub fn add_crush(&mut self, a: &str, b: &str) -> Result<bool> {
        self.graph.add_crush(&self.directory, &mut self.messaging, a, b)
    }

    pub fn crushes(&self, login: &str) -> Result<Vec<UserId>> {
        self.graph.list_crushes(&self.directory, login)
    }

    pub fn is_enemy(&self, a: &str, b: &str) -> bool {
        self.graph.is_enemy(a, b)
    }

    pub fn add_enemy(&mut self, a: &str, b: &str) -> Result<()> {
        self.graph.add_enemy(&self.directory, a, b)
    }

    // -- Messages --

    pub fn send_recado(&mut self, sender: &str, recipient: &str, content: &str) -> Result<()> {
        self.messaging
            .send_direct(&self.directory, &self.graph, sender, recipient, content)
    }

    pub fn read_recado(&mut self, login: &str) -> Result<String> {
        self.messaging.read_direct(login)
    }

    pub fn send_community_message(&mut self, sender: &str, community: &str, content: &str) -> Result<usize> {
        self.messaging
            .send_community(&self.directory, &self.communities, sender, community, content)
    }

    pub fn read_community_message(&mut self, login: &str) -> Result<String> {
        self.messaging.read_community(login)
    }

    // -- Communities --

    pub fn create_community(&mut self, owner: &str, name: &str, description: &str) -> Result<()> {
        self.communities.create(&self.directory, owner, name, description)
    }

    pub fn join_community(&mut self, login: &str, name: &str) -> Result<()> {
        self.communities.join(&self.directory, login, name)
    }

    pub fn leave_community(&mut self, login: &str, name: &str) -> Result<()> {
        self.communities.leave(login, name)
    }

    pub fn community(&self, name: &str) -> Result<&Community> {
        self.communities.get(name)
    }

    pub fn communities_of(&self, login: &str) -> Result<Vec<String>> {
        if !self.directory.exists(login) {
            return Err(CoreError::UnknownUser(login.to_string()));
        }
        Ok(self.communities.communities_of(login))
    }

    /// Number of unread messages in `login`'s inbox.
    pub fn unread(&self, login: &str) -> usize {
        self.messaging.inbox(login).map_or(0, Inbox::len)
    }
}
