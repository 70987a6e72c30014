//! Community registry: ownership, descriptions and member lists.

use chrono::Utc;
use indexmap::{IndexMap, IndexSet};
use recado_types::UserId;
use recado_types::models::Community;
use tracing::debug;

use crate::directory::Directory;
use crate::error::{CoreError, Result};

/// Read-only view of the registry used to resolve broadcast recipients.
pub trait CommunityRegistry {
    fn exists(&self, name: &str) -> bool;
    fn members(&self, name: &str) -> Option<&IndexSet<UserId>>;
}

#[derive(Debug, Default)]
pub struct Communities {
    communities: IndexMap<String, Community>,
}

impl Communities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_communities(communities: impl IntoIterator<Item = Community>) -> Self {
        Self {
            communities: communities
                .into_iter()
                .map(|community| (community.name.clone(), community))
                .collect(),
        }
    }

    pub fn create(
        &mut self,
        dir: &impl Directory,
        owner: &str,
        name: &str,
        description: &str,
    ) -> Result<()> {
        if !dir.exists(owner) {
            return Err(CoreError::UnknownUser(owner.to_string()));
        }
        if name.trim().is_empty() {
            return Err(CoreError::InvalidCommunityName);
        }
        if self.communities.contains_key(name) {
            return Err(CoreError::CommunityExists(name.to_string()));
        }

        let mut members = IndexSet::new();
        members.insert(owner.to_string());
        self.communities.insert(
            name.to_string(),
            Community {
                name: name.to_string(),
                owner: owner.to_string(),
                description: description.to_string(),
                members,
                created_at: Utc::now(),
            },
        );
        debug!("{} created community {}", owner, name);
        Ok(())
    }

    pub fn join(&mut self, dir: &impl Directory, user: &str, name: &str) -> Result<()> {
        if !dir.exists(user) {
            return Err(CoreError::UnknownUser(user.to_string()));
        }
        let community = self.lookup_mut(name)?;
        if !community.members.insert(user.to_string()) {
            return Err(CoreError::AlreadyMember {
                user: user.to_string(),
                community: name.to_string(),
            });
        }
        debug!("{} joined community {}", user, name);
        Ok(())
    }

    pub fn leave(&mut self, user: &str, name: &str) -> Result<()> {
        let community = self.lookup_mut(name)?;
        if community.owner == user {
            return Err(CoreError::OwnerCannotLeave(name.to_string()));
        }
        if !community.members.shift_remove(user) {
            return Err(CoreError::NotMember {
                user: user.to_string(),
                community: name.to_string(),
            });
        }
        debug!("{} left community {}", user, name);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&Community> {
        self.communities
            .get(name)
            .ok_or_else(|| CoreError::UnknownCommunity(name.to_string()))
    }

    /// Communities `user` belongs to, in creation order.
    pub fn communities_of(&self, user: &str) -> Vec<String> {
        self.communities
            .values()
            .filter(|c| c.members.contains(user))
            .map(|c| c.name.clone())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Community> {
        self.communities.values()
    }

    /// Delete every community owned by `user` and drop them from the rest.
    /// Returns the names of the deleted communities.
    pub fn remove_user(&mut self, user: &str) -> Vec<String> {
        let mut deleted = Vec::new();
        self.communities.retain(|name, community| {
            if community.owner == user {
                deleted.push(name.clone());
                false
            } else {
                community.members.shift_remove(user);
                true
            }
        });
        deleted
    }

    pub fn reset(&mut self) {
        self.communities.clear();
    }

    fn lookup_mut(&mut self, name: &str) -> Result<&mut Community> {
        self.communities
            .get_mut(name)
            .ok_or_else(|| CoreError::UnknownCommunity(name.to_string()))
    }
}

impl CommunityRegistry for Communities {
    fn exists(&self, name: &str) -> bool {
        self.communities.contains_key(name)
    }

    fn members(&self, name: &str) -> Option<&IndexSet<UserId>> {
        self.communities.get(name).map(|c| &c.members)
    }
}
