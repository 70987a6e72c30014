//! Relationship graph: friendships, invites, idols, crushes and enemies.
//!
//! Every user owns one [`Relations`] record holding its *outgoing* relations.
//! Friend invites are the exception: they are stored on the receiver, so a
//! reciprocal request can be detected by looking at the requester's own
//! record. Cross-user relations are plain id lookups into the record table.

use indexmap::IndexMap;
use recado_types::UserId;
use recado_types::models::Relations;
use tracing::debug;

use crate::directory::Directory;
use crate::error::{CoreError, Relation, Result};

/// Receives the notices generated when a crush becomes mutual.
pub trait Notifier {
    fn notify(&mut self, recipient: &str, content: &str);
}

/// Outcome of a friend request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FriendRequest {
    /// The invite now waits on the other user's side.
    Invited,
    /// The other user had already invited the requester; both are friends.
    Accepted,
}

#[derive(Debug, Default)]
pub struct RelationshipGraph {
    records: IndexMap<UserId, Relations>,
}

impl RelationshipGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = (UserId, Relations)>) -> Self {
        Self {
            records: records.into_iter().collect(),
        }
    }

    /// Create the empty record for a newly registered user.
    pub fn open_record(&mut self, user: &str) {
        self.records.entry(user.to_string()).or_default();
    }

    pub fn record(&self, user: &str) -> Option<&Relations> {
        self.records.get(user)
    }

    pub fn records(&self) -> impl Iterator<Item = (&UserId, &Relations)> {
        self.records.iter()
    }

    // -- Friends --

    pub fn is_friend(&self, a: &str, b: &str) -> bool {
        self.records.get(a).is_some_and(|r| r.friends.contains(b))
    }

    pub fn request_friend(&mut self, dir: &impl Directory, a: &str, b: &str) -> Result<FriendRequest> {
        self.validate(dir, Relation::Friend, a, b)?;

        if self.records.get(a).is_some_and(|r| r.invites.contains(b)) {
            let requester = self.record_mut(a);
            requester.invites.shift_remove(b);
            requester.friends.insert(b.to_string());

            let inviter = self.record_mut(b);
            inviter.invites.shift_remove(a);
            inviter.friends.insert(a.to_string());

            debug!("{} and {} are now friends", a, b);
            return Ok(FriendRequest::Accepted);
        }

        if self.records.get(b).is_some_and(|r| r.invites.contains(a)) {
            return Err(CoreError::DuplicateInvite(b.to_string()));
        }
        if self.is_friend(a, b) {
            return Err(CoreError::AlreadyFriends(b.to_string()));
        }

        self.record_mut(b).invites.insert(a.to_string());
        debug!("{} invited {}", a, b);
        Ok(FriendRequest::Invited)
    }

    pub fn list_friends(&self, dir: &impl Directory, a: &str) -> Result<Vec<UserId>> {
        self.known_record(dir, a)
            .map(|r| r.map(|r| r.friends.iter().cloned().collect()).unwrap_or_default())
    }

    // -- Fans --

    pub fn is_fan(&self, a: &str, idol: &str) -> bool {
        self.records.get(a).is_some_and(|r| r.idols.contains(idol))
    }

    pub fn add_idol(&mut self, dir: &impl Directory, a: &str, idol: &str) -> Result<()> {
        self.validate(dir, Relation::Idol, a, idol)?;
        if !self.record_mut(a).idols.insert(idol.to_string()) {
            return Err(CoreError::Duplicate {
                relation: Relation::Idol,
                target: idol.to_string(),
            });
        }
        debug!("{} is now a fan of {}", a, idol);
        Ok(())
    }

    /// Users who are fans of `idol`, in directory order. There is no reverse
    /// index, so this scans every record.
    pub fn list_fans(&self, dir: &impl Directory, idol: &str) -> Result<Vec<UserId>> {
        if !dir.exists(idol) {
            return Err(CoreError::UnknownUser(idol.to_string()));
        }
        Ok(self
            .records
            .iter()
            .filter(|(_, r)| r.idols.contains(idol))
            .map(|(user, _)| user.clone())
            .collect())
    }

    pub fn list_idols(&self, dir: &impl Directory, a: &str) -> Result<Vec<UserId>> {
        self.known_record(dir, a)
            .map(|r| r.map(|r| r.idols.iter().cloned().collect()).unwrap_or_default())
    }

    // -- Crushes --

    pub fn is_crush(&self, a: &str, b: &str) -> bool {
        self.records.get(a).is_some_and(|r| r.crushes.contains(b))
    }

    /// Returns true when the crush became mutual; both parties have then been
    /// notified through `notifier`.
    pub fn add_crush(
        &mut self,
        dir: &impl Directory,
        notifier: &mut impl Notifier,
        a: &str,
        b: &str,
    ) -> Result<bool> {
        self.validate(dir, Relation::Crush, a, b)?;
        if !self.record_mut(a).crushes.insert(b.to_string()) {
            return Err(CoreError::Duplicate {
                relation: Relation::Crush,
                target: b.to_string(),
            });
        }

        if !self.is_crush(b, a) {
            debug!("{} has a crush on {}", a, b);
            return Ok(false);
        }

        notifier.notify(a, &crush_notice(dir, b));
        notifier.notify(b, &crush_notice(dir, a));
        debug!("Mutual crush between {} and {}", a, b);
        Ok(true)
    }

    pub fn list_crushes(&self, dir: &impl Directory, a: &str) -> Result<Vec<UserId>> {
        self.known_record(dir, a)
            .map(|r| r.map(|r| r.crushes.iter().cloned().collect()).unwrap_or_default())
    }

    // -- Enemies --

    pub fn is_enemy(&self, a: &str, b: &str) -> bool {
        self.records.get(a).is_some_and(|r| r.enemies.contains(b))
    }

    /// Enemies are not subject to the enemy block: `b` may already list `a`.
    pub fn add_enemy(&mut self, dir: &impl Directory, a: &str, b: &str) -> Result<()> {
        if a == b {
            return Err(CoreError::SelfReference(Relation::Enemy));
        }
        ensure_exists(dir, a)?;
        ensure_exists(dir, b)?;
        if !self.record_mut(a).enemies.insert(b.to_string()) {
            return Err(CoreError::Duplicate {
                relation: Relation::Enemy,
                target: b.to_string(),
            });
        }
        debug!("{} marked {} as enemy", a, b);
        Ok(())
    }

    // -- Cleanup --

    /// Remove `user`'s record and every reference to it in other records.
    pub fn remove_user(&mut self, user: &str) {
        self.records.shift_remove(user);
        for relations in self.records.values_mut() {
            relations.forget(user);
        }
    }

    pub fn reset(&mut self) {
        self.records.clear();
    }

    /// Self, existence and enemy checks shared by every relation request.
    /// The enemy check runs before any relation-specific rule.
    fn validate(&self, dir: &impl Directory, relation: Relation, a: &str, b: &str) -> Result<()> {
        if a == b {
            return Err(CoreError::SelfReference(relation));
        }
        ensure_exists(dir, a)?;
        ensure_exists(dir, b)?;
        if self.is_enemy(b, a) {
            return Err(CoreError::BlockedByEnemy(b.to_string()));
        }
        Ok(())
    }

    fn known_record(&self, dir: &impl Directory, user: &str) -> Result<Option<&Relations>> {
        ensure_exists(dir, user)?;
        Ok(self.records.get(user))
    }

    fn record_mut(&mut self, user: &str) -> &mut Relations {
        self.records.entry(user.to_string()).or_default()
    }
}

pub(crate) fn ensure_exists(dir: &impl Directory, user: &str) -> Result<()> {
    if dir.exists(user) {
        Ok(())
    } else {
        Err(CoreError::UnknownUser(user.to_string()))
    }
}

fn crush_notice(dir: &impl Directory, about: &str) -> String {
    let name = dir.get(about).map_or(about, |p| p.display_name.as_str());
    format!("{} é seu paquera - Recado do Jackut.", name)
}
