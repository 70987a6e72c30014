//! Error types for the relationship and messaging core.

use std::fmt;

use recado_types::UserId;
use recado_types::models::MessageKind;
use thiserror::Error;

/// The kind of relation an operation was trying to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Friend,
    Idol,
    Crush,
    Enemy,
    Recado,
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Friend => "friend",
            Self::Idol => "idol",
            Self::Crush => "crush",
            Self::Enemy => "enemy",
            Self::Recado => "recado recipient",
        })
    }
}

/// Validation failures raised by the core. None of them is fatal: the caller
/// reports the message and the state is left exactly as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A user tried to relate to (or message) themselves
    #[error("user cannot add themselves as {0}")]
    SelfReference(Relation),

    #[error("user not registered: {0}")]
    UnknownUser(UserId),

    #[error("community does not exist: {0}")]
    UnknownCommunity(String),

    /// The target lists the acting user as an enemy
    #[error("invalid operation: {0} is your enemy")]
    BlockedByEnemy(UserId),

    #[error("{0} was already invited, waiting for acceptance")]
    DuplicateInvite(UserId),

    #[error("{0} is already your friend")]
    AlreadyFriends(UserId),

    /// The relation already exists
    #[error("{target} is already your {relation}")]
    Duplicate { relation: Relation, target: UserId },

    #[error("no {0} messages")]
    NoMessage(MessageKind),

    // -- Directory --
    #[error("invalid login")]
    InvalidLogin,

    #[error("invalid password")]
    InvalidPassword,

    #[error("an account with login {0} already exists")]
    UserExists(UserId),

    #[error("attribute not set: {0}")]
    AttributeNotSet(String),

    #[error("attribute is read-only: {0}")]
    ReadOnlyAttribute(String),

    // -- Communities --
    #[error("a community named {0} already exists")]
    CommunityExists(String),

    #[error("invalid community name")]
    InvalidCommunityName,

    #[error("{user} is already a member of {community}")]
    AlreadyMember { user: UserId, community: String },

    #[error("{user} is not a member of {community}")]
    NotMember { user: UserId, community: String },

    #[error("the owner cannot leave {0}")]
    OwnerCannotLeave(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
