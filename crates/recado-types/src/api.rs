use serde::{Deserialize, Serialize};

use crate::models::UserId;

// -- Session Claims --

/// Session token claims. The dispatch layer resolves `sub` to the acting
/// user; the core never sees the token itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: UserId,
    /// Creation time of the account the token was issued for, in
    /// microseconds. A re-registered login gets a new value.
    pub joined: i64,
    pub exp: usize,
}

// -- Accounts --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateUserRequest {
    pub login: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateUserResponse {
    pub login: UserId,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OpenSessionRequest {
    pub login: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub login: UserId,
    pub token: String,
}

// -- Profile --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EditAttributeRequest {
    pub value: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AttributeResponse {
    pub key: String,
    pub value: String,
}

// -- Relations --

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FriendRequestStatus {
    /// The invite is pending on the other user's side.
    Invited,
    /// The other user had already invited us; now mutual friends.
    Accepted,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FriendRequestResponse {
    pub status: FriendRequestStatus,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RelationStatus {
    pub login: UserId,
    pub related: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserListResponse {
    pub users: Vec<UserId>,
}

// -- Messages --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SendMessageRequest {
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReadMessageResponse {
    pub message: String,
}

// -- Communities --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateCommunityRequest {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommunityResponse {
    pub name: String,
    pub owner: UserId,
    pub description: String,
    pub members: Vec<UserId>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommunityListResponse {
    pub communities: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
