/// Database row types; these map directly to SQLite rows.
/// Distinct from recado-types models to keep the DB layer independent.

pub struct UserRow {
    pub login: String,
    pub display_name: String,
    pub password: String,
    pub created_at: String,
}

pub struct RelationRow {
    pub login: String,
    pub kind: String,
    pub target: String,
}

pub struct MessageRow {
    pub id: String,
    pub owner: String,
    pub kind: String,
    pub sender: String,
    pub recipient: String,
    pub content: String,
    pub sent_at: String,
}

pub struct CommunityRow {
    pub name: String,
    pub owner: String,
    pub description: String,
    pub created_at: String,
}
