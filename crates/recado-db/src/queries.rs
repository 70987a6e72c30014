use anyhow::Result;
use chrono::{DateTime, Utc};
use indexmap::{IndexMap, IndexSet};
use rusqlite::{Connection, params};
use tracing::{info, warn};
use uuid::Uuid;

use recado_types::models::{Community, Message, MessageKind, Profile, Relations};
use recado_types::snapshot::{Snapshot, UserSnapshot};

use crate::Database;
use crate::models::{CommunityRow, MessageRow, RelationRow, UserRow};

const FRIEND: &str = "friend";
const INVITE: &str = "invite";
const IDOL: &str = "idol";
const CRUSH: &str = "crush";
const ENEMY: &str = "enemy";

impl Database {
    /// Replace the stored state with `snapshot` in a single transaction.
    pub fn save(&self, snapshot: &Snapshot) -> Result<()> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            clear_tables(&tx)?;
            insert_users(&tx, &snapshot.users)?;
            insert_communities(&tx, &snapshot.communities)?;
            tx.commit()?;

            info!(
                "Saved snapshot: {} users, {} communities",
                snapshot.users.len(),
                snapshot.communities.len()
            );
            Ok(())
        })
    }

    /// Load the stored state. An empty database yields an empty snapshot.
    pub fn load(&self) -> Result<Snapshot> {
        self.with_conn(|conn| {
            let mut users: IndexMap<String, UserSnapshot> = query_users(conn)?
                .into_iter()
                .map(|row| {
                    let user = UserSnapshot {
                        profile: Profile {
                            login: row.login.clone(),
                            display_name: row.display_name,
                            password_hash: row.password,
                            attributes: IndexMap::new(),
                            created_at: parse_time(&row.created_at),
                        },
                        relations: Relations::default(),
                        inbox: Vec::new(),
                    };
                    (row.login, user)
                })
                .collect();

            for (login, key, value) in query_attributes(conn)? {
                match users.get_mut(&login) {
                    Some(user) => {
                        user.profile.attributes.insert(key, value);
                    }
                    None => warn!("Dropping attribute {} of unknown user {}", key, login),
                }
            }

            for row in query_relations(conn)? {
                let Some(user) = users.get_mut(&row.login) else {
                    warn!("Dropping {} relation of unknown user {}", row.kind, row.login);
                    continue;
                };
                let set = match row.kind.as_str() {
                    FRIEND => &mut user.relations.friends,
                    INVITE => &mut user.relations.invites,
                    IDOL => &mut user.relations.idols,
                    CRUSH => &mut user.relations.crushes,
                    ENEMY => &mut user.relations.enemies,
                    other => {
                        warn!("Unknown relation kind '{}' for {}", other, row.login);
                        continue;
                    }
                };
                set.insert(row.target);
            }

            for row in query_messages(conn)? {
                let Some(kind) = parse_kind(&row.kind) else {
                    warn!("Unknown message kind '{}' on message '{}'", row.kind, row.id);
                    continue;
                };
                let Some(user) = users.get_mut(&row.owner) else {
                    warn!("Dropping message '{}' for unknown user {}", row.id, row.owner);
                    continue;
                };
                user.inbox.push(Message {
                    id: row.id.parse().unwrap_or_else(|e| {
                        warn!("Corrupt message id '{}': {}", row.id, e);
                        Uuid::new_v4()
                    }),
                    kind,
                    sender: row.sender,
                    recipient: row.recipient,
                    content: row.content,
                    sent_at: parse_time(&row.sent_at),
                });
            }

            let mut communities: IndexMap<String, Community> = query_communities(conn)?
                .into_iter()
                .map(|row| {
                    let community = Community {
                        name: row.name.clone(),
                        owner: row.owner,
                        description: row.description,
                        members: IndexSet::new(),
                        created_at: parse_time(&row.created_at),
                    };
                    (row.name, community)
                })
                .collect();

            for (name, login) in query_members(conn)? {
                match communities.get_mut(&name) {
                    Some(community) => {
                        community.members.insert(login);
                    }
                    None => warn!("Dropping member {} of unknown community {}", login, name),
                }
            }

            Ok(Snapshot {
                users: users.into_values().collect(),
                communities: communities.into_values().collect(),
            })
        })
    }

    /// Remove every stored row.
    pub fn clear(&self) -> Result<()> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            clear_tables(&tx)?;
            tx.commit()?;
            Ok(())
        })
    }
}

fn clear_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        DELETE FROM users;
        DELETE FROM attributes;
        DELETE FROM relations;
        DELETE FROM messages;
        DELETE FROM communities;
        DELETE FROM members;
        ",
    )?;
    Ok(())
}

fn insert_users(conn: &Connection, users: &[UserSnapshot]) -> Result<()> {
    let mut user_stmt = conn.prepare(
        "INSERT INTO users (login, display_name, password, created_at, position) VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    let mut attr_stmt = conn.prepare(
        "INSERT INTO attributes (login, key, value, position) VALUES (?1, ?2, ?3, ?4)",
    )?;
    let mut relation_stmt = conn.prepare(
        "INSERT INTO relations (login, kind, target, position) VALUES (?1, ?2, ?3, ?4)",
    )?;
    let mut message_stmt = conn.prepare(
        "INSERT INTO messages (id, owner, kind, sender, recipient, content, sent_at, position)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )?;

    for (pos, user) in users.iter().enumerate() {
        let profile = &user.profile;
        user_stmt.execute(params![
            profile.login,
            profile.display_name,
            profile.password_hash,
            profile.created_at.to_rfc3339(),
            pos as i64,
        ])?;

        for (pos, (key, value)) in profile.attributes.iter().enumerate() {
            attr_stmt.execute(params![profile.login, key, value, pos as i64])?;
        }

        let relations = &user.relations;
        for (kind, set) in [
            (FRIEND, &relations.friends),
            (INVITE, &relations.invites),
            (IDOL, &relations.idols),
            (CRUSH, &relations.crushes),
            (ENEMY, &relations.enemies),
        ] {
            for (pos, target) in set.iter().enumerate() {
                relation_stmt.execute(params![profile.login, kind, target, pos as i64])?;
            }
        }

        for (pos, message) in user.inbox.iter().enumerate() {
            message_stmt.execute(params![
                message.id.to_string(),
                profile.login,
                message.kind.as_str(),
                message.sender,
                message.recipient,
                message.content,
                message.sent_at.to_rfc3339(),
                pos as i64,
            ])?;
        }
    }
    Ok(())
}

fn insert_communities(conn: &Connection, communities: &[Community]) -> Result<()> {
    let mut community_stmt = conn.prepare(
        "INSERT INTO communities (name, owner, description, created_at, position) VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    let mut member_stmt = conn.prepare(
        "INSERT INTO members (community, login, position) VALUES (?1, ?2, ?3)",
    )?;

    for (pos, community) in communities.iter().enumerate() {
        community_stmt.execute(params![
            community.name,
            community.owner,
            community.description,
            community.created_at.to_rfc3339(),
            pos as i64,
        ])?;
        for (pos, login) in community.members.iter().enumerate() {
            member_stmt.execute(params![community.name, login, pos as i64])?;
        }
    }
    Ok(())
}

fn query_users(conn: &Connection) -> Result<Vec<UserRow>> {
    let mut stmt = conn.prepare(
        "SELECT login, display_name, password, created_at FROM users ORDER BY position",
    )?;

    let rows = stmt
        .query_map([], |row| {
            Ok(UserRow {
                login: row.get(0)?,
                display_name: row.get(1)?,
                password: row.get(2)?,
                created_at: row.get(3)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn query_attributes(conn: &Connection) -> Result<Vec<(String, String, String)>> {
    let mut stmt =
        conn.prepare("SELECT login, key, value FROM attributes ORDER BY login, position")?;

    let rows = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn query_relations(conn: &Connection) -> Result<Vec<RelationRow>> {
    let mut stmt = conn.prepare(
        "SELECT login, kind, target FROM relations ORDER BY login, kind, position",
    )?;

    let rows = stmt
        .query_map([], |row| {
            Ok(RelationRow {
                login: row.get(0)?,
                kind: row.get(1)?,
                target: row.get(2)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn query_messages(conn: &Connection) -> Result<Vec<MessageRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, owner, kind, sender, recipient, content, sent_at
         FROM messages
         ORDER BY owner, position",
    )?;

    let rows = stmt
        .query_map([], |row| {
            Ok(MessageRow {
                id: row.get(0)?,
                owner: row.get(1)?,
                kind: row.get(2)?,
                sender: row.get(3)?,
                recipient: row.get(4)?,
                content: row.get(5)?,
                sent_at: row.get(6)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn query_communities(conn: &Connection) -> Result<Vec<CommunityRow>> {
    let mut stmt = conn.prepare(
        "SELECT name, owner, description, created_at FROM communities ORDER BY position",
    )?;

    let rows = stmt
        .query_map([], |row| {
            Ok(CommunityRow {
                name: row.get(0)?,
                owner: row.get(1)?,
                description: row.get(2)?,
                created_at: row.get(3)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn query_members(conn: &Connection) -> Result<Vec<(String, String)>> {
    let mut stmt =
        conn.prepare("SELECT community, login FROM members ORDER BY community, position")?;

    let rows = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn parse_kind(kind: &str) -> Option<MessageKind> {
    match kind {
        "direct" => Some(MessageKind::Direct),
        "community" => Some(MessageKind::Community),
        _ => None,
    }
}

fn parse_time(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_else(|e| {
            warn!("Corrupt timestamp '{}': {}", raw, e);
            DateTime::default()
        })
}
