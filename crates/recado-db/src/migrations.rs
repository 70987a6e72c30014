use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

/// Every table carries a `position` column so ordered collections (directory
/// order, friend order, inbox FIFO order, member order) survive a round trip.
pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            login           TEXT PRIMARY KEY,
            display_name    TEXT NOT NULL,
            password        TEXT NOT NULL,
            created_at      TEXT NOT NULL,
            position        INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS attributes (
            login       TEXT NOT NULL,
            key         TEXT NOT NULL,
            value       TEXT NOT NULL,
            position    INTEGER NOT NULL,
            PRIMARY KEY (login, key)
        );

        CREATE TABLE IF NOT EXISTS relations (
            login       TEXT NOT NULL,
            kind        TEXT NOT NULL,
            target      TEXT NOT NULL,
            position    INTEGER NOT NULL,
            PRIMARY KEY (login, kind, target)
        );

        CREATE TABLE IF NOT EXISTS messages (
            id          TEXT PRIMARY KEY,
            owner       TEXT NOT NULL,
            kind        TEXT NOT NULL,
            sender      TEXT NOT NULL,
            recipient   TEXT NOT NULL,
            content     TEXT NOT NULL,
            sent_at     TEXT NOT NULL,
            position    INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_messages_owner
            ON messages(owner, position);

        CREATE TABLE IF NOT EXISTS communities (
            name            TEXT PRIMARY KEY,
            owner           TEXT NOT NULL,
            description     TEXT NOT NULL,
            created_at      TEXT NOT NULL,
            position        INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS members (
            community   TEXT NOT NULL,
            login       TEXT NOT NULL,
            position    INTEGER NOT NULL,
            PRIMARY KEY (community, login)
        );
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
