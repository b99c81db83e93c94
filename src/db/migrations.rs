use rusqlite::{Connection, Result};
use std::collections::HashMap;

/// Current database schema version
const CURRENT_VERSION: u32 = 2;

/// Migration system for managing database schema versions
pub struct MigrationManager;

impl MigrationManager {
    /// Initialize the database with the current schema
    /// This creates the schema_version table and applies all migrations
    pub fn initialize(conn: &Connection) -> Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY
            )",
            [],
        )?;

        let current_version: u32 = conn
            .query_row(
                "SELECT COALESCE(MAX(version), 0) FROM schema_version",
                [],
                |row| row.get(0),
            )
            .unwrap_or(0);

        for version in (current_version + 1)..=CURRENT_VERSION {
            Self::apply_migration(conn, version)?;
        }

        conn.execute("PRAGMA foreign_keys=ON", [])?;
        Ok(())
    }

    /// Apply a specific migration by version number
    fn apply_migration(conn: &Connection, version: u32) -> Result<()> {
        let migrations = get_migrations();
        if let Some(migration) = migrations.get(&version) {
            log::debug!("applying schema migration v{}", version);
            let tx = conn.unchecked_transaction()?;
            migration(&tx)?;
            tx.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                [version],
            )?;
            tx.commit()?;
            Ok(())
        } else {
            Err(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_MISUSE),
                Some(format!("No migration found for version {}", version)),
            ))
        }
    }

    /// Get the current schema version
    pub fn get_version(conn: &Connection) -> Result<u32> {
        conn.query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |row| row.get(0),
        )
    }
}

type Migration = fn(&rusqlite::Transaction) -> Result<(), rusqlite::Error>;

/// Get all migrations indexed by version
fn get_migrations() -> HashMap<u32, Migration> {
    let mut migrations: HashMap<u32, Migration> = HashMap::new();
    migrations.insert(1, migration_v1);
    migrations.insert(2, migration_v2);
    migrations
}

/// Migration v1: leads and tags
fn migration_v1(tx: &rusqlite::Transaction) -> Result<(), rusqlite::Error> {
    tx.execute(
        "CREATE TABLE leads (
            id INTEGER PRIMARY KEY,
            uuid TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            email TEXT NULL,
            phone TEXT NULL,
            company TEXT NULL,
            assignee TEXT NULL,
            source TEXT NULL,
            value_cents INTEGER NOT NULL DEFAULT 0,
            stage TEXT NOT NULL CHECK(stage IN ('new','contacted','qualified','proposal','negotiation','won','lost')),
            priority TEXT NOT NULL CHECK(priority IN ('low','medium','high','urgent')),
            created_ts INTEGER NOT NULL,
            last_activity_ts INTEGER NOT NULL
        )",
        [],
    )?;
    tx.execute("CREATE INDEX idx_leads_stage ON leads(stage)", [])?;
    tx.execute("CREATE INDEX idx_leads_assignee ON leads(assignee)", [])?;

    tx.execute(
        "CREATE TABLE lead_tags (
            lead_id INTEGER NOT NULL REFERENCES leads(id) ON DELETE CASCADE,
            tag TEXT NOT NULL,
            PRIMARY KEY(lead_id, tag)
        )",
        [],
    )?;
    tx.execute("CREATE INDEX idx_lead_tags_tag ON lead_tags(tag)", [])?;

    Ok(())
}

/// Migration v2: stage change audit log
fn migration_v2(tx: &rusqlite::Transaction) -> Result<(), rusqlite::Error> {
    // No foreign key: the audit trail outlives deleted leads
    tx.execute(
        "CREATE TABLE lead_activity (
            id INTEGER PRIMARY KEY,
            lead_id INTEGER NOT NULL,
            from_stage TEXT NOT NULL,
            to_stage TEXT NOT NULL,
            reason TEXT NULL,
            entry_ts INTEGER NOT NULL
        )",
        [],
    )?;
    tx.execute(
        "CREATE INDEX idx_lead_activity_lead_entry ON lead_activity(lead_id, entry_ts)",
        [],
    )?;
    Ok(())
}
