use rusqlite::{Connection, Row};
use crate::board::ActivitySink;
use crate::models::{ActivityEntry, Stage};
use anyhow::{Context, Result};

/// Activity repository for the stage-change audit log
pub struct ActivityRepo;

fn stage_column(row: &Row, idx: usize) -> rusqlite::Result<Stage> {
    let value: String = row.get(idx)?;
    Stage::from_str(&value).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Text,
            format!("invalid stage '{}'", value).into(),
        )
    })
}

fn row_to_entry(row: &Row) -> rusqlite::Result<ActivityEntry> {
    Ok(ActivityEntry {
        id: Some(row.get(0)?),
        lead_id: row.get(1)?,
        from_stage: stage_column(row, 2)?,
        to_stage: stage_column(row, 3)?,
        reason: row.get(4)?,
        timestamp: row.get(5)?,
    })
}

impl ActivityRepo {
    /// Append an entry; returns it with its row id
    pub fn record(conn: &Connection, entry: &ActivityEntry) -> Result<ActivityEntry> {
        conn.execute(
            "INSERT INTO lead_activity (lead_id, from_stage, to_stage, reason, entry_ts)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                entry.lead_id,
                entry.from_stage.as_str(),
                entry.to_stage.as_str(),
                entry.reason,
                entry.timestamp,
            ],
        )
        .with_context(|| format!("Failed to record activity for lead {}", entry.lead_id))?;

        Ok(ActivityEntry {
            id: Some(conn.last_insert_rowid()),
            ..entry.clone()
        })
    }

    /// History of one lead, oldest first
    pub fn list_for_lead(conn: &Connection, lead_id: i64) -> Result<Vec<ActivityEntry>> {
        let mut stmt = conn.prepare(
            "SELECT id, lead_id, from_stage, to_stage, reason, entry_ts
             FROM lead_activity WHERE lead_id = ?1 ORDER BY entry_ts, id",
        )?;
        let rows = stmt.query_map([lead_id], row_to_entry)?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }

    /// Most recent entries across all leads, newest first
    pub fn list_recent(conn: &Connection, limit: usize) -> Result<Vec<ActivityEntry>> {
        let mut stmt = conn.prepare(
            "SELECT id, lead_id, from_stage, to_stage, reason, entry_ts
             FROM lead_activity ORDER BY entry_ts DESC, id DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map([limit as i64], row_to_entry)?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }
}

/// Activity sink that appends to the `lead_activity` table
pub struct SqliteActivitySink<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteActivitySink<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

impl ActivitySink for SqliteActivitySink<'_> {
    fn record(&mut self, entry: &ActivityEntry) -> Result<()> {
        ActivityRepo::record(self.conn, entry).map(|_| ())
    }
}
