use rusqlite::{Connection, OptionalExtension, Row};
use crate::models::{Lead, Priority, Stage};
use anyhow::{Context, Result};

/// Lead repository for database operations
///
/// The id-keyed lead collection behind the board: list, get, create,
/// update and delete. Tags live in `lead_tags` and are loaded with each lead.
///
/// # Example
///
/// ```no_run
/// use leadboard::db::DbConnection;
/// use leadboard::models::Lead;
/// use leadboard::repo::LeadRepo;
///
/// let conn = DbConnection::connect_in_memory().unwrap();
/// let lead = LeadRepo::create(&conn, &Lead::new("Acme renewal".to_string())).unwrap();
/// assert!(lead.id.is_some());
/// ```
pub struct LeadRepo;

const LEAD_COLUMNS: &str = "id, uuid, name, email, phone, company, assignee, source, value_cents,
                            stage, priority, created_ts, last_activity_ts";

fn invalid_column(idx: usize, value: &str) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        rusqlite::types::Type::Text,
        format!("invalid value '{}'", value).into(),
    )
}

fn row_to_lead(row: &Row) -> rusqlite::Result<Lead> {
    let stage_str: String = row.get(9)?;
    let stage = Stage::from_str(&stage_str).ok_or_else(|| invalid_column(9, &stage_str))?;
    let priority_str: String = row.get(10)?;
    let priority = Priority::from_str(&priority_str).ok_or_else(|| invalid_column(10, &priority_str))?;

    Ok(Lead {
        id: Some(row.get(0)?),
        uuid: row.get(1)?,
        name: row.get(2)?,
        email: row.get(3)?,
        phone: row.get(4)?,
        company: row.get(5)?,
        assignee: row.get(6)?,
        source: row.get(7)?,
        value_cents: row.get(8)?,
        stage,
        priority,
        tags: Vec::new(),
        created_ts: row.get(11)?,
        last_activity_ts: row.get(12)?,
    })
}

impl LeadRepo {
    /// Insert a lead and its tags; returns the lead with its new id
    pub fn create(conn: &Connection, lead: &Lead) -> Result<Lead> {
        let tx = conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO leads (uuid, name, email, phone, company, assignee, source, value_cents,
                    stage, priority, created_ts, last_activity_ts)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            rusqlite::params![
                lead.uuid,
                lead.name,
                lead.email,
                lead.phone,
                lead.company,
                lead.assignee,
                lead.source,
                lead.value_cents,
                lead.stage.as_str(),
                lead.priority.as_str(),
                lead.created_ts,
                lead.last_activity_ts,
            ],
        )
        .with_context(|| format!("Failed to create lead: {}", lead.name))?;

        let id = tx.last_insert_rowid();
        Self::replace_tags(&tx, id, &lead.tags)?;
        tx.commit()?;

        Ok(Lead {
            id: Some(id),
            ..lead.clone()
        })
    }

    /// Get lead by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> Result<Option<Lead>> {
        let mut stmt = conn.prepare(&format!("SELECT {} FROM leads WHERE id = ?1", LEAD_COLUMNS))?;
        let lead = stmt.query_row([id], row_to_lead).optional()?;

        match lead {
            Some(mut lead) => {
                lead.tags = Self::get_tags(conn, id)?;
                Ok(Some(lead))
            }
            None => Ok(None),
        }
    }

    /// Get tags for a lead
    pub fn get_tags(conn: &Connection, lead_id: i64) -> Result<Vec<String>> {
        let mut stmt = conn.prepare("SELECT tag FROM lead_tags WHERE lead_id = ?1 ORDER BY tag")?;
        let rows = stmt.query_map([lead_id], |row| row.get::<_, String>(0))?;

        let mut tags = Vec::new();
        for row in rows {
            tags.push(row?);
        }
        Ok(tags)
    }

    /// List all leads ordered by id
    pub fn list_all(conn: &Connection) -> Result<Vec<Lead>> {
        let mut stmt = conn.prepare(&format!("SELECT {} FROM leads ORDER BY id", LEAD_COLUMNS))?;
        let rows = stmt.query_map([], row_to_lead)?;

        let mut leads = Vec::new();
        for row in rows {
            let mut lead = row.context("Failed to read lead row")?;
            if let Some(id) = lead.id {
                lead.tags = Self::get_tags(conn, id)?;
            }
            leads.push(lead);
        }
        Ok(leads)
    }

    /// Write every field of an existing lead, tags included
    pub fn update(conn: &Connection, lead: &Lead) -> Result<()> {
        let id = lead.id.context("Cannot update a lead without an id")?;
        let tx = conn.unchecked_transaction()?;
        let updated = tx
            .execute(
                "UPDATE leads SET name = ?1, email = ?2, phone = ?3, company = ?4, assignee = ?5,
                        source = ?6, value_cents = ?7, stage = ?8, priority = ?9, last_activity_ts = ?10
                 WHERE id = ?11",
                rusqlite::params![
                    lead.name,
                    lead.email,
                    lead.phone,
                    lead.company,
                    lead.assignee,
                    lead.source,
                    lead.value_cents,
                    lead.stage.as_str(),
                    lead.priority.as_str(),
                    lead.last_activity_ts,
                    id,
                ],
            )
            .with_context(|| format!("Failed to update lead {}", id))?;

        if updated == 0 {
            anyhow::bail!("Lead {} not found", id);
        }

        Self::replace_tags(&tx, id, &lead.tags)?;
        tx.commit()?;
        Ok(())
    }

    /// Persist a stage change
    pub fn update_stage(conn: &Connection, id: i64, stage: Stage, activity_ts: i64) -> Result<()> {
        let updated = conn
            .execute(
                "UPDATE leads SET stage = ?1, last_activity_ts = ?2 WHERE id = ?3",
                rusqlite::params![stage.as_str(), activity_ts, id],
            )
            .with_context(|| format!("Failed to update stage of lead {}", id))?;

        if updated == 0 {
            anyhow::bail!("Lead {} not found", id);
        }
        Ok(())
    }

    /// Delete a lead; returns false if it did not exist
    pub fn delete(conn: &Connection, id: i64) -> Result<bool> {
        let deleted = conn
            .execute("DELETE FROM leads WHERE id = ?1", [id])
            .with_context(|| format!("Failed to delete lead {}", id))?;
        Ok(deleted > 0)
    }

    pub fn count(conn: &Connection) -> Result<i64> {
        let count = conn.query_row("SELECT COUNT(*) FROM leads", [], |row| row.get(0))?;
        Ok(count)
    }

    fn replace_tags(conn: &Connection, lead_id: i64, tags: &[String]) -> Result<()> {
        conn.execute("DELETE FROM lead_tags WHERE lead_id = ?1", [lead_id])?;
        for tag in tags {
            conn.execute(
                "INSERT OR IGNORE INTO lead_tags (lead_id, tag) VALUES (?1, ?2)",
                rusqlite::params![lead_id, tag],
            )?;
        }
        Ok(())
    }
}
