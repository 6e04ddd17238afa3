//! Event repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD, bulk and search APIs over the `events` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - No recurrence logic lives here; callers hold read-only copies.
//! - Search queries are length-capped and wildcard-stripped before they
//!   reach the underlying store, regardless of backing technology.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::DbError;
use crate::model::event::{Event, EventCategory, EventId, EventType, RepeatPolicy};
use crate::validate::{date_from_epoch_day, epoch_day, sanitize_search_query};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const EVENT_SELECT_SQL: &str = "SELECT
    id,
    name,
    anchor_epoch_day,
    event_type,
    category,
    repeat_policy,
    reminder_offsets,
    note,
    is_active,
    created_epoch_day
FROM events";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for event persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(EventId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "event not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted event data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Narrow persistence contract consumed by service, scheduler and transfer.
pub trait EventRepository {
    /// Active events ordered by anchor date ascending.
    fn list_active(&self) -> RepoResult<Vec<Event>>;
    /// Every stored event, active or not. Export path.
    fn list_all(&self) -> RepoResult<Vec<Event>>;
    fn list_by_type(&self, event_type: EventType) -> RepoResult<Vec<Event>>;
    fn list_by_category(&self, category: EventCategory) -> RepoResult<Vec<Event>>;
    fn get(&self, id: EventId) -> RepoResult<Option<Event>>;
    /// Inserts when `id == 0`, otherwise replaces in place. Returns the
    /// stored id. Last write wins for a given id.
    fn upsert(&self, event: &Event) -> RepoResult<EventId>;
    /// Upserts a batch inside one transaction.
    fn bulk_upsert(&self, events: &[Event]) -> RepoResult<()>;
    fn delete(&self, id: EventId) -> RepoResult<()>;
    fn delete_all(&self) -> RepoResult<()>;
    /// Deletes every event of one classification. Returns the removed count.
    fn delete_by_type(&self, event_type: EventType) -> RepoResult<usize>;
    /// Name-substring search over a sanitized query. Blank queries return
    /// an empty list without touching the store.
    fn search(&self, query: &str) -> RepoResult<Vec<Event>>;
}

/// SQLite-backed event repository.
pub struct SqliteEventRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEventRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query_events(&self, sql: &str, bind: &[&dyn rusqlite::ToSql]) -> RepoResult<Vec<Event>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(bind)?;
        let mut events = Vec::new();
        while let Some(row) = rows.next()? {
            events.push(parse_event_row(row)?);
        }
        Ok(events)
    }

    fn insert_event(&self, event: &Event) -> RepoResult<EventId> {
        if event.id == 0 {
            self.conn.execute(
                "INSERT INTO events (
                    name,
                    anchor_epoch_day,
                    event_type,
                    category,
                    repeat_policy,
                    reminder_offsets,
                    note,
                    is_active,
                    created_epoch_day
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
                params![
                    event.name.as_str(),
                    epoch_day(event.anchor_date),
                    event.event_type.as_str(),
                    event.category.as_str(),
                    event.repeat_policy.as_str(),
                    offsets_to_db(&event.reminder_offsets),
                    event.note.as_str(),
                    event.is_active,
                    epoch_day(event.created_at),
                ],
            )?;
            return Ok(self.conn.last_insert_rowid());
        }

        self.conn.execute(
            "INSERT OR REPLACE INTO events (
                id,
                name,
                anchor_epoch_day,
                event_type,
                category,
                repeat_policy,
                reminder_offsets,
                note,
                is_active,
                created_epoch_day
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
            params![
                event.id,
                event.name.as_str(),
                epoch_day(event.anchor_date),
                event.event_type.as_str(),
                event.category.as_str(),
                event.repeat_policy.as_str(),
                offsets_to_db(&event.reminder_offsets),
                event.note.as_str(),
                event.is_active,
                epoch_day(event.created_at),
            ],
        )?;
        Ok(event.id)
    }
}

impl EventRepository for SqliteEventRepository<'_> {
    fn list_active(&self) -> RepoResult<Vec<Event>> {
        self.query_events(
            &format!("{EVENT_SELECT_SQL} WHERE is_active = 1 ORDER BY anchor_epoch_day ASC, id ASC;"),
            &[],
        )
    }

    fn list_all(&self) -> RepoResult<Vec<Event>> {
        self.query_events(
            &format!("{EVENT_SELECT_SQL} ORDER BY anchor_epoch_day ASC, id ASC;"),
            &[],
        )
    }

    fn list_by_type(&self, event_type: EventType) -> RepoResult<Vec<Event>> {
        self.query_events(
            &format!(
                "{EVENT_SELECT_SQL} WHERE event_type = ?1 ORDER BY anchor_epoch_day ASC, id ASC;"
            ),
            &[&event_type.as_str()],
        )
    }

    fn list_by_category(&self, category: EventCategory) -> RepoResult<Vec<Event>> {
        self.query_events(
            &format!(
                "{EVENT_SELECT_SQL} WHERE category = ?1 ORDER BY anchor_epoch_day ASC, id ASC;"
            ),
            &[&category.as_str()],
        )
    }

    fn get(&self, id: EventId) -> RepoResult<Option<Event>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EVENT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query(params![id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_event_row(row)?));
        }
        Ok(None)
    }

    fn upsert(&self, event: &Event) -> RepoResult<EventId> {
        self.insert_event(event)
    }

    fn bulk_upsert(&self, events: &[Event]) -> RepoResult<()> {
        // unchecked_transaction: the repository borrows the connection
        // immutably; exclusive use during the batch is the caller's contract.
        let tx = self.conn.unchecked_transaction()?;
        for event in events {
            self.insert_event(event)?;
        }
        tx.commit()?;
        Ok(())
    }

    fn delete(&self, id: EventId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM events WHERE id = ?1;", params![id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn delete_all(&self) -> RepoResult<()> {
        self.conn.execute("DELETE FROM events;", [])?;
        Ok(())
    }

    fn delete_by_type(&self, event_type: EventType) -> RepoResult<usize> {
        let changed = self.conn.execute(
            "DELETE FROM events WHERE event_type = ?1;",
            params![event_type.as_str()],
        )?;
        Ok(changed)
    }

    fn search(&self, query: &str) -> RepoResult<Vec<Event>> {
        let sanitized = sanitize_search_query(query);
        if sanitized.is_empty() {
            return Ok(Vec::new());
        }

        let pattern = format!("%{sanitized}%");
        self.query_events(
            &format!(
                "{EVENT_SELECT_SQL} WHERE name LIKE ?1 ORDER BY anchor_epoch_day ASC, id ASC;"
            ),
            &[&pattern],
        )
    }
}

fn parse_event_row(row: &Row<'_>) -> RepoResult<Event> {
    let anchor_epoch_day: i64 = row.get("anchor_epoch_day")?;
    let anchor_date = date_from_epoch_day(anchor_epoch_day).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid anchor epoch day `{anchor_epoch_day}` in events.anchor_epoch_day"
        ))
    })?;

    let created_epoch_day: i64 = row.get("created_epoch_day")?;
    let created_at = date_from_epoch_day(created_epoch_day).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid created epoch day `{created_epoch_day}` in events.created_epoch_day"
        ))
    })?;

    let type_text: String = row.get("event_type")?;
    let event_type = EventType::parse(&type_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid event type `{type_text}` in events.event_type"))
    })?;

    let category_text: String = row.get("category")?;
    let category = EventCategory::parse(&category_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid category `{category_text}` in events.category"))
    })?;

    let repeat_text: String = row.get("repeat_policy")?;
    let repeat_policy = RepeatPolicy::parse(&repeat_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid repeat policy `{repeat_text}` in events.repeat_policy"
        ))
    })?;

    let offsets_text: String = row.get("reminder_offsets")?;
    let reminder_offsets = offsets_from_db(&offsets_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid reminder offsets `{offsets_text}` in events.reminder_offsets"
        ))
    })?;

    Ok(Event {
        id: row.get("id")?,
        name: row.get("name")?,
        anchor_date,
        event_type,
        category,
        repeat_policy,
        reminder_offsets,
        note: row.get("note")?,
        is_active: row.get("is_active")?,
        created_at,
    })
}

fn offsets_to_db(offsets: &[i32]) -> String {
    offsets
        .iter()
        .map(|offset| offset.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn offsets_from_db(value: &str) -> Option<Vec<i32>> {
    value
        .split(',')
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<i32>().ok())
        .collect()
}
