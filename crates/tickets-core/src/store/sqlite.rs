use super::{StoreError, TicketStore};
use crate::db;
use crate::model::{ActorId, NewTicket, Ticket, TicketId};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;

const SELECT_COLUMNS: &str = "SELECT ticket_id, body, is_completed, is_frozen, author FROM tickets";

/// [`TicketStore`] backed by a single SQLite connection.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (and migrate) the database at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        Ok(Self {
            conn: db::open_db(path)?,
        })
    }

    /// A fresh, private, migrated in-memory store.
    ///
    /// # Errors
    ///
    /// Returns an error if SQLite cannot allocate the database.
    pub fn open_in_memory() -> anyhow::Result<Self> {
        Ok(Self {
            conn: db::open_in_memory()?,
        })
    }

    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }

    fn query_one(
        &self,
        op: &'static str,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Option<Ticket>, StoreError> {
        let row = self
            .conn
            .query_row(sql, params, read_row)
            .optional()
            .map_err(|e| StoreError::from_sqlite(op, e))?;
        row.map(into_ticket).transpose()
    }

    fn query_many(
        &self,
        op: &'static str,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<Ticket>, StoreError> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| StoreError::from_sqlite(op, e))?;
        let rows = stmt
            .query_map(params, read_row)
            .map_err(|e| StoreError::from_sqlite(op, e))?;

        let mut tickets = Vec::new();
        for row in rows {
            let row = row.map_err(|e| StoreError::from_sqlite(op, e))?;
            tickets.push(into_ticket(row)?);
        }
        Ok(tickets)
    }
}

/// Raw column values before domain validation.
struct TicketRow {
    ticket_id: i64,
    body: String,
    is_completed: bool,
    is_frozen: bool,
    author: String,
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<TicketRow> {
    Ok(TicketRow {
        ticket_id: row.get(0)?,
        body: row.get(1)?,
        is_completed: row.get::<_, i64>(2)? != 0,
        is_frozen: row.get::<_, i64>(3)? != 0,
        author: row.get(4)?,
    })
}

fn into_ticket(row: TicketRow) -> Result<Ticket, StoreError> {
    let author = ActorId::new(row.author).map_err(|e| {
        StoreError::Corrupt(format!("ticket {}: {e}", row.ticket_id))
    })?;
    Ok(Ticket {
        id: TicketId::from_raw(row.ticket_id),
        body: row.body,
        is_completed: row.is_completed,
        is_frozen: row.is_frozen,
        author,
    })
}

impl TicketStore for SqliteStore {
    fn get(&self, id: TicketId) -> Result<Option<Ticket>, StoreError> {
        self.query_one(
            "get",
            &format!("{SELECT_COLUMNS} WHERE ticket_id = ?1"),
            params![id.as_i64()],
        )
    }

    fn get_for_owner(&self, id: TicketId, owner: &ActorId) -> Result<Option<Ticket>, StoreError> {
        self.query_one(
            "get_for_owner",
            &format!("{SELECT_COLUMNS} WHERE ticket_id = ?1 AND author = ?2"),
            params![id.as_i64(), owner.as_str()],
        )
    }

    fn list_for_owner(&self, owner: &ActorId) -> Result<Vec<Ticket>, StoreError> {
        self.query_many(
            "list_for_owner",
            &format!("{SELECT_COLUMNS} WHERE author = ?1 ORDER BY ticket_id ASC"),
            params![owner.as_str()],
        )
    }

    fn list_all(&self) -> Result<Vec<Ticket>, StoreError> {
        self.query_many(
            "list_all",
            &format!("{SELECT_COLUMNS} ORDER BY ticket_id ASC"),
            [],
        )
    }

    fn create(&self, fields: &NewTicket, author: &ActorId) -> Result<Ticket, StoreError> {
        self.conn
            .execute(
                "INSERT INTO tickets (body, is_completed, is_frozen, author) \
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    fields.body,
                    i64::from(fields.is_completed),
                    i64::from(fields.is_frozen),
                    author.as_str()
                ],
            )
            .map_err(|e| StoreError::from_sqlite("create", e))?;

        let id = TicketId::from_raw(self.conn.last_insert_rowid());
        tracing::debug!(ticket = %id, author = %author, "ticket created");

        Ok(Ticket {
            id,
            body: fields.body.clone(),
            is_completed: fields.is_completed,
            is_frozen: fields.is_frozen,
            author: author.clone(),
        })
    }

    fn write(&self, ticket: &Ticket) -> Result<Ticket, StoreError> {
        let changed = self
            .conn
            .execute(
                "UPDATE tickets SET body = ?1, is_completed = ?2, is_frozen = ?3 \
                 WHERE ticket_id = ?4",
                params![
                    ticket.body,
                    i64::from(ticket.is_completed),
                    i64::from(ticket.is_frozen),
                    ticket.id.as_i64()
                ],
            )
            .map_err(|e| StoreError::from_sqlite("write", e))?;

        // Row vanished between the read and this write.
        if changed == 0 {
            tracing::warn!(ticket = %ticket.id, "write found no row");
            return Err(StoreError::Conflict { op: "write" });
        }

        self.get(ticket.id)?
            .ok_or(StoreError::Conflict { op: "write" })
    }

    fn delete(&self, id: TicketId) -> Result<bool, StoreError> {
        let removed = self
            .conn
            .execute("DELETE FROM tickets WHERE ticket_id = ?1", params![id.as_i64()])
            .map_err(|e| StoreError::from_sqlite("delete", e))?;
        Ok(removed > 0)
    }
}
