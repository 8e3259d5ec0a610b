//! Full-table scans in canonical order, delivered to a sink in bounded
//! chunks. Export never holds more than one chunk of records in memory no
//! matter how large the workspace is.

use crate::{
    db::{Store, StoreError, row},
    model::{Channel, ChannelMember, File, Message, User},
    types::RecordId,
};
use rusqlite::{Connection, Row, params_from_iter, types::Value as SqlValue};

// usize is at least 32 bits on every supported target
#[allow(clippy::cast_possible_truncation)]
const fn to_len(count: u32) -> usize {
    count as usize
}

fn scan_rows<T>(
    conn: &Connection,
    sql: &str,
    params: Vec<SqlValue>,
    chunk_size: u32,
    map: fn(&Row<'_>) -> rusqlite::Result<T>,
    sink: &mut dyn FnMut(Vec<T>) -> Result<(), StoreError>,
) -> Result<(), StoreError> {
    let cap = to_len(chunk_size.max(1));
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params_from_iter(params), map)?;

    let mut chunk = Vec::with_capacity(cap);
    for item in rows {
        chunk.push(item?);
        if chunk.len() == cap {
            sink(std::mem::replace(&mut chunk, Vec::with_capacity(cap)))?;
        }
    }
    if !chunk.is_empty() {
        sink(chunk)?;
    }

    Ok(())
}

fn scoped(workspace_id: &RecordId) -> Vec<SqlValue> {
    vec![SqlValue::Text(workspace_id.as_str().to_string())]
}

fn scoped_after(workspace_id: &RecordId, after_ts: i64) -> Vec<SqlValue> {
    vec![
        SqlValue::Text(workspace_id.as_str().to_string()),
        SqlValue::Integer(after_ts),
    ]
}

impl Store {
    /// Users in id order.
    pub fn scan_users(
        &self,
        workspace_id: &RecordId,
        chunk_size: u32,
        mut sink: impl FnMut(Vec<User>) -> Result<(), StoreError>,
    ) -> Result<(), StoreError> {
        scan_rows(
            &self.conn(),
            "SELECT * FROM users WHERE workspace_id = ? ORDER BY id ASC",
            scoped(workspace_id),
            chunk_size,
            row::user_from_row,
            &mut sink,
        )
    }

    /// Channels in id order.
    pub fn scan_channels(
        &self,
        workspace_id: &RecordId,
        chunk_size: u32,
        mut sink: impl FnMut(Vec<Channel>) -> Result<(), StoreError>,
    ) -> Result<(), StoreError> {
        scan_rows(
            &self.conn(),
            "SELECT * FROM channels WHERE workspace_id = ? ORDER BY id ASC",
            scoped(workspace_id),
            chunk_size,
            row::channel_from_row,
            &mut sink,
        )
    }

    /// Memberships in `(channel_id, user_id)` order.
    pub fn scan_channel_members(
        &self,
        workspace_id: &RecordId,
        chunk_size: u32,
        mut sink: impl FnMut(Vec<ChannelMember>) -> Result<(), StoreError>,
    ) -> Result<(), StoreError> {
        scan_rows(
            &self.conn(),
            "SELECT * FROM channel_members WHERE workspace_id = ?
             ORDER BY channel_id ASC, user_id ASC",
            scoped(workspace_id),
            chunk_size,
            row::member_from_row,
            &mut sink,
        )
    }

    /// Messages newest first, optionally restricted to activity strictly
    /// after `after_ts`. This is the export order.
    pub fn scan_messages(
        &self,
        workspace_id: &RecordId,
        after_ts: Option<i64>,
        chunk_size: u32,
        mut sink: impl FnMut(Vec<Message>) -> Result<(), StoreError>,
    ) -> Result<(), StoreError> {
        let (sql, params) = match after_ts {
            None => (
                "SELECT * FROM messages WHERE workspace_id = ?
                 ORDER BY ts DESC, id DESC",
                scoped(workspace_id),
            ),
            Some(ts) => (
                "SELECT * FROM messages WHERE workspace_id = ? AND ts > ?
                 ORDER BY ts DESC, id DESC",
                scoped_after(workspace_id, ts),
            ),
        };

        scan_rows(
            &self.conn(),
            sql,
            params,
            chunk_size,
            row::message_from_row,
            &mut sink,
        )
    }

    /// Messages oldest first, for consumers replaying history forward.
    pub fn scan_messages_chronological(
        &self,
        workspace_id: &RecordId,
        chunk_size: u32,
        mut sink: impl FnMut(Vec<Message>) -> Result<(), StoreError>,
    ) -> Result<(), StoreError> {
        scan_rows(
            &self.conn(),
            "SELECT * FROM messages WHERE workspace_id = ?
             ORDER BY ts ASC, id ASC",
            scoped(workspace_id),
            chunk_size,
            row::message_from_row,
            &mut sink,
        )
    }

    /// Messages grouped by channel, chronological within each, for consumers
    /// replaying one conversation at a time.
    pub fn scan_messages_by_channel(
        &self,
        workspace_id: &RecordId,
        chunk_size: u32,
        mut sink: impl FnMut(Vec<Message>) -> Result<(), StoreError>,
    ) -> Result<(), StoreError> {
        scan_rows(
            &self.conn(),
            "SELECT * FROM messages WHERE workspace_id = ?
             ORDER BY channel_id ASC, ts ASC, id ASC",
            scoped(workspace_id),
            chunk_size,
            row::message_from_row,
            &mut sink,
        )
    }

    /// Files newest first, optionally restricted to uploads strictly after
    /// `after_ts`.
    pub fn scan_files(
        &self,
        workspace_id: &RecordId,
        after_ts: Option<i64>,
        chunk_size: u32,
        mut sink: impl FnMut(Vec<File>) -> Result<(), StoreError>,
    ) -> Result<(), StoreError> {
        let (sql, params) = match after_ts {
            None => (
                "SELECT * FROM files WHERE workspace_id = ?
                 ORDER BY created_ts DESC, id DESC",
                scoped(workspace_id),
            ),
            Some(ts) => (
                "SELECT * FROM files WHERE workspace_id = ? AND created_ts > ?
                 ORDER BY created_ts DESC, id DESC",
                scoped_after(workspace_id, ts),
            ),
        };

        scan_rows(
            &self.conn(),
            sql,
            params,
            chunk_size,
            row::file_from_row,
            &mut sink,
        )
    }
}

///
/// TESTS
///
