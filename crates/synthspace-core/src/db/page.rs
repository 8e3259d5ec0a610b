//! Ordered list reads. Every collection pages two ways: classic
//! limit/offset windows, and keyset cursors that stay stable while new
//! activity lands. Both share one filter grammar and the same canonical
//! orders as the scan API.

use crate::{
    cursor::{IdCursor, MemberCursor, Page, TsCursor, trim_to_page},
    db::{Store, StoreError, row},
    model::{Channel, ChannelMember, File, Message, User},
    types::{ChannelKind, RecordId},
};
use rusqlite::{Row, params_from_iter, types::Value as SqlValue};

///
/// ActivityFilter
///
/// Restrictions shared by the message and file listings. Timestamp bounds
/// are strict; for files they apply to `created_ts`.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ActivityFilter {
    pub channel_id: Option<RecordId>,
    pub user_id: Option<RecordId>,
    pub before_ts: Option<i64>,
    pub after_ts: Option<i64>,
}

impl ActivityFilter {
    fn apply(&self, conditions: &mut Conditions, ts_column: &str) {
        if let Some(channel_id) = &self.channel_id {
            conditions.push("channel_id = ?", [text(channel_id)]);
        }
        if let Some(user_id) = &self.user_id {
            conditions.push("user_id = ?", [text(user_id)]);
        }
        if let Some(before) = self.before_ts {
            conditions.push(format!("{ts_column} < ?"), [SqlValue::Integer(before)]);
        }
        if let Some(after) = self.after_ts {
            conditions.push(format!("{ts_column} > ?"), [SqlValue::Integer(after)]);
        }
    }
}

fn text(id: &RecordId) -> SqlValue {
    SqlValue::Text(id.as_str().to_string())
}

// usize is at least 32 bits on every supported target
#[allow(clippy::cast_possible_truncation)]
const fn to_len(count: u32) -> usize {
    count as usize
}

///
/// Conditions
/// Accumulates WHERE clauses and their bind values in lockstep.
///

struct Conditions {
    clauses: Vec<String>,
    params: Vec<SqlValue>,
}

impl Conditions {
    fn scoped(workspace_id: &RecordId) -> Self {
        Self {
            clauses: vec!["workspace_id = ?".to_string()],
            params: vec![text(workspace_id)],
        }
    }

    fn push(&mut self, clause: impl Into<String>, values: impl IntoIterator<Item = SqlValue>) {
        self.clauses.push(clause.into());
        self.params.extend(values);
    }

    fn select(self, table: &str, order: &str, window: Window) -> (String, Vec<SqlValue>) {
        let mut params = self.params;
        let tail = match window {
            Window::Limit(limit) => {
                params.push(SqlValue::Integer(i64::from(limit)));
                "LIMIT ?"
            }
            Window::Probe(limit) => {
                // one past the limit; the probe row decides the next cursor
                params.push(SqlValue::Integer(i64::from(limit) + 1));
                "LIMIT ?"
            }
            Window::LimitOffset(limit, offset) => {
                params.push(SqlValue::Integer(i64::from(limit)));
                params.push(SqlValue::Integer(i64::from(offset)));
                "LIMIT ? OFFSET ?"
            }
        };

        let sql = format!(
            "SELECT * FROM {table} WHERE {} ORDER BY {order} {tail}",
            self.clauses.join(" AND ")
        );
        (sql, params)
    }
}

enum Window {
    Limit(u32),
    Probe(u32),
    LimitOffset(u32, u32),
}

impl Store {
    fn fetch<T>(
        &self,
        sql: &str,
        params: Vec<SqlValue>,
        map: fn(&Row<'_>) -> rusqlite::Result<T>,
    ) -> Result<Vec<T>, StoreError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params_from_iter(params), map)?;

        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    pub fn list_users(
        &self,
        workspace_id: &RecordId,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<User>, StoreError> {
        let conditions = Conditions::scoped(workspace_id);
        let (sql, params) =
            conditions.select("users", "id ASC", Window::LimitOffset(limit, offset));

        self.fetch(&sql, params, row::user_from_row)
    }

    pub fn list_users_page(
        &self,
        workspace_id: &RecordId,
        limit: u32,
        cursor: Option<&str>,
    ) -> Result<Page<User>, StoreError> {
        let mut conditions = Conditions::scoped(workspace_id);
        if let Some(token) = cursor
            && let Some(resume) = IdCursor::decode(token)?
        {
            conditions.push("id > ?", [SqlValue::Text(resume.id)]);
        }
        let (sql, params) = conditions.select("users", "id ASC", Window::Probe(limit));
        let rows = self.fetch(&sql, params, row::user_from_row)?;

        Ok(trim_to_page(rows, to_len(limit), |user| {
            IdCursor {
                id: user.id.as_str().to_string(),
            }
            .encode()
        }))
    }

    pub fn list_channels(
        &self,
        workspace_id: &RecordId,
        channel_type: Option<ChannelKind>,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Channel>, StoreError> {
        let mut conditions = Conditions::scoped(workspace_id);
        if let Some(kind) = channel_type {
            conditions.push("channel_type = ?", [SqlValue::Text(kind.as_str().to_string())]);
        }
        let (sql, params) =
            conditions.select("channels", "id ASC", Window::LimitOffset(limit, offset));

        self.fetch(&sql, params, row::channel_from_row)
    }

    pub fn list_channels_page(
        &self,
        workspace_id: &RecordId,
        channel_type: Option<ChannelKind>,
        limit: u32,
        cursor: Option<&str>,
    ) -> Result<Page<Channel>, StoreError> {
        let mut conditions = Conditions::scoped(workspace_id);
        if let Some(kind) = channel_type {
            conditions.push("channel_type = ?", [SqlValue::Text(kind.as_str().to_string())]);
        }
        if let Some(token) = cursor
            && let Some(resume) = IdCursor::decode(token)?
        {
            conditions.push("id > ?", [SqlValue::Text(resume.id)]);
        }
        let (sql, params) = conditions.select("channels", "id ASC", Window::Probe(limit));
        let rows = self.fetch(&sql, params, row::channel_from_row)?;

        Ok(trim_to_page(rows, to_len(limit), |channel| {
            IdCursor {
                id: channel.id.as_str().to_string(),
            }
            .encode()
        }))
    }

    pub fn list_channel_members(
        &self,
        workspace_id: &RecordId,
        channel_id: Option<&RecordId>,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<ChannelMember>, StoreError> {
        let mut conditions = Conditions::scoped(workspace_id);
        if let Some(channel_id) = channel_id {
            conditions.push("channel_id = ?", [text(channel_id)]);
        }
        let (sql, params) = conditions.select(
            "channel_members",
            "channel_id ASC, user_id ASC",
            Window::LimitOffset(limit, offset),
        );

        self.fetch(&sql, params, row::member_from_row)
    }

    pub fn list_channel_members_page(
        &self,
        workspace_id: &RecordId,
        channel_id: Option<&RecordId>,
        limit: u32,
        cursor: Option<&str>,
    ) -> Result<Page<ChannelMember>, StoreError> {
        let mut conditions = Conditions::scoped(workspace_id);
        if let Some(channel_id) = channel_id {
            conditions.push("channel_id = ?", [text(channel_id)]);
        }
        if let Some(token) = cursor
            && let Some(resume) = MemberCursor::decode(token)?
        {
            conditions.push(
                "(channel_id > ? OR (channel_id = ? AND user_id > ?))",
                [
                    SqlValue::Text(resume.channel_id.clone()),
                    SqlValue::Text(resume.channel_id),
                    SqlValue::Text(resume.user_id),
                ],
            );
        }
        let (sql, params) = conditions.select(
            "channel_members",
            "channel_id ASC, user_id ASC",
            Window::Probe(limit),
        );
        let rows = self.fetch(&sql, params, row::member_from_row)?;

        Ok(trim_to_page(rows, to_len(limit), |member| {
            MemberCursor {
                channel_id: member.channel_id.as_str().to_string(),
                user_id: member.user_id.as_str().to_string(),
            }
            .encode()
        }))
    }

    pub fn list_messages(
        &self,
        workspace_id: &RecordId,
        filter: &ActivityFilter,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Message>, StoreError> {
        let mut conditions = Conditions::scoped(workspace_id);
        filter.apply(&mut conditions, "ts");
        let (sql, params) = conditions.select(
            "messages",
            "ts DESC, id DESC",
            Window::LimitOffset(limit, offset),
        );

        self.fetch(&sql, params, row::message_from_row)
    }

    pub fn list_messages_page(
        &self,
        workspace_id: &RecordId,
        filter: &ActivityFilter,
        limit: u32,
        cursor: Option<&str>,
    ) -> Result<Page<Message>, StoreError> {
        let mut conditions = Conditions::scoped(workspace_id);
        filter.apply(&mut conditions, "ts");
        if let Some(token) = cursor
            && let Some(resume) = TsCursor::decode(token)?
        {
            conditions.push(
                "(ts < ? OR (ts = ? AND id < ?))",
                [
                    SqlValue::Integer(resume.ts),
                    SqlValue::Integer(resume.ts),
                    SqlValue::Text(resume.id),
                ],
            );
        }
        let (sql, params) =
            conditions.select("messages", "ts DESC, id DESC", Window::Probe(limit));
        let rows = self.fetch(&sql, params, row::message_from_row)?;

        Ok(trim_to_page(rows, to_len(limit), |message| {
            TsCursor {
                ts: message.ts,
                id: message.id.as_str().to_string(),
            }
            .encode()
        }))
    }

    pub fn list_files(
        &self,
        workspace_id: &RecordId,
        filter: &ActivityFilter,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<File>, StoreError> {
        let mut conditions = Conditions::scoped(workspace_id);
        filter.apply(&mut conditions, "created_ts");
        let (sql, params) = conditions.select(
            "files",
            "created_ts DESC, id DESC",
            Window::LimitOffset(limit, offset),
        );

        self.fetch(&sql, params, row::file_from_row)
    }

    pub fn list_files_page(
        &self,
        workspace_id: &RecordId,
        filter: &ActivityFilter,
        limit: u32,
        cursor: Option<&str>,
    ) -> Result<Page<File>, StoreError> {
        let mut conditions = Conditions::scoped(workspace_id);
        filter.apply(&mut conditions, "created_ts");
        if let Some(token) = cursor
            && let Some(resume) = TsCursor::decode(token)?
        {
            conditions.push(
                "(created_ts < ? OR (created_ts = ? AND id < ?))",
                [
                    SqlValue::Integer(resume.ts),
                    SqlValue::Integer(resume.ts),
                    SqlValue::Text(resume.id),
                ],
            );
        }
        let (sql, params) =
            conditions.select("files", "created_ts DESC, id DESC", Window::Probe(limit));
        let rows = self.fetch(&sql, params, row::file_from_row)?;

        Ok(trim_to_page(rows, to_len(limit), |file| {
            TsCursor {
                ts: file.created_ts,
                id: file.id.as_str().to_string(),
            }
            .encode()
        }))
    }
}

///
/// TESTS
///
