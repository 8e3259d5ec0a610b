use crate::{
    db::{Store, StoreError, row},
    model::Workspace,
    types::RecordId,
};
use rusqlite::{OptionalExtension, params};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

///
/// EntityCounts
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct EntityCounts {
    pub users: u64,
    pub channels: u64,
    pub channel_members: u64,
    pub messages: u64,
    pub files: u64,
}

///
/// SummaryMax
///
/// High-water activity timestamps; null when a workspace has no rows of that
/// kind. Incremental exports resume from these.
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct SummaryMax {
    pub messages_max_ts: Option<i64>,
    pub files_max_ts: Option<i64>,
}

///
/// ExportSummary
///
/// The workspace row, its run metadata, row counts, the channel type
/// histogram, and the activity high-water marks in one document.
///

#[derive(Clone, Debug, Serialize)]
pub struct ExportSummary {
    pub workspace: Workspace,
    pub meta: serde_json::Map<String, Value>,
    pub counts: EntityCounts,
    pub channel_types: BTreeMap<String, u64>,
    pub max: SummaryMax,
}

impl Store {
    /// All workspaces, newest first.
    pub fn list_workspaces(&self) -> Result<Vec<Workspace>, StoreError> {
        let conn = self.conn();
        let mut stmt =
            conn.prepare("SELECT * FROM workspaces ORDER BY created_at DESC, id DESC")?;
        let rows = stmt.query_map([], row::workspace_from_row)?;

        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    pub fn latest_workspace_id(&self) -> Result<Option<RecordId>, StoreError> {
        let conn = self.conn();
        let id = conn
            .query_row(
                "SELECT id FROM workspaces ORDER BY created_at DESC, id DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;

        Ok(id)
    }

    pub fn workspace(&self, workspace_id: &RecordId) -> Result<Option<Workspace>, StoreError> {
        let conn = self.conn();
        let workspace = conn
            .query_row(
                "SELECT * FROM workspaces WHERE id = ?1",
                params![workspace_id],
                row::workspace_from_row,
            )
            .optional()?;

        Ok(workspace)
    }

    /// Upsert run metadata. Every value is stored JSON-encoded so structured
    /// entries like `requested` survive the text column.
    pub fn set_workspace_meta(
        &self,
        workspace_id: &RecordId,
        meta: &serde_json::Map<String, Value>,
    ) -> Result<(), StoreError> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO workspace_meta (workspace_id, key, value)
                 VALUES (?1, ?2, ?3)",
            )?;
            for (key, value) in meta {
                stmt.execute(params![workspace_id, key, serde_json::to_string(value)?])?;
            }
        }
        tx.commit()?;

        Ok(())
    }

    /// Read back run metadata. Values that fail to parse as JSON are kept as
    /// raw strings rather than dropped; foreign tools may have written them.
    pub fn workspace_meta(
        &self,
        workspace_id: &RecordId,
    ) -> Result<serde_json::Map<String, Value>, StoreError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT key, value FROM workspace_meta WHERE workspace_id = ?1 ORDER BY key",
        )?;
        let rows = stmt.query_map(params![workspace_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut meta = serde_json::Map::new();
        for row in rows {
            let (key, raw) = row?;
            let value = serde_json::from_str(&raw).unwrap_or(Value::String(raw));
            meta.insert(key, value);
        }

        Ok(meta)
    }

    pub fn stats(&self, workspace_id: &RecordId) -> Result<EntityCounts, StoreError> {
        Ok(EntityCounts {
            users: self.count_rows("users", workspace_id)?,
            channels: self.count_rows("channels", workspace_id)?,
            channel_members: self.count_rows("channel_members", workspace_id)?,
            messages: self.count_rows("messages", workspace_id)?,
            files: self.count_rows("files", workspace_id)?,
        })
    }

    pub fn channel_type_counts(
        &self,
        workspace_id: &RecordId,
    ) -> Result<BTreeMap<String, u64>, StoreError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT channel_type, COUNT(*) FROM channels
             WHERE workspace_id = ?1 GROUP BY channel_type",
        )?;
        let rows = stmt.query_map(params![workspace_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, u64>(1)?))
        })?;

        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    pub fn max_message_ts(&self, workspace_id: &RecordId) -> Result<Option<i64>, StoreError> {
        let conn = self.conn();
        let max = conn.query_row(
            "SELECT MAX(ts) FROM messages WHERE workspace_id = ?1",
            params![workspace_id],
            |row| row.get(0),
        )?;

        Ok(max)
    }

    pub fn max_file_ts(&self, workspace_id: &RecordId) -> Result<Option<i64>, StoreError> {
        let conn = self.conn();
        let max = conn.query_row(
            "SELECT MAX(created_ts) FROM files WHERE workspace_id = ?1",
            params![workspace_id],
            |row| row.get(0),
        )?;

        Ok(max)
    }

    /// Everything a consumer needs to size a workspace, in one document.
    /// Errors when the workspace row itself is missing.
    pub fn export_summary(&self, workspace_id: &RecordId) -> Result<ExportSummary, StoreError> {
        let workspace = self
            .workspace(workspace_id)?
            .ok_or_else(|| StoreError::WorkspaceNotFound(workspace_id.clone()))?;

        Ok(ExportSummary {
            workspace,
            meta: self.workspace_meta(workspace_id)?,
            counts: self.stats(workspace_id)?,
            channel_types: self.channel_type_counts(workspace_id)?,
            max: SummaryMax {
                messages_max_ts: self.max_message_ts(workspace_id)?,
                files_max_ts: self.max_file_ts(workspace_id)?,
            },
        })
    }

    fn count_rows(&self, table: &'static str, workspace_id: &RecordId) -> Result<u64, StoreError> {
        let conn = self.conn();
        let count = conn.query_row(
            &format!("SELECT COUNT(*) FROM {table} WHERE workspace_id = ?1"),
            params![workspace_id],
            |row| row.get(0),
        )?;

        Ok(count)
    }
}

///
/// TESTS
///
