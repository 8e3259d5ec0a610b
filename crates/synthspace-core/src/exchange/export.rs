use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    db::{EntityCounts, Store, StoreError},
    model::Workspace,
    types::RecordId,
};

use super::{
    ExchangeError,
    jsonl::{self, JsonlWriter},
};

///
/// ExportOptions
///

#[derive(Clone, Debug)]
pub struct ExportOptions {
    /// Gzip entity files, switching their suffix to `.jsonl.gz`.
    pub compress: bool,
    /// Rows fetched (and flushed) per batch while streaming entities.
    pub chunk_size: u32,
    /// Only export messages with `ts` strictly greater than this.
    pub messages_after_ts: Option<i64>,
    /// Only export files with `created_ts` strictly greater than this.
    pub files_after_ts: Option<i64>,
    /// Cursor file for incremental exports; read before and rewritten after.
    pub state_path: Option<PathBuf>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            compress: false,
            chunk_size: 2000,
            messages_after_ts: None,
            files_after_ts: None,
            state_path: None,
        }
    }
}

impl ExportOptions {
    fn load_state(&self) -> Result<Option<IncrementalState>, ExchangeError> {
        let Some(path) = &self.state_path else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(path)?;

        Ok(Some(serde_json::from_str(&text)?))
    }
}

///
/// IncrementalState
///
/// Persisted between export runs. Cursors only apply when the recorded
/// workspace matches the one being exported; a state file left behind by a
/// different workspace is ignored rather than silently skipping rows.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct IncrementalState {
    pub workspace_id: String,
    pub messages_max_ts: Option<i64>,
    pub files_max_ts: Option<i64>,
}

///
/// WorkspaceEnvelope
///

#[derive(Debug, Deserialize, Serialize)]
pub(super) struct WorkspaceEnvelope {
    pub workspace: Workspace,
}

///
/// ExportReport
///

#[derive(Clone, Debug, Serialize)]
pub struct ExportReport {
    pub workspace_id: RecordId,
    pub out_dir: PathBuf,
    pub counts: EntityCounts,
}

/// Exports one workspace to `out_root/<workspace-id>/` as JSON + JSONL files.
///
/// Layout: `workspace.json` (envelope), one `.jsonl[.gz]` file per entity,
/// and `summary.json` written last. When no workspace id is given the most
/// recently created one is exported. Explicit `*_after_ts` options take
/// precedence over cursors loaded from the state file.
pub fn export_workspace(
    store: &Store,
    out_root: &Path,
    workspace_id: Option<&RecordId>,
    options: &ExportOptions,
) -> Result<ExportReport, ExchangeError> {
    let workspace_id = match workspace_id {
        Some(id) => id.clone(),
        None => store
            .latest_workspace_id()?
            .ok_or(ExchangeError::NoWorkspaces)?,
    };
    let summary = store.export_summary(&workspace_id)?;

    let state = options
        .load_state()?
        .filter(|state| state.workspace_id == workspace_id.as_str());
    let messages_after = options
        .messages_after_ts
        .or_else(|| state.as_ref().and_then(|s| s.messages_max_ts));
    let files_after = options
        .files_after_ts
        .or_else(|| state.as_ref().and_then(|s| s.files_max_ts));
    debug!(
        workspace = %workspace_id,
        ?messages_after,
        ?files_after,
        "starting export"
    );

    let out_dir = out_root.join(workspace_id.as_str());
    fs::create_dir_all(&out_dir)?;

    jsonl::dump_json(
        &out_dir.join("workspace.json"),
        &WorkspaceEnvelope {
            workspace: summary.workspace.clone(),
        },
    )?;

    let suffix = if options.compress { "jsonl.gz" } else { "jsonl" };
    let chunk = options.chunk_size;

    let users = write_entity(&out_dir, "users", suffix, options.compress, |writer| {
        store.scan_users(&workspace_id, chunk, |rows| write_rows(writer, &rows))
    })?;
    let channels = write_entity(&out_dir, "channels", suffix, options.compress, |writer| {
        store.scan_channels(&workspace_id, chunk, |rows| write_rows(writer, &rows))
    })?;
    let channel_members = write_entity(
        &out_dir,
        "channel_members",
        suffix,
        options.compress,
        |writer| store.scan_channel_members(&workspace_id, chunk, |rows| write_rows(writer, &rows)),
    )?;
    let messages = write_entity(&out_dir, "messages", suffix, options.compress, |writer| {
        store.scan_messages(&workspace_id, messages_after, chunk, |rows| {
            write_rows(writer, &rows)
        })
    })?;
    let files = write_entity(&out_dir, "files", suffix, options.compress, |writer| {
        store.scan_files(&workspace_id, files_after, chunk, |rows| {
            write_rows(writer, &rows)
        })
    })?;

    jsonl::dump_json(&out_dir.join("summary.json"), &summary)?;

    if let Some(path) = &options.state_path {
        let state = IncrementalState {
            workspace_id: workspace_id.as_str().to_string(),
            messages_max_ts: store.max_message_ts(&workspace_id)?,
            files_max_ts: store.max_file_ts(&workspace_id)?,
        };
        jsonl::dump_json(path, &state)?;
    }

    let report = ExportReport {
        workspace_id,
        out_dir,
        counts: EntityCounts {
            users,
            channels,
            channel_members,
            messages,
            files,
        },
    };
    info!(
        workspace = %report.workspace_id,
        out = %report.out_dir.display(),
        users = report.counts.users,
        channels = report.counts.channels,
        channel_members = report.counts.channel_members,
        messages = report.counts.messages,
        files = report.counts.files,
        "exported workspace"
    );

    Ok(report)
}

fn write_entity(
    dir: &Path,
    name: &str,
    suffix: &str,
    compress: bool,
    scan: impl FnOnce(&mut JsonlWriter) -> Result<(), StoreError>,
) -> Result<u64, ExchangeError> {
    let path = dir.join(format!("{name}.{suffix}"));
    let mut writer = JsonlWriter::create(&path, compress)?;
    scan(&mut writer)?;

    Ok(writer.finish()?)
}

fn write_rows<T: Serialize>(writer: &mut JsonlWriter, rows: &[T]) -> Result<(), StoreError> {
    for row in rows {
        writer.write(row).map_err(StoreError::Io)?;
    }

    Ok(())
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::{WriteMode, testing},
        exchange::jsonl::read_jsonl,
        model::{Message, User},
        types::ChannelKind,
    };

    fn seeded_store() -> Store {
        let store = Store::in_memory().expect("store");
        store
            .insert_workspace(&testing::workspace("ws"), WriteMode::Insert)
            .expect("workspace");
        store
            .insert_users(
                &[testing::user("u1", "ws"), testing::user("u2", "ws")],
                WriteMode::Insert,
            )
            .expect("users");
        store
            .insert_channels(
                &[testing::channel("c1", "ws", ChannelKind::Public)],
                WriteMode::Insert,
            )
            .expect("channels");
        store
            .insert_channel_members(&[
                testing::member("c1", "u1", "ws"),
                testing::member("c1", "u2", "ws"),
            ])
            .expect("members");
        store
            .insert_messages(
                &[
                    testing::message("m1", "ws", "c1", "u1", 100),
                    testing::message("m2", "ws", "c1", "u2", 200),
                    testing::message("m3", "ws", "c1", "u1", 300),
                ],
                WriteMode::Insert,
            )
            .expect("messages");
        store
            .insert_files(
                &[testing::file("f1", "ws", "c1", "u1", 150)],
                WriteMode::Insert,
            )
            .expect("files");

        store
    }

    #[test]
    fn export_writes_full_workspace_layout() {
        let store = seeded_store();
        let dir = tempfile::tempdir().expect("tempdir");

        let report = export_workspace(&store, dir.path(), None, &ExportOptions::default())
            .expect("export");

        assert_eq!(report.workspace_id.as_str(), "ws");
        assert_eq!(report.out_dir, dir.path().join("ws"));
        assert_eq!(report.counts.users, 2);
        assert_eq!(report.counts.channels, 1);
        assert_eq!(report.counts.channel_members, 2);
        assert_eq!(report.counts.messages, 3);
        assert_eq!(report.counts.files, 1);

        for name in [
            "workspace.json",
            "summary.json",
            "users.jsonl",
            "channels.jsonl",
            "channel_members.jsonl",
            "messages.jsonl",
            "files.jsonl",
        ] {
            assert!(report.out_dir.join(name).exists(), "missing {name}");
        }

        let text = fs::read_to_string(report.out_dir.join("workspace.json")).expect("read");
        let envelope: WorkspaceEnvelope = serde_json::from_str(&text).expect("envelope");
        assert_eq!(envelope.workspace.id.as_str(), "ws");

        let users: Vec<User> = read_jsonl(&report.out_dir.join("users.jsonl"))
            .expect("open")
            .collect::<Result<_, _>>()
            .expect("rows");
        assert_eq!(users.len(), 2);
    }

    #[test]
    fn compress_switches_entity_files_to_gz() {
        let store = seeded_store();
        let dir = tempfile::tempdir().expect("tempdir");
        let options = ExportOptions {
            compress: true,
            ..ExportOptions::default()
        };

        let report = export_workspace(&store, dir.path(), None, &options).expect("export");

        assert!(report.out_dir.join("messages.jsonl.gz").exists());
        assert!(!report.out_dir.join("messages.jsonl").exists());

        let messages: Vec<Message> = read_jsonl(&report.out_dir.join("messages.jsonl.gz"))
            .expect("open")
            .collect::<Result<_, _>>()
            .expect("rows");
        assert_eq!(messages.len(), 3);
    }

    #[test]
    fn after_ts_filters_trim_activity_but_not_summary() {
        let store = seeded_store();
        let dir = tempfile::tempdir().expect("tempdir");
        let options = ExportOptions {
            messages_after_ts: Some(100),
            files_after_ts: Some(150),
            ..ExportOptions::default()
        };

        let report = export_workspace(&store, dir.path(), None, &options).expect("export");
        assert_eq!(report.counts.messages, 2, "strictly newer than ts 100");
        assert_eq!(report.counts.files, 0);

        let text = fs::read_to_string(report.out_dir.join("summary.json")).expect("read");
        let summary: serde_json::Value = serde_json::from_str(&text).expect("summary");
        assert_eq!(summary["counts"]["messages"], 3);
        assert_eq!(summary["counts"]["files"], 1);
    }

    #[test]
    fn incremental_state_resumes_from_high_water_marks() {
        let store = seeded_store();
        let dir = tempfile::tempdir().expect("tempdir");
        let state_path = dir.path().join("state.json");
        let options = ExportOptions {
            state_path: Some(state_path.clone()),
            ..ExportOptions::default()
        };

        let first = export_workspace(&store, &dir.path().join("one"), None, &options)
            .expect("first export");
        assert_eq!(first.counts.messages, 3);

        let text = fs::read_to_string(&state_path).expect("state");
        let state: IncrementalState = serde_json::from_str(&text).expect("decode");
        assert_eq!(state.workspace_id, "ws");
        assert_eq!(state.messages_max_ts, Some(300));
        assert_eq!(state.files_max_ts, Some(150));

        let second = export_workspace(&store, &dir.path().join("two"), None, &options)
            .expect("second export");
        assert_eq!(second.counts.messages, 0, "nothing newer than the cursor");
        assert_eq!(second.counts.files, 0);

        store
            .insert_messages(
                &[testing::message("m4", "ws", "c1", "u1", 400)],
                WriteMode::Insert,
            )
            .expect("newer message");
        let third = export_workspace(&store, &dir.path().join("three"), None, &options)
            .expect("third export");
        assert_eq!(third.counts.messages, 1);
    }

    #[test]
    fn explicit_after_ts_overrides_state_cursor() {
        let store = seeded_store();
        let dir = tempfile::tempdir().expect("tempdir");
        let state_path = dir.path().join("state.json");
        jsonl::dump_json(
            &state_path,
            &IncrementalState {
                workspace_id: "ws".to_string(),
                messages_max_ts: Some(300),
                files_max_ts: Some(150),
            },
        )
        .expect("seed state");

        let options = ExportOptions {
            messages_after_ts: Some(0),
            state_path: Some(state_path),
            ..ExportOptions::default()
        };
        let report = export_workspace(&store, dir.path(), None, &options).expect("export");

        assert_eq!(report.counts.messages, 3, "flag wins over state");
        assert_eq!(report.counts.files, 0, "state still drives files");
    }

    #[test]
    fn state_for_another_workspace_is_ignored() {
        let store = seeded_store();
        let dir = tempfile::tempdir().expect("tempdir");
        let state_path = dir.path().join("state.json");
        jsonl::dump_json(
            &state_path,
            &IncrementalState {
                workspace_id: "other".to_string(),
                messages_max_ts: Some(9_999),
                files_max_ts: Some(9_999),
            },
        )
        .expect("seed state");

        let options = ExportOptions {
            state_path: Some(state_path),
            ..ExportOptions::default()
        };
        let report = export_workspace(&store, dir.path(), None, &options).expect("export");
        assert_eq!(report.counts.messages, 3);
        assert_eq!(report.counts.files, 1);
    }

    #[test]
    fn empty_database_reports_no_workspaces() {
        let store = Store::in_memory().expect("store");
        let dir = tempfile::tempdir().expect("tempdir");

        let err = export_workspace(&store, dir.path(), None, &ExportOptions::default())
            .expect_err("should fail");
        assert!(matches!(err, ExchangeError::NoWorkspaces));
    }

    #[test]
    fn missing_explicit_workspace_is_a_store_error() {
        let store = seeded_store();
        let dir = tempfile::tempdir().expect("tempdir");

        let err = export_workspace(
            &store,
            dir.path(),
            Some(&RecordId::new("absent")),
            &ExportOptions::default(),
        )
        .expect_err("should fail");
        assert!(matches!(
            err,
            ExchangeError::Store(StoreError::WorkspaceNotFound(_))
        ));
    }
}
