use std::fs;
use std::path::{Path, PathBuf};

use serde::{Serialize, de::DeserializeOwned};
use tracing::info;

use crate::{
    db::{EntityCounts, Store, StoreError, WriteMode},
    types::RecordId,
};

use super::{ExchangeError, export::WorkspaceEnvelope, jsonl};

// Rows are buffered into transactions of this size while loading.
const IMPORT_BATCH: usize = 2000;

///
/// ImportReport
///

#[derive(Clone, Debug, Serialize)]
pub struct ImportReport {
    pub workspace_id: RecordId,
    pub counts: EntityCounts,
}

/// Loads a workspace export from `source/<workspace-id>/` into the store.
///
/// Every write ignores duplicate keys, so importing the same export twice
/// (or importing over a database that already holds the workspace) is a
/// no-op rather than an error. Entity files may be `.jsonl` or `.jsonl.gz`;
/// absent ones are treated as empty slices.
pub fn import_workspace(
    store: &Store,
    source: &Path,
    workspace_id: &RecordId,
) -> Result<ImportReport, ExchangeError> {
    let dir = source.join(workspace_id.as_str());
    let workspace_path = dir.join("workspace.json");
    if !workspace_path.exists() {
        return Err(ExchangeError::ExportMissing(dir));
    }

    let text = fs::read_to_string(&workspace_path)?;
    let envelope: WorkspaceEnvelope = serde_json::from_str(&text)?;
    store.insert_workspace(&envelope.workspace, WriteMode::InsertOrIgnore)?;

    let counts = EntityCounts {
        users: import_entity(&dir, "users", |rows| {
            store.insert_users(rows, WriteMode::InsertOrIgnore)
        })?,
        channels: import_entity(&dir, "channels", |rows| {
            store.insert_channels(rows, WriteMode::InsertOrIgnore)
        })?,
        channel_members: import_entity(&dir, "channel_members", |rows| {
            store.insert_channel_members(rows)
        })?,
        messages: import_entity(&dir, "messages", |rows| {
            store.insert_messages(rows, WriteMode::InsertOrIgnore)
        })?,
        files: import_entity(&dir, "files", |rows| {
            store.insert_files(rows, WriteMode::InsertOrIgnore)
        })?,
    };

    let report = ImportReport {
        workspace_id: workspace_id.clone(),
        counts,
    };
    info!(
        workspace = %report.workspace_id,
        source = %dir.display(),
        users = report.counts.users,
        channels = report.counts.channels,
        channel_members = report.counts.channel_members,
        messages = report.counts.messages,
        files = report.counts.files,
        "imported workspace"
    );

    Ok(report)
}

fn import_entity<T: DeserializeOwned>(
    dir: &Path,
    name: &str,
    mut flush: impl FnMut(&[T]) -> Result<(), StoreError>,
) -> Result<u64, ExchangeError> {
    let Some(path) = entity_file(dir, name) else {
        return Ok(0);
    };

    let mut rows: Vec<T> = Vec::with_capacity(IMPORT_BATCH);
    let mut total = 0u64;
    for row in jsonl::read_jsonl(&path)? {
        rows.push(row?);
        if rows.len() >= IMPORT_BATCH {
            flush(&rows)?;
            total += count(rows.len());
            rows.clear();
        }
    }
    if !rows.is_empty() {
        flush(&rows)?;
        total += count(rows.len());
    }

    Ok(total)
}

// Prefers the plain file when both it and a compressed sibling exist.
fn entity_file(dir: &Path, name: &str) -> Option<PathBuf> {
    let plain = dir.join(format!("{name}.jsonl"));
    if plain.exists() {
        return Some(plain);
    }
    let gz = dir.join(format!("{name}.jsonl.gz"));

    gz.exists().then_some(gz)
}

fn count(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::testing,
        exchange::{ExportOptions, export_workspace},
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
                &[
                    testing::channel("c1", "ws", ChannelKind::Public),
                    testing::channel("c2", "ws", ChannelKind::Private),
                ],
                WriteMode::Insert,
            )
            .expect("channels");
        store
            .insert_channel_members(&[
                testing::member("c1", "u1", "ws"),
                testing::member("c1", "u2", "ws"),
                testing::member("c2", "u1", "ws"),
            ])
            .expect("members");
        store
            .insert_messages(
                &[
                    testing::message("m1", "ws", "c1", "u1", 100),
                    testing::message("m2", "ws", "c1", "u2", 200),
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
    fn roundtrip_preserves_every_entity_count() {
        let source = seeded_store();
        let dir = tempfile::tempdir().expect("tempdir");
        export_workspace(&source, dir.path(), None, &ExportOptions::default()).expect("export");

        let target = Store::in_memory().expect("target");
        let ws = RecordId::new("ws");
        let report = import_workspace(&target, dir.path(), &ws).expect("import");

        assert_eq!(report.counts.users, 2);
        assert_eq!(report.counts.channels, 2);
        assert_eq!(report.counts.channel_members, 3);
        assert_eq!(report.counts.messages, 2);
        assert_eq!(report.counts.files, 1);

        let summary = target.export_summary(&ws).expect("summary");
        assert_eq!(summary.counts, source.export_summary(&ws).expect("src").counts);
        assert_eq!(summary.workspace.name, "Workspace ws");
    }

    #[test]
    fn reimport_is_idempotent() {
        let source = seeded_store();
        let dir = tempfile::tempdir().expect("tempdir");
        export_workspace(&source, dir.path(), None, &ExportOptions::default()).expect("export");

        let target = Store::in_memory().expect("target");
        let ws = RecordId::new("ws");
        import_workspace(&target, dir.path(), &ws).expect("first");
        import_workspace(&target, dir.path(), &ws).expect("second");

        let counts = target.stats(&ws).expect("stats");
        assert_eq!(counts.users, 2);
        assert_eq!(counts.messages, 2);
        assert_eq!(counts.channel_members, 3);
    }

    #[test]
    fn gzipped_exports_import_transparently() {
        let source = seeded_store();
        let dir = tempfile::tempdir().expect("tempdir");
        let options = ExportOptions {
            compress: true,
            ..ExportOptions::default()
        };
        export_workspace(&source, dir.path(), None, &options).expect("export");

        let target = Store::in_memory().expect("target");
        let report = import_workspace(&target, dir.path(), &RecordId::new("ws")).expect("import");
        assert_eq!(report.counts.messages, 2);
        assert_eq!(report.counts.files, 1);
    }

    #[test]
    fn missing_entity_files_are_empty_slices() {
        let dir = tempfile::tempdir().expect("tempdir");
        let ws_dir = dir.path().join("ws");
        jsonl::dump_json(
            &ws_dir.join("workspace.json"),
            &WorkspaceEnvelope {
                workspace: testing::workspace("ws"),
            },
        )
        .expect("workspace.json");

        let target = Store::in_memory().expect("target");
        let ws = RecordId::new("ws");
        let report = import_workspace(&target, dir.path(), &ws).expect("import");

        assert_eq!(report.counts, EntityCounts::default());
        assert!(target.workspace(&ws).expect("lookup").is_some());
    }

    #[test]
    fn missing_export_directory_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let target = Store::in_memory().expect("target");

        let err = import_workspace(&target, dir.path(), &RecordId::new("ws"))
            .expect_err("should fail");
        assert!(matches!(err, ExchangeError::ExportMissing(_)));
    }

    #[test]
    fn malformed_entity_row_names_file_and_line() {
        let source = seeded_store();
        let dir = tempfile::tempdir().expect("tempdir");
        export_workspace(&source, dir.path(), None, &ExportOptions::default()).expect("export");

        let users = dir.path().join("ws/users.jsonl");
        let mut text = fs::read_to_string(&users).expect("read");
        text.push_str("{broken\n");
        fs::write(&users, text).expect("write");

        let target = Store::in_memory().expect("target");
        let err = import_workspace(&target, dir.path(), &RecordId::new("ws"))
            .expect_err("should fail");
        match err {
            ExchangeError::MalformedRow { path, line, .. } => {
                assert_eq!(path, users);
                assert_eq!(line, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
