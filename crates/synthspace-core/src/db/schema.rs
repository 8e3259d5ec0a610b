use rusqlite::Connection;

/// Tables and indexes, idempotent. Column order here is the canonical record
/// field order everywhere else (models, JSONL, API rows).
const CREATE_SQL: &str = "
CREATE TABLE IF NOT EXISTS workspaces (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    created_at INTEGER NOT NULL
);
CREATE TABLE IF NOT EXISTS workspace_meta (
    workspace_id TEXT NOT NULL,
    key TEXT NOT NULL,
    value TEXT NOT NULL,
    PRIMARY KEY (workspace_id, key)
);
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    workspace_id TEXT NOT NULL,
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    title TEXT NOT NULL,
    is_bot INTEGER NOT NULL
);
CREATE TABLE IF NOT EXISTS channels (
    id TEXT PRIMARY KEY,
    workspace_id TEXT NOT NULL,
    name TEXT NOT NULL,
    is_private INTEGER NOT NULL,
    channel_type TEXT NOT NULL DEFAULT 'public',
    topic TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS channel_members (
    channel_id TEXT NOT NULL,
    workspace_id TEXT NOT NULL,
    user_id TEXT NOT NULL,
    PRIMARY KEY (channel_id, user_id)
);
CREATE TABLE IF NOT EXISTS messages (
    id TEXT PRIMARY KEY,
    workspace_id TEXT NOT NULL,
    channel_id TEXT NOT NULL,
    user_id TEXT NOT NULL,
    ts INTEGER NOT NULL,
    text TEXT NOT NULL,
    thread_ts INTEGER,
    reply_count INTEGER NOT NULL,
    reactions_json TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS files (
    id TEXT PRIMARY KEY,
    workspace_id TEXT NOT NULL,
    user_id TEXT NOT NULL,
    name TEXT NOT NULL,
    size INTEGER NOT NULL,
    mimetype TEXT NOT NULL,
    created_ts INTEGER NOT NULL,
    channel_id TEXT NOT NULL,
    message_id TEXT,
    url TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_users_workspace ON users(workspace_id);
CREATE INDEX IF NOT EXISTS idx_users_workspace_id ON users(workspace_id, id);
CREATE INDEX IF NOT EXISTS idx_channels_workspace ON channels(workspace_id);
CREATE INDEX IF NOT EXISTS idx_channels_workspace_id ON channels(workspace_id, id);
CREATE INDEX IF NOT EXISTS idx_channel_members_workspace ON channel_members(workspace_id);
CREATE INDEX IF NOT EXISTS idx_channel_members_channel ON channel_members(channel_id);
CREATE INDEX IF NOT EXISTS idx_messages_workspace ON messages(workspace_id);
CREATE INDEX IF NOT EXISTS idx_messages_channel ON messages(channel_id);
CREATE INDEX IF NOT EXISTS idx_messages_workspace_ts_id ON messages(workspace_id, ts DESC, id DESC);
CREATE INDEX IF NOT EXISTS idx_files_workspace ON files(workspace_id);
CREATE INDEX IF NOT EXISTS idx_files_workspace_ts_id ON files(workspace_id, created_ts DESC, id DESC);
CREATE INDEX IF NOT EXISTS idx_workspace_meta_workspace ON workspace_meta(workspace_id);
";

/// Table names and the columns validation requires of each.
pub(crate) const REQUIRED_TABLES: &[(&str, &[&str])] = &[
    ("workspaces", &["id", "name", "created_at"]),
    ("workspace_meta", &["workspace_id", "key", "value"]),
    (
        "users",
        &["id", "workspace_id", "name", "email", "title", "is_bot"],
    ),
    (
        "channels",
        &[
            "id",
            "workspace_id",
            "name",
            "is_private",
            "channel_type",
            "topic",
        ],
    ),
    ("channel_members", &["channel_id", "workspace_id", "user_id"]),
    (
        "messages",
        &[
            "id",
            "workspace_id",
            "channel_id",
            "user_id",
            "ts",
            "text",
            "thread_ts",
            "reply_count",
            "reactions_json",
        ],
    ),
    (
        "files",
        &[
            "id",
            "workspace_id",
            "user_id",
            "name",
            "size",
            "mimetype",
            "created_ts",
            "channel_id",
            "message_id",
            "url",
        ],
    ),
];

pub(in crate::db) fn init(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(CREATE_SQL)?;
    // Databases written before channel kinds existed carry only the
    // is_private flag.
    ensure_column(
        conn,
        "channels",
        "channel_type",
        "TEXT NOT NULL DEFAULT 'public'",
    )?;
    Ok(())
}

fn ensure_column(
    conn: &Connection,
    table: &str,
    column: &str,
    definition: &str,
) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let names = stmt.query_map([], |row| row.get::<_, String>(1))?;
    for name in names {
        if name? == column {
            return Ok(());
        }
    }
    conn.execute_batch(&format!(
        "ALTER TABLE {table} ADD COLUMN {column} {definition}"
    ))?;
    Ok(())
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    fn table_columns(conn: &Connection, table: &str) -> Vec<String> {
        let mut stmt = conn
            .prepare(&format!("PRAGMA table_info({table})"))
            .expect("pragma");
        let names = stmt
            .query_map([], |row| row.get::<_, String>(1))
            .expect("rows");
        names.map(|n| n.expect("name")).collect()
    }

    #[test]
    fn init_creates_every_required_table_and_column() {
        let conn = Connection::open_in_memory().expect("memory db");
        init(&conn).expect("schema init");

        for (table, columns) in REQUIRED_TABLES {
            let present = table_columns(&conn, table);
            for column in *columns {
                assert!(
                    present.iter().any(|p| p == column),
                    "{table} is missing {column}"
                );
            }
        }
    }

    #[test]
    fn init_is_idempotent() {
        let conn = Connection::open_in_memory().expect("memory db");
        init(&conn).expect("first init");
        init(&conn).expect("second init");
    }

    #[test]
    fn ensure_column_upgrades_a_legacy_channels_table() {
        let conn = Connection::open_in_memory().expect("memory db");
        conn.execute_batch(
            "CREATE TABLE channels (
                id TEXT PRIMARY KEY,
                workspace_id TEXT NOT NULL,
                name TEXT NOT NULL,
                is_private INTEGER NOT NULL,
                topic TEXT NOT NULL
            );",
        )
        .expect("legacy table");

        init(&conn).expect("migrating init");
        assert!(table_columns(&conn, "channels").contains(&"channel_type".to_string()));

        conn.execute(
            "INSERT INTO channels (id, workspace_id, name, is_private, topic)
             VALUES ('c1', 'w1', 'general', 0, 't')",
            [],
        )
        .expect("insert");
        let kind: String = conn
            .query_row("SELECT channel_type FROM channels WHERE id = 'c1'", [], |r| {
                r.get(0)
            })
            .expect("select");
        assert_eq!(kind, "public");
    }
}
