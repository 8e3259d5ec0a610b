use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags, OptionalExtension};
use serde::Serialize;
use serde_json::Value;

use crate::{GENERATOR_NAME, SCHEMA_VERSION, db::schema};

///
/// ValidationReport
///
/// Compatibility report for an arbitrary SQLite file. Every problem lands in
/// `errors` or `warnings` instead of aborting, so one run surfaces the full
/// picture; `ok` is simply "no errors".
///

#[derive(Clone, Debug, Serialize)]
pub struct ValidationReport {
    pub db: PathBuf,
    pub ok: bool,
    pub workspace_id: Option<String>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub meta: serde_json::Map<String, Value>,
    pub tool_version: Option<String>,
    pub required_schema_version: u32,
}

impl ValidationReport {
    fn new(db: &Path, workspace_id: Option<&str>, tool_version: Option<&str>) -> Self {
        Self {
            db: db.to_path_buf(),
            ok: false,
            workspace_id: workspace_id.map(str::to_string),
            errors: Vec::new(),
            warnings: Vec::new(),
            meta: serde_json::Map::new(),
            tool_version: tool_version.map(str::to_string),
            required_schema_version: SCHEMA_VERSION,
        }
    }
}

/// Checks whether a SQLite database is compatible with this tool.
///
/// Strictly read-only: the file is opened with `SQLITE_OPEN_READ_ONLY` and is
/// never created or mutated. An explicit `workspace_id` must exist; otherwise
/// the newest workspace is inspected (`require_workspace` turns "none found"
/// into an error). Pass `tool_version` to get a warning when the database was
/// written by a newer release.
#[must_use]
pub fn validate_db(
    path: &Path,
    workspace_id: Option<&str>,
    require_workspace: bool,
    tool_version: Option<&str>,
) -> ValidationReport {
    let mut report = ValidationReport::new(path, workspace_id, tool_version);

    if !path.exists() {
        report
            .errors
            .push(format!("DB file not found: {}", path.display()));
        return report;
    }

    let conn = match Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    ) {
        Ok(conn) => conn,
        Err(err) => {
            report
                .errors
                .push(format!("Unable to open DB read-only: {err}"));
            return report;
        }
    };

    let tables = match table_names(&conn) {
        Ok(tables) => tables,
        Err(err) => {
            report
                .errors
                .push(format!("Not a usable SQLite database: {err}"));
            return report;
        }
    };
    if tables.is_empty() {
        report
            .errors
            .push("DB has no tables (did you point at the right SQLite file?).".to_string());
        return report;
    }

    for (table, required) in schema::REQUIRED_TABLES {
        if !tables.contains(*table) {
            report.errors.push(format!("Missing table: {table}"));
            continue;
        }
        match table_columns(&conn, table) {
            Ok(columns) => {
                let mut missing: Vec<&str> = required
                    .iter()
                    .copied()
                    .filter(|column| !columns.contains(*column))
                    .collect();
                if !missing.is_empty() {
                    missing.sort_unstable();
                    report.errors.push(format!(
                        "Table {table} missing columns: {}",
                        missing.join(", ")
                    ));
                }
            }
            Err(err) => {
                report
                    .errors
                    .push(format!("Unable to inspect table {table}: {err}"));
            }
        }
    }

    if tables.contains("workspaces") && tables.contains("workspace_meta") {
        if let Err(err) = inspect_workspace(&conn, workspace_id, require_workspace, &mut report) {
            report
                .errors
                .push(format!("Unable to inspect workspace metadata: {err}"));
        }
    }

    report.ok = report.errors.is_empty();
    report
}

fn inspect_workspace(
    conn: &Connection,
    workspace_id: Option<&str>,
    require_workspace: bool,
    report: &mut ValidationReport,
) -> rusqlite::Result<()> {
    let resolved = match workspace_id {
        Some(id) => Some(id.to_string()),
        None => conn
            .query_row(
                "SELECT id FROM workspaces ORDER BY created_at DESC, id DESC LIMIT 1",
                [],
                |row| row.get::<_, String>(0),
            )
            .optional()?,
    };
    report.workspace_id = resolved.clone();

    if let Some(id) = workspace_id {
        let exists = conn
            .query_row(
                "SELECT 1 FROM workspaces WHERE id = ?1 LIMIT 1",
                [id],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        if !exists {
            report.errors.push(format!("Workspace not found: {id}"));
        }
    }
    if require_workspace && resolved.is_none() {
        report.errors.push("No workspaces found in DB.".to_string());
    }

    let Some(resolved) = resolved else {
        return Ok(());
    };

    let mut stmt =
        conn.prepare("SELECT key, value FROM workspace_meta WHERE workspace_id = ?1 ORDER BY key")?;
    let rows = stmt.query_map([&resolved], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
    })?;
    for row in rows {
        let (key, raw) = row?;
        let value = serde_json::from_str(&raw).unwrap_or(Value::String(raw));
        report.meta.insert(key, value);
    }

    check_meta(report);
    Ok(())
}

// Metadata checks never reject outright except for a schema too new to read.
fn check_meta(report: &mut ValidationReport) {
    if let Some(generator) = report.meta.get("generator")
        && *generator != GENERATOR_NAME
    {
        report
            .warnings
            .push(format!("Unexpected generator meta: {generator}"));
    }

    match report
        .meta
        .get("generator_version")
        .and_then(Value::as_str)
        .filter(|version| !version.is_empty())
    {
        None => {
            report
                .warnings
                .push("Missing workspace_meta generator_version.".to_string());
        }
        Some(version) => {
            if let Some(db_version) = parse_semver(version)
                && let Some(tool_version) = report.tool_version.as_deref().and_then(parse_semver)
                && db_version > tool_version
            {
                report.warnings.push(
                    "DB generator_version appears newer than this tool; \
                     consider upgrading synthspace."
                        .to_string(),
                );
            }
        }
    }

    match report.meta.get("schema_version") {
        None => {
            report
                .warnings
                .push("Missing workspace_meta schema_version (older DB export?).".to_string());
        }
        Some(value) => match value.as_i64() {
            Some(version) => {
                if version > i64::from(SCHEMA_VERSION) {
                    report.errors.push(format!(
                        "DB schema_version {version} is newer than supported {SCHEMA_VERSION}."
                    ));
                }
            }
            None => {
                report.warnings.push(format!(
                    "Unrecognized schema_version type: {}",
                    value_type(value)
                ));
            }
        },
    }
}

fn table_names(conn: &Connection) -> rusqlite::Result<BTreeSet<String>> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
    )?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
    rows.collect()
}

fn table_columns(conn: &Connection, table: &str) -> rusqlite::Result<BTreeSet<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(1))?;
    rows.collect()
}

/// Parses the leading `major.minor.patch` of a version string; suffixes like
/// `-beta.1` are ignored. Returns `None` when no such prefix exists.
fn parse_semver(version: &str) -> Option<(u64, u64, u64)> {
    let mut parts = version.trim().splitn(3, '.');
    let major = parse_component(parts.next()?)?;
    let minor = parse_component(parts.next()?)?;
    let rest = parts.next()?;
    let digits = rest
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(rest.len());
    let patch = parse_component(&rest[..digits])?;

    Some((major, minor, patch))
}

fn parse_component(part: &str) -> Option<u64> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

fn value_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "float",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

///
/// TESTS
///
