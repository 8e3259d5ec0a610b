use crate::{
    GENERATOR_NAME, GENERATOR_VERSION, SCHEMA_VERSION,
    config::GenerationConfig,
    db::{Store, StoreError, WriteMode},
    error::Error,
    generate::{GenerateError, Generator},
    hook::HookRegistry,
    types::RecordId,
};
use serde_json::{Value, json};
use tracing::{debug, info};

///
/// GenerationReport
///
/// What one run actually wrote. The message and file counts equal the
/// configured counts whenever generation succeeds; they are reported from
/// the write path rather than echoed from the config.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GenerationReport {
    pub workspace_id: RecordId,
    pub users: u64,
    pub channels: u64,
    pub channel_members: u64,
    pub messages: u64,
    pub files: u64,
}

/// Drive one full synthesis run into the store.
///
/// Entities land in dependency order, with run metadata written right after
/// the workspace row so even a half-finished database is attributable.
/// Messages and files stream through a bounded buffer of `batch_size`
/// records; peak memory never depends on the configured totals.
pub fn run_generation(
    store: &Store,
    config: &GenerationConfig,
    hooks: &HookRegistry,
    profile: &str,
) -> Result<GenerationReport, Error> {
    let mut generator = Generator::new(config.clone(), hooks)?;

    let workspace = generator.workspace()?;
    store.insert_workspace(&workspace, WriteMode::Insert)?;
    store.set_workspace_meta(&workspace.id, &run_meta(config, profile))?;
    debug!(workspace = %workspace.id, seed = config.seed, "workspace written");

    let users = generator.users(&workspace.id)?;
    store.insert_users(&users, WriteMode::Insert)?;
    let user_ids: Vec<RecordId> = users.iter().map(|u| u.id.clone()).collect();

    let channels = generator.channels(&workspace.id)?;
    store.insert_channels(&channels, WriteMode::Insert)?;
    let channel_ids: Vec<RecordId> = channels.iter().map(|c| c.id.clone()).collect();

    let members = generator.channel_members(&workspace.id, &channels, &user_ids)?;
    store.insert_channel_members(&members)?;

    let batch = batch_len(config.batch_size);
    let messages = {
        let stream = generator.messages(&workspace.id, &channel_ids, &user_ids)?;
        insert_in_batches(stream, batch, |rows| {
            store.insert_messages(rows, WriteMode::Insert)
        })?
    };
    let files = {
        let stream = generator.files(&workspace.id, &channel_ids, &user_ids)?;
        insert_in_batches(stream, batch, |rows| {
            store.insert_files(rows, WriteMode::Insert)
        })?
    };

    let report = GenerationReport {
        workspace_id: workspace.id,
        users: count(users.len()),
        channels: count(channels.len()),
        channel_members: count(members.len()),
        messages,
        files,
    };
    info!(
        workspace = %report.workspace_id,
        users = report.users,
        channels = report.channels,
        channel_members = report.channel_members,
        messages = report.messages,
        files = report.files,
        "generation complete"
    );

    Ok(report)
}

fn insert_in_batches<T>(
    stream: impl Iterator<Item = Result<T, GenerateError>>,
    batch_size: usize,
    mut flush: impl FnMut(&[T]) -> Result<(), StoreError>,
) -> Result<u64, Error> {
    let mut buffer = Vec::with_capacity(batch_size);
    let mut written = 0u64;

    for item in stream {
        buffer.push(item?);
        if buffer.len() >= batch_size {
            flush(&buffer)?;
            written += count(buffer.len());
            buffer.clear();
        }
    }
    if !buffer.is_empty() {
        flush(&buffer)?;
        written += count(buffer.len());
    }

    Ok(written)
}

/// The metadata block attached to every generated workspace. `requested`
/// records the resolved knobs verbatim so consumers can tell a truncated
/// run from a small one.
fn run_meta(config: &GenerationConfig, profile: &str) -> serde_json::Map<String, Value> {
    let mut meta = serde_json::Map::new();
    meta.insert("generator".to_string(), json!(GENERATOR_NAME));
    meta.insert("generator_version".to_string(), json!(GENERATOR_VERSION));
    meta.insert("schema_version".to_string(), json!(SCHEMA_VERSION));
    meta.insert("seed".to_string(), json!(config.seed));
    meta.insert(
        "requested".to_string(),
        json!({
            "workspace_name": config.workspace_name,
            "users": config.users,
            "channels": config.channels,
            "dm_channels": config.dm_channels,
            "mpdm_channels": config.mpdm_channels,
            "messages": config.messages,
            "files": config.files,
            "batch_size": config.batch_size,
            "profile": profile,
        }),
    );

    meta
}

fn count(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}

// usize is at least 32 bits on every supported target
#[allow(clippy::cast_possible_truncation)]
const fn batch_len(batch_size: u32) -> usize {
    batch_size as usize
}

///
/// TESTS
///
