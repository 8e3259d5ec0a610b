//! Cursor walks over a generated workspace. Every collection must hand out
//! each row exactly once and agree with the offset-mode listing about order
//! and content.

use synthspace_core::{
    config::GenerationConfig,
    cursor::Page,
    db::{ActivityFilter, Store},
    generate::run_generation,
    hook::HookRegistry,
    types::RecordId,
};

fn seeded() -> (Store, RecordId) {
    let store = Store::in_memory().expect("in-memory store");
    let config = GenerationConfig {
        workspace_name: "Walks".to_string(),
        users: 23,
        channels: 5,
        dm_channels: 4,
        mpdm_channels: 3,
        messages: 57,
        files: 19,
        seed: 7,
        batch_size: 25,
        channel_members_min: 2,
        channel_members_max: 4,
        ..GenerationConfig::default()
    };
    let report =
        run_generation(&store, &config, &HookRegistry::new(), "test").expect("generation run");

    (store, report.workspace_id)
}

fn walk<T>(mut fetch: impl FnMut(Option<&str>) -> Page<T>) -> Vec<T> {
    let mut rows = Vec::new();
    let mut cursor: Option<String> = None;
    loop {
        let page = fetch(cursor.as_deref());
        rows.extend(page.rows);
        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    rows
}

fn assert_unique<I: Ord>(ids: Vec<I>) {
    let total = ids.len();
    let mut sorted = ids;
    sorted.sort();
    sorted.dedup();
    assert_eq!(sorted.len(), total, "walk repeated a row");
}

#[test]
fn user_walk_matches_the_offset_listing() {
    let (store, ws) = seeded();

    let walked = walk(|cursor| store.list_users_page(&ws, 5, cursor).expect("user page"));
    let listed = store.list_users(&ws, 1_000, 0).expect("user listing");

    assert_eq!(walked.len(), 23);
    assert_eq!(walked, listed);
    assert_unique(walked.into_iter().map(|u| u.id).collect());
}

#[test]
fn channel_walk_matches_the_offset_listing() {
    let (store, ws) = seeded();

    let walked = walk(|cursor| {
        store
            .list_channels_page(&ws, None, 4, cursor)
            .expect("channel page")
    });
    let listed = store.list_channels(&ws, None, 1_000, 0).expect("listing");

    // 5 regular + 4 im + 3 mpim
    assert_eq!(walked.len(), 12);
    assert_eq!(walked, listed);
    assert_unique(walked.into_iter().map(|c| c.id).collect());
}

#[test]
fn member_walk_matches_the_offset_listing() {
    let (store, ws) = seeded();

    let walked = walk(|cursor| {
        store
            .list_channel_members_page(&ws, None, 7, cursor)
            .expect("member page")
    });
    let listed = store
        .list_channel_members(&ws, None, 10_000, 0)
        .expect("listing");

    assert!(!walked.is_empty());
    assert_eq!(walked, listed);
    assert_unique(
        walked
            .into_iter()
            .map(|m| (m.channel_id, m.user_id))
            .collect(),
    );
}

#[test]
fn message_walk_matches_the_offset_listing() {
    let (store, ws) = seeded();
    let all = ActivityFilter::default();

    let walked = walk(|cursor| {
        store
            .list_messages_page(&ws, &all, 10, cursor)
            .expect("message page")
    });
    let listed = store.list_messages(&ws, &all, 10_000, 0).expect("listing");

    assert_eq!(walked.len(), 57);
    assert_eq!(walked, listed);
    for pair in walked.windows(2) {
        assert!((pair[1].ts, pair[1].id.as_str()) < (pair[0].ts, pair[0].id.as_str()));
    }
    assert_unique(walked.into_iter().map(|m| m.id).collect());
}

#[test]
fn file_walk_matches_the_offset_listing() {
    let (store, ws) = seeded();
    let all = ActivityFilter::default();

    let walked = walk(|cursor| {
        store
            .list_files_page(&ws, &all, 6, cursor)
            .expect("file page")
    });
    let listed = store.list_files(&ws, &all, 10_000, 0).expect("listing");

    assert_eq!(walked.len(), 19);
    assert_eq!(walked, listed);
    assert_unique(walked.into_iter().map(|f| f.id).collect());
}

#[test]
fn scoped_message_walk_stays_inside_the_channel() {
    let (store, ws) = seeded();

    let channels = store.list_channels(&ws, None, 1_000, 0).expect("channels");
    let target = channels.first().expect("at least one channel").id.clone();
    let filter = ActivityFilter {
        channel_id: Some(target.clone()),
        ..ActivityFilter::default()
    };

    let walked = walk(|cursor| {
        store
            .list_messages_page(&ws, &filter, 3, cursor)
            .expect("scoped page")
    });
    let listed = store
        .list_messages(&ws, &filter, 10_000, 0)
        .expect("scoped listing");

    assert_eq!(walked, listed);
    for message in &walked {
        assert_eq!(message.channel_id, target);
    }
}
