//! Row-to-record mapping. Columns are looked up by name so the mappers stay
//! valid for legacy databases where migrated columns sit at the end.

use crate::model::{Channel, ChannelMember, File, Message, User, Workspace};
use rusqlite::Row;

pub(in crate::db) fn workspace_from_row(row: &Row<'_>) -> rusqlite::Result<Workspace> {
    Ok(Workspace {
        id: row.get("id")?,
        name: row.get("name")?,
        created_at: row.get("created_at")?,
    })
}

pub(in crate::db) fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get("id")?,
        workspace_id: row.get("workspace_id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        title: row.get("title")?,
        is_bot: row.get("is_bot")?,
    })
}

pub(in crate::db) fn channel_from_row(row: &Row<'_>) -> rusqlite::Result<Channel> {
    Ok(Channel {
        id: row.get("id")?,
        workspace_id: row.get("workspace_id")?,
        name: row.get("name")?,
        is_private: row.get("is_private")?,
        channel_type: row.get("channel_type")?,
        topic: row.get("topic")?,
    })
}

pub(in crate::db) fn member_from_row(row: &Row<'_>) -> rusqlite::Result<ChannelMember> {
    Ok(ChannelMember {
        channel_id: row.get("channel_id")?,
        workspace_id: row.get("workspace_id")?,
        user_id: row.get("user_id")?,
    })
}

pub(in crate::db) fn message_from_row(row: &Row<'_>) -> rusqlite::Result<Message> {
    Ok(Message {
        id: row.get("id")?,
        workspace_id: row.get("workspace_id")?,
        channel_id: row.get("channel_id")?,
        user_id: row.get("user_id")?,
        ts: row.get("ts")?,
        text: row.get("text")?,
        thread_ts: row.get("thread_ts")?,
        reply_count: row.get("reply_count")?,
        reactions_json: row.get("reactions_json")?,
    })
}

pub(in crate::db) fn file_from_row(row: &Row<'_>) -> rusqlite::Result<File> {
    Ok(File {
        id: row.get("id")?,
        workspace_id: row.get("workspace_id")?,
        user_id: row.get("user_id")?,
        name: row.get("name")?,
        size: row.get("size")?,
        mimetype: row.get("mimetype")?,
        created_ts: row.get("created_ts")?,
        channel_id: row.get("channel_id")?,
        message_id: row.get("message_id")?,
        url: row.get("url")?,
    })
}
