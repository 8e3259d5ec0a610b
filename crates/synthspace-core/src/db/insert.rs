use crate::{
    db::{Store, StoreError},
    model::{Channel, ChannelMember, File, Message, User, Workspace},
};
use rusqlite::params;
use tracing::trace;

///
/// WriteMode
///
/// Plain inserts fail on a duplicate primary key; ignore mode skips rows
/// that already exist, which is what makes re-imports idempotent.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WriteMode {
    Insert,
    InsertOrIgnore,
}

impl WriteMode {
    const fn verb(self) -> &'static str {
        match self {
            Self::Insert => "INSERT",
            Self::InsertOrIgnore => "INSERT OR IGNORE",
        }
    }
}

impl Store {
    pub fn insert_workspace(
        &self,
        workspace: &Workspace,
        mode: WriteMode,
    ) -> Result<(), StoreError> {
        let conn = self.conn();
        conn.execute(
            &format!(
                "{} INTO workspaces (id, name, created_at) VALUES (?1, ?2, ?3)",
                mode.verb()
            ),
            params![workspace.id, workspace.name, workspace.created_at],
        )?;

        Ok(())
    }

    /// Insert a batch of users in one transaction.
    pub fn insert_users(&self, users: &[User], mode: WriteMode) -> Result<(), StoreError> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(&format!(
                "{} INTO users (id, workspace_id, name, email, title, is_bot)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                mode.verb()
            ))?;
            for user in users {
                stmt.execute(params![
                    user.id,
                    user.workspace_id,
                    user.name,
                    user.email,
                    user.title,
                    user.is_bot,
                ])?;
            }
        }
        tx.commit()?;
        trace!(rows = users.len(), "inserted users");

        Ok(())
    }

    pub fn insert_channels(&self, channels: &[Channel], mode: WriteMode) -> Result<(), StoreError> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(&format!(
                "{} INTO channels (id, workspace_id, name, is_private, channel_type, topic)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                mode.verb()
            ))?;
            for channel in channels {
                stmt.execute(params![
                    channel.id,
                    channel.workspace_id,
                    channel.name,
                    channel.is_private,
                    channel.channel_type,
                    channel.topic,
                ])?;
            }
        }
        tx.commit()?;
        trace!(rows = channels.len(), "inserted channels");

        Ok(())
    }

    /// Memberships are always inserted with duplicates ignored; direct
    /// message channels can legitimately re-propose an existing pair.
    pub fn insert_channel_members(&self, members: &[ChannelMember]) -> Result<(), StoreError> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO channel_members (channel_id, workspace_id, user_id)
                 VALUES (?1, ?2, ?3)",
            )?;
            for member in members {
                stmt.execute(params![member.channel_id, member.workspace_id, member.user_id])?;
            }
        }
        tx.commit()?;
        trace!(rows = members.len(), "inserted channel members");

        Ok(())
    }

    pub fn insert_messages(&self, messages: &[Message], mode: WriteMode) -> Result<(), StoreError> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(&format!(
                "{} INTO messages
                 (id, workspace_id, channel_id, user_id, ts, text, thread_ts, reply_count, reactions_json)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                mode.verb()
            ))?;
            for message in messages {
                stmt.execute(params![
                    message.id,
                    message.workspace_id,
                    message.channel_id,
                    message.user_id,
                    message.ts,
                    message.text,
                    message.thread_ts,
                    message.reply_count,
                    message.reactions_json,
                ])?;
            }
        }
        tx.commit()?;
        trace!(rows = messages.len(), "inserted messages");

        Ok(())
    }

    pub fn insert_files(&self, files: &[File], mode: WriteMode) -> Result<(), StoreError> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(&format!(
                "{} INTO files
                 (id, workspace_id, user_id, name, size, mimetype, created_ts, channel_id, message_id, url)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                mode.verb()
            ))?;
            for file in files {
                stmt.execute(params![
                    file.id,
                    file.workspace_id,
                    file.user_id,
                    file.name,
                    file.size,
                    file.mimetype,
                    file.created_ts,
                    file.channel_id,
                    file.message_id,
                    file.url,
                ])?;
            }
        }
        tx.commit()?;
        trace!(rows = files.len(), "inserted files");

        Ok(())
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{db::testing, types::RecordId};

    #[test]
    fn plain_insert_rejects_duplicate_ids() {
        let store = Store::in_memory().expect("store");
        let workspace = testing::workspace("w1");
        store
            .insert_workspace(&workspace, WriteMode::Insert)
            .expect("first insert");
        assert!(
            store
                .insert_workspace(&workspace, WriteMode::Insert)
                .is_err()
        );
    }

    #[test]
    fn ignore_mode_skips_existing_rows() {
        let store = Store::in_memory().expect("store");
        let users = vec![testing::user("u1", "w1"), testing::user("u2", "w1")];
        store
            .insert_users(&users, WriteMode::Insert)
            .expect("initial insert");
        store
            .insert_users(&users, WriteMode::InsertOrIgnore)
            .expect("re-insert is a no-op");

        let counts = store
            .stats(&RecordId::new("w1"))
            .expect("stats after re-insert");
        assert_eq!(counts.users, 2);
    }

    #[test]
    fn duplicate_memberships_collapse_to_one_row() {
        let store = Store::in_memory().expect("store");
        let member = testing::member("c1", "u1", "w1");
        store
            .insert_channel_members(&[member.clone(), member])
            .expect("insert with duplicate pair");

        let counts = store.stats(&RecordId::new("w1")).expect("stats");
        assert_eq!(counts.channel_members, 1);
    }
}
