use crate::{
    generate::{GenerateError, Generator},
    hook::FieldMap,
    model::{Message, RecordKind},
    rng::{SeedStream, StreamKind},
    types::RecordId,
};
use serde_json::json;

/// Activity falls in the 30 days leading up to the base timestamp.
pub(in crate::generate) const ACTIVITY_WINDOW_SECS: i64 = 2_592_000;

const TEXT_WORDS_MIN: u32 = 4;
const TEXT_WORDS_MAX: u32 = 20;
const REPLIES_MAX: u32 = 6;
const REACTIONS_MAX: u32 = 5;

impl<'h> Generator<'h> {
    /// Lazy message stream. Single-pass and non-restartable; peak memory is
    /// one record regardless of the configured count.
    pub fn messages<'g>(
        &'g mut self,
        workspace_id: &RecordId,
        channel_ids: &'g [RecordId],
        user_ids: &'g [RecordId],
    ) -> Result<MessageStream<'g, 'h>, GenerateError> {
        if self.config.messages > 0 {
            if channel_ids.is_empty() {
                return Err(GenerateError::ReferentialGap {
                    entity: RecordKind::Message,
                    dependency: RecordKind::Channel,
                });
            }
            if user_ids.is_empty() {
                return Err(GenerateError::ReferentialGap {
                    entity: RecordKind::Message,
                    dependency: RecordKind::User,
                });
            }
        }

        let ids = self.id_stream(StreamKind::Messages, workspace_id);
        Ok(MessageStream {
            workspace_id: workspace_id.clone(),
            remaining: self.config.messages,
            ids,
            channel_ids,
            user_ids,
            generator: self,
        })
    }
}

///
/// MessageStream
///

pub struct MessageStream<'g, 'h> {
    generator: &'g mut Generator<'h>,
    workspace_id: RecordId,
    channel_ids: &'g [RecordId],
    user_ids: &'g [RecordId],
    ids: SeedStream,
    remaining: u32,
}

impl MessageStream<'_, '_> {
    fn synthesize(&mut self) -> Result<Message, GenerateError> {
        let id = RecordId::draw(&mut self.ids);
        let base_ts = self.generator.base_ts;

        let channel_id = self
            .generator
            .general
            .choose(self.channel_ids)
            .cloned()
            .ok_or(GenerateError::ReferentialGap {
                entity: RecordKind::Message,
                dependency: RecordKind::Channel,
            })?;
        let user_id = self
            .generator
            .general
            .choose(self.user_ids)
            .cloned()
            .ok_or(GenerateError::ReferentialGap {
                entity: RecordKind::Message,
                dependency: RecordKind::User,
            })?;
        let ts = base_ts - self.generator.general.int_in(0, ACTIVITY_WINDOW_SECS);

        let words = self.generator.general.count_in(TEXT_WORDS_MIN, TEXT_WORDS_MAX);
        let text = self
            .generator
            .lexicon
            .sentence(usize::try_from(words).unwrap_or(usize::MAX));
        let reply_count = self.generator.general.count_in(0, REPLIES_MAX);
        let thumbs = self.generator.general.count_in(0, REACTIONS_MAX);
        let reactions_json = json!({ "thumbsup": thumbs }).to_string();

        let mut fields = FieldMap::new();
        fields.insert("id".to_string(), json!(id.as_str()));
        fields.insert("workspace_id".to_string(), json!(self.workspace_id.as_str()));
        fields.insert("channel_id".to_string(), json!(channel_id.as_str()));
        fields.insert("user_id".to_string(), json!(user_id.as_str()));
        fields.insert("ts".to_string(), json!(ts));
        fields.insert("text".to_string(), json!(text));
        fields.insert("thread_ts".to_string(), serde_json::Value::Null);
        fields.insert("reply_count".to_string(), json!(reply_count));
        fields.insert("reactions_json".to_string(), json!(reactions_json));

        let fields = self.generator.hooks.apply(RecordKind::Message, fields);
        Ok(Message::from_field_map(&fields)?)
    }
}

impl Iterator for MessageStream<'_, '_> {
    type Item = Result<Message, GenerateError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.synthesize())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.remaining).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

///
/// TESTS
///
