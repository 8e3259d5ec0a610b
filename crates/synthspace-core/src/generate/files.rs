use crate::{
    generate::{GenerateError, Generator, messages::ACTIVITY_WINDOW_SECS},
    hook::FieldMap,
    model::{File, RecordKind},
    rng::{SeedStream, StreamKind},
    types::RecordId,
};
use serde_json::json;

const EXTENSIONS: &[&str] = &["pdf", "png", "txt", "zip"];
const MIMETYPES: &[&str] = &[
    "application/pdf",
    "image/png",
    "text/plain",
    "application/zip",
];
const SIZE_MIN: i64 = 5_000;
const SIZE_MAX: i64 = 5_000_000;

impl<'h> Generator<'h> {
    /// Lazy file stream, same single-pass contract as messages.
    pub fn files<'g>(
        &'g mut self,
        workspace_id: &RecordId,
        channel_ids: &'g [RecordId],
        user_ids: &'g [RecordId],
    ) -> Result<FileStream<'g, 'h>, GenerateError> {
        if self.config.files > 0 {
            if channel_ids.is_empty() {
                return Err(GenerateError::ReferentialGap {
                    entity: RecordKind::File,
                    dependency: RecordKind::Channel,
                });
            }
            if user_ids.is_empty() {
                return Err(GenerateError::ReferentialGap {
                    entity: RecordKind::File,
                    dependency: RecordKind::User,
                });
            }
        }

        let ids = self.id_stream(StreamKind::Files, workspace_id);
        Ok(FileStream {
            workspace_id: workspace_id.clone(),
            remaining: self.config.files,
            ids,
            channel_ids,
            user_ids,
            generator: self,
        })
    }
}

///
/// FileStream
///

pub struct FileStream<'g, 'h> {
    generator: &'g mut Generator<'h>,
    workspace_id: RecordId,
    channel_ids: &'g [RecordId],
    user_ids: &'g [RecordId],
    ids: SeedStream,
    remaining: u32,
}

impl FileStream<'_, '_> {
    fn synthesize(&mut self) -> Result<File, GenerateError> {
        // The record id comes first, the url id last; both draw from the
        // files identity stream, in that order.
        let id = RecordId::draw(&mut self.ids);
        let base_ts = self.generator.base_ts;

        let user_id = self
            .generator
            .general
            .choose(self.user_ids)
            .cloned()
            .ok_or(GenerateError::ReferentialGap {
                entity: RecordKind::File,
                dependency: RecordKind::User,
            })?;
        let extension = self
            .generator
            .general
            .choose(EXTENSIONS)
            .copied()
            .unwrap_or("txt");
        let name = format!("{}.{extension}", self.generator.lexicon.word());
        let size = self.generator.general.int_in(SIZE_MIN, SIZE_MAX);
        let mimetype = self
            .generator
            .general
            .choose(MIMETYPES)
            .copied()
            .unwrap_or("text/plain");
        let created_ts = base_ts - self.generator.general.int_in(0, ACTIVITY_WINDOW_SECS);
        let channel_id = self
            .generator
            .general
            .choose(self.channel_ids)
            .cloned()
            .ok_or(GenerateError::ReferentialGap {
                entity: RecordKind::File,
                dependency: RecordKind::Channel,
            })?;
        let url_id = RecordId::draw(&mut self.ids);
        let url = format!("https://files.example.com/{url_id}");

        let mut fields = FieldMap::new();
        fields.insert("id".to_string(), json!(id.as_str()));
        fields.insert("workspace_id".to_string(), json!(self.workspace_id.as_str()));
        fields.insert("user_id".to_string(), json!(user_id.as_str()));
        fields.insert("name".to_string(), json!(name));
        fields.insert("size".to_string(), json!(size));
        fields.insert("mimetype".to_string(), json!(mimetype));
        fields.insert("created_ts".to_string(), json!(created_ts));
        fields.insert("channel_id".to_string(), json!(channel_id.as_str()));
        fields.insert("message_id".to_string(), serde_json::Value::Null);
        fields.insert("url".to_string(), json!(url));

        let fields = self.generator.hooks.apply(RecordKind::File, fields);
        Ok(File::from_field_map(&fields)?)
    }
}

impl Iterator for FileStream<'_, '_> {
    type Item = Result<File, GenerateError>;

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
