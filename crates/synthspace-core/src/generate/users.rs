use crate::{
    generate::{GenerateError, Generator},
    hook::FieldMap,
    lexicon::slug,
    model::{RecordKind, User},
    rng::StreamKind,
    types::RecordId,
};
use serde_json::json;

/// Probability that a user is a bot account.
const BOT_RATE: f64 = 0.02;

impl Generator<'_> {
    /// Synthesize the user roster for `workspace_id`.
    pub fn users(&mut self, workspace_id: &RecordId) -> Result<Vec<User>, GenerateError> {
        let mut ids = self.id_stream(StreamKind::Users, workspace_id);
        let mut users = Vec::with_capacity(usize::try_from(self.config.users).unwrap_or(usize::MAX));

        for index in 0..self.config.users {
            let id = RecordId::draw(&mut ids);
            let name = self.lexicon.full_name();
            let title = self.lexicon.job_title();
            let email = format!("{}.{index}@example.com", slug(&name));
            let is_bot = self.general.chance(BOT_RATE);

            let mut fields = FieldMap::new();
            fields.insert("id".to_string(), json!(id.as_str()));
            fields.insert("workspace_id".to_string(), json!(workspace_id.as_str()));
            fields.insert("name".to_string(), json!(name));
            fields.insert("email".to_string(), json!(email));
            fields.insert("title".to_string(), json!(title));
            fields.insert("is_bot".to_string(), json!(is_bot));

            let fields = self.hooks.apply(RecordKind::User, fields);
            users.push(User::from_field_map(&fields)?);
        }

        Ok(users)
    }
}

///
/// TESTS
///
