use crate::{
    generate::{GenerateError, Generator},
    hook::FieldMap,
    model::{RecordKind, Workspace},
    rng::{SeedStream, StreamKind},
    types::RecordId,
};
use serde_json::json;

impl Generator<'_> {
    /// Synthesize the run's single workspace record.
    ///
    /// The id is keyed by the shape namespace, so any change to the
    /// requested counts or the name yields a different workspace identity.
    pub fn workspace(&self) -> Result<Workspace, GenerateError> {
        let mut ids = SeedStream::derive(
            self.config.seed,
            StreamKind::Workspace,
            &self.config.shape_namespace(),
        );
        let id = RecordId::draw(&mut ids);

        let mut fields = FieldMap::new();
        fields.insert("id".to_string(), json!(id.as_str()));
        fields.insert("name".to_string(), json!(self.config.workspace_name));
        fields.insert("created_at".to_string(), json!(self.base_ts));

        let fields = self.hooks.apply(RecordKind::Workspace, fields);
        Ok(Workspace::from_field_map(&fields)?)
    }
}

///
/// TESTS
///
