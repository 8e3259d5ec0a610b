use crate::{
    hook::{FieldMap, HookError},
    model::{RecordKind, optional_id, require_i64, require_id, require_str},
    types::RecordId,
};
use serde::{Deserialize, Serialize};

///
/// File
///
/// `message_id` is null natively; attaching files to messages is left to
/// hooks. The `url` carries its own freshly drawn id, distinct from the
/// record id.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct File {
    pub id: RecordId,
    pub workspace_id: RecordId,
    pub user_id: RecordId,
    pub name: String,
    pub size: i64,
    pub mimetype: String,
    pub created_ts: i64,
    pub channel_id: RecordId,
    pub message_id: Option<RecordId>,
    pub url: String,
}

impl File {
    pub(crate) fn from_field_map(fields: &FieldMap) -> Result<Self, HookError> {
        const KIND: RecordKind = RecordKind::File;

        Ok(Self {
            id: require_id(fields, KIND, "id")?,
            workspace_id: require_id(fields, KIND, "workspace_id")?,
            user_id: require_id(fields, KIND, "user_id")?,
            name: require_str(fields, KIND, "name")?,
            size: require_i64(fields, KIND, "size")?,
            mimetype: require_str(fields, KIND, "mimetype")?,
            created_ts: require_i64(fields, KIND, "created_ts")?,
            channel_id: require_id(fields, KIND, "channel_id")?,
            message_id: optional_id(fields, KIND, "message_id")?,
            url: require_str(fields, KIND, "url")?,
        })
    }
}
