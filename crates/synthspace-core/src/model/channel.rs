use crate::{
    hook::{FieldMap, HookError},
    model::{RecordKind, require_bool, require_channel_kind, require_id, require_str},
    types::{ChannelKind, RecordId},
};
use serde::{Deserialize, Serialize};

///
/// Channel
///
/// `is_private` is persisted alongside `channel_type` even though the type
/// implies it; older databases carry only the flag.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub id: RecordId,
    pub workspace_id: RecordId,
    pub name: String,
    pub is_private: bool,
    pub channel_type: ChannelKind,
    pub topic: String,
}

impl Channel {
    pub(crate) fn from_field_map(fields: &FieldMap) -> Result<Self, HookError> {
        const KIND: RecordKind = RecordKind::Channel;

        Ok(Self {
            id: require_id(fields, KIND, "id")?,
            workspace_id: require_id(fields, KIND, "workspace_id")?,
            name: require_str(fields, KIND, "name")?,
            is_private: require_bool(fields, KIND, "is_private")?,
            channel_type: require_channel_kind(fields, KIND, "channel_type")?,
            topic: require_str(fields, KIND, "topic")?,
        })
    }
}
