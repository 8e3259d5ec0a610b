use crate::{
    hook::{FieldMap, HookError},
    model::{RecordKind, require_id},
    types::RecordId,
};
use serde::{Deserialize, Serialize};

///
/// ChannelMember
///
/// Keyed by `(channel_id, user_id)`; duplicate pairs are ignored on write.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ChannelMember {
    pub channel_id: RecordId,
    pub workspace_id: RecordId,
    pub user_id: RecordId,
}

impl ChannelMember {
    pub(crate) fn from_field_map(fields: &FieldMap) -> Result<Self, HookError> {
        const KIND: RecordKind = RecordKind::ChannelMember;

        Ok(Self {
            channel_id: require_id(fields, KIND, "channel_id")?,
            workspace_id: require_id(fields, KIND, "workspace_id")?,
            user_id: require_id(fields, KIND, "user_id")?,
        })
    }
}
