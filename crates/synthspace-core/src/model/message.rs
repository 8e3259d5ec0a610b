use crate::{
    hook::{FieldMap, HookError},
    model::{RecordKind, optional_i64, require_i64, require_id, require_str, require_u32},
    types::RecordId,
};
use serde::{Deserialize, Serialize};

///
/// Message
///
/// `thread_ts` is always null natively; threading is a hook extension point.
/// `reactions_json` stays an opaque serialized map so hooks can reshape it
/// without the store caring.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: RecordId,
    pub workspace_id: RecordId,
    pub channel_id: RecordId,
    pub user_id: RecordId,
    pub ts: i64,
    pub text: String,
    pub thread_ts: Option<i64>,
    pub reply_count: u32,
    pub reactions_json: String,
}

impl Message {
    pub(crate) fn from_field_map(fields: &FieldMap) -> Result<Self, HookError> {
        const KIND: RecordKind = RecordKind::Message;

        Ok(Self {
            id: require_id(fields, KIND, "id")?,
            workspace_id: require_id(fields, KIND, "workspace_id")?,
            channel_id: require_id(fields, KIND, "channel_id")?,
            user_id: require_id(fields, KIND, "user_id")?,
            ts: require_i64(fields, KIND, "ts")?,
            text: require_str(fields, KIND, "text")?,
            thread_ts: optional_i64(fields, KIND, "thread_ts")?,
            reply_count: require_u32(fields, KIND, "reply_count")?,
            reactions_json: require_str(fields, KIND, "reactions_json")?,
        })
    }
}
