use crate::{
    hook::{FieldMap, HookError},
    model::{RecordKind, require_bool, require_id, require_str},
    types::RecordId,
};
use serde::{Deserialize, Serialize};

///
/// User
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: RecordId,
    pub workspace_id: RecordId,
    pub name: String,
    pub email: String,
    pub title: String,
    pub is_bot: bool,
}

impl User {
    pub(crate) fn from_field_map(fields: &FieldMap) -> Result<Self, HookError> {
        const KIND: RecordKind = RecordKind::User;

        Ok(Self {
            id: require_id(fields, KIND, "id")?,
            workspace_id: require_id(fields, KIND, "workspace_id")?,
            name: require_str(fields, KIND, "name")?,
            email: require_str(fields, KIND, "email")?,
            title: require_str(fields, KIND, "title")?,
            is_bot: require_bool(fields, KIND, "is_bot")?,
        })
    }
}
