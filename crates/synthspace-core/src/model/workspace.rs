use crate::{
    hook::{FieldMap, HookError},
    model::{RecordKind, require_i64, require_id, require_str},
    types::RecordId,
};
use serde::{Deserialize, Serialize};

///
/// Workspace
///
/// The root record of a run. `created_at` is the run's base timestamp; all
/// message and file activity falls in the 30 day window ending there.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: RecordId,
    pub name: String,
    pub created_at: i64,
}

impl Workspace {
    pub(crate) fn from_field_map(fields: &FieldMap) -> Result<Self, HookError> {
        const KIND: RecordKind = RecordKind::Workspace;

        Ok(Self {
            id: require_id(fields, KIND, "id")?,
            name: require_str(fields, KIND, "name")?,
            created_at: require_i64(fields, KIND, "created_at")?,
        })
    }
}
