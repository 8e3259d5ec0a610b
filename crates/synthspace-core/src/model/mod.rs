//! Typed records and the field-map plumbing that feeds them. Synthesis
//! builds a loose [`FieldMap`](crate::hook::FieldMap) per record, runs the
//! hook chain, then converts here; a chain that drops or mistypes a required
//! field surfaces as a [`HookError`](crate::hook::HookError).

mod channel;
mod file;
mod member;
mod message;
mod user;
mod workspace;

pub use channel::Channel;
pub use file::File;
pub use member::ChannelMember;
pub use message::Message;
pub use user::User;
pub use workspace::Workspace;

use crate::{
    hook::{FieldMap, HookError},
    types::{ChannelKind, RecordId},
};
use serde_json::Value;
use std::fmt;

///
/// RecordKind
///
/// The six record families the synthesizer knows. Used to scope hook chains
/// and to name the offender in contract errors.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum RecordKind {
    Workspace,
    User,
    Channel,
    ChannelMember,
    Message,
    File,
}

impl RecordKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Workspace => "workspace",
            Self::User => "user",
            Self::Channel => "channel",
            Self::ChannelMember => "channel_member",
            Self::Message => "message",
            Self::File => "file",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// Field extraction
//
// Readers for the post-hook field map. Absence and type mismatches are the
// only failure modes; extra fields are ignored.
//

pub(crate) fn require_str(
    fields: &FieldMap,
    kind: RecordKind,
    field: &'static str,
) -> Result<String, HookError> {
    match fields.get(field) {
        None => Err(HookError::MissingField { kind, field }),
        Some(value) => value
            .as_str()
            .map(ToString::to_string)
            .ok_or(HookError::MistypedField { kind, field }),
    }
}

pub(crate) fn require_id(
    fields: &FieldMap,
    kind: RecordKind,
    field: &'static str,
) -> Result<RecordId, HookError> {
    require_str(fields, kind, field).map(RecordId::new)
}

pub(crate) fn require_i64(
    fields: &FieldMap,
    kind: RecordKind,
    field: &'static str,
) -> Result<i64, HookError> {
    match fields.get(field) {
        None => Err(HookError::MissingField { kind, field }),
        Some(value) => value.as_i64().ok_or(HookError::MistypedField { kind, field }),
    }
}

pub(crate) fn require_u32(
    fields: &FieldMap,
    kind: RecordKind,
    field: &'static str,
) -> Result<u32, HookError> {
    let wide = match fields.get(field) {
        None => return Err(HookError::MissingField { kind, field }),
        Some(value) => value
            .as_u64()
            .ok_or(HookError::MistypedField { kind, field })?,
    };
    u32::try_from(wide).map_err(|_| HookError::MistypedField { kind, field })
}

pub(crate) fn require_bool(
    fields: &FieldMap,
    kind: RecordKind,
    field: &'static str,
) -> Result<bool, HookError> {
    match fields.get(field) {
        None => Err(HookError::MissingField { kind, field }),
        Some(value) => value
            .as_bool()
            .ok_or(HookError::MistypedField { kind, field }),
    }
}

pub(crate) fn require_channel_kind(
    fields: &FieldMap,
    kind: RecordKind,
    field: &'static str,
) -> Result<ChannelKind, HookError> {
    require_str(fields, kind, field)?
        .parse()
        .map_err(|_| HookError::MistypedField { kind, field })
}

/// Absent and explicit-null both mean "no value".
pub(crate) fn optional_i64(
    fields: &FieldMap,
    kind: RecordKind,
    field: &'static str,
) -> Result<Option<i64>, HookError> {
    match fields.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_i64()
            .map(Some)
            .ok_or(HookError::MistypedField { kind, field }),
    }
}

pub(crate) fn optional_id(
    fields: &FieldMap,
    kind: RecordKind,
    field: &'static str,
) -> Result<Option<RecordId>, HookError> {
    match fields.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_str()
            .map(|id| Some(RecordId::new(id)))
            .ok_or(HookError::MistypedField { kind, field }),
    }
}

///
/// TESTS
///
