use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error as ThisError;

///
/// CursorError
///
/// Any failure to reverse a token is fatal for the request; a malformed
/// cursor must never be silently treated as start-of-collection.
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum CursorError {
    #[error("invalid cursor: token is not base64url")]
    Encoding,

    #[error("invalid cursor: payload is not a JSON object")]
    Payload,

    #[error("invalid cursor: missing field `{0}`")]
    MissingField(&'static str),

    #[error("invalid cursor: field `{0}` has the wrong type")]
    FieldType(&'static str),

    #[error("cursor cannot be combined with offset pagination")]
    MixedPagination,
}

///
/// IdCursor
/// Ordering key for id-ascending collections (users, channels).
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct IdCursor {
    pub id: String,
}

impl IdCursor {
    #[must_use]
    pub fn encode(&self) -> String {
        encode_token(self)
    }

    pub fn decode(token: &str) -> Result<Option<Self>, CursorError> {
        let Some(fields) = decode_object(token)? else {
            return Ok(None);
        };
        Ok(Some(Self {
            id: take_str(&fields, "id")?,
        }))
    }
}

///
/// TsCursor
/// Ordering key for the timestamp-descending collections: messages on
/// `(ts DESC, id DESC)` and files on `(created_ts DESC, id DESC)`.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TsCursor {
    pub ts: i64,
    pub id: String,
}

impl TsCursor {
    #[must_use]
    pub fn encode(&self) -> String {
        encode_token(self)
    }

    pub fn decode(token: &str) -> Result<Option<Self>, CursorError> {
        let Some(fields) = decode_object(token)? else {
            return Ok(None);
        };
        Ok(Some(Self {
            ts: take_i64(&fields, "ts")?,
            id: take_str(&fields, "id")?,
        }))
    }
}

///
/// MemberCursor
/// Ordering key for membership pages on `(channel_id ASC, user_id ASC)`.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MemberCursor {
    pub channel_id: String,
    pub user_id: String,
}

impl MemberCursor {
    #[must_use]
    pub fn encode(&self) -> String {
        encode_token(self)
    }

    pub fn decode(token: &str) -> Result<Option<Self>, CursorError> {
        let Some(fields) = decode_object(token)? else {
            return Ok(None);
        };
        Ok(Some(Self {
            channel_id: take_str(&fields, "channel_id")?,
            user_id: take_str(&fields, "user_id")?,
        }))
    }
}

/// Compact JSON, then base64url without padding. Struct field order is the
/// wire field order.
fn encode_token<T: Serialize>(cursor: &T) -> String {
    let json = serde_json::to_string(cursor).unwrap_or_default();
    URL_SAFE_NO_PAD.encode(json.as_bytes())
}

/// Empty input means start-of-collection. Padded tokens are accepted by
/// stripping the padding before decoding.
fn decode_object(token: &str) -> Result<Option<serde_json::Map<String, Value>>, CursorError> {
    if token.is_empty() {
        return Ok(None);
    }

    let stripped = token.trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD
        .decode(stripped.as_bytes())
        .map_err(|_| CursorError::Encoding)?;
    let value: Value = serde_json::from_slice(&bytes).map_err(|_| CursorError::Payload)?;

    match value {
        Value::Object(fields) => Ok(Some(fields)),
        _ => Err(CursorError::Payload),
    }
}

fn take_str(
    fields: &serde_json::Map<String, Value>,
    field: &'static str,
) -> Result<String, CursorError> {
    fields
        .get(field)
        .ok_or(CursorError::MissingField(field))?
        .as_str()
        .map(ToString::to_string)
        .ok_or(CursorError::FieldType(field))
}

fn take_i64(
    fields: &serde_json::Map<String, Value>,
    field: &'static str,
) -> Result<i64, CursorError> {
    fields
        .get(field)
        .ok_or(CursorError::MissingField(field))?
        .as_i64()
        .ok_or(CursorError::FieldType(field))
}

///
/// TESTS
///
