use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error as ThisError;

///
/// ChannelKind
///
/// The four conversation flavours a workspace contains. Persisted and
/// serialized as lowercase strings. `Im` and `Mpim` are always private.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Public,
    Private,
    Im,
    Mpim,
}

impl ChannelKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::Im => "im",
            Self::Mpim => "mpim",
        }
    }

    /// Direct and multi-party conversations never appear in the public list.
    #[must_use]
    pub const fn is_private(self) -> bool {
        !matches!(self, Self::Public)
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChannelKind {
    type Err = UnknownChannelKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(Self::Public),
            "private" => Ok(Self::Private),
            "im" => Ok(Self::Im),
            "mpim" => Ok(Self::Mpim),
            other => Err(UnknownChannelKindError(other.to_string())),
        }
    }
}

impl ToSql for ChannelKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for ChannelKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        text.parse()
            .map_err(|err| FromSqlError::Other(Box::new(err)))
    }
}

///
/// UnknownChannelKindError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
#[error("unknown channel kind: {0}")]
pub struct UnknownChannelKindError(pub String);

///
/// TESTS
///
