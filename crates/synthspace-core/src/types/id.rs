use crate::rng::SeedStream;
use derive_more::{Display, From};
use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use uuid::Builder;

///
/// RecordId
///
/// A 32 character lowercase hex identifier shaped like a v4 UUID with the
/// hyphens stripped. Native ids are drawn from seeded identity streams, so a
/// fixed (seed, namespace) pair always yields the same id sequence. Hooks may
/// substitute arbitrary strings; the store treats ids as opaque text.
///

#[derive(
    Clone, Debug, Display, Eq, From, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Draw the next identifier from a seeded stream.
    ///
    /// Consumes 128 bits, forces the v4 version and RFC 4122 variant bits,
    /// and formats without hyphens.
    #[must_use]
    pub fn draw(stream: &mut SeedStream) -> Self {
        let mut bytes = [0u8; 16];
        stream.fill_bytes(&mut bytes);
        let uuid = Builder::from_random_bytes(bytes).into_uuid();
        Self(uuid.simple().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl ToSql for RecordId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        self.0.to_sql()
    }
}

impl FromSql for RecordId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        String::column_result(value).map(Self)
    }
}

///
/// TESTS
///
