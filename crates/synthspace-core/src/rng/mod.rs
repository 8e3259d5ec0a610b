//! Deterministic randomness. One run seed fans out into independent
//! sub-streams so each identifier family replays identically regardless of
//! what the other families draw.

mod stream;

pub use stream::{SeedStream, StreamKind};
