mod channel;
mod id;

pub use channel::{ChannelKind, UnknownChannelKindError};
pub use id::RecordId;
