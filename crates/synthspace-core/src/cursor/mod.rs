//! Opaque pagination cursors. Tokens are base64url (no padding) over compact
//! JSON objects carrying the composite ordering key of the last returned
//! row; [`page`] turns limit+1 probe fetches into pages.

mod page;
mod token;

pub use page::{Page, PageMode, probe_count, resolve_page_mode, trim_to_page};
pub use token::{CursorError, IdCursor, MemberCursor, TsCursor};
