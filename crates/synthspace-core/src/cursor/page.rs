use crate::cursor::CursorError;

///
/// Page
///
/// One keyset page: at most `limit` rows plus, when more data follows, the
/// opaque token that resumes after the last returned row.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Page<T> {
    pub rows: Vec<T>,
    pub next_cursor: Option<String>,
}

///
/// PageMode
///
/// Which pagination style one list request uses. Presence of the cursor
/// parameter selects keyset mode even when the token itself is empty.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PageMode {
    Offset(u32),
    Cursor(Option<String>),
}

/// Rows to request when probing for one page: one past the limit, so the
/// probe row's existence decides whether a next cursor is handed out.
#[must_use]
pub const fn probe_count(limit: usize) -> usize {
    limit.saturating_add(1)
}

/// Resolve the pagination style of a request, rejecting mixed styles.
pub fn resolve_page_mode(cursor: Option<&str>, offset: u32) -> Result<PageMode, CursorError> {
    match cursor {
        None => Ok(PageMode::Offset(offset)),
        Some(_) if offset != 0 => Err(CursorError::MixedPagination),
        Some(token) => Ok(PageMode::Cursor(
            (!token.is_empty()).then(|| token.to_string()),
        )),
    }
}

/// Trim a probe fetch down to a page. When the probe row is present it is
/// dropped and the next cursor is built from the last row that remains.
pub fn trim_to_page<T>(
    mut rows: Vec<T>,
    limit: usize,
    encode: impl Fn(&T) -> String,
) -> Page<T> {
    let next_cursor = if rows.len() > limit {
        rows.truncate(limit);
        rows.last().map(encode)
    } else {
        None
    };

    Page { rows, next_cursor }
}

///
/// TESTS
///
