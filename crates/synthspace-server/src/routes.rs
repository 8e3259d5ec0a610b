use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderName, HeaderValue},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use synthspace_core::{
    cursor::{Page, PageMode, resolve_page_mode},
    db::{ActivityFilter, ExportSummary},
    model::Workspace,
    types::{ChannelKind, RecordId},
};

use crate::{AppState, error::ApiError};

const DEFAULT_LIMIT: u32 = 100;
const MAX_LIMIT: u32 = 5_000;

static X_NEXT_CURSOR: HeaderName = HeaderName::from_static("x-next-cursor");

///
/// ListParams
///
/// Query parameters shared by every listing endpoint. Filters that do not
/// apply to a collection are ignored, matching lenient query handling
/// elsewhere. Presence of `cursor` (even empty) selects keyset mode.
///

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListParams {
    limit: Option<u32>,
    offset: Option<u32>,
    cursor: Option<String>,
    channel_type: Option<String>,
    channel_id: Option<String>,
    user_id: Option<String>,
    before_ts: Option<i64>,
    after_ts: Option<i64>,
}

impl ListParams {
    fn limit(&self) -> Result<u32, ApiError> {
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT);
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(ApiError::BadRequest(format!(
                "limit must be between 1 and {MAX_LIMIT}"
            )));
        }

        Ok(limit)
    }

    fn page_mode(&self) -> Result<PageMode, ApiError> {
        Ok(resolve_page_mode(
            self.cursor.as_deref(),
            self.offset.unwrap_or(0),
        )?)
    }

    fn channel_kind(&self) -> Result<Option<ChannelKind>, ApiError> {
        self.channel_type
            .as_deref()
            .map(str::parse::<ChannelKind>)
            .transpose()
            .map_err(|err| ApiError::BadRequest(err.to_string()))
    }

    fn channel_id(&self) -> Option<RecordId> {
        self.channel_id.as_deref().map(RecordId::new)
    }

    fn activity_filter(&self) -> ActivityFilter {
        ActivityFilter {
            channel_id: self.channel_id(),
            user_id: self.user_id.as_deref().map(RecordId::new),
            before_ts: self.before_ts,
            after_ts: self.after_ts,
        }
    }
}

pub(crate) async fn healthz() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn list_workspaces(
    State(state): State<AppState>,
) -> Result<Json<Vec<Workspace>>, ApiError> {
    let store = state.open()?;

    Ok(Json(store.list_workspaces()?))
}

pub(crate) async fn workspace_summary(
    State(state): State<AppState>,
    Path(workspace_id): Path<String>,
) -> Result<Json<ExportSummary>, ApiError> {
    let store = state.open()?;

    Ok(Json(store.export_summary(&RecordId::new(workspace_id))?))
}

pub(crate) async fn list_users(
    State(state): State<AppState>,
    Path(workspace_id): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Response, ApiError> {
    let limit = params.limit()?;
    let mode = params.page_mode()?;
    let store = state.open()?;
    let workspace_id = RecordId::new(workspace_id);

    match mode {
        PageMode::Offset(offset) => {
            let rows = store.list_users(&workspace_id, limit, offset)?;
            Ok(Json(rows).into_response())
        }
        PageMode::Cursor(cursor) => {
            let page = store.list_users_page(&workspace_id, limit, cursor.as_deref())?;
            Ok(page_response(page))
        }
    }
}

pub(crate) async fn list_channels(
    State(state): State<AppState>,
    Path(workspace_id): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Response, ApiError> {
    let limit = params.limit()?;
    let mode = params.page_mode()?;
    let kind = params.channel_kind()?;
    let store = state.open()?;
    let workspace_id = RecordId::new(workspace_id);

    match mode {
        PageMode::Offset(offset) => {
            let rows = store.list_channels(&workspace_id, kind, limit, offset)?;
            Ok(Json(rows).into_response())
        }
        PageMode::Cursor(cursor) => {
            let page = store.list_channels_page(&workspace_id, kind, limit, cursor.as_deref())?;
            Ok(page_response(page))
        }
    }
}

pub(crate) async fn list_channel_members(
    State(state): State<AppState>,
    Path(workspace_id): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Response, ApiError> {
    let limit = params.limit()?;
    let mode = params.page_mode()?;
    let channel = params.channel_id();
    let store = state.open()?;
    let workspace_id = RecordId::new(workspace_id);

    match mode {
        PageMode::Offset(offset) => {
            let rows = store.list_channel_members(&workspace_id, channel.as_ref(), limit, offset)?;
            Ok(Json(rows).into_response())
        }
        PageMode::Cursor(cursor) => {
            let page = store.list_channel_members_page(
                &workspace_id,
                channel.as_ref(),
                limit,
                cursor.as_deref(),
            )?;
            Ok(page_response(page))
        }
    }
}

pub(crate) async fn list_messages(
    State(state): State<AppState>,
    Path(workspace_id): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Response, ApiError> {
    let limit = params.limit()?;
    let mode = params.page_mode()?;
    let filter = params.activity_filter();
    let store = state.open()?;
    let workspace_id = RecordId::new(workspace_id);

    match mode {
        PageMode::Offset(offset) => {
            let rows = store.list_messages(&workspace_id, &filter, limit, offset)?;
            Ok(Json(rows).into_response())
        }
        PageMode::Cursor(cursor) => {
            let page = store.list_messages_page(&workspace_id, &filter, limit, cursor.as_deref())?;
            Ok(page_response(page))
        }
    }
}

pub(crate) async fn list_files(
    State(state): State<AppState>,
    Path(workspace_id): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Response, ApiError> {
    let limit = params.limit()?;
    let mode = params.page_mode()?;
    let filter = params.activity_filter();
    let store = state.open()?;
    let workspace_id = RecordId::new(workspace_id);

    match mode {
        PageMode::Offset(offset) => {
            let rows = store.list_files(&workspace_id, &filter, limit, offset)?;
            Ok(Json(rows).into_response())
        }
        PageMode::Cursor(cursor) => {
            let page = store.list_files_page(&workspace_id, &filter, limit, cursor.as_deref())?;
            Ok(page_response(page))
        }
    }
}

// The body stays a bare array in both modes; keyset continuation rides in a
// header so offset-mode clients never see a different shape.
fn page_response<T: Serialize>(page: Page<T>) -> Response {
    let mut response = Json(page.rows).into_response();
    if let Some(cursor) = page.next_cursor
        && let Ok(value) = HeaderValue::from_str(&cursor)
    {
        response.headers_mut().insert(&X_NEXT_CURSOR, value);
    }

    response
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_defaults_and_bounds() {
        let params = ListParams::default();
        assert_eq!(params.limit().expect("default"), DEFAULT_LIMIT);

        let params = ListParams {
            limit: Some(MAX_LIMIT),
            ..ListParams::default()
        };
        assert_eq!(params.limit().expect("max"), MAX_LIMIT);

        for out_of_range in [0, MAX_LIMIT + 1] {
            let params = ListParams {
                limit: Some(out_of_range),
                ..ListParams::default()
            };
            assert!(matches!(
                params.limit().expect_err("rejected"),
                ApiError::BadRequest(_)
            ));
        }
    }

    #[test]
    fn cursor_with_offset_is_rejected() {
        let params = ListParams {
            cursor: Some(String::new()),
            offset: Some(10),
            ..ListParams::default()
        };
        match params.page_mode().expect_err("mixed") {
            ApiError::BadRequest(detail) => {
                assert_eq!(detail, "cursor cannot be combined with offset");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unknown_channel_type_is_rejected() {
        let params = ListParams {
            channel_type: Some("group".to_string()),
            ..ListParams::default()
        };
        match params.channel_kind().expect_err("unknown kind") {
            ApiError::BadRequest(detail) => assert_eq!(detail, "unknown channel kind: group"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn valid_channel_type_parses() {
        let params = ListParams {
            channel_type: Some("mpim".to_string()),
            ..ListParams::default()
        };
        assert_eq!(
            params.channel_kind().expect("parses"),
            Some(ChannelKind::Mpim)
        );
    }
}
