use axum::extract::State;
use axum::Extension;
use vs_core::{Caller, Comment};
use vs_services::commands::{ContentInput, PageQuery};

use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::response::{ApiResponse, Empty};
use crate::AppState;

pub async fn list_comments(
    State(state): State<AppState>,
    ApiPath(video_id): ApiPath<String>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<Vec<Comment>> {
    let comments = state.services.comments.list_for_video(&video_id, &query).await?;
    Ok(ApiResponse::ok(comments, "Comments retrieved successfully"))
}

pub async fn add_comment(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    ApiPath(video_id): ApiPath<String>,
    ApiJson(input): ApiJson<ContentInput>,
) -> ApiResult<Comment> {
    let comment = state.services.comments.add(&caller, &video_id, input).await?;
    Ok(ApiResponse::created(comment, "Comment created successfully"))
}

pub async fn update_comment(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    ApiPath(comment_id): ApiPath<String>,
    body: Result<ApiJson<ContentInput>, ApiError>,
) -> ApiResult<Comment> {
    let comment = state
        .services
        .comments
        .update(&caller, &comment_id, ApiJson::deferred(body))
        .await?;
    Ok(ApiResponse::ok(comment, "Comment updated successfully"))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    ApiPath(comment_id): ApiPath<String>,
) -> ApiResult<Empty> {
    state.services.comments.delete(&caller, &comment_id).await?;
    Ok(ApiResponse::ok(Empty {}, "Comment deleted successfully"))
}
