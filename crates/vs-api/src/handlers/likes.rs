use axum::extract::State;
use axum::Extension;
use vs_core::{Caller, Like, LikedVideo, Toggled};

use crate::error::ApiResult;
use crate::extract::ApiPath;
use crate::response::ApiResponse;
use crate::AppState;

fn toggled(outcome: Toggled<Like>, kind: &str) -> ApiResponse<Toggled<Like>> {
    let verb = if outcome.is_created() { "liked" } else { "unliked" };
    ApiResponse::ok(outcome, format!("{kind} {verb} successfully"))
}

pub async fn toggle_video_like(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    ApiPath(video_id): ApiPath<String>,
) -> ApiResult<Toggled<Like>> {
    let outcome = state.services.likes.toggle_video_like(&caller, &video_id).await?;
    Ok(toggled(outcome, "Video"))
}

pub async fn toggle_comment_like(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    ApiPath(comment_id): ApiPath<String>,
) -> ApiResult<Toggled<Like>> {
    let outcome = state.services.likes.toggle_comment_like(&caller, &comment_id).await?;
    Ok(toggled(outcome, "Comment"))
}

pub async fn toggle_tweet_like(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    ApiPath(tweet_id): ApiPath<String>,
) -> ApiResult<Toggled<Like>> {
    let outcome = state.services.likes.toggle_tweet_like(&caller, &tweet_id).await?;
    Ok(toggled(outcome, "Tweet"))
}

pub async fn liked_videos(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> ApiResult<Vec<LikedVideo>> {
    let videos = state.services.likes.liked_videos(&caller).await?;
    Ok(ApiResponse::ok(videos, "Liked videos retrieved successfully"))
}
