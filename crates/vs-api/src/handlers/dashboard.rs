use axum::extract::State;
use vs_core::{ChannelStats, Video};

use crate::error::ApiResult;
use crate::extract::ApiPath;
use crate::response::ApiResponse;
use crate::AppState;

pub async fn channel_stats(
    State(state): State<AppState>,
    ApiPath(channel_id): ApiPath<String>,
) -> ApiResult<ChannelStats> {
    let stats = state.services.dashboard.channel_stats(&channel_id).await?;
    Ok(ApiResponse::ok(stats, "Channel stats fetched successfully"))
}

pub async fn channel_videos(
    State(state): State<AppState>,
    ApiPath(channel_id): ApiPath<String>,
) -> ApiResult<Vec<Video>> {
    let videos = state.services.dashboard.channel_videos(&channel_id).await?;
    Ok(ApiResponse::ok(videos, "Channel videos fetched successfully"))
}
