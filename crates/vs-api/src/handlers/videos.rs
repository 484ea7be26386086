use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Extension;
use vs_core::{Caller, Video};
use vs_services::commands::{PublishVideoInput, UpdateVideoInput, VideoListQuery};

use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiPath, ApiQuery, MultipartForm};
use crate::response::{ApiResponse, Empty};
use crate::AppState;

pub async fn list_videos(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<VideoListQuery>,
) -> ApiResult<Vec<Video>> {
    let videos = state.services.videos.list(&query).await?;
    Ok(ApiResponse::ok(videos, "Videos fetched successfully"))
}

/// Multipart parts: `title`, `description`, `videoFile`, `thumbnail`.
pub async fn publish_video(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Video> {
    let mut form = MultipartForm::read(multipart?).await?;
    let input = PublishVideoInput {
        title: form.take_text("title"),
        description: form.take_text("description"),
        video_file: form.take_file("videoFile"),
        thumbnail: form.take_file("thumbnail"),
    };
    let video = state.services.videos.publish(&caller, input).await?;
    Ok(ApiResponse::created(video, "Video published successfully"))
}

pub async fn get_video(
    State(state): State<AppState>,
    ApiPath(video_id): ApiPath<String>,
) -> ApiResult<Video> {
    let video = state.services.videos.get(&video_id).await?;
    Ok(ApiResponse::ok(video, "Video fetched successfully"))
}

/// Multipart parts: `title`, `description`, `thumbnail`.
///
/// A broken form is handed to the service unread so ownership is checked
/// first.
pub async fn update_video(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    ApiPath(video_id): ApiPath<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Video> {
    let input = update_form(multipart).await.map_err(|ApiError(err)| err);
    let video = state.services.videos.update(&caller, &video_id, input).await?;
    Ok(ApiResponse::ok(video, "Video updated successfully"))
}

async fn update_form(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<UpdateVideoInput, ApiError> {
    let mut form = MultipartForm::read(multipart?).await?;
    Ok(UpdateVideoInput {
        title: form.take_text("title"),
        description: form.take_text("description"),
        thumbnail: form.take_file("thumbnail"),
    })
}

pub async fn delete_video(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    ApiPath(video_id): ApiPath<String>,
) -> ApiResult<Empty> {
    state.services.videos.delete(&caller, &video_id).await?;
    Ok(ApiResponse::ok(Empty {}, "Video deleted successfully"))
}

pub async fn toggle_publish(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    ApiPath(video_id): ApiPath<String>,
) -> ApiResult<Video> {
    let video = state.services.videos.toggle_publish(&caller, &video_id).await?;
    Ok(ApiResponse::ok(video, "Video updated successfully"))
}
