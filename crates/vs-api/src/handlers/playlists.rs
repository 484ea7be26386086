use axum::extract::State;
use axum::Extension;
use vs_core::{Caller, Playlist};
use vs_services::commands::PlaylistInput;

use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiJson, ApiPath};
use crate::response::{ApiResponse, Empty};
use crate::AppState;

pub async fn create_playlist(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    ApiJson(input): ApiJson<PlaylistInput>,
) -> ApiResult<Playlist> {
    let playlist = state.services.playlists.create(&caller, input).await?;
    Ok(ApiResponse::created(playlist, "Playlist created successfully"))
}

pub async fn user_playlists(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<String>,
) -> ApiResult<Vec<Playlist>> {
    let playlists = state.services.playlists.user_playlists(&user_id).await?;
    Ok(ApiResponse::ok(playlists, "All playlists fetched successfully"))
}

pub async fn get_playlist(
    State(state): State<AppState>,
    ApiPath(playlist_id): ApiPath<String>,
) -> ApiResult<Playlist> {
    let playlist = state.services.playlists.get(&playlist_id).await?;
    Ok(ApiResponse::ok(playlist, "Playlist fetched successfully"))
}

pub async fn update_playlist(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    ApiPath(playlist_id): ApiPath<String>,
    body: Result<ApiJson<PlaylistInput>, ApiError>,
) -> ApiResult<Playlist> {
    let playlist = state
        .services
        .playlists
        .update(&caller, &playlist_id, ApiJson::deferred(body))
        .await?;
    Ok(ApiResponse::ok(playlist, "Playlist updated successfully"))
}

pub async fn delete_playlist(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    ApiPath(playlist_id): ApiPath<String>,
) -> ApiResult<Empty> {
    state.services.playlists.delete(&caller, &playlist_id).await?;
    Ok(ApiResponse::ok(Empty {}, "Playlist deleted successfully"))
}

/// Path order is `/add/{videoId}/{playlistId}`.
pub async fn add_video(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    ApiPath((video_id, playlist_id)): ApiPath<(String, String)>,
) -> ApiResult<Playlist> {
    let playlist = state
        .services
        .playlists
        .add_video(&caller, &playlist_id, &video_id)
        .await?;
    Ok(ApiResponse::ok(playlist, "Video added to playlist successfully"))
}

pub async fn remove_video(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    ApiPath((video_id, playlist_id)): ApiPath<(String, String)>,
) -> ApiResult<Playlist> {
    let playlist = state
        .services
        .playlists
        .remove_video(&caller, &playlist_id, &video_id)
        .await?;
    Ok(ApiResponse::ok(playlist, "Video removed from playlist successfully"))
}
