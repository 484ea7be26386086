//! Playlists and their video membership.
//!
//! Membership changes go through `PlaylistRepo::add_video` / `remove_video`,
//! which apply "append if absent" / "remove if present" as a single storage
//! operation. The service never writes a membership list it read earlier.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use vs_core::guard::authorize;
use vs_core::ids::{new_id, parse_id};
use vs_core::{Caller, Playlist, PlaylistRepo, Result, UserDirectory, VideoRepo};

use crate::commands::PlaylistInput;
use crate::require;

#[derive(Clone)]
pub struct PlaylistService {
    playlists: Arc<dyn PlaylistRepo>,
    videos: Arc<dyn VideoRepo>,
    users: Arc<dyn UserDirectory>,
}

impl PlaylistService {
    pub fn new(
        playlists: Arc<dyn PlaylistRepo>,
        videos: Arc<dyn VideoRepo>,
        users: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            playlists,
            videos,
            users,
        }
    }

    pub async fn create(&self, caller: &Caller, input: PlaylistInput) -> Result<Playlist> {
        let details = input.validate()?;
        let now = Utc::now();
        let playlist = self
            .playlists
            .create_playlist(Playlist {
                id: new_id(),
                owner_id: caller.user_id,
                name: details.name,
                description: details.description,
                videos: Vec::new(),
                created_at: now,
                updated_at: now,
            })
            .await?;
        info!(playlist_id = %playlist.id, owner = %caller.user_id, "playlist created");
        Ok(playlist)
    }

    pub async fn user_playlists(&self, user_id: &str) -> Result<Vec<Playlist>> {
        let user_id = parse_id("user", user_id)?;
        require(self.users.get_user(user_id).await?, "User not found")?;
        self.playlists.playlists_by_owner(user_id).await
    }

    pub async fn get(&self, playlist_id: &str) -> Result<Playlist> {
        let id = parse_id("playlist", playlist_id)?;
        require(self.playlists.get_playlist(id).await?, "Playlist not found")
    }

    pub async fn update(
        &self,
        caller: &Caller,
        playlist_id: &str,
        input: Result<PlaylistInput>,
    ) -> Result<Playlist> {
        let mut playlist = self.owned(caller, playlist_id, "update this playlist").await?;
        let details = input?.validate()?;
        playlist.name = details.name;
        playlist.description = details.description;
        playlist.updated_at = Utc::now();
        let playlist = self.playlists.update_playlist(playlist).await?;
        info!(playlist_id = %playlist.id, "playlist updated");
        Ok(playlist)
    }

    pub async fn delete(&self, caller: &Caller, playlist_id: &str) -> Result<()> {
        let playlist = self.owned(caller, playlist_id, "delete this playlist").await?;
        self.playlists.delete_playlist(playlist.id).await?;
        info!(playlist_id = %playlist.id, "playlist deleted");
        Ok(())
    }

    /// Fails with `Conflict` when the video is already a member.
    pub async fn add_video(&self, caller: &Caller, playlist_id: &str, video_id: &str) -> Result<Playlist> {
        let playlist_id = parse_id("playlist", playlist_id)?;
        let video_id = parse_id("video", video_id)?;
        let playlist = require(self.playlists.get_playlist(playlist_id).await?, "Playlist not found")?;
        authorize(&playlist, caller, "modify this playlist")?;
        require(self.videos.get_video(video_id).await?, "Video not found")?;

        let playlist = self.playlists.add_video(playlist_id, video_id).await?;
        info!(%playlist_id, %video_id, size = playlist.videos.len(), "video added to playlist");
        Ok(playlist)
    }

    /// Fails with `NotFound` when the video is not a member.
    pub async fn remove_video(&self, caller: &Caller, playlist_id: &str, video_id: &str) -> Result<Playlist> {
        let playlist_id = parse_id("playlist", playlist_id)?;
        let video_id = parse_id("video", video_id)?;
        let playlist = require(self.playlists.get_playlist(playlist_id).await?, "Playlist not found")?;
        authorize(&playlist, caller, "modify this playlist")?;

        let playlist = self.playlists.remove_video(playlist_id, video_id).await?;
        info!(%playlist_id, %video_id, size = playlist.videos.len(), "video removed from playlist");
        Ok(playlist)
    }

    async fn owned(&self, caller: &Caller, playlist_id: &str, action: &str) -> Result<Playlist> {
        let id = parse_id("playlist", playlist_id)?;
        let playlist = require(self.playlists.get_playlist(id).await?, "Playlist not found")?;
        authorize(&playlist, caller, action)?;
        Ok(playlist)
    }
}
