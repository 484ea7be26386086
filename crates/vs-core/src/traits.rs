//! # Core Traits (Ports)
//!
//! Any plugin must implement these traits to be used by the binary.
//!
//! Repository contract shared by every port below:
//! - lookups return `Ok(None)` for absent records, never an error;
//! - a violated uniqueness constraint is `AppError::Conflict`;
//! - updating or deleting a record that vanished is `AppError::NotFound`.

use async_trait::async_trait;
use bytes::Bytes;
use mime::Mime;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    Caller, Comment, Like, LikeTarget, LikedVideo, Playlist, Subscription, Tweet, User, Video,
};
use crate::query::QueryPlan;

/// Read-only view of the accounts owned by the authentication collaborator.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>>;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait VideoRepo: Send + Sync {
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>>;
    async fn create_video(&self, video: Video) -> Result<Video>;
    async fn update_video(&self, video: Video) -> Result<Video>;
    async fn delete_video(&self, id: Uuid) -> Result<()>;

    /// Fields usable in a plan: `owner_id`, `is_published`, `title`,
    /// `description`, `duration`, `views`, `created_at`, `updated_at`.
    async fn list_videos(&self, plan: &QueryPlan) -> Result<Vec<Video>>;
    async fn videos_by_owner(&self, owner_id: Uuid) -> Result<Vec<Video>>;
    /// `(video count, summed views)` for one channel.
    async fn channel_totals(&self, owner_id: Uuid) -> Result<(i64, i64)>;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CommentRepo: Send + Sync {
    async fn get_comment(&self, id: Uuid) -> Result<Option<Comment>>;
    async fn create_comment(&self, comment: Comment) -> Result<Comment>;
    async fn update_comment(&self, comment: Comment) -> Result<Comment>;
    async fn delete_comment(&self, id: Uuid) -> Result<()>;

    /// Fields usable in a plan: `video_id`, `owner_id`, `content`, `created_at`.
    async fn list_comments(&self, plan: &QueryPlan) -> Result<Vec<Comment>>;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait TweetRepo: Send + Sync {
    async fn get_tweet(&self, id: Uuid) -> Result<Option<Tweet>>;
    async fn create_tweet(&self, tweet: Tweet) -> Result<Tweet>;
    async fn update_tweet(&self, tweet: Tweet) -> Result<Tweet>;
    async fn delete_tweet(&self, id: Uuid) -> Result<()>;
    async fn tweets_by_owner(&self, owner_id: Uuid) -> Result<Vec<Tweet>>;
}

/// At most one like per (user, target); `insert_like` enforces it.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait LikeRepo: Send + Sync {
    async fn find_like(&self, liked_by: Uuid, target: LikeTarget) -> Result<Option<Like>>;
    async fn insert_like(&self, like: Like) -> Result<Like>;
    /// `false` when the like was already gone.
    async fn delete_like(&self, id: Uuid) -> Result<bool>;
    async fn liked_videos(&self, liked_by: Uuid) -> Result<Vec<LikedVideo>>;
    async fn count_likes_by(&self, liked_by: Uuid) -> Result<i64>;
}

/// At most one subscription per (subscriber, channel); `insert_subscription` enforces it.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait SubscriptionRepo: Send + Sync {
    async fn find_subscription(
        &self,
        subscriber_id: Uuid,
        channel_id: Uuid,
    ) -> Result<Option<Subscription>>;
    async fn insert_subscription(&self, subscription: Subscription) -> Result<Subscription>;
    /// `false` when the subscription was already gone.
    async fn delete_subscription(&self, id: Uuid) -> Result<bool>;
    async fn subscribers_of(&self, channel_id: Uuid) -> Result<Vec<Subscription>>;
    async fn subscriptions_of(&self, subscriber_id: Uuid) -> Result<Vec<Subscription>>;
    async fn count_subscribers(&self, channel_id: Uuid) -> Result<i64>;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PlaylistRepo: Send + Sync {
    async fn get_playlist(&self, id: Uuid) -> Result<Option<Playlist>>;
    async fn create_playlist(&self, playlist: Playlist) -> Result<Playlist>;
    /// Persists name, description and `updated_at`; membership is untouched.
    async fn update_playlist(&self, playlist: Playlist) -> Result<Playlist>;
    async fn delete_playlist(&self, id: Uuid) -> Result<()>;
    async fn playlists_by_owner(&self, owner_id: Uuid) -> Result<Vec<Playlist>>;

    /// Appends `video_id` unless already present, as one atomic step.
    /// Already present is `Conflict`.
    async fn add_video(&self, playlist_id: Uuid, video_id: Uuid) -> Result<Playlist>;
    /// Removes `video_id` if present, as one atomic step.
    /// Absent is `NotFound`.
    async fn remove_video(&self, playlist_id: Uuid, video_id: Uuid) -> Result<Playlist>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Thumbnail,
}

/// What the media provider hands back after an upload.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredMedia {
    pub url: String,
    /// Seconds, when the provider can tell.
    pub duration: Option<f64>,
}

/// Media storage contract for handling uploads and thumbnails.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Stores raw bytes and returns their public location.
    async fn upload(&self, kind: MediaKind, data: Bytes, content_type: &Mime) -> Result<StoredMedia>;
}

/// Turns a presented access token into a caller.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait IdentityProvider: Send + Sync {
    /// Invalid or expired tokens are `AppError::Unauthorized`.
    fn verify_access_token(&self, token: &str) -> Result<Caller>;
}
