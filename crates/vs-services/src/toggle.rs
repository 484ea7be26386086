//! # Toggle engine
//!
//! Likes and subscriptions are both "create if absent, delete if present"
//! associations. [`toggle`] runs that decision once per call; uniqueness of
//! the association is left to storage. When an insert loses a race to a
//! concurrent toggle (storage reports `Conflict`), the decision is re-read
//! instead of failing.

use std::fmt;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;
use vs_core::ids::new_id;
use vs_core::{
    AppError, CommentRepo, Like, LikeRepo, LikeTarget, Result, Subscription, SubscriptionRepo,
    Toggled, TweetRepo, UserDirectory, VideoRepo,
};

/// Upper bound on read-then-decide rounds for one toggle call.
pub const MAX_TOGGLE_ATTEMPTS: usize = 3;

/// One kind of toggleable association.
#[async_trait]
pub trait Toggle: Send + Sync {
    type Key: Send + Sync + fmt::Debug;
    type Association: Send;

    /// Name of the target in error messages ("Video", "Channel", ...).
    fn target_kind(&self, key: &Self::Key) -> &'static str;
    async fn target_exists(&self, key: &Self::Key) -> Result<bool>;
    async fn find(&self, key: &Self::Key) -> Result<Option<Self::Association>>;
    /// Must fail with `Conflict` when the association already exists.
    async fn insert(&self, key: &Self::Key) -> Result<Self::Association>;
    async fn remove(&self, existing: &Self::Association) -> Result<()>;
}

pub async fn toggle<T>(engine: &T, key: &T::Key) -> Result<Toggled<T::Association>>
where
    T: Toggle + ?Sized,
{
    if !engine.target_exists(key).await? {
        return Err(AppError::not_found(format!(
            "{} not found",
            engine.target_kind(key)
        )));
    }

    for attempt in 1..=MAX_TOGGLE_ATTEMPTS {
        if let Some(existing) = engine.find(key).await? {
            engine.remove(&existing).await?;
            debug!(?key, "association removed");
            return Ok(Toggled::Deleted);
        }

        match engine.insert(key).await {
            Ok(created) => {
                debug!(?key, "association created");
                return Ok(Toggled::Created(created));
            }
            Err(AppError::Conflict(reason)) => {
                warn!(?key, attempt, %reason, "toggle raced a concurrent writer, re-reading");
            }
            Err(err) => return Err(err),
        }
    }

    Err(AppError::internal(format!(
        "toggle for {key:?} did not settle after {MAX_TOGGLE_ATTEMPTS} attempts"
    )))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeKey {
    pub liked_by: Uuid,
    pub target: LikeTarget,
}

pub struct LikeToggle<'a> {
    pub likes: &'a dyn LikeRepo,
    pub videos: &'a dyn VideoRepo,
    pub comments: &'a dyn CommentRepo,
    pub tweets: &'a dyn TweetRepo,
}

#[async_trait]
impl<'a> Toggle for LikeToggle<'a> {
    type Key = LikeKey;
    type Association = Like;

    fn target_kind(&self, key: &LikeKey) -> &'static str {
        key.target.kind()
    }

    async fn target_exists(&self, key: &LikeKey) -> Result<bool> {
        Ok(match key.target {
            LikeTarget::Video(id) => self.videos.get_video(id).await?.is_some(),
            LikeTarget::Comment(id) => self.comments.get_comment(id).await?.is_some(),
            LikeTarget::Tweet(id) => self.tweets.get_tweet(id).await?.is_some(),
        })
    }

    async fn find(&self, key: &LikeKey) -> Result<Option<Like>> {
        self.likes.find_like(key.liked_by, key.target).await
    }

    async fn insert(&self, key: &LikeKey) -> Result<Like> {
        self.likes
            .insert_like(Like {
                id: new_id(),
                liked_by: key.liked_by,
                target: key.target,
                created_at: Utc::now(),
            })
            .await
    }

    async fn remove(&self, existing: &Like) -> Result<()> {
        if !self.likes.delete_like(existing.id).await? {
            debug!(like_id = %existing.id, "like was already removed concurrently");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionKey {
    pub subscriber_id: Uuid,
    pub channel_id: Uuid,
}

pub struct SubscriptionToggle<'a> {
    pub subscriptions: &'a dyn SubscriptionRepo,
    pub users: &'a dyn UserDirectory,
}

#[async_trait]
impl<'a> Toggle for SubscriptionToggle<'a> {
    type Key = SubscriptionKey;
    type Association = Subscription;

    fn target_kind(&self, _key: &SubscriptionKey) -> &'static str {
        "Channel"
    }

    async fn target_exists(&self, key: &SubscriptionKey) -> Result<bool> {
        Ok(self.users.get_user(key.channel_id).await?.is_some())
    }

    async fn find(&self, key: &SubscriptionKey) -> Result<Option<Subscription>> {
        self.subscriptions
            .find_subscription(key.subscriber_id, key.channel_id)
            .await
    }

    async fn insert(&self, key: &SubscriptionKey) -> Result<Subscription> {
        self.subscriptions
            .insert_subscription(Subscription {
                id: new_id(),
                subscriber_id: key.subscriber_id,
                channel_id: key.channel_id,
                created_at: Utc::now(),
            })
            .await
    }

    async fn remove(&self, existing: &Subscription) -> Result<()> {
        if !self.subscriptions.delete_subscription(existing.id).await? {
            debug!(subscription_id = %existing.id, "subscription was already removed concurrently");
        }
        Ok(())
    }
}
