use std::sync::Arc;

use tracing::info;
use vs_core::ids::parse_id;
use vs_core::{
    Caller, CommentRepo, Like, LikeRepo, LikeTarget, LikedVideo, Result, Toggled, TweetRepo,
    VideoRepo,
};

use crate::toggle::{toggle, LikeKey, LikeToggle};

#[derive(Clone)]
pub struct LikeService {
    likes: Arc<dyn LikeRepo>,
    videos: Arc<dyn VideoRepo>,
    comments: Arc<dyn CommentRepo>,
    tweets: Arc<dyn TweetRepo>,
}

impl LikeService {
    pub fn new(
        likes: Arc<dyn LikeRepo>,
        videos: Arc<dyn VideoRepo>,
        comments: Arc<dyn CommentRepo>,
        tweets: Arc<dyn TweetRepo>,
    ) -> Self {
        Self {
            likes,
            videos,
            comments,
            tweets,
        }
    }

    pub async fn toggle_video_like(&self, caller: &Caller, video_id: &str) -> Result<Toggled<Like>> {
        let id = parse_id("video", video_id)?;
        self.toggle(caller, LikeTarget::Video(id)).await
    }

    pub async fn toggle_comment_like(&self, caller: &Caller, comment_id: &str) -> Result<Toggled<Like>> {
        let id = parse_id("comment", comment_id)?;
        self.toggle(caller, LikeTarget::Comment(id)).await
    }

    pub async fn toggle_tweet_like(&self, caller: &Caller, tweet_id: &str) -> Result<Toggled<Like>> {
        let id = parse_id("tweet", tweet_id)?;
        self.toggle(caller, LikeTarget::Tweet(id)).await
    }

    pub async fn toggle(&self, caller: &Caller, target: LikeTarget) -> Result<Toggled<Like>> {
        let engine = LikeToggle {
            likes: self.likes.as_ref(),
            videos: self.videos.as_ref(),
            comments: self.comments.as_ref(),
            tweets: self.tweets.as_ref(),
        };
        let key = LikeKey {
            liked_by: caller.user_id,
            target,
        };
        let outcome = toggle(&engine, &key).await?;
        info!(
            kind = target.kind(),
            target_id = %target.id(),
            liked_by = %caller.user_id,
            liked = outcome.is_created(),
            "like toggled"
        );
        Ok(outcome)
    }

    /// Videos the caller currently likes, most recent like first.
    pub async fn liked_videos(&self, caller: &Caller) -> Result<Vec<LikedVideo>> {
        self.likes.liked_videos(caller.user_id).await
    }
}
