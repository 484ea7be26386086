use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;
use vs_core::ids::parse_id;
use vs_core::{ChannelStats, LikeRepo, Result, SubscriptionRepo, UserDirectory, Video, VideoRepo};

use crate::require;

/// Read-only channel aggregates.
#[derive(Clone)]
pub struct DashboardService {
    videos: Arc<dyn VideoRepo>,
    subscriptions: Arc<dyn SubscriptionRepo>,
    likes: Arc<dyn LikeRepo>,
    users: Arc<dyn UserDirectory>,
}

impl DashboardService {
    pub fn new(
        videos: Arc<dyn VideoRepo>,
        subscriptions: Arc<dyn SubscriptionRepo>,
        likes: Arc<dyn LikeRepo>,
        users: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            videos,
            subscriptions,
            likes,
            users,
        }
    }

    /// `total_likes` counts likes given by the channel's user.
    pub async fn channel_stats(&self, channel_id: &str) -> Result<ChannelStats> {
        let channel_id = self.channel(channel_id).await?;
        let ((total_videos, total_views), total_subscribers, total_likes) = tokio::try_join!(
            self.videos.channel_totals(channel_id),
            self.subscriptions.count_subscribers(channel_id),
            self.likes.count_likes_by(channel_id),
        )?;
        debug!(%channel_id, total_videos, total_subscribers, "channel stats computed");
        Ok(ChannelStats {
            total_videos,
            total_views,
            total_subscribers,
            total_likes,
        })
    }

    pub async fn channel_videos(&self, channel_id: &str) -> Result<Vec<Video>> {
        let channel_id = self.channel(channel_id).await?;
        self.videos.videos_by_owner(channel_id).await
    }

    async fn channel(&self, raw: &str) -> Result<Uuid> {
        let id = parse_id("channel", raw)?;
        require(self.users.get_user(id).await?, "Channel not found")?;
        Ok(id)
    }
}
