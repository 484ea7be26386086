//! # vs-services
//!
//! Use cases of the platform. Every operation takes its caller explicitly,
//! validates identifiers and payloads, loads through the repository ports,
//! checks ownership before mutating and returns domain records.

pub mod commands;
pub mod comment;
pub mod dashboard;
pub mod like;
pub mod playlist;
pub mod subscription;
pub mod toggle;
pub mod tweet;
pub mod video;

use std::sync::Arc;

use vs_core::{
    AppError, CommentRepo, LikeRepo, MediaStore, PlaylistRepo, Result, SubscriptionRepo, TweetRepo,
    UserDirectory, VideoRepo,
};

pub use comment::CommentService;
pub use dashboard::DashboardService;
pub use like::LikeService;
pub use playlist::PlaylistService;
pub use subscription::SubscriptionService;
pub use tweet::TweetService;
pub use video::VideoService;

/// Unwraps a lookup, turning absence into `NotFound(message)`.
pub(crate) fn require<T>(found: Option<T>, message: &str) -> Result<T> {
    found.ok_or_else(|| AppError::not_found(message))
}

/// One handle per repository port.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserDirectory>,
    pub videos: Arc<dyn VideoRepo>,
    pub comments: Arc<dyn CommentRepo>,
    pub tweets: Arc<dyn TweetRepo>,
    pub likes: Arc<dyn LikeRepo>,
    pub subscriptions: Arc<dyn SubscriptionRepo>,
    pub playlists: Arc<dyn PlaylistRepo>,
}

impl Repositories {
    /// Uses one store that implements every port (e.g. the SQLite plugin).
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: UserDirectory
            + VideoRepo
            + CommentRepo
            + TweetRepo
            + LikeRepo
            + SubscriptionRepo
            + PlaylistRepo
            + 'static,
    {
        Self {
            users: store.clone(),
            videos: store.clone(),
            comments: store.clone(),
            tweets: store.clone(),
            likes: store.clone(),
            subscriptions: store.clone(),
            playlists: store,
        }
    }
}

/// Every service, wired against the same repositories.
#[derive(Clone)]
pub struct Services {
    pub videos: VideoService,
    pub comments: CommentService,
    pub likes: LikeService,
    pub tweets: TweetService,
    pub playlists: PlaylistService,
    pub subscriptions: SubscriptionService,
    pub dashboard: DashboardService,
}

impl Services {
    pub fn new(repos: Repositories, media: Arc<dyn MediaStore>) -> Self {
        Self {
            videos: VideoService::new(repos.videos.clone(), media),
            comments: CommentService::new(repos.comments.clone(), repos.videos.clone()),
            likes: LikeService::new(
                repos.likes.clone(),
                repos.videos.clone(),
                repos.comments.clone(),
                repos.tweets.clone(),
            ),
            tweets: TweetService::new(repos.tweets.clone(), repos.users.clone()),
            playlists: PlaylistService::new(
                repos.playlists.clone(),
                repos.videos.clone(),
                repos.users.clone(),
            ),
            subscriptions: SubscriptionService::new(repos.subscriptions.clone(), repos.users.clone()),
            dashboard: DashboardService::new(repos.videos, repos.subscriptions, repos.likes, repos.users),
        }
    }
}
