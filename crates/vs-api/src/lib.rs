//! # vs-api
//!
//! The web routing layer for vidshare.
//!
//! Every route lives under `/api/v1`. All of them except `/healthcheck`
//! sit behind [`auth::require_caller`], so handlers always find a `Caller`
//! in the request extensions.

pub mod auth;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod response;

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, patch, post};
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use vs_core::IdentityProvider;
use vs_services::Services;

use handlers::{comments, dashboard, likes, playlists, subscriptions, tweets, videos};

/// Shared per-request state.
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<Services>,
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    pub fn new(services: Services, identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            services: Arc::new(services),
            identity,
        }
    }
}

/// Serves stored media files straight from disk.
#[derive(Debug, Clone)]
pub struct MediaMount {
    pub url_prefix: String,
    pub root: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Empty means any origin.
    pub cors_origins: Vec<String>,
    pub max_upload_bytes: usize,
    pub media: Option<MediaMount>,
}

/// Builds the complete application router.
pub fn router(state: AppState, config: &ApiConfig) -> Router {
    let protected = Router::new()
        .route("/videos", get(videos::list_videos).post(videos::publish_video))
        .route(
            "/videos/{videoId}",
            get(videos::get_video)
                .patch(videos::update_video)
                .delete(videos::delete_video),
        )
        .route("/videos/toggle/publish/{videoId}", patch(videos::toggle_publish))
        .route(
            "/comments/{videoId}",
            get(comments::list_comments).post(comments::add_comment),
        )
        .route(
            "/comments/c/{commentId}",
            patch(comments::update_comment).delete(comments::delete_comment),
        )
        .route("/likes/toggle/v/{videoId}", post(likes::toggle_video_like))
        .route("/likes/toggle/c/{commentId}", post(likes::toggle_comment_like))
        .route("/likes/toggle/t/{tweetId}", post(likes::toggle_tweet_like))
        .route("/likes/videos", get(likes::liked_videos))
        .route("/playlist", post(playlists::create_playlist))
        .route("/playlist/user/{userId}", get(playlists::user_playlists))
        .route(
            "/playlist/{playlistId}",
            get(playlists::get_playlist)
                .patch(playlists::update_playlist)
                .delete(playlists::delete_playlist),
        )
        .route("/playlist/add/{videoId}/{playlistId}", patch(playlists::add_video))
        .route("/playlist/remove/{videoId}/{playlistId}", patch(playlists::remove_video))
        .route(
            "/subscriptions/c/{channelId}",
            post(subscriptions::toggle_subscription).get(subscriptions::channel_subscribers),
        )
        .route("/subscriptions/u/{subscriberId}", get(subscriptions::subscribed_channels))
        .route("/tweets", post(tweets::create_tweet))
        .route("/tweets/user/{userId}", get(tweets::user_tweets))
        .route(
            "/tweets/{tweetId}",
            patch(tweets::update_tweet).delete(tweets::delete_tweet),
        )
        .route("/dashboard/stats/{channelId}", get(dashboard::channel_stats))
        .route("/dashboard/videos/{channelId}", get(dashboard::channel_videos))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth::require_caller,
        ));

    let api = Router::new()
        .route("/healthcheck", get(handlers::healthcheck))
        .merge(protected);

    let mut app = Router::new().nest("/api/v1", api);
    if let Some(media) = &config.media {
        let prefix = media.url_prefix.trim_end_matches('/');
        if !prefix.is_empty() {
            app = app.nest_service(prefix, ServeDir::new(&media.root));
        }
    }

    app.fallback(handlers::not_found)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.max_upload_bytes))
        .layer(middleware::cors_layer(&config.cors_origins))
        .layer(middleware::trace_layer())
        .with_state(state)
}
