use axum::extract::State;
use axum::Extension;
use vs_core::{Caller, Tweet};
use vs_services::commands::{ContentInput, TweetUpdateInput};

use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiJson, ApiPath};
use crate::response::{ApiResponse, Empty};
use crate::AppState;

pub async fn create_tweet(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    ApiJson(input): ApiJson<ContentInput>,
) -> ApiResult<Tweet> {
    let tweet = state.services.tweets.create(&caller, input).await?;
    Ok(ApiResponse::created(tweet, "Tweet Posted Successfully"))
}

pub async fn user_tweets(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<String>,
) -> ApiResult<Vec<Tweet>> {
    let tweets = state.services.tweets.user_tweets(&user_id).await?;
    Ok(ApiResponse::ok(tweets, "All tweets fetched successfully"))
}

pub async fn update_tweet(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    ApiPath(tweet_id): ApiPath<String>,
    body: Result<ApiJson<TweetUpdateInput>, ApiError>,
) -> ApiResult<Tweet> {
    let tweet = state
        .services
        .tweets
        .update(&caller, &tweet_id, ApiJson::deferred(body))
        .await?;
    Ok(ApiResponse::ok(tweet, "Tweet updated successfully"))
}

pub async fn delete_tweet(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    ApiPath(tweet_id): ApiPath<String>,
) -> ApiResult<Empty> {
    state.services.tweets.delete(&caller, &tweet_id).await?;
    Ok(ApiResponse::ok(Empty {}, "Tweet deleted successfully"))
}
