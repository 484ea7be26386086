use axum::extract::State;
use axum::Extension;
use vs_core::{Caller, Subscription, Toggled};

use crate::error::ApiResult;
use crate::extract::ApiPath;
use crate::response::ApiResponse;
use crate::AppState;

pub async fn toggle_subscription(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    ApiPath(channel_id): ApiPath<String>,
) -> ApiResult<Toggled<Subscription>> {
    let outcome = state.services.subscriptions.toggle(&caller, &channel_id).await?;
    let message = if outcome.is_created() {
        "Channel subscribed successfully."
    } else {
        "Channel unsubscribed successfully."
    };
    Ok(ApiResponse::ok(outcome, message))
}

pub async fn channel_subscribers(
    State(state): State<AppState>,
    ApiPath(channel_id): ApiPath<String>,
) -> ApiResult<Vec<Subscription>> {
    let subscribers = state.services.subscriptions.subscribers(&channel_id).await?;
    Ok(ApiResponse::ok(subscribers, "Subscribers fetched successfully."))
}

pub async fn subscribed_channels(
    State(state): State<AppState>,
    ApiPath(subscriber_id): ApiPath<String>,
) -> ApiResult<Vec<Subscription>> {
    let channels = state
        .services
        .subscriptions
        .subscribed_channels(&subscriber_id)
        .await?;
    Ok(ApiResponse::ok(channels, "Subscribed channels fetched successfully."))
}
