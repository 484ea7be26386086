use std::sync::Arc;

use tracing::info;
use uuid::Uuid;
use vs_core::ids::parse_id;
use vs_core::{Caller, Result, Subscription, SubscriptionRepo, Toggled, UserDirectory};

use crate::require;
use crate::toggle::{toggle, SubscriptionKey, SubscriptionToggle};

#[derive(Clone)]
pub struct SubscriptionService {
    subscriptions: Arc<dyn SubscriptionRepo>,
    users: Arc<dyn UserDirectory>,
}

impl SubscriptionService {
    pub fn new(subscriptions: Arc<dyn SubscriptionRepo>, users: Arc<dyn UserDirectory>) -> Self {
        Self {
            subscriptions,
            users,
        }
    }

    pub async fn toggle(&self, caller: &Caller, channel_id: &str) -> Result<Toggled<Subscription>> {
        let channel_id = parse_id("channel", channel_id)?;
        let engine = SubscriptionToggle {
            subscriptions: self.subscriptions.as_ref(),
            users: self.users.as_ref(),
        };
        let key = SubscriptionKey {
            subscriber_id: caller.user_id,
            channel_id,
        };
        let outcome = toggle(&engine, &key).await?;
        info!(
            %channel_id,
            subscriber = %caller.user_id,
            subscribed = outcome.is_created(),
            "subscription toggled"
        );
        Ok(outcome)
    }

    pub async fn subscribers(&self, channel_id: &str) -> Result<Vec<Subscription>> {
        let channel_id = self.existing_user("channel", channel_id, "Channel not found").await?;
        self.subscriptions.subscribers_of(channel_id).await
    }

    pub async fn subscribed_channels(&self, subscriber_id: &str) -> Result<Vec<Subscription>> {
        let subscriber_id = self
            .existing_user("subscriber", subscriber_id, "Subscriber not found")
            .await?;
        self.subscriptions.subscriptions_of(subscriber_id).await
    }

    async fn existing_user(&self, kind: &str, raw: &str, missing: &str) -> Result<Uuid> {
        let id = parse_id(kind, raw)?;
        require(self.users.get_user(id).await?, missing)?;
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vs_core::ids::new_id;
    use vs_core::{AppError, MockSubscriptionRepo, MockUserDirectory};

    #[tokio::test]
    async fn unknown_channel_cannot_be_subscribed() {
        let mut users = MockUserDirectory::new();
        users.expect_get_user().returning(|_| Ok(None));
        let mut subscriptions = MockSubscriptionRepo::new();
        subscriptions.expect_find_subscription().never();

        let service = SubscriptionService::new(Arc::new(subscriptions), Arc::new(users));
        let err = service
            .toggle(&Caller::new(new_id()), &new_id().to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref m) if m == "Channel not found"));
    }

    #[tokio::test]
    async fn malformed_channel_id_is_invalid() {
        let service = SubscriptionService::new(
            Arc::new(MockSubscriptionRepo::new()),
            Arc::new(MockUserDirectory::new()),
        );
        let err = service.subscribers("42").await.unwrap_err();
        assert_eq!(err.status_code(), 400);
    }
}
