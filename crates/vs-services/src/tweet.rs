use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use vs_core::guard::authorize;
use vs_core::ids::{new_id, parse_id};
use vs_core::{Caller, Result, Tweet, TweetRepo, UserDirectory};

use crate::commands::{ContentInput, TweetUpdateInput};
use crate::require;

#[derive(Clone)]
pub struct TweetService {
    tweets: Arc<dyn TweetRepo>,
    users: Arc<dyn UserDirectory>,
}

impl TweetService {
    pub fn new(tweets: Arc<dyn TweetRepo>, users: Arc<dyn UserDirectory>) -> Self {
        Self { tweets, users }
    }

    pub async fn create(&self, caller: &Caller, input: ContentInput) -> Result<Tweet> {
        let content = input.validate()?;
        let now = Utc::now();
        let tweet = self
            .tweets
            .create_tweet(Tweet {
                id: new_id(),
                owner_id: caller.user_id,
                content,
                created_at: now,
                updated_at: now,
            })
            .await?;
        info!(tweet_id = %tweet.id, owner = %caller.user_id, "tweet posted");
        Ok(tweet)
    }

    pub async fn user_tweets(&self, user_id: &str) -> Result<Vec<Tweet>> {
        let user_id = parse_id("user", user_id)?;
        require(self.users.get_user(user_id).await?, "User not found")?;
        self.tweets.tweets_by_owner(user_id).await
    }

    pub async fn update(
        &self,
        caller: &Caller,
        tweet_id: &str,
        input: Result<TweetUpdateInput>,
    ) -> Result<Tweet> {
        let mut tweet = self.owned(caller, tweet_id, "update this tweet").await?;
        tweet.content = input?.validate()?;
        tweet.updated_at = Utc::now();
        let tweet = self.tweets.update_tweet(tweet).await?;
        info!(tweet_id = %tweet.id, "tweet updated");
        Ok(tweet)
    }

    pub async fn delete(&self, caller: &Caller, tweet_id: &str) -> Result<()> {
        let tweet = self.owned(caller, tweet_id, "delete this tweet").await?;
        self.tweets.delete_tweet(tweet.id).await?;
        info!(tweet_id = %tweet.id, "tweet deleted");
        Ok(())
    }

    async fn owned(&self, caller: &Caller, tweet_id: &str, action: &str) -> Result<Tweet> {
        let id = parse_id("tweet", tweet_id)?;
        let tweet = require(self.tweets.get_tweet(id).await?, "Tweet not found")?;
        authorize(&tweet, caller, action)?;
        Ok(tweet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vs_core::{AppError, MockTweetRepo, MockUserDirectory};

    #[tokio::test]
    async fn unknown_user_has_no_tweets() {
        let mut users = MockUserDirectory::new();
        users.expect_get_user().returning(|_| Ok(None));
        let mut tweets = MockTweetRepo::new();
        tweets.expect_tweets_by_owner().never();

        let service = TweetService::new(Arc::new(tweets), Arc::new(users));
        let err = service.user_tweets(&new_id().to_string()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref m) if m == "User not found"));
    }

    #[tokio::test]
    async fn blank_tweet_is_rejected() {
        let mut tweets = MockTweetRepo::new();
        tweets.expect_create_tweet().never();
        let service = TweetService::new(Arc::new(tweets), Arc::new(MockUserDirectory::new()));
        let err = service
            .create(
                &Caller::new(new_id()),
                ContentInput {
                    content: Some("\n".into()),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn owner_updates_with_new_content() {
        let owner = new_id();
        let now = Utc::now();
        let tweet = Tweet {
            id: new_id(),
            owner_id: owner,
            content: "old".into(),
            created_at: now,
            updated_at: now,
        };
        let id = tweet.id;
        let mut tweets = MockTweetRepo::new();
        tweets.expect_get_tweet().returning(move |_| Ok(Some(tweet.clone())));
        tweets.expect_update_tweet().returning(Ok);

        let service = TweetService::new(Arc::new(tweets), Arc::new(MockUserDirectory::new()));
        let updated = service
            .update(
                &Caller::new(owner),
                &id.to_string(),
                Ok(TweetUpdateInput {
                    new_content: Some("new".into()),
                }),
            )
            .await
            .unwrap();
        assert_eq!(updated.content, "new");
    }
}
