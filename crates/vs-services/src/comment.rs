use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use vs_core::guard::authorize;
use vs_core::ids::{new_id, parse_id};
use vs_core::query::{Filter, QueryPlan, Sort};
use vs_core::{Caller, Comment, CommentRepo, Result, VideoRepo};

use crate::commands::{ContentInput, PageQuery};
use crate::require;

#[derive(Clone)]
pub struct CommentService {
    comments: Arc<dyn CommentRepo>,
    videos: Arc<dyn VideoRepo>,
}

impl CommentService {
    pub fn new(comments: Arc<dyn CommentRepo>, videos: Arc<dyn VideoRepo>) -> Self {
        Self { comments, videos }
    }

    /// One page of a video's comments, oldest first.
    pub async fn list_for_video(&self, video_id: &str, query: &PageQuery) -> Result<Vec<Comment>> {
        let video_id = parse_id("video", video_id)?;
        let page = query.to_page()?;
        require(self.videos.get_video(video_id).await?, "Video not found")?;

        let plan = QueryPlan::build(
            [Filter::id_equals("video_id", Some(video_id))],
            Some(Sort::ascending("created_at")),
            page,
        );
        debug!(%video_id, page = page.number(), "listing comments");
        self.comments.list_comments(&plan).await
    }

    pub async fn add(&self, caller: &Caller, video_id: &str, input: ContentInput) -> Result<Comment> {
        let video_id = parse_id("video", video_id)?;
        require(self.videos.get_video(video_id).await?, "Video not found")?;
        let content = input.validate()?;

        let now = Utc::now();
        let comment = self
            .comments
            .create_comment(Comment {
                id: new_id(),
                video_id,
                owner_id: caller.user_id,
                content,
                created_at: now,
                updated_at: now,
            })
            .await?;
        info!(comment_id = %comment.id, %video_id, "comment added");
        Ok(comment)
    }

    /// `input` is the decoded body; a decode failure surfaces only after the
    /// ownership check.
    pub async fn update(
        &self,
        caller: &Caller,
        comment_id: &str,
        input: Result<ContentInput>,
    ) -> Result<Comment> {
        let mut comment = self.owned(caller, comment_id, "update this comment").await?;
        comment.content = input?.validate()?;
        comment.updated_at = Utc::now();
        let comment = self.comments.update_comment(comment).await?;
        info!(comment_id = %comment.id, "comment updated");
        Ok(comment)
    }

    pub async fn delete(&self, caller: &Caller, comment_id: &str) -> Result<()> {
        let comment = self.owned(caller, comment_id, "delete this comment").await?;
        self.comments.delete_comment(comment.id).await?;
        info!(comment_id = %comment.id, "comment deleted");
        Ok(())
    }

    async fn owned(&self, caller: &Caller, comment_id: &str, action: &str) -> Result<Comment> {
        let id = parse_id("comment", comment_id)?;
        let comment = require(self.comments.get_comment(id).await?, "Comment not found")?;
        authorize(&comment, caller, action)?;
        Ok(comment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;
    use uuid::Uuid;
    use vs_core::{AppError, MockCommentRepo, MockVideoRepo};

    fn comment_owned_by(owner_id: Uuid) -> Comment {
        let now = Utc::now();
        Comment {
            id: new_id(),
            video_id: new_id(),
            owner_id,
            content: "nice".into(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn listing_unknown_video_is_not_found() {
        let mut videos = MockVideoRepo::new();
        videos.expect_get_video().returning(|_| Ok(None));
        let mut comments = MockCommentRepo::new();
        comments.expect_list_comments().never();

        let service = CommentService::new(Arc::new(comments), Arc::new(videos));
        let err = service
            .list_for_video(&new_id().to_string(), &PageQuery::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref m) if m == "Video not found"));
    }

    #[tokio::test]
    async fn stranger_update_is_forbidden_before_content_check() {
        let comment = comment_owned_by(new_id());
        let id = comment.id;
        let mut comments = MockCommentRepo::new();
        comments
            .expect_get_comment()
            .with(eq(id))
            .returning(move |_| Ok(Some(comment.clone())));
        comments.expect_update_comment().never();

        let service = CommentService::new(Arc::new(comments), Arc::new(MockVideoRepo::new()));
        let err = service
            .update(&Caller::new(new_id()), &id.to_string(), Ok(ContentInput { content: None }))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(ref m) if m == "You are not allowed to update this comment"));
    }

    #[tokio::test]
    async fn undecodable_body_reaches_only_the_owner() {
        let owner = new_id();
        let comment = comment_owned_by(owner);
        let id = comment.id;
        let mut comments = MockCommentRepo::new();
        comments.expect_get_comment().returning(move |_| Ok(Some(comment.clone())));
        comments.expect_update_comment().never();
        let service = CommentService::new(Arc::new(comments), Arc::new(MockVideoRepo::new()));

        let stranger = service
            .update(&Caller::new(new_id()), &id.to_string(), Err(AppError::invalid("bad json")))
            .await
            .unwrap_err();
        assert_eq!(stranger.status_code(), 403);

        let err = service
            .update(&Caller::new(owner), &id.to_string(), Err(AppError::invalid("bad json")))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(ref m) if m == "bad json"));
    }

    #[tokio::test]
    async fn owner_blank_update_is_invalid() {
        let owner = new_id();
        let comment = comment_owned_by(owner);
        let id = comment.id;
        let mut comments = MockCommentRepo::new();
        comments.expect_get_comment().returning(move |_| Ok(Some(comment.clone())));
        comments.expect_update_comment().never();

        let service = CommentService::new(Arc::new(comments), Arc::new(MockVideoRepo::new()));
        let err = service
            .update(
                &Caller::new(owner),
                &id.to_string(),
                Ok(ContentInput {
                    content: Some("  ".into()),
                }),
            )
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }
}
