//! Video catalogue: listing, publishing and owner-only edits.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use vs_core::guard::authorize;
use vs_core::ids::{new_id, parse_id};
use vs_core::{Caller, MediaKind, MediaStore, Result, Video, VideoRepo};

use crate::commands::{PublishVideoInput, UpdateVideoInput, VideoListQuery};
use crate::require;

#[derive(Clone)]
pub struct VideoService {
    videos: Arc<dyn VideoRepo>,
    media: Arc<dyn MediaStore>,
}

impl VideoService {
    pub fn new(videos: Arc<dyn VideoRepo>, media: Arc<dyn MediaStore>) -> Self {
        Self { videos, media }
    }

    /// Zero matches is an empty list, not an error.
    pub async fn list(&self, query: &VideoListQuery) -> Result<Vec<Video>> {
        let plan = query.to_plan()?;
        debug!(?plan, "listing videos");
        self.videos.list_videos(&plan).await
    }

    pub async fn publish(&self, caller: &Caller, input: PublishVideoInput) -> Result<Video> {
        let command = input.validate()?;

        let video_file = self
            .media
            .upload(MediaKind::Video, command.video_file.data, &command.video_file.content_type)
            .await?;
        let thumbnail = self
            .media
            .upload(MediaKind::Thumbnail, command.thumbnail.data, &command.thumbnail.content_type)
            .await?;

        let now = Utc::now();
        let video = self
            .videos
            .create_video(Video {
                id: new_id(),
                owner_id: caller.user_id,
                title: command.title,
                description: command.description,
                video_file: video_file.url,
                thumbnail: thumbnail.url,
                duration: video_file.duration.unwrap_or_default(),
                views: 0,
                is_published: true,
                created_at: now,
                updated_at: now,
            })
            .await?;

        info!(video_id = %video.id, owner = %caller.user_id, "video published");
        Ok(video)
    }

    pub async fn get(&self, video_id: &str) -> Result<Video> {
        let id = parse_id("video", video_id)?;
        require(self.videos.get_video(id).await?, "Video not found")
    }

    /// An unreadable form in `input` is reported only to the owner.
    pub async fn update(
        &self,
        caller: &Caller,
        video_id: &str,
        input: Result<UpdateVideoInput>,
    ) -> Result<Video> {
        let mut video = self.owned(caller, video_id, "update this video").await?;
        let command = input?.validate()?;

        let thumbnail = self
            .media
            .upload(MediaKind::Thumbnail, command.thumbnail.data, &command.thumbnail.content_type)
            .await?;

        video.title = command.title;
        video.description = command.description;
        video.thumbnail = thumbnail.url;
        video.updated_at = Utc::now();
        let video = self.videos.update_video(video).await?;

        info!(video_id = %video.id, "video updated");
        Ok(video)
    }

    pub async fn delete(&self, caller: &Caller, video_id: &str) -> Result<()> {
        let video = self.owned(caller, video_id, "delete this video").await?;
        self.videos.delete_video(video.id).await?;
        info!(video_id = %video.id, "video deleted");
        Ok(())
    }

    pub async fn toggle_publish(&self, caller: &Caller, video_id: &str) -> Result<Video> {
        let mut video = self
            .owned(caller, video_id, "toggle the publish status of this video")
            .await?;
        video.is_published = !video.is_published;
        video.updated_at = Utc::now();
        let video = self.videos.update_video(video).await?;
        info!(video_id = %video.id, published = video.is_published, "publish status toggled");
        Ok(video)
    }

    async fn owned(&self, caller: &Caller, video_id: &str, action: &str) -> Result<Video> {
        let id = parse_id("video", video_id)?;
        let video = require(self.videos.get_video(id).await?, "Video not found")?;
        authorize(&video, caller, action)?;
        Ok(video)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Upload;
    use bytes::Bytes;
    use uuid::Uuid;
    use vs_core::{AppError, MockMediaStore, MockVideoRepo, StoredMedia};

    fn video_owned_by(owner_id: Uuid) -> Video {
        let now = Utc::now();
        Video {
            id: new_id(),
            owner_id,
            title: "Ownership".into(),
            description: "Borrowing explained".into(),
            video_file: "/media/v.mp4".into(),
            thumbnail: "/media/t.webp".into(),
            duration: 61.0,
            views: 3,
            is_published: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn file(content_type: &str) -> Option<Upload> {
        Some(Upload {
            file_name: None,
            content_type: Some(content_type.into()),
            data: Bytes::from_static(b"bytes"),
        })
    }

    fn service(videos: MockVideoRepo, media: MockMediaStore) -> VideoService {
        VideoService::new(Arc::new(videos), Arc::new(media))
    }

    #[tokio::test]
    async fn publish_uploads_both_files_and_stores_urls() {
        let mut media = MockMediaStore::new();
        media.expect_upload().times(2).returning(|kind, _, _| {
            Ok(match kind {
                MediaKind::Video => StoredMedia {
                    url: "/media/clip.mp4".into(),
                    duration: Some(42.0),
                },
                MediaKind::Thumbnail => StoredMedia {
                    url: "/media/thumb.webp".into(),
                    duration: None,
                },
            })
        });
        let mut videos = MockVideoRepo::new();
        videos.expect_create_video().returning(Ok);

        let caller = Caller::new(new_id());
        let video = service(videos, media)
            .publish(
                &caller,
                PublishVideoInput {
                    title: Some(" Intro ".into()),
                    description: Some("First steps".into()),
                    video_file: file("video/mp4"),
                    thumbnail: file("image/png"),
                },
            )
            .await
            .unwrap();

        assert_eq!(video.title, "Intro");
        assert_eq!(video.owner_id, caller.user_id);
        assert_eq!(video.video_file, "/media/clip.mp4");
        assert_eq!(video.thumbnail, "/media/thumb.webp");
        assert_eq!(video.duration, 42.0);
        assert_eq!(video.views, 0);
        assert!(video.is_published);
    }

    #[tokio::test]
    async fn publish_without_files_never_uploads() {
        let mut media = MockMediaStore::new();
        media.expect_upload().never();
        let err = service(MockVideoRepo::new(), media)
            .publish(
                &Caller::new(new_id()),
                PublishVideoInput {
                    title: Some("t".into()),
                    description: Some("d".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn stranger_cannot_delete() {
        let video = video_owned_by(new_id());
        let id = video.id;
        let mut videos = MockVideoRepo::new();
        videos.expect_get_video().returning(move |_| Ok(Some(video.clone())));
        videos.expect_delete_video().never();

        let err = service(videos, MockMediaStore::new())
            .delete(&Caller::new(new_id()), &id.to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn stranger_update_is_forbidden_even_with_invalid_input() {
        let video = video_owned_by(new_id());
        let id = video.id;
        let mut videos = MockVideoRepo::new();
        videos.expect_get_video().returning(move |_| Ok(Some(video.clone())));

        let mut media = MockMediaStore::new();
        media.expect_upload().never();

        let err = service(videos, media)
            .update(&Caller::new(new_id()), &id.to_string(), Ok(UpdateVideoInput::default()))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 403);
    }

    #[tokio::test]
    async fn malformed_id_is_rejected_before_lookup() {
        let mut videos = MockVideoRepo::new();
        videos.expect_get_video().never();
        let err = service(videos, MockMediaStore::new()).get("not-an-id").await.unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn owner_toggles_publish_flag() {
        let owner = new_id();
        let video = video_owned_by(owner);
        let id = video.id;
        let mut videos = MockVideoRepo::new();
        videos.expect_get_video().returning(move |_| Ok(Some(video.clone())));
        videos.expect_update_video().returning(Ok);

        let toggled = service(videos, MockMediaStore::new())
            .toggle_publish(&Caller::new(owner), &id.to_string())
            .await
            .unwrap();
        assert!(!toggled.is_published);
    }
}
