//! # Input schemas
//!
//! Request payloads arrive as loosely typed `*Input` structs (every field
//! optional, exactly as a client may send them). Each one validates into a
//! fully populated command before it touches storage.

use bytes::Bytes;
use mime::Mime;
use serde::Deserialize;
use vs_core::ids::parse_optional_id;
use vs_core::query::{Filter, Page, QueryPlan, Sort};
use vs_core::{AppError, Result};

/// Public sort keys for video listings and the columns they map to.
pub const VIDEO_SORTABLE: &[(&str, &str)] = &[
    ("title", "title"),
    ("duration", "duration"),
    ("views", "views"),
    ("createdAt", "created_at"),
    ("updatedAt", "updated_at"),
];

/// Fields the free-text `query` parameter searches.
pub const VIDEO_TEXT_FIELDS: &[&str] = &["title", "description"];

/// Trims `value`; blank or missing is an `InvalidArgument` carrying `message`.
pub fn required_text(value: Option<String>, message: &str) -> Result<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
        .ok_or_else(|| AppError::invalid(message))
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl PageQuery {
    pub fn to_page(&self) -> Result<Page> {
        Page::parse(self.page.as_deref(), self.limit.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub query: Option<String>,
    pub sort_by: Option<String>,
    pub sort_type: Option<String>,
    pub user_id: Option<String>,
}

impl VideoListQuery {
    pub fn to_plan(&self) -> Result<QueryPlan> {
        let owner = parse_optional_id("user", self.user_id.as_deref())?;
        let sort = Sort::parse(
            self.sort_by.as_deref(),
            self.sort_type.as_deref(),
            VIDEO_SORTABLE,
        )?;
        let page = Page::parse(self.page.as_deref(), self.limit.as_deref())?;
        Ok(QueryPlan::build(
            [
                Filter::id_equals("owner_id", owner),
                Filter::contains(VIDEO_TEXT_FIELDS, self.query.as_deref()),
            ],
            sort,
            page,
        ))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentInput {
    pub content: Option<String>,
}

impl ContentInput {
    pub fn validate(self) -> Result<String> {
        required_text(self.content, "Content is required")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TweetUpdateInput {
    pub new_content: Option<String>,
}

impl TweetUpdateInput {
    pub fn validate(self) -> Result<String> {
        required_text(self.new_content, "New content is required")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaylistInput {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistDetails {
    pub name: String,
    pub description: String,
}

impl PlaylistInput {
    pub fn validate(self) -> Result<PlaylistDetails> {
        const MESSAGE: &str = "Playlist name and description are required";
        Ok(PlaylistDetails {
            name: required_text(self.name, MESSAGE)?,
            description: required_text(self.description, MESSAGE)?,
        })
    }
}

/// One file part of a multipart request, before validation.
#[derive(Debug, Clone, Default)]
pub struct Upload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// A file part whose media type has been resolved and checked.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaUpload {
    pub content_type: Mime,
    pub data: Bytes,
}

impl Upload {
    /// Resolves the media type from the declared content type, falling back to
    /// the file extension, and requires its top-level type to be `expected`.
    pub fn validate(self, expected: mime::Name<'_>, label: &str) -> Result<MediaUpload> {
        if self.data.is_empty() {
            return Err(AppError::invalid(format!("{label} file is empty")));
        }
        let declared = self
            .content_type
            .as_deref()
            .and_then(|raw| raw.parse::<Mime>().ok())
            .filter(|parsed| *parsed != mime::APPLICATION_OCTET_STREAM);
        let content_type = declared
            .or_else(|| {
                self.file_name
                    .as_deref()
                    .and_then(|name| mime_guess::from_path(name).first())
            })
            .ok_or_else(|| AppError::invalid(format!("{label} file type is unknown")))?;
        if content_type.type_() != expected {
            return Err(AppError::invalid(format!(
                "{label} file must be {expected}/*, got {content_type}"
            )));
        }
        Ok(MediaUpload {
            content_type,
            data: self.data,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct PublishVideoInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub video_file: Option<Upload>,
    pub thumbnail: Option<Upload>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PublishVideo {
    pub title: String,
    pub description: String,
    pub video_file: MediaUpload,
    pub thumbnail: MediaUpload,
}

impl PublishVideoInput {
    pub fn validate(self) -> Result<PublishVideo> {
        let title = required_text(self.title, "Title is required")?;
        let description = required_text(self.description, "Description is required")?;
        let video_file = self
            .video_file
            .ok_or_else(|| AppError::invalid("Video file is required"))?
            .validate(mime::VIDEO, "Video")?;
        let thumbnail = self
            .thumbnail
            .ok_or_else(|| AppError::invalid("Thumbnail file is required"))?
            .validate(mime::IMAGE, "Thumbnail")?;
        Ok(PublishVideo {
            title,
            description,
            video_file,
            thumbnail,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct UpdateVideoInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub thumbnail: Option<Upload>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateVideo {
    pub title: String,
    pub description: String,
    pub thumbnail: MediaUpload,
}

impl UpdateVideoInput {
    pub fn validate(self) -> Result<UpdateVideo> {
        const MESSAGE: &str = "All fields are required";
        let title = required_text(self.title, MESSAGE)?;
        let description = required_text(self.description, MESSAGE)?;
        let thumbnail = self
            .thumbnail
            .ok_or_else(|| AppError::invalid("Thumbnail file is required"))?
            .validate(mime::IMAGE, "Thumbnail")?;
        Ok(UpdateVideo {
            title,
            description,
            thumbnail,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;
    use vs_core::query::FilterValue;

    fn upload(content_type: Option<&str>, file_name: Option<&str>) -> Upload {
        Upload {
            file_name: file_name.map(str::to_string),
            content_type: content_type.map(str::to_string),
            data: Bytes::from_static(b"\x00\x01"),
        }
    }

    #[test]
    fn required_text_trims() {
        assert_eq!(required_text(Some("  hi ".into()), "m").unwrap(), "hi");
        assert!(required_text(Some(" \t ".into()), "m").is_err());
        assert!(required_text(None, "m").is_err());
    }

    #[test]
    fn playlist_needs_both_fields() {
        let input = PlaylistInput {
            name: Some("Rust".into()),
            description: Some("   ".into()),
        };
        let err = input.validate().unwrap_err();
        assert_eq!(err.to_string(), "Playlist name and description are required");
    }

    #[test]
    fn video_list_query_builds_plan() {
        let owner = Uuid::now_v7();
        let query = VideoListQuery {
            page: Some("3".into()),
            limit: Some("5".into()),
            query: Some("borrow".into()),
            sort_by: Some("views".into()),
            sort_type: Some("desc".into()),
            user_id: Some(owner.to_string()),
        };
        let plan = query.to_plan().unwrap();
        assert_eq!(plan.skip, 10);
        assert_eq!(plan.take, 5);
        assert_eq!(plan.sort.unwrap().field, "views");
        assert_eq!(
            plan.filters[0],
            Filter::Equals {
                field: "owner_id",
                value: FilterValue::Id(owner)
            }
        );
        assert!(matches!(plan.filters[1], Filter::Contains { ref needle, .. } if needle == "borrow"));
    }

    #[test]
    fn video_list_query_rejects_bad_user_id() {
        let query = VideoListQuery {
            user_id: Some("abc".into()),
            ..Default::default()
        };
        assert_eq!(query.to_plan().unwrap_err().status_code(), 400);
    }

    #[test]
    fn upload_falls_back_to_file_extension() {
        let media = upload(Some("application/octet-stream"), Some("clip.mp4"))
            .validate(mime::VIDEO, "Video")
            .unwrap();
        assert_eq!(media.content_type.essence_str(), "video/mp4");
    }

    #[test]
    fn upload_rejects_wrong_type_and_empty_data() {
        let err = upload(Some("image/png"), None).validate(mime::VIDEO, "Video").unwrap_err();
        assert_eq!(err.status_code(), 400);

        let empty = Upload {
            data: Bytes::new(),
            ..upload(Some("video/mp4"), None)
        };
        assert!(empty.validate(mime::VIDEO, "Video").is_err());
    }

    #[test]
    fn publish_requires_both_files() {
        let input = PublishVideoInput {
            title: Some("Title".into()),
            description: Some("Desc".into()),
            video_file: Some(upload(Some("video/webm"), None)),
            thumbnail: None,
        };
        assert_eq!(input.validate().unwrap_err().to_string(), "Thumbnail file is required");
    }
}
