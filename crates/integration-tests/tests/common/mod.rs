//! Shared harness: the real router over in-memory SQLite, local media in a
//! temp dir and HS256 tokens.
#![allow(dead_code)]

use std::io::Cursor;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use image::{DynamicImage, ImageFormat, RgbImage};
use secrecy::SecretString;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;
use vs_api::{ApiConfig, AppState};
use vs_auth_jwt::JwtIdentityProvider;
use vs_core::User;
use vs_db_sqlite::SqliteStore;
use vs_services::{Repositories, Services};
use vs_storage_local::LocalMediaStore;

const BOUNDARY: &str = "vidshare-test-boundary";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<SqliteStore>,
    pub jwt: Arc<JwtIdentityProvider>,
    pub media_dir: TempDir,
}

pub struct Reply {
    pub status: StatusCode,
    pub body: Value,
}

impl Reply {
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    pub fn message(&self) -> &str {
        self.body["message"].as_str().unwrap_or_default()
    }
}

/// A registered user and a valid access token for them.
pub struct TestUser {
    pub id: Uuid,
    pub token: String,
}

pub enum Part {
    Text(&'static str, String),
    File {
        name: &'static str,
        file_name: &'static str,
        content_type: &'static str,
        data: Vec<u8>,
    },
}

impl TestApp {
    pub async fn spawn() -> Self {
        let store = Arc::new(SqliteStore::connect("sqlite::memory:", 1).await.unwrap());
        let media_dir = TempDir::new().unwrap();
        let media = LocalMediaStore::new(media_dir.path(), "/media");
        let jwt = Arc::new(JwtIdentityProvider::new(
            &SecretString::from("integration-secret".to_string()),
            3600,
        ));

        let services = Services::new(Repositories::from_store(store.clone()), Arc::new(media));
        let state = AppState::new(services, jwt.clone());
        let config = ApiConfig {
            cors_origins: Vec::new(),
            max_upload_bytes: 8 * 1024 * 1024,
            media: None,
        };

        Self {
            router: vs_api::router(state, &config),
            store,
            jwt,
            media_dir,
        }
    }

    pub async fn user(&self, username: &str) -> TestUser {
        let user = User {
            id: Uuid::now_v7(),
            username: username.to_string(),
            created_at: Utc::now(),
        };
        self.store.insert_user(&user).await.unwrap();
        let token = self.jwt.issue_access_token(user.id, Some(username)).unwrap();
        TestUser { id: user.id, token }
    }

    pub async fn send(&self, request: Request<Body>) -> Reply {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        Reply { status, body }
    }

    pub async fn call(&self, method: Method, uri: &str, user: Option<&TestUser>, json: Option<Value>) -> Reply {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", user.token));
        }
        let body = match json {
            Some(json) => {
                builder = builder.header(CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        self.send(builder.body(body).unwrap()).await
    }

    /// Sends `body` verbatim under the given content type.
    pub async fn raw(&self, method: Method, uri: &str, user: &TestUser, content_type: &str, body: &str) -> Reply {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(AUTHORIZATION, format!("Bearer {}", user.token))
            .header(CONTENT_TYPE, content_type)
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn get(&self, uri: &str, user: &TestUser) -> Reply {
        self.call(Method::GET, uri, Some(user), None).await
    }

    /// Authenticates through the `accessToken` cookie instead of the header.
    pub async fn get_with_cookie(&self, uri: &str, user: &TestUser) -> Reply {
        let request = Request::builder()
            .uri(uri)
            .header(COOKIE, format!("accessToken={}", user.token))
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn multipart(&self, method: Method, uri: &str, user: &TestUser, parts: Vec<Part>) -> Reply {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(AUTHORIZATION, format!("Bearer {}", user.token))
            .header(CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
            .body(Body::from(multipart_body(parts)))
            .unwrap();
        self.send(request).await
    }

    /// Publishes a video through the API and returns its JSON record.
    pub async fn publish(&self, owner: &TestUser, title: &str) -> Value {
        let reply = self
            .multipart(Method::POST, "/api/v1/videos", owner, video_parts(title))
            .await;
        assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.body);
        reply.data().clone()
    }
}

pub fn id_of(record: &Value) -> String {
    record["id"].as_str().unwrap().to_string()
}

pub fn png(width: u32, height: u32) -> Vec<u8> {
    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, image::Rgb([200, 30, 30])));
    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

pub fn video_parts(title: &str) -> Vec<Part> {
    vec![
        Part::Text("title", title.to_string()),
        Part::Text("description", format!("About {title}")),
        Part::File {
            name: "videoFile",
            file_name: "clip.mp4",
            content_type: "video/mp4",
            data: format!("fake video bytes for {title}").into_bytes(),
        },
        Part::File {
            name: "thumbnail",
            file_name: "thumb.png",
            content_type: "image/png",
            data: png(32, 18),
        },
    ]
}

fn multipart_body(parts: Vec<Part>) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                file_name,
                content_type,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(&data);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}
