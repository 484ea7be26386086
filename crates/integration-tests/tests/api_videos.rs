mod common;

use axum::http::{Method, StatusCode};
use common::{id_of, png, video_parts, Part, TestApp};
use serde_json::Value;

fn titles(reply: &Value) -> Vec<String> {
    reply["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|video| video["title"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn publish_stores_media_and_returns_the_record() {
    let app = TestApp::spawn().await;
    let owner = app.user("alice").await;

    let reply = app
        .multipart(Method::POST, "/api/v1/videos", &owner, video_parts("Lifetimes"))
        .await;
    assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.body);
    assert_eq!(reply.message(), "Video published successfully");

    let video = reply.data();
    assert_eq!(video["title"], "Lifetimes");
    assert_eq!(video["ownerId"], owner.id.to_string());
    assert_eq!(video["views"], 0);
    assert_eq!(video["isPublished"], true);
    assert_eq!(video["duration"], 0.0);

    let file_url = video["videoFile"].as_str().unwrap();
    let thumb_url = video["thumbnail"].as_str().unwrap();
    assert!(file_url.starts_with("/media/") && file_url.ends_with(".mp4"), "{file_url}");
    assert!(thumb_url.ends_with(".webp"), "{thumb_url}");
    for url in [file_url, thumb_url] {
        let on_disk = app.media_dir.path().join(url.trim_start_matches("/media/"));
        assert!(on_disk.exists(), "{} missing", on_disk.display());
    }
}

#[tokio::test]
async fn publish_validates_its_parts() {
    let app = TestApp::spawn().await;
    let owner = app.user("alice").await;

    let mut parts = video_parts("No thumb");
    parts.pop();
    let reply = app.multipart(Method::POST, "/api/v1/videos", &owner, parts).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.message(), "Thumbnail file is required");

    let parts = vec![
        Part::Text("title", "Wrong type".into()),
        Part::Text("description", "An image posing as a video".into()),
        Part::File {
            name: "videoFile",
            file_name: "clip.png",
            content_type: "image/png",
            data: png(4, 4),
        },
        Part::File {
            name: "thumbnail",
            file_name: "thumb.png",
            content_type: "image/png",
            data: png(4, 4),
        },
    ];
    let reply = app.multipart(Method::POST, "/api/v1/videos", &owner, parts).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);

    let mut parts = video_parts("Broken thumb");
    parts.pop();
    parts.push(Part::File {
        name: "thumbnail",
        file_name: "thumb.png",
        content_type: "image/png",
        data: b"definitely not a png".to_vec(),
    });
    let reply = app.multipart(Method::POST, "/api/v1/videos", &owner, parts).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.message(), "Thumbnail is not a readable image");
}

#[tokio::test]
async fn listing_filters_sorts_and_pages() {
    let app = TestApp::spawn().await;
    let alice = app.user("alice").await;
    let bob = app.user("bob").await;
    for title in ["Traits", "Async Rust", "Macros"] {
        app.publish(&alice, title).await;
    }
    app.publish(&bob, "Rust for Bob").await;

    let all = app.get("/api/v1/videos", &alice).await;
    assert_eq!(all.status, StatusCode::OK);
    assert_eq!(all.message(), "Videos fetched successfully");
    assert_eq!(titles(&all.body), ["Traits", "Async Rust", "Macros", "Rust for Bob"]);

    let search = app.get("/api/v1/videos?query=rust", &alice).await;
    assert_eq!(titles(&search.body), ["Async Rust", "Rust for Bob"]);

    let by_owner = app
        .get(&format!("/api/v1/videos?userId={}&sortBy=title&sortType=asc", alice.id), &alice)
        .await;
    assert_eq!(titles(&by_owner.body), ["Async Rust", "Macros", "Traits"]);

    let second_page = app.get("/api/v1/videos?page=2&limit=3", &alice).await;
    assert_eq!(titles(&second_page.body), ["Rust for Bob"]);

    let past_the_end = app.get("/api/v1/videos?page=9", &alice).await;
    assert_eq!(past_the_end.status, StatusCode::OK);
    assert_eq!(past_the_end.data(), &Value::Array(Vec::new()));

    let bad_sort = app.get("/api/v1/videos?sortBy=owner&sortType=asc", &alice).await;
    assert_eq!(bad_sort.status, StatusCode::BAD_REQUEST);

    let bad_limit = app.get("/api/v1/videos?limit=0", &alice).await;
    assert_eq!(bad_limit.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn only_the_owner_may_change_a_video() {
    let app = TestApp::spawn().await;
    let alice = app.user("alice").await;
    let bob = app.user("bob").await;
    let video_id = id_of(&app.publish(&alice, "Ownership").await);
    let uri = format!("/api/v1/videos/{video_id}");

    let update_parts = || {
        vec![
            Part::Text("title", "Borrowing".into()),
            Part::Text("description", "Shared and unique references".into()),
            Part::File {
                name: "thumbnail",
                file_name: "new.png",
                content_type: "image/png",
                data: png(64, 36),
            },
        ]
    };

    let denied = app.multipart(Method::PATCH, &uri, &bob, update_parts()).await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);
    assert_eq!(denied.message(), "You are not allowed to update this video");

    let denied = app.call(Method::DELETE, &uri, Some(&bob), None).await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    let updated = app.multipart(Method::PATCH, &uri, &alice, update_parts()).await;
    assert_eq!(updated.status, StatusCode::OK, "{}", updated.body);
    assert_eq!(updated.data()["title"], "Borrowing");

    let toggled = app
        .call(Method::PATCH, &format!("/api/v1/videos/toggle/publish/{video_id}"), Some(&alice), None)
        .await;
    assert_eq!(toggled.status, StatusCode::OK);
    assert_eq!(toggled.data()["isPublished"], false);

    let deleted = app.call(Method::DELETE, &uri, Some(&alice), None).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.message(), "Video deleted successfully");
    assert_eq!(deleted.data(), &serde_json::json!({}));

    let gone = app.get(&uri, &alice).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
    assert_eq!(gone.message(), "Video not found");
}

#[tokio::test]
async fn update_requires_every_field() {
    let app = TestApp::spawn().await;
    let alice = app.user("alice").await;
    let video_id = id_of(&app.publish(&alice, "Generics").await);

    let parts = vec![Part::Text("title", "Only a title".into())];
    let reply = app
        .multipart(Method::PATCH, &format!("/api/v1/videos/{video_id}"), &alice, parts)
        .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.message(), "All fields are required");
}

#[tokio::test]
async fn stranger_with_unreadable_form_is_forbidden() {
    let app = TestApp::spawn().await;
    let alice = app.user("alice").await;
    let bob = app.user("bob").await;
    let uri = format!("/api/v1/videos/{}", id_of(&app.publish(&alice, "Lifetimes").await));

    let denied = app.raw(Method::PATCH, &uri, &bob, "text/plain", "title=stolen").await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);
    assert_eq!(denied.message(), "You are not allowed to update this video");

    let owner = app.raw(Method::PATCH, &uri, &alice, "text/plain", "title=mine").await;
    assert_eq!(owner.status, StatusCode::BAD_REQUEST);
    assert_eq!(owner.body["success"], false);
}
