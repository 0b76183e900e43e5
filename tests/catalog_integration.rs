use axum::http::StatusCode;
use axum_test::TestServer;
use axum_test::multipart::{MultipartForm, Part};
use serde_json::{Value, json};
use tempfile::TempDir;
use vitrine::{
    AdminConfig, AppConfig, AppState, BlogConfig, Config, ServerConfig, UploadsConfig, create_app,
    store::{PostPayload, PostStatus},
};

const ADMIN_EMAIL: &str = "admin@example.com";

async fn setup_test_server() -> (TempDir, TestServer, AppState) {
    let temp_dir = TempDir::new().unwrap();

    let registry_file = temp_dir.path().join("admins.toml");
    std::fs::write(&registry_file, format!("emails = [\"{}\"]\n", ADMIN_EMAIL)).unwrap();

    let config = Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        app: AppConfig {
            name: "TestServer".to_string(),
            log_level: "error".to_string(),
            session_secret: "test-session-secret".to_string(),
            base_url: Some("http://localhost:8080".to_string()),
        },
        blog: BlogConfig {
            data_file: temp_dir.path().join("data").join("posts.json"),
            post_limit: 50,
            page_size: 6,
            max_results: 50,
            categories: vec!["Web Development".to_string(), "Automation".to_string()],
            default_author: "Admin".to_string(),
            default_read_time: "6 min read".to_string(),
        },
        uploads: UploadsConfig {
            directory: temp_dir.path().join("uploads"),
            url_prefix: "/uploads".to_string(),
            max_bytes: 5 * 1024 * 1024,
        },
        admin: AdminConfig {
            registry_file,
            session_max_age_seconds: 3600,
        },
    };

    let state = AppState::initialize(config).await.unwrap();
    let server = TestServer::builder()
        .save_cookies()
        .build(create_app(state.clone()))
        .unwrap();

    (temp_dir, server, state)
}

async fn seed_post(state: &AppState, title: &str, category: &str, tags: &[&str], featured: bool) {
    state
        .store
        .create(PostPayload {
            title: title.to_string(),
            category: category.to_string(),
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
            featured,
            ..PostPayload::default()
        })
        .await
        .unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(2)).await;
}

#[tokio::test]
async fn test_catalog_shows_published_posts_only() {
    let (_temp_dir, server, state) = setup_test_server().await;

    seed_post(&state, "Visible", "Web Development", &[], false).await;
    state
        .store
        .create(PostPayload {
            title: "Hidden draft".to_string(),
            status: PostStatus::Draft,
            ..PostPayload::default()
        })
        .await
        .unwrap();

    let body: Value = server.get("/api/blog").await.json();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["total"], json!(1));
    assert_eq!(body["data"]["posts"][0]["title"], json!("Visible"));
}

#[tokio::test]
async fn test_catalog_search_and_category_are_conjunctive() {
    let (_temp_dir, server, state) = setup_test_server().await;

    seed_post(&state, "Hello", "Web Development", &["a", "b"], false).await;
    seed_post(&state, "Hello elsewhere", "Automation", &[], false).await;
    seed_post(&state, "Goodbye", "Web Development", &[], false).await;

    // Case-insensitive search
    let search: Value = server.get("/api/blog?q=hELLo").await.json();
    assert_eq!(search["data"]["total"], json!(2));

    // Search and category together
    let both: Value = server
        .get("/api/blog?q=hello&category=Web%20Development")
        .await
        .json();
    assert_eq!(both["data"]["total"], json!(1));
    assert_eq!(both["data"]["posts"][0]["title"], json!("Hello"));
    assert_eq!(both["data"]["posts"][0]["tags"], json!(["a", "b"]));

    // A category the post does not carry excludes it
    let excluded: Value = server
        .get("/api/blog?q=goodbye&category=Automation")
        .await
        .json();
    assert_eq!(excluded["data"]["total"], json!(0));

    // Tag search matches too
    let by_tag: Value = server.get("/api/blog?q=b").await.json();
    assert!(by_tag["data"]["total"].as_u64().unwrap() >= 1);
}

#[tokio::test]
async fn test_catalog_facets_count_configured_categories() {
    let (_temp_dir, server, state) = setup_test_server().await;

    seed_post(&state, "One", "Web Development", &[], false).await;
    seed_post(&state, "Two", "Web Development", &[], false).await;
    seed_post(&state, "Three", "Automation", &[], false).await;
    seed_post(&state, "Off the map", "Cooking", &[], false).await;

    let body: Value = server.get("/api/blog").await.json();
    let facets = body["data"]["facets"].as_array().unwrap();

    assert_eq!(facets[0]["category"], json!("All"));
    assert_eq!(facets[0]["count"], json!(4));
    assert_eq!(facets[1]["category"], json!("Web Development"));
    assert_eq!(facets[1]["count"], json!(2));
    assert_eq!(facets[2]["category"], json!("Automation"));
    assert_eq!(facets[2]["count"], json!(1));
    // "Cooking" contributes to no bucket; its post is visible under All only
    assert_eq!(facets.len(), 3);
}

#[tokio::test]
async fn test_catalog_featured_selection_and_search_suppression() {
    let (_temp_dir, server, state) = setup_test_server().await;

    seed_post(&state, "Newest plain", "Web Development", &[], false).await;
    seed_post(&state, "The hero", "Automation", &["featured"], true).await;

    // First featured post in filtered order becomes the hero
    let body: Value = server.get("/api/blog").await.json();
    assert_eq!(body["data"]["featured"]["title"], json!("The hero"));

    // With no featured post, the first post stands in
    let solo: Value = server.get("/api/blog?category=Web%20Development").await.json();
    assert_eq!(solo["data"]["featured"]["title"], json!("Newest plain"));

    // An active search suppresses the hero section entirely
    let searched: Value = server.get("/api/blog?q=hero").await.json();
    assert!(searched["data"].get("featured").is_none());
}

#[tokio::test]
async fn test_catalog_paginates_in_recency_order() {
    let (_temp_dir, server, state) = setup_test_server().await;

    for i in 0..8 {
        seed_post(&state, &format!("Post {}", i), "Automation", &[], false).await;
    }

    let page1: Value = server.get("/api/blog").await.json();
    assert_eq!(page1["data"]["total"], json!(8));
    assert_eq!(page1["data"]["totalPages"], json!(2));
    assert_eq!(page1["data"]["posts"].as_array().unwrap().len(), 6);
    // Most recent first
    assert_eq!(page1["data"]["posts"][0]["title"], json!("Post 7"));

    let page2: Value = server.get("/api/blog?page=2").await.json();
    assert_eq!(page2["data"]["posts"].as_array().unwrap().len(), 2);
    assert_eq!(page2["data"]["posts"][1]["title"], json!("Post 0"));
}

#[tokio::test]
async fn test_upload_then_serve_roundtrip() {
    let (_temp_dir, server, _state) = setup_test_server().await;

    let login = server
        .post("/api/admin/verify")
        .json(&json!({"email": ADMIN_EMAIL}))
        .await;
    login.assert_status_ok();

    let form = MultipartForm::new().add_part(
        "image",
        Part::bytes(b"png bytes".to_vec())
            .file_name("cover.png")
            .mime_type("image/png"),
    );
    let uploaded = server.post("/api/admin/images").multipart(form).await;
    uploaded.assert_status_ok();
    let body: Value = uploaded.json();
    assert_eq!(body["success"], json!(true));

    let image_url = body["imageUrl"].as_str().unwrap();
    assert!(image_url.starts_with("/uploads/"));
    assert!(image_url.ends_with(".png"));

    let served = server.get(image_url).await;
    served.assert_status_ok();
    assert_eq!(served.header("content-type"), "image/png");
}

#[tokio::test]
async fn test_upload_rejections() {
    let (_temp_dir, server, _state) = setup_test_server().await;

    let login = server
        .post("/api/admin/verify")
        .json(&json!({"email": ADMIN_EMAIL}))
        .await;
    login.assert_status_ok();

    // A 6 MiB image is rejected before any file is written
    let oversized = MultipartForm::new().add_part(
        "image",
        Part::bytes(vec![0u8; 6 * 1024 * 1024])
            .file_name("huge.png")
            .mime_type("image/png"),
    );
    let response = server.post("/api/admin/images").multipart(oversized).await;
    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);

    // Non-image media types are refused
    let document = MultipartForm::new().add_part(
        "image",
        Part::bytes(b"%PDF-1.4".to_vec())
            .file_name("doc.pdf")
            .mime_type("application/pdf"),
    );
    let response = server.post("/api/admin/images").multipart(document).await;
    response.assert_status(StatusCode::UNSUPPORTED_MEDIA_TYPE);

    // Uploads are a write path: no session, no upload
    let anonymous_server_form = MultipartForm::new().add_part(
        "image",
        Part::bytes(b"png".to_vec())
            .file_name("a.png")
            .mime_type("image/png"),
    );
    server.post("/api/admin/logout").await.assert_status_ok();
    let response = server
        .post("/api/admin/images")
        .multipart(anonymous_server_form)
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_missing_image_falls_back_to_placeholder() {
    let (_temp_dir, server, _state) = setup_test_server().await;

    let response = server.get("/uploads/does-not-exist.png").await;
    response.assert_status_ok();
    assert_eq!(response.header("content-type"), "image/svg+xml");
}
