use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod admin;
pub mod catalog;
pub mod startup_checks;
pub mod store;
pub mod uploads;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub app: AppConfig,
    pub blog: BlogConfig,
    pub uploads: UploadsConfig,
    pub admin: AdminConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub name: String,
    pub log_level: String,
    pub session_secret: String,
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BlogConfig {
    pub data_file: PathBuf,
    /// Soft cap on stored posts. Creation past it is allowed; stats report
    /// a negative remainder and cleanup reclaims the oldest documents.
    pub post_limit: usize,
    pub page_size: usize,
    pub max_results: usize,
    pub categories: Vec<String>,
    pub default_author: String,
    pub default_read_time: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UploadsConfig {
    pub directory: PathBuf,
    pub url_prefix: String,
    pub max_bytes: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AdminConfig {
    pub registry_file: PathBuf,
    pub session_max_age_seconds: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            app: AppConfig {
                name: "Vitrine".to_string(),
                log_level: "info".to_string(),
                session_secret: "change-me-in-production".to_string(),
                base_url: None,
            },
            blog: BlogConfig {
                data_file: PathBuf::from("data/posts.json"),
                post_limit: 50,
                page_size: 6,
                max_results: 50,
                categories: vec![
                    "Web Development".to_string(),
                    "Mobile Apps".to_string(),
                    "Automation".to_string(),
                    "E-Commerce".to_string(),
                    "Design".to_string(),
                ],
                default_author: "Admin".to_string(),
                default_read_time: "6 min read".to_string(),
            },
            uploads: UploadsConfig {
                directory: PathBuf::from("uploads"),
                url_prefix: "/uploads".to_string(),
                max_bytes: 5 * 1024 * 1024,
            },
            admin: AdminConfig {
                registry_file: PathBuf::from("admins.toml"),
                session_max_age_seconds: 86400,
            },
        }
    }
}

use axum::{Router, extract::DefaultBodyLimit};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<store::BlogStore>,
    pub images: uploads::ImageStore,
    pub registry: admin::RegistryManager,
    pub config: Config,
}

impl AppState {
    pub async fn initialize(
        config: Config,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let store = Arc::new(store::BlogStore::open(config.blog.clone()).await?);
        let images = uploads::ImageStore::new(config.uploads.clone());
        let registry = admin::RegistryManager::new(config.admin.registry_file.clone()).await?;

        Ok(Self {
            store,
            images,
            registry,
            config,
        })
    }
}

pub fn create_app(state: AppState) -> Router {
    // Multipart bodies must be allowed past the image size cap so oversized
    // uploads are answered with PayloadTooLarge instead of a bare 413.
    let upload_body_limit = state.config.uploads.max_bytes * 2;

    Router::new()
        .route("/api/blog", axum::routing::get(catalog::catalog_handler))
        .route(
            "/api/admin/verify",
            axum::routing::post(admin::verify_admin_handler),
        )
        .route(
            "/api/admin/session",
            axum::routing::get(admin::session_handler),
        )
        .route(
            "/api/admin/logout",
            axum::routing::post(admin::logout_handler),
        )
        .route(
            "/api/admin/posts",
            axum::routing::get(admin::list_posts_handler).post(admin::create_post_handler),
        )
        .route(
            "/api/admin/posts/{id}",
            axum::routing::put(admin::update_post_handler).delete(admin::delete_post_handler),
        )
        .route(
            "/api/admin/posts/{id}/edit",
            axum::routing::get(admin::edit_post_handler),
        )
        .route("/api/admin/stats", axum::routing::get(admin::stats_handler))
        .route(
            "/api/admin/cleanup",
            axum::routing::post(admin::cleanup_handler),
        )
        .route(
            "/api/admin/images",
            axum::routing::post(uploads::upload_image_handler)
                .layer(DefaultBodyLimit::max(upload_body_limit)),
        )
        .route(
            "/uploads/{*path}",
            axum::routing::get(uploads::serve_image_handler),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    let matched_path = request
                        .extensions()
                        .get::<axum::extract::MatchedPath>()
                        .map(|matched_path| matched_path.as_str());

                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        matched_path,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        tracing::info!(
                            target: "access_log",
                            status = %response.status(),
                            latency_ms = %latency.as_millis(),
                            "response"
                        );
                    },
                ),
        )
        .with_state(state)
}
