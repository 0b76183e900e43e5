use super::{
    editor::{Editor, EditorForm, EditorMode},
    error::AdminError,
    session,
};
use crate::{
    AppState,
    store::{BlogPost, ListFilter, PostStatus, StoreError, StoreStats},
};
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, header::SET_COOKIE},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AdminListQuery {
    pub status: Option<PostStatus>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct PostListResponse {
    pub success: bool,
    pub data: Vec<BlogPost>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub success: bool,
    pub data: BlogPost,
}

#[derive(Debug, Serialize)]
pub struct EditResponse {
    pub success: bool,
    pub mode: &'static str,
    pub id: Uuid,
    pub form: EditorForm,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub success: bool,
    pub data: StoreStats,
}

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Deserialize)]
pub struct CleanupRequest {
    pub count: usize,
    #[serde(default)]
    pub confirmed: bool,
}

#[derive(Debug, Serialize)]
pub struct CleanupResponse {
    pub success: bool,
    pub deleted: usize,
}

/// Email-gated login. A registered email receives a signed, expiring session
/// cookie; anything else answers `success: false` without detail.
pub async fn verify_admin_handler(
    State(app_state): State<AppState>,
    Json(request): Json<VerifyRequest>,
) -> impl IntoResponse {
    let email = request.email.trim().to_lowercase();

    if !app_state.registry.is_registered(&email).await {
        warn!("Admin verification failed for unregistered email");
        let response = MessageResponse {
            success: false,
            message: "Email is not registered as an administrator".to_string(),
        };
        return (HeaderMap::new(), Json(response));
    }

    let max_age = app_state.config.admin.session_max_age_seconds;
    match session::create_session_token(&app_state.config.app.session_secret, &email, max_age) {
        Ok(token) => {
            let mut headers = HeaderMap::new();
            if let Ok(cookie) = session::session_cookie(&token, max_age).parse() {
                headers.insert(SET_COOKIE, cookie);
            }

            info!("Administrator {} verified", email);
            let response = MessageResponse {
                success: true,
                message: "Administrator session established".to_string(),
            };
            (headers, Json(response))
        }
        Err(_) => {
            let response = MessageResponse {
                success: false,
                message: "Server error".to_string(),
            };
            (HeaderMap::new(), Json(response))
        }
    }
}

/// Session restore. Failures are silent: an invalid, expired, or
/// no-longer-registered session just reads as not logged in.
pub async fn session_handler(
    State(app_state): State<AppState>,
    headers: HeaderMap,
) -> Json<SessionResponse> {
    let email = session::session_email(&headers, &app_state.config.app.session_secret);

    match email {
        Some(email) if app_state.registry.is_registered(&email).await => Json(SessionResponse {
            success: true,
            email: Some(email),
        }),
        _ => Json(SessionResponse {
            success: false,
            email: None,
        }),
    }
}

pub async fn logout_handler() -> impl IntoResponse {
    let mut headers = HeaderMap::new();
    if let Ok(cookie) = session::clear_session_cookie().parse() {
        headers.insert(SET_COOKIE, cookie);
    }

    (
        headers,
        Json(MessageResponse {
            success: true,
            message: "Logged out".to_string(),
        }),
    )
}

pub async fn list_posts_handler(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<AdminListQuery>,
) -> Result<Json<PostListResponse>, AdminError> {
    session::require_admin(&headers, &app_state).await?;

    let result = app_state
        .store
        .list(ListFilter {
            status: query.status,
            page: query.page,
            limit: query.limit,
        })
        .await;

    Ok(Json(PostListResponse {
        success: true,
        data: result.items,
        total: result.total,
    }))
}

pub async fn create_post_handler(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Json(form): Json<EditorForm>,
) -> Result<Json<PostResponse>, AdminError> {
    let email = session::require_admin(&headers, &app_state).await?;

    let post = app_state.store.create(form.into_payload()?).await?;
    info!("Admin {} created post {}", email, post.id);

    Ok(Json(PostResponse {
        success: true,
        data: post,
    }))
}

/// Entering Edit mode: seeds the editor's working copy from the selected
/// post, tags re-joined for the tag-input field.
pub async fn edit_post_handler(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<EditResponse>, AdminError> {
    session::require_admin(&headers, &app_state).await?;

    let post = app_state
        .store
        .get(id)
        .await
        .ok_or(StoreError::NotFound(id))?;

    let mut editor = Editor::new();
    editor.begin_edit(&post);
    debug_assert_eq!(editor.mode(), EditorMode::Edit(id));

    Ok(Json(EditResponse {
        success: true,
        mode: "edit",
        id,
        form: editor.form().clone(),
    }))
}

pub async fn update_post_handler(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(form): Json<EditorForm>,
) -> Result<Json<PostResponse>, AdminError> {
    let email = session::require_admin(&headers, &app_state).await?;

    let post = app_state.store.update(id, form.into_payload()?).await?;
    info!("Admin {} updated post {}", email, id);

    Ok(Json(PostResponse {
        success: true,
        data: post,
    }))
}

/// Destructive; refuses to run without the explicit confirmation flag.
pub async fn delete_post_handler(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Query(query): Query<DeleteQuery>,
) -> Result<Json<MessageResponse>, AdminError> {
    let email = session::require_admin(&headers, &app_state).await?;

    if !query.confirm {
        return Err(AdminError::ConfirmationRequired);
    }

    app_state.store.delete(id).await?;
    info!("Admin {} deleted post {}", email, id);

    Ok(Json(MessageResponse {
        success: true,
        message: "Post deleted".to_string(),
    }))
}

pub async fn stats_handler(
    State(app_state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<StatsResponse>, AdminError> {
    session::require_admin(&headers, &app_state).await?;

    Ok(Json(StatsResponse {
        success: true,
        data: app_state.store.stats().await,
    }))
}

/// Bulk deletion of the oldest documents. Destructive and irreversible;
/// requires the explicit confirmation flag in the body.
pub async fn cleanup_handler(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CleanupRequest>,
) -> Result<Json<CleanupResponse>, AdminError> {
    let email = session::require_admin(&headers, &app_state).await?;

    if !request.confirmed {
        return Err(AdminError::ConfirmationRequired);
    }

    let deleted = app_state.store.cleanup_oldest(request.count).await?;
    info!("Admin {} cleaned up {} oldest posts", email, deleted);

    Ok(Json(CleanupResponse {
        success: true,
        deleted,
    }))
}
