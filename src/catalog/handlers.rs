use super::{
    core,
    types::{CatalogPage, CatalogQuery, CatalogResponse},
};
use crate::AppState;
use axum::{
    extract::{Query, State},
    response::Json,
};

/// Public read path: one snapshot of published posts per request, filtered,
/// faceted, and paginated in memory. Performs no writes and is not gated by
/// the admin session.
pub async fn catalog_handler(
    State(app_state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Json<CatalogResponse> {
    let snapshot = app_state.store.published().await;
    let config = &app_state.config.blog;

    let search = query.q.unwrap_or_default();
    let search_active = !search.trim().is_empty();
    let category = query.category.as_deref().unwrap_or(core::ALL_CATEGORY);

    let facets = core::facet_counts(&snapshot, &config.categories);
    let filtered = core::filter(&snapshot, category, &search, config.max_results);
    let featured = core::select_featured(&filtered, search_active).cloned();

    let total = filtered.len();
    let page = query.page.unwrap_or(1).max(1);
    let posts = core::paginate(&filtered, page, config.page_size)
        .into_iter()
        .cloned()
        .collect();

    Json(CatalogResponse {
        success: true,
        data: CatalogPage {
            posts,
            page,
            total_pages: core::page_count(total, config.page_size),
            total,
            facets,
            featured,
        },
    })
}
