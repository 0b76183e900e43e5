use crate::store::BlogPost;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogQuery {
    /// Free-text search query; empty or absent matches everything.
    pub q: Option<String>,
    /// Category facet; absent or "All" disables category filtering.
    pub category: Option<String>,
    /// 1-based page index. Resets to 1 whenever the client changes the
    /// category or query.
    pub page: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FacetCount {
    pub category: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPage {
    pub posts: Vec<BlogPost>,
    pub page: usize,
    pub total_pages: usize,
    pub total: usize,
    pub facets: Vec<FacetCount>,
    /// Hero article. Suppressed entirely while a search query is active.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<BlogPost>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogResponse {
    pub success: bool,
    pub data: CatalogPage,
}
