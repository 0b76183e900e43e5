use super::types::FacetCount;
use crate::store::BlogPost;

/// Implicit bucket that counts every post regardless of category.
pub const ALL_CATEGORY: &str = "All";

/// Per-category counts over the snapshot. The "All" bucket comes first and
/// counts everything; posts whose category matches no configured bucket are
/// only visible under "All".
pub fn facet_counts(posts: &[BlogPost], categories: &[String]) -> Vec<FacetCount> {
    let mut facets = Vec::with_capacity(categories.len() + 1);
    facets.push(FacetCount {
        category: ALL_CATEGORY.to_string(),
        count: posts.len(),
    });

    for category in categories {
        facets.push(FacetCount {
            category: category.clone(),
            count: posts
                .iter()
                .filter(|post| &post.category == category)
                .count(),
        });
    }

    facets
}

/// Case-insensitive substring match over title, excerpt, content, author,
/// category, and each tag. An empty query matches everything.
pub fn matches_query(post: &BlogPost, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }

    post.title.to_lowercase().contains(&query)
        || post.excerpt.to_lowercase().contains(&query)
        || post.content.to_lowercase().contains(&query)
        || post.author.to_lowercase().contains(&query)
        || post.category.to_lowercase().contains(&query)
        || post.tags.iter().any(|tag| tag.to_lowercase().contains(&query))
}

/// Conjunctive category + search filter, capped at `max_results` before
/// pagination. Input order is preserved.
pub fn filter<'a>(
    posts: &'a [BlogPost],
    category: &str,
    query: &str,
    max_results: usize,
) -> Vec<&'a BlogPost> {
    posts
        .iter()
        .filter(|post| category == ALL_CATEGORY || post.category == category)
        .filter(|post| matches_query(post, query))
        .take(max_results)
        .collect()
}

/// The first featured post in the filtered set, falling back to the first
/// post. While a search is active no hero article is shown at all.
pub fn select_featured<'a>(filtered: &[&'a BlogPost], search_active: bool) -> Option<&'a BlogPost> {
    if search_active {
        return None;
    }

    filtered
        .iter()
        .find(|post| post.featured)
        .or_else(|| filtered.first())
        .copied()
}

pub fn page_count(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size)
}

/// 1-based pagination over the filtered set.
pub fn paginate<'a>(filtered: &[&'a BlogPost], page: usize, page_size: usize) -> Vec<&'a BlogPost> {
    let page = page.max(1);
    let start = (page - 1) * page_size;
    if start >= filtered.len() {
        return Vec::new();
    }

    let end = (start + page_size).min(filtered.len());
    filtered[start..end].to_vec()
}
