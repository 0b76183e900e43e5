#[cfg(test)]
mod tests {
    use super::super::core::*;
    use crate::store::{BlogPost, PostStatus};
    use chrono::Utc;
    use uuid::Uuid;

    fn post(title: &str, category: &str, tags: &[&str], featured: bool) -> BlogPost {
        let now = Utc::now();
        BlogPost {
            id: Uuid::new_v4(),
            title: title.to_string(),
            slug: None,
            excerpt: String::new(),
            content: String::new(),
            author: "Admin".to_string(),
            date: now,
            read_time: "6 min read".to_string(),
            category: category.to_string(),
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
            image: String::new(),
            featured,
            status: PostStatus::Published,
            views: 0,
            likes: 0,
            comments_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    fn categories() -> Vec<String> {
        vec!["Web Development".to_string(), "Automation".to_string()]
    }

    #[test]
    fn test_facet_counts_with_all_bucket() {
        let posts = vec![
            post("A", "Web Development", &[], false),
            post("B", "Web Development", &[], false),
            post("C", "Automation", &[], false),
            post("D", "Cooking", &[], false), // matches no configured bucket
        ];

        let facets = facet_counts(&posts, &categories());

        assert_eq!(facets.len(), 3);
        assert_eq!(facets[0].category, "All");
        assert_eq!(facets[0].count, 4);
        assert_eq!(facets[1].category, "Web Development");
        assert_eq!(facets[1].count, 2);
        assert_eq!(facets[2].category, "Automation");
        assert_eq!(facets[2].count, 1);
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let mut subject = post("Shipping Fast", "Web Development", &["rust", "axum"], false);
        subject.excerpt = "A short Excerpt".to_string();
        subject.content = "Long body text".to_string();
        subject.author = "Jordan".to_string();

        assert!(matches_query(&subject, "shipping"));
        assert!(matches_query(&subject, "EXCERPT"));
        assert!(matches_query(&subject, "body"));
        assert!(matches_query(&subject, "jordan"));
        assert!(matches_query(&subject, "web dev"));
        assert!(matches_query(&subject, "AXUM"));
        assert!(!matches_query(&subject, "kubernetes"));

        // Empty and whitespace queries match everything
        assert!(matches_query(&subject, ""));
        assert!(matches_query(&subject, "   "));
    }

    #[test]
    fn test_filter_is_conjunctive() {
        let posts = vec![
            post("Hello", "Web Development", &["a", "b"], false),
            post("Hello again", "Automation", &[], false),
            post("Goodbye", "Web Development", &[], false),
        ];

        let both = filter(&posts, "Web Development", "hello", 50);
        assert_eq!(both.len(), 1);
        assert_eq!(both[0].title, "Hello");

        let category_only = filter(&posts, "Web Development", "", 50);
        assert_eq!(category_only.len(), 2);

        let all = filter(&posts, ALL_CATEGORY, "", 50);
        assert_eq!(all.len(), 3);

        // Category the post does not carry excludes it
        let none = filter(&posts, "Automation", "hello", 50);
        assert_eq!(none.len(), 1);
        assert_eq!(none[0].title, "Hello again");
    }

    #[test]
    fn test_filter_caps_results_before_pagination() {
        let posts: Vec<BlogPost> = (0..80)
            .map(|i| post(&format!("Post {}", i), "Web Development", &[], false))
            .collect();

        let filtered = filter(&posts, ALL_CATEGORY, "", 50);
        assert_eq!(filtered.len(), 50);
        // Cap keeps the head of the snapshot order
        assert_eq!(filtered[0].title, "Post 0");
        assert_eq!(filtered[49].title, "Post 49");
    }

    #[test]
    fn test_featured_selection() {
        let posts = vec![
            post("First", "Web Development", &[], false),
            post("Hero", "Automation", &[], true),
            post("Another hero", "Automation", &[], true),
        ];
        let filtered: Vec<&BlogPost> = posts.iter().collect();

        // First featured post wins
        let hero = select_featured(&filtered, false).unwrap();
        assert_eq!(hero.title, "Hero");

        // No featured post: fall back to the first in filtered order
        let plain = vec![post("Only", "Design", &[], false)];
        let plain_refs: Vec<&BlogPost> = plain.iter().collect();
        assert_eq!(select_featured(&plain_refs, false).unwrap().title, "Only");

        // Active search suppresses the hero section entirely
        assert!(select_featured(&filtered, true).is_none());

        // Empty result set has no hero
        assert!(select_featured(&[], false).is_none());
    }

    #[test]
    fn test_pagination_pages_partition_the_filtered_order() {
        for total in [0usize, 1, 5, 6, 7, 12, 13] {
            let posts: Vec<BlogPost> = (0..total)
                .map(|i| post(&format!("Post {}", i), "Design", &[], false))
                .collect();
            let filtered: Vec<&BlogPost> = posts.iter().collect();

            let pages = page_count(total, 6);
            assert_eq!(pages, total.div_ceil(6));

            let mut seen = Vec::new();
            for page in 1..=pages {
                seen.extend(paginate(&filtered, page, 6).iter().map(|p| p.id));
            }
            let expected: Vec<_> = filtered.iter().map(|p| p.id).collect();
            assert_eq!(seen, expected);

            // Pages past the end are empty
            assert!(paginate(&filtered, pages + 1, 6).is_empty());
        }
    }

    #[test]
    fn test_hello_scenario() {
        let posts = vec![post("Hello", "Web Development", &["a", "b"], false)];

        assert_eq!(posts[0].tags, vec!["a".to_string(), "b".to_string()]);

        let found = filter(&posts, ALL_CATEGORY, "hELLo", 50);
        assert_eq!(found.len(), 1);

        let by_category = filter(&posts, "Web Development", "", 50);
        assert_eq!(by_category.len(), 1);

        let excluded = filter(&posts, "Automation", "", 50);
        assert!(excluded.is_empty());
    }
}
