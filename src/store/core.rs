use super::{error::StoreError, types::*};
use crate::BlogConfig;
use chrono::Utc;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use tracing::{debug, error, info};
use uuid::Uuid;

/// Capacity-tracked document store for blog posts. Documents live in memory
/// behind an `RwLock` and are persisted to a JSON file on every mutation,
/// periodically, and on shutdown.
///
/// The store is the sole owner of post lifetime; callers only ever hold
/// clones. Ordering of `list` is contractual: `created_at` descending.
pub struct BlogStore {
    config: BlogConfig,
    documents: RwLock<HashMap<Uuid, BlogPost>>,
}

impl BlogStore {
    pub async fn open(config: BlogConfig) -> Result<Self, StoreError> {
        let documents = if config.data_file.exists() {
            let contents = tokio::fs::read_to_string(&config.data_file).await?;
            let posts: Vec<BlogPost> = serde_json::from_str(&contents)?;
            info!(
                "Loaded {} posts from {:?}",
                posts.len(),
                config.data_file
            );
            posts.into_iter().map(|post| (post.id, post)).collect()
        } else {
            debug!(
                "No document file at {:?}, starting with an empty store",
                config.data_file
            );
            HashMap::new()
        };

        Ok(Self {
            config,
            documents: RwLock::new(documents),
        })
    }

    pub fn get_config(&self) -> &BlogConfig {
        &self.config
    }

    pub async fn create(&self, payload: PostPayload) -> Result<BlogPost, StoreError> {
        let title = validated_title(&payload.title)?;
        let now = Utc::now();

        let post = BlogPost {
            id: Uuid::new_v4(),
            title,
            slug: payload.slug,
            excerpt: payload.excerpt,
            content: payload.content,
            author: payload
                .author
                .unwrap_or_else(|| self.config.default_author.clone()),
            date: payload.date.unwrap_or(now),
            read_time: payload
                .read_time
                .unwrap_or_else(|| self.config.default_read_time.clone()),
            category: payload.category,
            tags: payload.tags,
            image: payload.image,
            featured: payload.featured,
            status: payload.status,
            views: 0,
            likes: 0,
            comments_count: 0,
            created_at: now,
            updated_at: now,
        };

        let mut documents = self.documents.write().await;
        documents.insert(post.id, post.clone());
        self.persist(&documents).await?;

        info!("Created post {} ({})", post.id, post.title);
        Ok(post)
    }

    /// Full replace of all mutable fields. Id, `created_at`, and the
    /// read-model metrics survive; `updated_at` is bumped.
    pub async fn update(&self, id: Uuid, payload: PostPayload) -> Result<BlogPost, StoreError> {
        let title = validated_title(&payload.title)?;

        let mut documents = self.documents.write().await;
        let post = documents.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        post.title = title;
        post.slug = payload.slug;
        post.excerpt = payload.excerpt;
        post.content = payload.content;
        post.author = payload
            .author
            .unwrap_or_else(|| self.config.default_author.clone());
        post.date = payload.date.unwrap_or(post.date);
        post.read_time = payload
            .read_time
            .unwrap_or_else(|| self.config.default_read_time.clone());
        post.category = payload.category;
        post.tags = payload.tags;
        post.image = payload.image;
        post.featured = payload.featured;
        post.status = payload.status;
        post.updated_at = Utc::now();

        let updated = post.clone();
        self.persist(&documents).await?;

        info!("Updated post {}", id);
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut documents = self.documents.write().await;
        documents.remove(&id).ok_or(StoreError::NotFound(id))?;
        self.persist(&documents).await?;

        info!("Deleted post {}", id);
        Ok(())
    }

    pub async fn get(&self, id: Uuid) -> Option<BlogPost> {
        let documents = self.documents.read().await;
        documents.get(&id).cloned()
    }

    pub async fn list(&self, filter: ListFilter) -> ListResult {
        let documents = self.documents.read().await;

        let mut items: Vec<BlogPost> = documents
            .values()
            .filter(|post| filter.status.is_none_or(|status| post.status == status))
            .cloned()
            .collect();
        sort_recency(&mut items);

        let total = items.len();
        let page = filter.page.unwrap_or(1).max(1);
        let limit = filter.limit.unwrap_or(self.config.max_results).max(1);

        let start = (page - 1) * limit;
        let items = if start >= items.len() {
            Vec::new()
        } else {
            let end = (start + limit).min(items.len());
            items[start..end].to_vec()
        };

        ListResult { items, total }
    }

    /// Snapshot of every published post in recency order, for the public
    /// catalog. Draft documents are never visible through this path.
    pub async fn published(&self) -> Vec<BlogPost> {
        let documents = self.documents.read().await;
        let mut items: Vec<BlogPost> = documents
            .values()
            .filter(|post| post.status == PostStatus::Published)
            .cloned()
            .collect();
        sort_recency(&mut items);
        items
    }

    /// Aggregate counts over all statuses. `remaining` goes negative once
    /// the soft cap is exceeded.
    pub async fn stats(&self) -> StoreStats {
        let documents = self.documents.read().await;
        let total = documents.len();
        let featured = documents.values().filter(|post| post.featured).count();

        StoreStats {
            total,
            featured,
            regular: total - featured,
            limit: self.config.post_limit,
            remaining: self.config.post_limit as i64 - total as i64,
        }
    }

    /// Deletes the `count` documents with the smallest `created_at`.
    /// Destructive and irreversible; the admin surface demands explicit
    /// confirmation before calling this.
    pub async fn cleanup_oldest(&self, count: usize) -> Result<usize, StoreError> {
        let mut documents = self.documents.write().await;

        let mut by_age: Vec<(chrono::DateTime<Utc>, Uuid)> = documents
            .values()
            .map(|post| (post.created_at, post.id))
            .collect();
        by_age.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

        let victims: Vec<Uuid> = by_age.into_iter().take(count).map(|(_, id)| id).collect();
        let deleted = victims.len();
        for id in victims {
            documents.remove(&id);
        }

        if deleted > 0 {
            self.persist(&documents).await?;
        }

        info!("Cleanup removed {} oldest posts", deleted);
        Ok(deleted)
    }

    pub async fn save(&self) -> Result<(), StoreError> {
        let documents = self.documents.read().await;
        self.persist(&documents).await
    }

    pub fn start_periodic_save(store: Arc<BlogStore>, interval_minutes: u64) {
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(tokio::time::Duration::from_secs(interval_minutes * 60));
            interval.tick().await; // Skip the first immediate tick

            loop {
                interval.tick().await;
                if let Err(e) = store.save().await {
                    error!("Periodic store save failed: {}", e);
                } else {
                    debug!("Periodic store save completed");
                }
            }
        });
    }

    async fn persist(&self, documents: &HashMap<Uuid, BlogPost>) -> Result<(), StoreError> {
        if let Some(parent) = self.config.data_file.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut posts: Vec<&BlogPost> = documents.values().collect();
        posts.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

        let contents = serde_json::to_string_pretty(&posts)?;
        tokio::fs::write(&self.config.data_file, contents).await?;
        Ok(())
    }
}

fn validated_title(title: &str) -> Result<String, StoreError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(StoreError::Validation("title is required".to_string()));
    }
    Ok(title.to_string())
}

fn sort_recency(posts: &mut [BlogPost]) {
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
}
