use crate::store::{BlogPost, PostPayload, PostStatus, StoreError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Splits the tag-input string on commas, trimming and discarding blanks.
/// Duplicates are kept; the input order is preserved.
pub fn split_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Inverse of `split_tags`, used to seed the tag-input field in Edit mode.
pub fn join_tags(tags: &[String]) -> String {
    tags.join(", ")
}

/// The editor's working copy: every mutable post field, with tags as a
/// single comma-separated input string. The structured tag sequence is never
/// edited directly; it is recomputed at submission time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorForm {
    pub title: String,
    pub slug: Option<String>,
    pub excerpt: String,
    pub content: String,
    pub author: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub read_time: Option<String>,
    pub category: String,
    pub tags_input: String,
    pub image: String,
    pub featured: bool,
    pub status: PostStatus,
}

impl EditorForm {
    /// Seeds a working copy from an existing post, converting its tag
    /// sequence back into a comma-joined string and carrying its image
    /// reference into the preview slot.
    pub fn from_post(post: &BlogPost) -> Self {
        Self {
            title: post.title.clone(),
            slug: post.slug.clone(),
            excerpt: post.excerpt.clone(),
            content: post.content.clone(),
            author: Some(post.author.clone()),
            date: Some(post.date),
            read_time: Some(post.read_time.clone()),
            category: post.category.clone(),
            tags_input: join_tags(&post.tags),
            image: post.image.clone(),
            featured: post.featured,
            status: post.status,
        }
    }

    /// Submission: validates the title and recomputes the tag sequence from
    /// the input string.
    pub fn into_payload(self) -> Result<PostPayload, StoreError> {
        if self.title.trim().is_empty() {
            return Err(StoreError::Validation("title is required".to_string()));
        }

        Ok(PostPayload {
            title: self.title,
            slug: self.slug,
            excerpt: self.excerpt,
            content: self.content,
            author: self.author,
            date: self.date,
            read_time: self.read_time,
            category: self.category,
            tags: split_tags(&self.tags_input),
            image: self.image,
            featured: self.featured,
            status: self.status,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit(Uuid),
}

/// Two-mode editor state machine. Create is the initial and the
/// after-submission state; Edit holds the id of the post whose working copy
/// the form was seeded from.
#[derive(Debug, Clone)]
pub struct Editor {
    mode: EditorMode,
    form: EditorForm,
}

impl Editor {
    pub fn new() -> Self {
        Self {
            mode: EditorMode::Create,
            form: EditorForm::default(),
        }
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn form(&self) -> &EditorForm {
        &self.form
    }

    pub fn begin_edit(&mut self, post: &BlogPost) {
        self.mode = EditorMode::Edit(post.id);
        self.form = EditorForm::from_post(post);
    }

    /// Returns to Create mode without persisting anything; the working copy
    /// is discarded.
    pub fn cancel(&mut self) {
        self.mode = EditorMode::Create;
        self.form = EditorForm::default();
    }

    /// After a successful create or update the editor resets to a blank
    /// Create form; the image preview slot empties with it.
    pub fn finish_submit(&mut self) {
        self.mode = EditorMode::Create;
        self.form = EditorForm::default();
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}
