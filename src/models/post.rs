// src/models/post.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::{comment::CommentView, tag::Tag};
use crate::utils::{
    html::clean_html,
    validation::{validate_image_url_or_blank, validate_tag_names},
};

/// Default number of posts per page on the index.
pub const DEFAULT_PAGE_SIZE: i64 = 5;
/// Upper bound on a requested page size.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Represents the 'posts' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub author_id: i64,
}

/// A post joined with its author's name and comment count, as shown in listings.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PostSummary {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub author_id: i64,
    pub author_name: String,
    pub comment_count: i64,
}

/// Full post view: summary plus every comment (oldest first) and its tags.
#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: PostSummary,
    pub comments: Vec<CommentView>,
    pub tags: Vec<Tag>,
}

/// Values for a new post. Timestamps are assigned by the service.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub author_id: i64,
}

/// Replacement values for an existing post's editable fields.
#[derive(Debug, Clone)]
pub struct PostChanges {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
}

/// Ordering applied to post search results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PostSort {
    #[default]
    DateDesc,
    DateAsc,
    /// Author first name, then last name.
    Author,
    /// Most comments first.
    Popularity,
}

impl PostSort {
    /// Parses a query-string value; anything unrecognized means newest first.
    pub fn from_param(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "date_asc" => PostSort::DateAsc,
            "author" => PostSort::Author,
            "popularity" => PostSort::Popularity,
            _ => PostSort::DateDesc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PostSort::DateDesc => "date_desc",
            PostSort::DateAsc => "date_asc",
            PostSort::Author => "author",
            PostSort::Popularity => "popularity",
        }
    }
}

/// A normalized search request over posts.
#[derive(Debug, Clone)]
pub struct PostSearch {
    /// Substring matched against title, content, or any linked tag name.
    pub term: Option<String>,
    /// Exact tag name the post must carry.
    pub tag: Option<String>,
    /// 1-indexed.
    pub page: i64,
    pub page_size: i64,
    pub sort: PostSort,
}

impl Default for PostSearch {
    fn default() -> Self {
        Self {
            term: None,
            tag: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            sort: PostSort::DateDesc,
        }
    }
}

impl PostSearch {
    /// Blank filters become `None`, `page` is at least 1 and `page_size`
    /// is clamped to `1..=MAX_PAGE_SIZE`.
    pub fn normalized(self) -> Self {
        let non_blank = |value: Option<String>| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        Self {
            term: non_blank(self.term),
            tag: non_blank(self.tag),
            page: self.page.max(1),
            page_size: self.page_size.clamp(1, MAX_PAGE_SIZE),
            sort: self.sort,
        }
    }

    /// Rows skipped before this page. Saturates, so an absurd `page` just
    /// lands past the last row.
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1).saturating_mul(self.page_size)
    }
}

/// One page of results plus the total number of matches.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_count: i64, page: i64, page_size: i64) -> Self {
        let total_pages = if page_size > 0 {
            (total_count + page_size - 1) / page_size
        } else {
            0
        };
        Self {
            items,
            total_count,
            page,
            page_size,
            total_pages,
        }
    }
}

/// DTO for creating or editing a post.
///
/// Run through `sanitized` before validating so limits apply to the stored text.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(
        min = 1,
        max = 200,
        message = "Title length must be between 1 and 200 chars"
    ))]
    pub title: String,

    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,

    /// An empty string means "no image".
    #[validate(length(max = 500), custom(function = validate_image_url_or_blank))]
    pub image_url: Option<String>,

    /// Replaces the post's tags when present; `None` leaves them untouched on edit.
    #[validate(custom(function = validate_tag_names))]
    pub tags: Option<Vec<String>>,
}

impl CreatePostRequest {
    /// Trims title and image link and strips unsafe HTML from the body.
    pub fn sanitized(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            content: clean_html(&self.content).trim().to_string(),
            image_url: self.image_url.map(|url| url.trim().to_string()),
            tags: self.tags,
        }
    }
}

/// Query parameters for searching posts.
#[derive(Debug, Deserialize)]
pub struct PostListParams {
    /// Search keyword for title/content/tag match.
    pub q: Option<String>,

    /// 1-indexed page number (default: 1).
    pub page: Option<i64>,

    /// Number of items per page (default: 5, max: 100).
    pub page_size: Option<i64>,

    /// Sort order: 'date_desc' (default), 'date_asc', 'author' or 'popularity'.
    pub sort: Option<String>,

    /// Exact tag name filter.
    pub tag: Option<String>,
}

impl From<PostListParams> for PostSearch {
    fn from(params: PostListParams) -> Self {
        PostSearch {
            term: params.q,
            tag: params.tag,
            page: params.page.unwrap_or(1),
            page_size: params.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            sort: params
                .sort
                .as_deref()
                .map(PostSort::from_param)
                .unwrap_or_default(),
        }
        .normalized()
    }
}
