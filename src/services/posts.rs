// src/services/posts.rs

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::{comments::fetch_post_comments, tags::replace_post_tags};
use crate::{
    db::like_pattern,
    error::AppError,
    models::{
        post::{NewPost, Page, Post, PostChanges, PostDetail, PostSearch, PostSort, PostSummary},
        tag::{Tag, tag_key},
    },
};

/// Post columns joined with the author's display name and the comment count.
macro_rules! summary_select {
    () => {
        r#"
        SELECT
            p.id, p.title, p.content, p.image_url, p.created_at, p.updated_at, p.author_id,
            TRIM(u.first_name || ' ' || u.last_name) AS author_name,
            (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comment_count
        FROM posts p
        JOIN users u ON u.id = p.author_id
        "#
    };
}

const POST_COLUMNS: &str = "id, title, content, image_url, created_at, updated_at, author_id";

#[derive(Clone)]
pub struct PostService {
    pool: SqlitePool,
}

impl PostService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All posts with author and comment count, newest first.
    pub async fn list_all(&self) -> Result<Vec<PostSummary>, AppError> {
        let posts = sqlx::query_as::<_, PostSummary>(concat!(
            summary_select!(),
            "ORDER BY p.created_at DESC, p.id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    /// A single post with its author, every comment (with authors) and tags.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<PostDetail>, AppError> {
        let Some(post) = sqlx::query_as::<_, PostSummary>(concat!(summary_select!(), "WHERE p.id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        let comments = fetch_post_comments(&self.pool, id).await?;

        let tags = sqlx::query_as::<_, Tag>(
            r#"
            SELECT t.id, t.name
            FROM tags t
            JOIN post_tags pt ON pt.tag_id = t.id
            WHERE pt.post_id = ?
            ORDER BY t.name
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(PostDetail {
            post,
            comments,
            tags,
        }))
    }

    /// Posts owned by `author_id`, newest first.
    pub async fn list_by_author(&self, author_id: i64) -> Result<Vec<PostSummary>, AppError> {
        let posts = sqlx::query_as::<_, PostSummary>(concat!(
            summary_select!(),
            "WHERE p.author_id = ? ORDER BY p.created_at DESC, p.id DESC"
        ))
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    /// Stores a new post and, when given, links it to `tag_names`.
    pub async fn create(
        &self,
        post: &NewPost,
        tag_names: Option<&[String]>,
    ) -> Result<Post, AppError> {
        let mut tx = self.pool.begin().await?;

        let stored = sqlx::query_as::<_, Post>(&format!(
            "INSERT INTO posts (title, content, image_url, created_at, author_id) \
             VALUES (?, ?, ?, ?, ?) RETURNING {}",
            POST_COLUMNS
        ))
        .bind(&post.title)
        .bind(&post.content)
        .bind(&post.image_url)
        .bind(Utc::now())
        .bind(post.author_id)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(names) = tag_names {
            replace_post_tags(&mut *tx, stored.id, names).await?;
        }

        tx.commit().await?;

        tracing::info!(post_id = stored.id, author_id = stored.author_id, "Post created");
        Ok(stored)
    }

    /// Overwrites title, content and image of post `changes.id` and stamps
    /// `updated_at`. With `tag_names`, the post's tag links are fully replaced.
    ///
    /// Returns `false` without touching anything when the post doesn't exist.
    pub async fn update(
        &self,
        changes: &PostChanges,
        tag_names: Option<&[String]>,
    ) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            "UPDATE posts SET title = ?, content = ?, image_url = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&changes.title)
        .bind(&changes.content)
        .bind(&changes.image_url)
        .bind(Utc::now())
        .bind(changes.id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if updated == 0 {
            return Ok(false);
        }

        if let Some(names) = tag_names {
            replace_post_tags(&mut *tx, changes.id, names).await?;
        }

        tx.commit().await?;

        tracing::info!(post_id = changes.id, "Post updated");
        Ok(true)
    }

    /// Deletes the post together with its comments and tag links in one
    /// transaction. Tags themselves stay. Returns `false` if nothing existed.
    pub async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM post_tags WHERE post_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM comments WHERE post_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let deleted = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            return Ok(false);
        }

        tx.commit().await?;

        tracing::info!(post_id = id, "Post deleted");
        Ok(true)
    }

    pub async fn exists(&self, id: i64) -> Result<bool, AppError> {
        let found = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(found > 0)
    }

    /// Paged search over posts.
    ///
    /// `term` matches title, content or any linked tag name as a substring
    /// (ASCII case-insensitive under SQLite `LIKE`); `tag` requires a linked
    /// tag with that name, compared by `tag_key`. Both filters are ANDed.
    pub async fn search(&self, search: &PostSearch) -> Result<Page<PostSummary>, AppError> {
        let search = search.clone().normalized();

        let mut count_query =
            QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM posts p JOIN users u ON u.id = p.author_id");
        push_filters(&mut count_query, &search);
        let total_count = count_query
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        let mut items_query = QueryBuilder::<Sqlite>::new(summary_select!());
        push_filters(&mut items_query, &search);
        items_query.push(order_clause(search.sort));
        items_query
            .push(" LIMIT ")
            .push_bind(search.page_size)
            .push(" OFFSET ")
            .push_bind(search.offset());

        let items = items_query
            .build_query_as::<PostSummary>()
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!(
            term = ?search.term,
            tag = ?search.tag,
            sort = search.sort.as_str(),
            page = search.page,
            total_count,
            "Post search"
        );

        Ok(Page::new(items, total_count, search.page, search.page_size))
    }

    /// Every tag name, alphabetically.
    pub async fn list_all_tag_names(&self) -> Result<Vec<String>, AppError> {
        let names = sqlx::query_scalar::<_, String>("SELECT name FROM tags ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        Ok(names)
    }
}

fn push_filters(query: &mut QueryBuilder<'_, Sqlite>, search: &PostSearch) {
    query.push(" WHERE 1 = 1");

    if let Some(term) = &search.term {
        let pattern = like_pattern(term);
        query
            .push(" AND (p.title LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR p.content LIKE ")
            .push_bind(pattern.clone())
            .push(
                " ESCAPE '\\' OR EXISTS (SELECT 1 FROM post_tags pt JOIN tags t ON t.id = pt.tag_id \
                 WHERE pt.post_id = p.id AND t.name LIKE ",
            )
            .push_bind(pattern)
            .push(" ESCAPE '\\'))");
    }

    if let Some(tag) = &search.tag {
        query
            .push(
                " AND EXISTS (SELECT 1 FROM post_tags pt JOIN tags t ON t.id = pt.tag_id \
                 WHERE pt.post_id = p.id AND t.name_key = ",
            )
            .push_bind(tag_key(tag))
            .push(")");
    }
}

fn order_clause(sort: PostSort) -> &'static str {
    match sort {
        PostSort::DateDesc => " ORDER BY p.created_at DESC, p.id DESC",
        PostSort::DateAsc => " ORDER BY p.created_at ASC, p.id ASC",
        PostSort::Author => {
            " ORDER BY u.first_name ASC, u.last_name ASC, p.created_at DESC, p.id DESC"
        }
        PostSort::Popularity => " ORDER BY comment_count DESC, p.created_at DESC, p.id DESC",
    }
}
