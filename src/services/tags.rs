// src/services/tags.rs

use std::collections::{BTreeSet, HashSet};

use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::{
    error::AppError,
    models::tag::{Tag, tag_key},
};

/// Trims names, drops blanks and removes case-insensitive duplicates,
/// keeping the first spelling seen.
pub fn normalize_tag_names(names: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .filter(|name| seen.insert(tag_key(name)))
        .map(str::to_string)
        .collect()
}

/// Looks up tags whose names match any of `names`, ignoring case.
async fn find_by_names(conn: &mut SqliteConnection, names: &[String]) -> Result<Vec<Tag>, AppError> {
    let mut query = QueryBuilder::<Sqlite>::new("SELECT id, name FROM tags WHERE name_key IN (");
    let mut separated = query.separated(", ");
    for name in names {
        separated.push_bind(tag_key(name));
    }
    separated.push_unseparated(") ORDER BY name");

    Ok(query.build_query_as::<Tag>().fetch_all(&mut *conn).await?)
}

/// Replaces every tag link of `post_id` with links to `names`, creating tags
/// that don't exist yet. Tag rows are never deleted here.
///
/// Must run inside the caller's transaction so the delete-then-insert is atomic.
pub async fn replace_post_tags(
    conn: &mut SqliteConnection,
    post_id: i64,
    names: &[String],
) -> Result<Vec<Tag>, AppError> {
    let names = normalize_tag_names(names);

    let mut resolved = Vec::new();
    if !names.is_empty() {
        let existing = find_by_names(conn, &names).await?;
        let known: HashSet<String> = existing.iter().map(|t| tag_key(&t.name)).collect();

        let missing: Vec<&String> = names
            .iter()
            .filter(|name| !known.contains(&tag_key(name)))
            .collect();

        for name in &missing {
            sqlx::query(
                "INSERT INTO tags (name, name_key) VALUES (?, ?) ON CONFLICT (name_key) DO NOTHING",
            )
            .bind(name.as_str())
            .bind(tag_key(name))
            .execute(&mut *conn)
            .await?;
        }

        resolved = if missing.is_empty() {
            existing
        } else {
            tracing::debug!(post_id, created = missing.len(), "Created new tags");
            find_by_names(conn, &names).await?
        };
    }

    sqlx::query("DELETE FROM post_tags WHERE post_id = ?")
        .bind(post_id)
        .execute(&mut *conn)
        .await?;

    let tag_ids: BTreeSet<i64> = resolved.iter().map(|t| t.id).collect();
    if !tag_ids.is_empty() {
        let mut insert = QueryBuilder::<Sqlite>::new("INSERT INTO post_tags (post_id, tag_id) ");
        insert.push_values(tag_ids, |mut row, tag_id| {
            row.push_bind(post_id).push_bind(tag_id);
        });
        insert.build().execute(&mut *conn).await?;
    }

    Ok(resolved)
}
