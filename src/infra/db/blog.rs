use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::repos::{BlogRepo, CreateBlogPostParams, RepoError, UpdateBlogPostParams},
    domain::entities::BlogPostRecord,
};

use super::{PostgresRepositories, map_sqlx_error};

const POST_COLUMNS: &str = "id, title, body, is_published, views_count, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct BlogPostRow {
    id: Uuid,
    title: String,
    body: String,
    is_published: bool,
    views_count: i64,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<BlogPostRow> for BlogPostRecord {
    fn from(row: BlogPostRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            body: row.body,
            is_published: row.is_published,
            views_count: row.views_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl BlogRepo for PostgresRepositories {
    async fn list_published(&self) -> Result<Vec<BlogPostRecord>, RepoError> {
        let rows = sqlx::query_as::<_, BlogPostRow>(&format!(
            "SELECT {POST_COLUMNS} FROM blog_posts \
             WHERE is_published \
             ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(BlogPostRecord::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<BlogPostRecord>, RepoError> {
        let row = sqlx::query_as::<_, BlogPostRow>(&format!(
            "SELECT {POST_COLUMNS} FROM blog_posts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(BlogPostRecord::from))
    }

    async fn increment_views(&self, id: Uuid) -> Result<(), RepoError> {
        sqlx::query("UPDATE blog_posts SET views_count = views_count + 1 WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn create_post(&self, params: CreateBlogPostParams) -> Result<BlogPostRecord, RepoError> {
        let CreateBlogPostParams {
            title,
            body,
            is_published,
        } = params;

        let id = Uuid::new_v4();
        let now = OffsetDateTime::now_utc();

        let row = sqlx::query_as::<_, BlogPostRow>(&format!(
            "INSERT INTO blog_posts (id, title, body, is_published, views_count, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, 0, $5, $5) \
             RETURNING {POST_COLUMNS}"
        ))
        .bind(id)
        .bind(title)
        .bind(body)
        .bind(is_published)
        .bind(now)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(BlogPostRecord::from(row))
    }

    async fn update_post(&self, params: UpdateBlogPostParams) -> Result<BlogPostRecord, RepoError> {
        let UpdateBlogPostParams {
            id,
            title,
            body,
            is_published,
        } = params;

        let row = sqlx::query_as::<_, BlogPostRow>(&format!(
            "UPDATE blog_posts \
             SET title = $2, body = $3, is_published = $4, updated_at = now() \
             WHERE id = $1 \
             RETURNING {POST_COLUMNS}"
        ))
        .bind(id)
        .bind(title)
        .bind(body)
        .bind(is_published)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(BlogPostRecord::from(row))
    }

    async fn delete_post(&self, id: Uuid) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM blog_posts WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}
