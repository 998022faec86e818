//! Blog service: published listings and view-counted detail reads.
//!
//! Blog content is deliberately uncached; only the catalog carries a cache
//! layer.

use std::sync::Arc;

use uuid::Uuid;

use crate::application::error::AppError;
use crate::application::repos::{BlogRepo, CreateBlogPostParams, UpdateBlogPostParams};
use crate::domain::entities::BlogPostRecord;

#[derive(Debug, Clone)]
pub struct BlogPostInput {
    pub title: String,
    pub body: String,
    pub is_published: bool,
}

pub struct BlogService {
    posts: Arc<dyn BlogRepo>,
}

impl BlogService {
    pub fn new(posts: Arc<dyn BlogRepo>) -> Self {
        Self { posts }
    }

    pub async fn published_posts(&self) -> Result<Vec<BlogPostRecord>, AppError> {
        Ok(self.posts.list_published().await?)
    }

    /// Fetch one published post and bump its view counter.
    pub async fn read_post(&self, id: Uuid) -> Result<Option<BlogPostRecord>, AppError> {
        let Some(post) = self.posts.find_by_id(id).await? else {
            return Ok(None);
        };
        if !post.is_published {
            return Ok(None);
        }

        self.posts.increment_views(id).await?;
        Ok(Some(BlogPostRecord {
            views_count: post.views_count + 1,
            ..post
        }))
    }

    pub async fn create_post(&self, input: BlogPostInput) -> Result<BlogPostRecord, AppError> {
        validate_post(&input)?;
        Ok(self
            .posts
            .create_post(CreateBlogPostParams {
                title: input.title,
                body: input.body,
                is_published: input.is_published,
            })
            .await?)
    }

    pub async fn update_post(
        &self,
        id: Uuid,
        input: BlogPostInput,
    ) -> Result<BlogPostRecord, AppError> {
        validate_post(&input)?;
        Ok(self
            .posts
            .update_post(UpdateBlogPostParams {
                id,
                title: input.title,
                body: input.body,
                is_published: input.is_published,
            })
            .await?)
    }

    pub async fn delete_post(&self, id: Uuid) -> Result<(), AppError> {
        Ok(self.posts.delete_post(id).await?)
    }
}

fn validate_post(input: &BlogPostInput) -> Result<(), AppError> {
    if input.title.trim().is_empty() {
        return Err(AppError::validation("post title must not be empty"));
    }
    Ok(())
}
