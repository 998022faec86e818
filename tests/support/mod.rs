//! Shared in-memory repository fakes for integration tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use vetrina::application::repos::{
    BlogRepo, CategoriesRepo, CategoriesWriteRepo, CreateBlogPostParams, CreateCategoryParams,
    CreateProductParams, CreateUserParams, ProductsRepo, ProductsWriteRepo, RepoError,
    UpdateBlogPostParams, UpdateCategoryParams, UpdateProductParams, UpdateProfileParams,
    UsersRepo,
};
use vetrina::domain::entities::{
    BlogPostRecord, CategoryRecord, CategoryRef, CategoryWithCount, OverallStats, PriceStats,
    ProductRecord, UserRecord,
};

#[derive(Default)]
pub struct FakeRepos {
    pub products: Mutex<Vec<ProductRecord>>,
    pub categories: Mutex<Vec<CategoryRecord>>,
    pub posts: Mutex<Vec<BlogPostRecord>>,
    pub users: Mutex<Vec<UserRecord>>,
}

impl FakeRepos {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn insert_category(&self, name: &str, slug: &str) -> CategoryRecord {
        let now = OffsetDateTime::now_utc();
        let category = CategoryRecord {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug: slug.to_string(),
            description: None,
            created_at: now,
            updated_at: now,
        };
        self.categories.lock().unwrap().push(category.clone());
        category
    }

    pub fn insert_product(
        &self,
        name: &str,
        price_cents: i64,
        category: &CategoryRecord,
    ) -> ProductRecord {
        self.insert_product_at(name, price_cents, category, 0)
    }

    /// Insert a product whose creation time is offset by `age_secs` into
    /// the past, for exercising recency ordering.
    pub fn insert_product_at(
        &self,
        name: &str,
        price_cents: i64,
        category: &CategoryRecord,
        age_secs: i64,
    ) -> ProductRecord {
        let created_at = OffsetDateTime::now_utc() - Duration::seconds(age_secs);
        let product = ProductRecord {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            price_cents,
            category: CategoryRef {
                id: category.id,
                name: category.name.clone(),
                slug: category.slug.clone(),
            },
            owner: None,
            is_published: true,
            created_at,
            updated_at: created_at,
        };
        self.products.lock().unwrap().push(product.clone());
        product
    }

    pub fn insert_post(&self, title: &str, is_published: bool) -> BlogPostRecord {
        let now = OffsetDateTime::now_utc();
        let post = BlogPostRecord {
            id: Uuid::new_v4(),
            title: title.to_string(),
            body: "body".to_string(),
            is_published,
            views_count: 0,
            created_at: now,
            updated_at: now,
        };
        self.posts.lock().unwrap().push(post.clone());
        post
    }

    pub fn remove_product(&self, id: Uuid) {
        self.products.lock().unwrap().retain(|p| p.id != id);
    }

    fn category_ref(&self, id: Uuid) -> Result<CategoryRef, RepoError> {
        let categories = self.categories.lock().unwrap();
        categories
            .iter()
            .find(|c| c.id == id)
            .map(|c| CategoryRef {
                id: c.id,
                name: c.name.clone(),
                slug: c.slug.clone(),
            })
            .ok_or_else(|| RepoError::invalid_input("unknown category"))
    }
}

#[async_trait]
impl ProductsRepo for FakeRepos {
    async fn list_published(
        &self,
        category_slug: Option<&str>,
    ) -> Result<Vec<ProductRecord>, RepoError> {
        let products = self.products.lock().unwrap();
        let mut rows: Vec<ProductRecord> = products
            .iter()
            .filter(|p| p.is_published)
            .filter(|p| category_slug.is_none_or(|slug| p.category.slug == slug))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<ProductRecord>, RepoError> {
        let products = self.products.lock().unwrap();
        Ok(products
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn find_published(&self, id: Uuid) -> Result<Option<ProductRecord>, RepoError> {
        let products = self.products.lock().unwrap();
        Ok(products
            .iter()
            .find(|p| p.id == id && p.is_published)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ProductRecord>, RepoError> {
        let products = self.products.lock().unwrap();
        Ok(products.iter().find(|p| p.id == id).cloned())
    }

    async fn category_price_stats(&self, category_id: Uuid) -> Result<PriceStats, RepoError> {
        let products = self.products.lock().unwrap();
        let prices: Vec<i64> = products
            .iter()
            .filter(|p| p.category.id == category_id && p.is_published)
            .map(|p| p.price_cents)
            .collect();

        let count = prices.len() as i64;
        let avg_price = (!prices.is_empty())
            .then(|| prices.iter().sum::<i64>() as f64 / prices.len() as f64);
        Ok(PriceStats {
            count,
            avg_price,
            min_price: prices.iter().min().copied(),
            max_price: prices.iter().max().copied(),
        })
    }

    async fn recent_published(
        &self,
        category_id: Uuid,
        limit: u32,
    ) -> Result<Vec<ProductRecord>, RepoError> {
        let products = self.products.lock().unwrap();
        let mut rows: Vec<ProductRecord> = products
            .iter()
            .filter(|p| p.category.id == category_id && p.is_published)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows.truncate(limit as usize);
        Ok(rows)
    }

    async fn overall_stats(&self) -> Result<OverallStats, RepoError> {
        let products = self.products.lock().unwrap();
        let published: Vec<&ProductRecord> =
            products.iter().filter(|p| p.is_published).collect();

        let total = published.len() as i64;
        let avg_price = (!published.is_empty()).then(|| {
            published.iter().map(|p| p.price_cents).sum::<i64>() as f64 / published.len() as f64
        });
        let mut category_ids: Vec<Uuid> = published.iter().map(|p| p.category.id).collect();
        category_ids.sort();
        category_ids.dedup();

        Ok(OverallStats {
            total,
            avg_price,
            categories: category_ids.len() as i64,
        })
    }
}

#[async_trait]
impl ProductsWriteRepo for FakeRepos {
    async fn create_product(
        &self,
        params: CreateProductParams,
    ) -> Result<ProductRecord, RepoError> {
        let category = self.category_ref(params.category_id)?;
        let now = OffsetDateTime::now_utc();
        let product = ProductRecord {
            id: Uuid::new_v4(),
            name: params.name,
            description: params.description,
            price_cents: params.price_cents,
            category,
            owner: None,
            is_published: params.is_published,
            created_at: now,
            updated_at: now,
        };
        self.products.lock().unwrap().push(product.clone());
        Ok(product)
    }

    async fn update_product(
        &self,
        params: UpdateProductParams,
    ) -> Result<ProductRecord, RepoError> {
        let category = self.category_ref(params.category_id)?;
        let mut products = self.products.lock().unwrap();
        let product = products
            .iter_mut()
            .find(|p| p.id == params.id)
            .ok_or(RepoError::NotFound)?;
        product.name = params.name;
        product.description = params.description;
        product.price_cents = params.price_cents;
        product.category = category;
        product.updated_at = OffsetDateTime::now_utc();
        Ok(product.clone())
    }

    async fn set_published(
        &self,
        id: Uuid,
        is_published: bool,
    ) -> Result<ProductRecord, RepoError> {
        let mut products = self.products.lock().unwrap();
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RepoError::NotFound)?;
        product.is_published = is_published;
        product.updated_at = OffsetDateTime::now_utc();
        Ok(product.clone())
    }

    async fn delete_product(&self, id: Uuid) -> Result<(), RepoError> {
        let mut products = self.products.lock().unwrap();
        let before = products.len();
        products.retain(|p| p.id != id);
        if products.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl CategoriesRepo for FakeRepos {
    async fn list_ordered(&self) -> Result<Vec<CategoryRecord>, RepoError> {
        let categories = self.categories.lock().unwrap();
        let mut rows: Vec<CategoryRecord> = categories.clone();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<CategoryRecord>, RepoError> {
        let categories = self.categories.lock().unwrap();
        Ok(categories
            .iter()
            .filter(|c| ids.contains(&c.id))
            .cloned()
            .collect())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<CategoryRecord>, RepoError> {
        let categories = self.categories.lock().unwrap();
        Ok(categories.iter().find(|c| c.slug == slug).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CategoryRecord>, RepoError> {
        let categories = self.categories.lock().unwrap();
        Ok(categories.iter().find(|c| c.id == id).cloned())
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, RepoError> {
        let categories = self.categories.lock().unwrap();
        Ok(categories.iter().any(|c| c.slug == slug))
    }

    async fn top_by_published(&self, limit: u32) -> Result<Vec<CategoryWithCount>, RepoError> {
        let categories = self.categories.lock().unwrap();
        let products = self.products.lock().unwrap();

        let mut rows: Vec<CategoryWithCount> = categories
            .iter()
            .map(|c| CategoryWithCount {
                id: c.id,
                name: c.name.clone(),
                slug: c.slug.clone(),
                published_count: products
                    .iter()
                    .filter(|p| p.category.id == c.id && p.is_published)
                    .count() as i64,
            })
            .collect();
        rows.sort_by(|a, b| {
            b.published_count
                .cmp(&a.published_count)
                .then_with(|| a.name.cmp(&b.name))
        });
        rows.truncate(limit as usize);
        Ok(rows)
    }

    async fn list_missing_slugs(&self) -> Result<Vec<CategoryRecord>, RepoError> {
        let categories = self.categories.lock().unwrap();
        Ok(categories
            .iter()
            .filter(|c| c.slug.is_empty())
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CategoriesWriteRepo for FakeRepos {
    async fn create_category(
        &self,
        params: CreateCategoryParams,
    ) -> Result<CategoryRecord, RepoError> {
        let now = OffsetDateTime::now_utc();
        let category = CategoryRecord {
            id: Uuid::new_v4(),
            name: params.name,
            slug: params.slug,
            description: params.description,
            created_at: now,
            updated_at: now,
        };
        self.categories.lock().unwrap().push(category.clone());
        Ok(category)
    }

    async fn update_category(
        &self,
        params: UpdateCategoryParams,
    ) -> Result<CategoryRecord, RepoError> {
        let mut categories = self.categories.lock().unwrap();
        let category = categories
            .iter_mut()
            .find(|c| c.id == params.id)
            .ok_or(RepoError::NotFound)?;
        category.name = params.name;
        category.slug = params.slug;
        category.description = params.description;
        category.updated_at = OffsetDateTime::now_utc();
        Ok(category.clone())
    }

    async fn set_slug(&self, id: Uuid, slug: &str) -> Result<CategoryRecord, RepoError> {
        let mut categories = self.categories.lock().unwrap();
        let category = categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(RepoError::NotFound)?;
        category.slug = slug.to_string();
        category.updated_at = OffsetDateTime::now_utc();
        Ok(category.clone())
    }

    async fn delete_category(&self, id: Uuid) -> Result<(), RepoError> {
        let mut categories = self.categories.lock().unwrap();
        let before = categories.len();
        categories.retain(|c| c.id != id);
        if categories.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl BlogRepo for FakeRepos {
    async fn list_published(&self) -> Result<Vec<BlogPostRecord>, RepoError> {
        let posts = self.posts.lock().unwrap();
        let mut rows: Vec<BlogPostRecord> =
            posts.iter().filter(|p| p.is_published).cloned().collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<BlogPostRecord>, RepoError> {
        let posts = self.posts.lock().unwrap();
        Ok(posts.iter().find(|p| p.id == id).cloned())
    }

    async fn increment_views(&self, id: Uuid) -> Result<(), RepoError> {
        let mut posts = self.posts.lock().unwrap();
        if let Some(post) = posts.iter_mut().find(|p| p.id == id) {
            post.views_count += 1;
        }
        Ok(())
    }

    async fn create_post(&self, params: CreateBlogPostParams) -> Result<BlogPostRecord, RepoError> {
        let now = OffsetDateTime::now_utc();
        let post = BlogPostRecord {
            id: Uuid::new_v4(),
            title: params.title,
            body: params.body,
            is_published: params.is_published,
            views_count: 0,
            created_at: now,
            updated_at: now,
        };
        self.posts.lock().unwrap().push(post.clone());
        Ok(post)
    }

    async fn update_post(&self, params: UpdateBlogPostParams) -> Result<BlogPostRecord, RepoError> {
        let mut posts = self.posts.lock().unwrap();
        let post = posts
            .iter_mut()
            .find(|p| p.id == params.id)
            .ok_or(RepoError::NotFound)?;
        post.title = params.title;
        post.body = params.body;
        post.is_published = params.is_published;
        post.updated_at = OffsetDateTime::now_utc();
        Ok(post.clone())
    }

    async fn delete_post(&self, id: Uuid) -> Result<(), RepoError> {
        let mut posts = self.posts.lock().unwrap();
        let before = posts.len();
        posts.retain(|p| p.id != id);
        if posts.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl UsersRepo for FakeRepos {
    async fn create_user(&self, params: CreateUserParams) -> Result<UserRecord, RepoError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == params.email) {
            return Err(RepoError::Duplicate {
                constraint: "users_email_key".to_string(),
            });
        }
        let now = OffsetDateTime::now_utc();
        let user = UserRecord {
            id: Uuid::new_v4(),
            email: params.email,
            first_name: params.first_name,
            last_name: params.last_name,
            phone: params.phone,
            country: params.country,
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, RepoError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn update_profile(&self, params: UpdateProfileParams) -> Result<UserRecord, RepoError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == params.id)
            .ok_or(RepoError::NotFound)?;
        user.first_name = params.first_name;
        user.last_name = params.last_name;
        user.phone = params.phone;
        user.country = params.country;
        user.updated_at = OffsetDateTime::now_utc();
        Ok(user.clone())
    }
}
