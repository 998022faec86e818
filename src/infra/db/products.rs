use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::repos::{
        CreateProductParams, ProductsRepo, ProductsWriteRepo, RepoError, UpdateProductParams,
    },
    domain::entities::{CategoryRef, OverallStats, OwnerRef, PriceStats, ProductRecord},
};

use super::{PostgresRepositories, map_sqlx_error};

const PRODUCT_SELECT: &str = "SELECT \
        p.id, p.name, p.description, p.price_cents, p.is_published, \
        p.created_at, p.updated_at, \
        c.id AS category_id, c.name AS category_name, c.slug AS category_slug, \
        u.id AS owner_id, u.email AS owner_email \
     FROM products p \
     INNER JOIN categories c ON c.id = p.category_id \
     LEFT JOIN users u ON u.id = p.owner_id ";

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    price_cents: i64,
    is_published: bool,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
    category_id: Uuid,
    category_name: String,
    category_slug: String,
    owner_id: Option<Uuid>,
    owner_email: Option<String>,
}

impl From<ProductRow> for ProductRecord {
    fn from(row: ProductRow) -> Self {
        let owner = match (row.owner_id, row.owner_email) {
            (Some(id), Some(email)) => Some(OwnerRef { id, email }),
            _ => None,
        };
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            price_cents: row.price_cents,
            category: CategoryRef {
                id: row.category_id,
                name: row.category_name,
                slug: row.category_slug,
            },
            owner,
            is_published: row.is_published,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PriceStatsRow {
    count: i64,
    avg_price: Option<f64>,
    min_price: Option<i64>,
    max_price: Option<i64>,
}

#[async_trait]
impl ProductsRepo for PostgresRepositories {
    async fn list_published(
        &self,
        category_slug: Option<&str>,
    ) -> Result<Vec<ProductRecord>, RepoError> {
        let mut qb = QueryBuilder::<Postgres>::new(PRODUCT_SELECT);
        qb.push(" WHERE p.is_published ");
        if let Some(slug) = category_slug {
            qb.push(" AND c.slug = ");
            qb.push_bind(slug);
        }
        qb.push(" ORDER BY p.name, c.name ");

        let rows = qb
            .build_query_as::<ProductRow>()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(ProductRecord::from).collect())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<ProductRecord>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "{PRODUCT_SELECT} WHERE p.id = ANY($1)"
        ))
        .bind(ids.to_vec())
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(ProductRecord::from).collect())
    }

    async fn find_published(&self, id: Uuid) -> Result<Option<ProductRecord>, RepoError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "{PRODUCT_SELECT} WHERE p.id = $1 AND p.is_published"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(ProductRecord::from))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ProductRecord>, RepoError> {
        let row =
            sqlx::query_as::<_, ProductRow>(&format!("{PRODUCT_SELECT} WHERE p.id = $1"))
                .bind(id)
                .fetch_optional(self.pool())
                .await
                .map_err(map_sqlx_error)?;

        Ok(row.map(ProductRecord::from))
    }

    async fn category_price_stats(&self, category_id: Uuid) -> Result<PriceStats, RepoError> {
        let row = sqlx::query_as::<_, PriceStatsRow>(
            "SELECT \
                COUNT(*) AS count, \
                AVG(price_cents)::FLOAT8 AS avg_price, \
                MIN(price_cents) AS min_price, \
                MAX(price_cents) AS max_price \
             FROM products \
             WHERE category_id = $1 AND is_published",
        )
        .bind(category_id)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(PriceStats {
            count: row.count,
            avg_price: row.avg_price,
            min_price: row.min_price,
            max_price: row.max_price,
        })
    }

    async fn recent_published(
        &self,
        category_id: Uuid,
        limit: u32,
    ) -> Result<Vec<ProductRecord>, RepoError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "{PRODUCT_SELECT} \
             WHERE p.category_id = $1 AND p.is_published \
             ORDER BY p.created_at DESC \
             LIMIT $2"
        ))
        .bind(category_id)
        .bind(i64::from(limit))
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(ProductRecord::from).collect())
    }

    async fn overall_stats(&self) -> Result<OverallStats, RepoError> {
        #[derive(sqlx::FromRow)]
        struct OverallRow {
            total: i64,
            avg_price: Option<f64>,
            categories: i64,
        }

        let row = sqlx::query_as::<_, OverallRow>(
            "SELECT \
                COUNT(*) AS total, \
                AVG(price_cents)::FLOAT8 AS avg_price, \
                COUNT(DISTINCT category_id) AS categories \
             FROM products \
             WHERE is_published",
        )
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(OverallStats {
            total: row.total,
            avg_price: row.avg_price,
            categories: row.categories,
        })
    }
}

#[async_trait]
impl ProductsWriteRepo for PostgresRepositories {
    async fn create_product(
        &self,
        params: CreateProductParams,
    ) -> Result<ProductRecord, RepoError> {
        let CreateProductParams {
            name,
            description,
            price_cents,
            category_id,
            owner_id,
            is_published,
        } = params;

        let id = Uuid::new_v4();
        let now = OffsetDateTime::now_utc();

        sqlx::query(
            "INSERT INTO products ( \
                id, name, description, price_cents, category_id, owner_id, \
                is_published, created_at, updated_at \
             ) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)",
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(price_cents)
        .bind(category_id)
        .bind(owner_id)
        .bind(is_published)
        .bind(now)
        .execute(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        self.find_by_id(id).await?.ok_or(RepoError::NotFound)
    }

    async fn update_product(
        &self,
        params: UpdateProductParams,
    ) -> Result<ProductRecord, RepoError> {
        let UpdateProductParams {
            id,
            name,
            description,
            price_cents,
            category_id,
        } = params;

        let result = sqlx::query(
            "UPDATE products \
             SET name = $2, \
                 description = $3, \
                 price_cents = $4, \
                 category_id = $5, \
                 updated_at = now() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(price_cents)
        .bind(category_id)
        .execute(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }

        self.find_by_id(id).await?.ok_or(RepoError::NotFound)
    }

    async fn set_published(
        &self,
        id: Uuid,
        is_published: bool,
    ) -> Result<ProductRecord, RepoError> {
        let result = sqlx::query(
            "UPDATE products \
             SET is_published = $2, updated_at = now() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(is_published)
        .execute(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }

        self.find_by_id(id).await?.ok_or(RepoError::NotFound)
    }

    async fn delete_product(&self, id: Uuid) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
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
