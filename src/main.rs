use std::{process, sync::Arc};

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

use vetrina::{
    application::{
        accounts::AccountsService,
        blog::BlogService,
        catalog::{CatalogService, CategoryInput, NewProduct},
        error::AppError,
        repos::{
            CategoriesRepo, CategoriesWriteRepo, ProductsRepo, ProductsWriteRepo, UsersRepo,
        },
    },
    cache::{CacheStore, CatalogCache, MemoryStore, NullStore},
    config,
    infra::{
        db::PostgresRepositories,
        error::InfraError,
        http::{self, AppState},
        telemetry,
    },
};

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let cli = config::CliArgs::parse();
    let settings = config::load(&cli)
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli
        .command
        .unwrap_or(config::Command::Serve(config::ServeArgs::default()));

    telemetry::init(&settings.logging)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Seed(_) => run_seed(settings).await,
        config::Command::GenerateSlugs(_) => run_generate_slugs(settings).await,
    }
}

async fn init_repositories(
    settings: &config::Settings,
) -> Result<Arc<PostgresRepositories>, AppError> {
    let url = settings
        .database
        .url
        .as_deref()
        .ok_or_else(|| AppError::unexpected("database.url is not configured"))?;

    let pool =
        PostgresRepositories::connect(url, settings.database.max_connections.get())
            .await
            .map_err(|err| InfraError::database(err.to_string()))?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| InfraError::database(format!("migrations failed: {err}")))?;

    Ok(Arc::new(PostgresRepositories::new(pool)))
}

fn build_catalog_service(
    db: Arc<PostgresRepositories>,
    settings: &config::Settings,
) -> Arc<CatalogService> {
    let store: Arc<dyn CacheStore> = if settings.cache.enabled {
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(NullStore)
    };

    let products: Arc<dyn ProductsRepo> = db.clone();
    let products_write: Arc<dyn ProductsWriteRepo> = db.clone();
    let categories: Arc<dyn CategoriesRepo> = db.clone();
    let categories_write: Arc<dyn CategoriesWriteRepo> = db;

    let cache = Arc::new(CatalogCache::new(
        store,
        products.clone(),
        categories.clone(),
    ));

    Arc::new(CatalogService::new(
        cache,
        products,
        products_write,
        categories,
        categories_write,
    ))
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let db = init_repositories(&settings).await?;

    let catalog = build_catalog_service(db.clone(), &settings);
    let blog = Arc::new(BlogService::new(db.clone()));
    let users: Arc<dyn UsersRepo> = db.clone();
    let accounts = Arc::new(AccountsService::new(users));

    let state = AppState {
        catalog,
        blog,
        accounts,
        db,
    };
    let router = http::build_router(state);

    let listener = TcpListener::bind(settings.server.addr)
        .await
        .map_err(InfraError::from)?;
    info!(addr = %settings.server.addr, "listening");

    axum::serve(listener, router.into_make_service())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    Ok(())
}

async fn run_seed(settings: config::Settings) -> Result<(), AppError> {
    let db = init_repositories(&settings).await?;
    let catalog = build_catalog_service(db.clone(), &settings);

    let existing = CategoriesRepo::list_ordered(db.as_ref()).await?;
    if !existing.is_empty() {
        info!(count = existing.len(), "categories already present, skipping seed");
        return Ok(());
    }

    let seed: &[(&str, &str, &[(&str, i64)])] = &[
        (
            "Books",
            "Printed and electronic books",
            &[("Rust in Practice", 3499), ("Database Internals", 4599)],
        ),
        (
            "Electronics",
            "Devices and accessories",
            &[("Mechanical Keyboard", 8999), ("USB-C Dock", 12999)],
        ),
        (
            "Clothing",
            "Apparel for all seasons",
            &[("Wool Sweater", 5999), ("Rain Jacket", 7499)],
        ),
    ];

    for (name, description, products) in seed {
        let category = catalog
            .create_category(CategoryInput {
                name: (*name).to_string(),
                description: Some((*description).to_string()),
            })
            .await?;

        for (product_name, price_cents) in *products {
            catalog
                .create_product(NewProduct {
                    name: (*product_name).to_string(),
                    description: None,
                    price_cents: *price_cents,
                    category_id: category.id,
                    owner_id: None,
                    is_published: true,
                })
                .await?;
        }
        info!(category = *name, products = products.len(), "seeded");
    }

    Ok(())
}

async fn run_generate_slugs(settings: config::Settings) -> Result<(), AppError> {
    let db = init_repositories(&settings).await?;
    let catalog = build_catalog_service(db, &settings);

    let updated = catalog.generate_missing_slugs().await?;
    info!(updated, "slug backfill finished");
    Ok(())
}
