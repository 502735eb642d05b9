mod core;
mod features;
mod modules;
mod shared;

use crate::core::config::{Config, StorageConfig, StorageProvider};
use crate::core::middleware;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::core::database;
use crate::features::legacy_posts::{routes as legacy_posts_routes, LegacyPostCatalog};
use crate::features::posts::{
    routes as posts_routes, FeedService, PgPostRepository, UploadService,
};
use crate::modules::storage::{ImageKitClient, MediaStorage, MinIOClient};
use axum::Router;
use std::sync::Arc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

/// Build the configured media provider client
async fn create_storage(config: &StorageConfig) -> anyhow::Result<Arc<dyn MediaStorage>> {
    match config.provider {
        StorageProvider::ImageKit => {
            let imagekit = config
                .imagekit
                .clone()
                .ok_or_else(|| anyhow::anyhow!("ImageKit configuration missing"))?;
            let client = ImageKitClient::new(imagekit, config.tags.clone())
                .map_err(|e| anyhow::anyhow!("Failed to initialize ImageKit client: {}", e))?;
            Ok(Arc::new(client))
        }
        StorageProvider::MinIO => {
            let client = MinIOClient::new(config.minio.clone(), config.tags.clone())
                .map_err(|e| anyhow::anyhow!("Failed to initialize MinIO client: {}", e))?;
            client
                .ensure_bucket_exists()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to ensure MinIO bucket exists: {}", e))?;
            tracing::info!("MinIO storage ready for bucket: {}", client.bucket_name());
            Ok(Arc::new(client))
        }
    }
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    let available_cpus = std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1);
    tracing::info!(
        "System info: available_cpus={}, tokio_worker_threads={}, pid={}",
        available_cpus,
        worker_threads,
        std::process::id()
    );

    tracing::info!("Configuration loaded successfully");

    // Create database connection pool
    let pool = database::create_pool(&config.database).await?;
    tracing::info!("Database connection pool created");

    // Creates the posts table if absent
    tracing::info!("Running database migrations...");
    database::run_migrations(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
    tracing::info!("Database migrations completed successfully");

    // Staging directory for incoming uploads
    tokio::fs::create_dir_all(&config.staging.dir)
        .await
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to create staging directory {}: {}",
                config.staging.dir.display(),
                e
            )
        })?;
    tracing::info!("Upload staging directory: {}", config.staging.dir.display());

    let storage = create_storage(&config.storage).await?;
    tracing::info!(
        "Storage provider initialized: {}",
        storage.provider_name()
    );

    // Initialize post services
    let post_repository = Arc::new(PgPostRepository::new(pool.clone()));
    let upload_service = Arc::new(UploadService::new(
        post_repository.clone(),
        Arc::clone(&storage),
        config.staging.dir.clone(),
    ));
    let feed_service = Arc::new(FeedService::new(post_repository));
    tracing::info!(
        "Post services initialized (staging in {})",
        upload_service.staging_dir().display()
    );

    // Legacy text posts
    let legacy_catalog = Arc::new(
        LegacyPostCatalog::seeded()
            .map_err(|e| anyhow::anyhow!("Failed to load legacy posts: {}", e))?,
    );
    tracing::info!("Legacy catalog loaded with {} posts", legacy_catalog.len());

    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    let swagger =
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi));

    // Simple health check endpoint
    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }
    let health_route = Router::new().route("/health", axum::routing::get(health_check));

    let app = Router::new()
        .merge(swagger)
        .merge(posts_routes(
            upload_service,
            feed_service,
            config.app.max_upload_body_size,
        ))
        .merge(legacy_posts_routes(legacy_catalog))
        .merge(health_route)
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid));

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    // Use socket2 for TCP listener configuration
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nodelay(true)?;

    #[cfg(target_os = "linux")]
    {
        let keepalive = socket2::TcpKeepalive::new()
            .with_time(std::time::Duration::from_secs(60))
            .with_interval(std::time::Duration::from_secs(10))
            .with_retries(3);
        socket.set_tcp_keepalive(&keepalive)?;
    }
    #[cfg(not(target_os = "linux"))]
    {
        let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
        socket.set_tcp_keepalive(&keepalive)?;
    }

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
