//! Letcook server entry point.

mod keep_alive;

use std::sync::Arc;
use std::time::Duration;

use axum::{Router, middleware, routing::get};
use letcook_api::{AppState, auth_middleware, router as api_router};
use letcook_common::Config;
use letcook_core::{
    AnalysisService, CommentService, DashboardService, FavoriteService, FollowingService,
    NotificationService, OpenAiProvider, ReactionService, RecipeService, ReportService,
    SearchService, TagService, TokenService, UserService,
};
use letcook_db::repositories::{
    FavoriteRepository, FollowingRepository, NotificationRepository, RecipeCommentRepository,
    RecipeReactionRepository, RecipeReportRepository, RecipeRepository, RecipeTagRepository,
    UserRepository,
};
use tokio::{signal, sync::watch};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::keep_alive::{HttpPinger, run_keep_alive};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

async fn health() -> &'static str {
    "OK"
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "letcook=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting letcook server...");

    let config = Config::load()?;
    let public_url = config.public_url()?;

    let db = letcook_db::init(&config).await?;
    info!("Connected to database");

    info!("Running database migrations...");
    letcook_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let following_repo = FollowingRepository::new(Arc::clone(&db));
    let recipe_repo = RecipeRepository::new(Arc::clone(&db));
    let tag_repo = RecipeTagRepository::new(Arc::clone(&db));
    let comment_repo = RecipeCommentRepository::new(Arc::clone(&db));
    let reaction_repo = RecipeReactionRepository::new(Arc::clone(&db));
    let report_repo = RecipeReportRepository::new(Arc::clone(&db));
    let favorite_repo = FavoriteRepository::new(Arc::clone(&db));
    let notification_repo = NotificationRepository::new(Arc::clone(&db));

    // Initialize services
    let notification_service = NotificationService::new(notification_repo);
    let recipe_service = RecipeService::new(
        recipe_repo.clone(),
        user_repo.clone(),
        comment_repo.clone(),
        notification_service.clone(),
    );

    if config.analysis.api_key.is_none() {
        tracing::warn!("No analysis API key configured; analysis endpoints will fail");
    }
    let analysis_service = AnalysisService::new(
        Arc::new(OpenAiProvider::new(config.analysis.clone())),
        recipe_service.clone(),
        Duration::from_secs(config.analysis.cache_ttl_secs),
    );

    let state = AppState {
        token_service: TokenService::new(&config),
        user_service: UserService::new(user_repo.clone()),
        following_service: FollowingService::new(following_repo, user_repo.clone()),
        tag_service: TagService::new(tag_repo, recipe_repo.clone(), recipe_service.clone()),
        comment_service: CommentService::new(
            comment_repo,
            recipe_repo.clone(),
            recipe_service.clone(),
        ),
        reaction_service: ReactionService::new(reaction_repo, recipe_service.clone()),
        report_service: ReportService::new(
            report_repo.clone(),
            recipe_repo.clone(),
            recipe_service.clone(),
        ),
        favorite_service: FavoriteService::new(
            favorite_repo,
            recipe_repo.clone(),
            recipe_service.clone(),
        ),
        search_service: SearchService::new(recipe_repo.clone(), recipe_service.clone()),
        analysis_service,
        dashboard_service: DashboardService::new(user_repo, recipe_repo, report_repo),
        notification_service,
        recipe_service,
    };

    // Build router
    let app = Router::new()
        .route("/health", get(health))
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    if config.keep_alive.enabled {
        let period = Duration::from_secs(config.keep_alive.interval_secs);
        info!(url = %public_url, ?period, "Starting keep-alive ping");
        tokio::spawn(run_keep_alive(
            period,
            Arc::new(HttpPinger::new(public_url.to_string())),
            shutdown_rx,
        ));
    }

    // Start server with graceful shutdown
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = shutdown_tx.send(true);
        })
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
