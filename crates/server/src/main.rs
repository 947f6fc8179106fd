//! Tandem server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{middleware, Router};
use tandem_api::{middleware::AppState, router as api_router, SseBroadcaster};
use tandem_common::Config;
use tandem_core::{
    GoalService, HistoryService, QuestionService, ReflectionService, SubscriptionService,
    UserService, VoteService,
};
use tandem_db::repositories::{
    CycleRenewalRepository, GoalRepository, QuestionRepository, QuestionResponseLikeRepository,
    QuestionResponseRepository, ReflectionLikeRepository, ReflectionRepository,
    SubscriptionRepository, UserProfileRepository, UserRepository, VoteRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
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

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tandem=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting tandem server...");

    // Load configuration
    let config = Config::load()?;
    let cycle_days = config.cycle.length_days;

    // Connect to database
    let db = tandem_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    tandem_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let user_profile_repo = UserProfileRepository::new(Arc::clone(&db));
    let goal_repo = GoalRepository::new(Arc::clone(&db));
    let subscription_repo = SubscriptionRepository::new(Arc::clone(&db));
    let vote_repo = VoteRepository::new(Arc::clone(&db));
    let reflection_repo = ReflectionRepository::new(Arc::clone(&db));
    let reflection_like_repo = ReflectionLikeRepository::new(Arc::clone(&db));
    let cycle_renewal_repo = CycleRenewalRepository::new(Arc::clone(&db));
    let question_repo = QuestionRepository::new(Arc::clone(&db));
    let question_response_repo = QuestionResponseRepository::new(Arc::clone(&db));
    let question_response_like_repo = QuestionResponseLikeRepository::new(Arc::clone(&db));

    // Initialize services
    let user_service = UserService::new(
        user_repo,
        user_profile_repo,
        subscription_repo.clone(),
        reflection_repo.clone(),
        vote_repo.clone(),
    );
    let goal_service = GoalService::new(goal_repo.clone(), vote_repo.clone());
    let subscription_service = SubscriptionService::new(
        subscription_repo.clone(),
        goal_repo.clone(),
        cycle_renewal_repo,
        cycle_days,
    );
    let vote_service = VoteService::new(
        vote_repo.clone(),
        subscription_repo.clone(),
        reflection_repo.clone(),
        cycle_days,
    );
    let reflection_service =
        ReflectionService::new(reflection_repo, reflection_like_repo, goal_repo.clone());
    let question_service = QuestionService::new(
        question_repo,
        question_response_repo,
        question_response_like_repo,
    );
    let history_service =
        HistoryService::new(vote_repo, subscription_repo, goal_repo, cycle_days);

    // Initialize SSE broadcaster
    let sse_broadcaster = SseBroadcaster::new();

    // Create app state
    let state = AppState {
        user_service,
        goal_service,
        subscription_service,
        vote_service,
        reflection_service,
        question_service,
        history_service,
        sse_broadcaster,
    };

    // Build router
    let app = Router::new()
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            tandem_api::middleware::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
