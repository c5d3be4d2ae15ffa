use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    catch_panic::CatchPanicLayer, limit::RequestBodyLimitLayer, timeout::TimeoutLayer,
};

use crate::config::ServerConfig;
use crate::model::{Norms, PlannedActivities, ProfileField, Relationships, RelevantLocations};
use crate::persistence::{seed, InMemoryProfilesRepository, ProfilesRepository};
use field_handlers::{
    add_item, delete_item, merge_item, retrieve_item, retrieve_items, update_item,
};
use handlers::{
    create_profile, delete_profile, health_check, help_info, merge_profile,
    retrieve_historic_profiles_page, retrieve_profile, retrieve_profiles_page,
    retrieve_user_identifiers_page, route_not_found, update_profile,
};

pub mod errors;
mod field_handlers;
pub mod handlers;
pub mod models;

#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn ProfilesRepository>,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(repository: Arc<dyn ProfilesRepository>, config: ServerConfig) -> Self {
        Self { repository, config }
    }
}

/// Mount the item endpoints of one profile collection under `path`.
fn field_routes<F: ProfileField>(
    router: Router<Arc<AppState>>,
    path: &str,
) -> Router<Arc<AppState>> {
    router
        .route(
            &format!("/profiles/{{userId}}/{}", path),
            post(add_item::<F>).get(retrieve_items::<F>),
        )
        .route(
            &format!("/profiles/{{userId}}/{}/{{key}}", path),
            get(retrieve_item::<F>)
                .put(update_item::<F>)
                .patch(merge_item::<F>)
                .delete(delete_item::<F>),
        )
}

pub fn build_router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.request_timeout_secs);
    let max_body_bytes = state.config.max_body_bytes;

    let router = Router::new()
        .route("/health", get(health_check))
        .route("/help/info", get(help_info))
        .route(
            "/profiles",
            post(create_profile).get(retrieve_profiles_page),
        )
        .route("/userIdentifiers", get(retrieve_user_identifiers_page))
        .route(
            "/profiles/{userId}",
            get(retrieve_profile)
                .put(update_profile)
                .patch(merge_profile)
                .delete(delete_profile),
        )
        .route(
            "/profiles/{userId}/historic",
            get(retrieve_historic_profiles_page),
        );
    let router = field_routes::<Norms>(router, "norms");
    let router = field_routes::<PlannedActivities>(router, "plannedActivities");
    let router = field_routes::<RelevantLocations>(router, "relevantLocations");
    let router = field_routes::<Relationships>(router, "relationships");

    router
        .fallback(route_not_found)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(timeout))
        .layer(CatchPanicLayer::new())
        .with_state(Arc::new(state))
}

/// Build the store for `config`, seeding it when a seed file is configured.
pub async fn build_repository(
    config: &ServerConfig,
) -> Result<Arc<dyn ProfilesRepository>, crate::persistence::PersistenceError> {
    let repository: Arc<dyn ProfilesRepository> = Arc::new(InMemoryProfilesRepository::new());
    if let Some(path) = config.seed_file.as_deref() {
        let report = seed::seed_from_file(repository.as_ref(), path).await?;
        log::info!(
            "Seed finished: {} inserted, {} skipped, {} rejected",
            report.inserted,
            report.skipped,
            report.rejected
        );
    }
    Ok(repository)
}

pub async fn run_with_config(config: ServerConfig) {
    log::info!(
        "Server configuration: http={}:{}, default page limit={}, request timeout={}s",
        config.http_host,
        config.http_port,
        config.default_page_limit,
        config.request_timeout_secs
    );

    let repository = match build_repository(&config).await {
        Ok(repository) => repository,
        Err(e) => {
            log::error!("✗ Failed to initialize the profile store: {}", e);
            std::process::exit(1);
        }
    };

    let http_bind_address = format!("{}:{}", config.http_host, config.http_port);
    log::info!("Starting HTTP server on {}", http_bind_address);

    let daemon = config.daemon;
    let app = build_router(AppState::new(repository, config.clone()));

    let http_listener = match TcpListener::bind(&http_bind_address).await {
        Ok(listener) => {
            log::info!("Successfully bound HTTP listener to {}", http_bind_address);
            listener
        }
        Err(e) => {
            log::error!(
                "✗ FATAL: Failed to bind HTTP listener to {}: {}",
                http_bind_address,
                e
            );
            log::error!("  Is another process using port {}?", config.http_port);
            std::process::exit(1);
        }
    };

    let http_server = axum::serve(http_listener, app);
    println!("Profile manager is running");
    println!("  HTTP API: http://{}", http_bind_address);

    if daemon {
        println!("Running in daemon mode - press Ctrl+C to stop");

        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};

            let (mut sigterm, mut sigint) =
                match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                    (Ok(sigterm), Ok(sigint)) => (sigterm, sigint),
                    (Err(e), _) | (_, Err(e)) => {
                        log::error!(
                            "Failed to register signal handlers: {}. Server will run without graceful shutdown.",
                            e
                        );
                        if let Err(e) = http_server.await {
                            log::error!("HTTP server error: {:?}", e);
                        }
                        return;
                    }
                };

            tokio::select! {
                result = http_server => {
                    if let Err(e) = result {
                        log::error!("HTTP server error: {:?}", e);
                    }
                }
                _ = sigterm.recv() => println!("Received SIGTERM, shutting down..."),
                _ = sigint.recv() => println!("Received SIGINT, shutting down..."),
            }
        }

        #[cfg(windows)]
        {
            tokio::select! {
                result = http_server => {
                    if let Err(e) = result {
                        log::error!("HTTP server error: {:?}", e);
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    println!("Received shutdown signal, shutting down...");
                }
            }
        }

        println!("Server stopped");
    } else if let Err(e) = http_server.await {
        log::error!("HTTP server fatal error: {:?}", e);
        std::process::exit(1);
    }
}
