// Capitals Comfort API v0.1
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod capitals;
mod config;
mod errors;
mod model;
mod routes;
mod services;
mod storage;

use config::AppConfig;
use routes::rankings::AppState;
use services::collector::{CollectorState, SharedAggregate, SharedCollectorState};
use services::open_meteo::OpenMeteoClient;

/// Capitals Comfort API — OpenAPI specification.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Capitals Comfort API",
        version = "0.1.0",
        description = "Climate comfort ranking for world capitals. \
            Concurrently fetches hourly Open-Meteo forecasts for a fixed set of \
            capitals, cleans them, scores each daytime hour with a seasonal \
            comfort model, and serves overall, daily, top-N, and best-of-day \
            ranking views plus per-city statistics.",
        license(name = "MIT"),
    ),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "Rankings", description = "Comfort rankings and per-city statistics"),
        (name = "Collector", description = "Background weather collector status and control"),
    ),
    paths(
        routes::health::health_check,
        routes::rankings::get_overall_ranking,
        routes::rankings::get_daily_ranking,
        routes::rankings::get_top_per_day,
        routes::rankings::get_best_per_day,
        routes::rankings::get_city_stats,
        routes::collector::get_collector_status,
        routes::collector::trigger_refresh,
    ),
    components(
        schemas(
            routes::health::HealthResponse,
            model::CityMetadata,
            model::CleanedHourlyRow,
            model::CityCleaned,
            services::ranking::RankingEntry,
            services::ranking::DailyRankingEntry,
            services::ranking::CityStats,
            services::collector::CollectorState,
            services::collector::CityCollectStatus,
            services::collector::CityFailure,
            services::collector::RefreshOutcome,
            errors::ErrorResponse,
        )
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "capitals_comfort_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();
    let client = OpenMeteoClient::new(&config.open_meteo_url);

    // Seed the in-memory aggregate from the last persisted cleaned file, if
    // one exists — rankings work across restarts without waiting for the
    // first cycle.
    let cleaned_path = Path::new(&config.data_dir).join(storage::CLEANED_FILE);
    let initial_aggregate = match storage::load_cleaned_aggregate(&cleaned_path) {
        Ok(aggregate) => {
            tracing::info!(
                "Loaded previous cleaned aggregate ({} cities) from {}",
                aggregate.capitals_weather_cleaned.len(),
                cleaned_path.display()
            );
            Some(aggregate)
        }
        Err(e) => {
            tracing::info!(
                "No previous cleaned aggregate ({}), waiting for first refresh cycle",
                e
            );
            None
        }
    };

    let aggregate: SharedAggregate = Arc::new(RwLock::new(initial_aggregate));
    let collector_state: SharedCollectorState = Arc::new(RwLock::new(CollectorState::new()));

    // Spawn the background collector
    tokio::spawn(services::collector::run_collector(
        client.clone(),
        capitals::CAPITALS,
        config.forecast_days,
        PathBuf::from(&config.data_dir),
        Duration::from_secs(config.refresh_interval_secs),
        aggregate.clone(),
        collector_state.clone(),
    ));

    let app_state = AppState {
        aggregate,
        collector_state,
        client,
        config: config.clone(),
    };

    // CORS — read-mostly API for the dashboard
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers(Any);

    let app = Router::new()
        .route("/api/v1/health", get(routes::health::health_check))
        .route(
            "/api/v1/rankings/overall",
            get(routes::rankings::get_overall_ranking),
        )
        .route(
            "/api/v1/rankings/daily",
            get(routes::rankings::get_daily_ranking),
        )
        .route(
            "/api/v1/rankings/top-per-day",
            get(routes::rankings::get_top_per_day),
        )
        .route(
            "/api/v1/rankings/best-per-day",
            get(routes::rankings::get_best_per_day),
        )
        .route("/api/v1/stats", get(routes::rankings::get_city_stats))
        .route(
            "/api/v1/collector/status",
            get(routes::collector::get_collector_status),
        )
        .route(
            "/api/v1/collector/refresh",
            post(routes::collector::trigger_refresh),
        )
        .with_state(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("API server listening on {}", addr);
    tracing::info!(
        "Swagger UI available at http://localhost:{}/swagger-ui/",
        config.port
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind TCP listener");
    axum::serve(listener, app)
        .await
        .expect("Server terminated unexpectedly");
}
