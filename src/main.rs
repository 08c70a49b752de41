// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc, time::Duration};
use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::application::car_store::CarStore;
use crate::application::fleet_initializer::FleetInitializer;
use crate::application::fleet_service::FleetService;
use crate::application::position_updater::{spawn_position_scheduler, PositionUpdater};
use crate::application::seed_source::{NoopSeedSource, SeedSource};
use crate::application::status_balancer::StatusBalancer;
use crate::infrastructure::config::load_fleet_config;
use crate::infrastructure::memory_store::InMemoryCarStore;
use crate::infrastructure::mock_api::MockApiSeedSource;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    create_car, delete_car, fleet_summary, get_car, health_check, list_cars,
    status_distribution, update_car,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = load_fleet_config()?;

    // Create store and seed source (infrastructure layer)
    let store: Arc<dyn CarStore> = Arc::new(InMemoryCarStore::new());
    let seed: Arc<dyn SeedSource> = match &config.seed {
        Some(settings) => Arc::new(MockApiSeedSource::new(settings.url.clone())),
        None => Arc::new(NoopSeedSource),
    };

    // Create services (application layer)
    let balancer = StatusBalancer::new(store.clone(), seed.clone(), config.fleet.target_car_count);
    let initializer = FleetInitializer::new(
        store.clone(),
        seed.clone(),
        balancer,
        config.fleet.target_car_count,
    );
    let updater = PositionUpdater::new(store.clone(), seed.clone(), initializer.clone());
    let fleet_service = FleetService::new(store.clone());

    // Populate the fleet once; a failure here degrades to an empty fleet
    // that the first scheduler tick will initialize instead.
    if let Err(err) = initializer.initialize().await {
        tracing::error!("Fleet initialization failed: {:#}", err);
    }

    spawn_position_scheduler(
        updater,
        Duration::from_millis(config.fleet.update_interval_ms),
    );

    // Create application state
    let state = Arc::new(AppState { fleet_service });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/", get(fleet_summary))
        .route("/healthz", get(health_check))
        .route("/cars", get(list_cars).post(create_car))
        .route("/cars/:id", get(get_car).put(update_car).delete(delete_car))
        .route("/status", get(status_distribution))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config.server.listen_addr.parse()?;
    println!("Starting fleet-tracker service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
