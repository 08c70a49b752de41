// Position updater - Scheduled random-walk advancement of moving cars
use crate::application::car_store::CarStore;
use crate::application::fleet_initializer::FleetInitializer;
use crate::application::seed_source::SeedSource;
use crate::domain::car::CarStatus;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;

#[derive(Clone)]
pub struct PositionUpdater {
    store: Arc<dyn CarStore>,
    seed: Arc<dyn SeedSource>,
    initializer: FleetInitializer,
    tick_guard: Arc<Mutex<()>>,
}

impl PositionUpdater {
    pub fn new(
        store: Arc<dyn CarStore>,
        seed: Arc<dyn SeedSource>,
        initializer: FleetInitializer,
    ) -> Self {
        Self {
            store,
            seed,
            initializer,
            tick_guard: Arc::new(Mutex::new(())),
        }
    }

    /// One scheduled invocation. Advances every Moving car by a random-walk
    /// step; Stopped and Idle cars are never touched. An empty store
    /// delegates to the initializer instead of updating.
    ///
    /// Single-flight: a tick that fires while the previous one is still
    /// running is skipped, never queued behind it.
    pub async fn tick(&self) -> anyhow::Result<()> {
        let _guard = match self.tick_guard.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                tracing::warn!("Previous position update still running, skipping tick");
                return Ok(());
            }
        };

        if self.store.count().await? == 0 {
            return self.initializer.initialize().await;
        }

        tracing::debug!("Updating car positions");

        let moving = self.store.find(Some(CarStatus::Moving)).await?;
        let updated = moving.len();

        // Per-car updates are independent; persistence failures are logged
        // and do not block the rest of the tick.
        let updates = moving.into_iter().map(|mut car| {
            let store = self.store.clone();
            let seed = self.seed.clone();
            async move {
                let angle = rand::rng().random_range(0.0..std::f64::consts::TAU);
                car.advance(angle);

                if let Err(err) = store.save(car.clone()).await {
                    tracing::warn!("Failed to persist position of car {}: {}", car.id, err);
                    return;
                }
                if let Err(err) = seed.update(&car.id, &car).await {
                    tracing::warn!("Failed to mirror position of car {}: {}", car.id, err);
                }
            }
        });
        futures::future::join_all(updates).await;

        tracing::info!("Updated positions of {} cars", updated);
        Ok(())
    }
}

/// Drive the updater on a fixed period. Ticks are awaited in-loop, so they
/// serialize; a tick that comes due mid-run is skipped rather than bursted.
pub fn spawn_position_scheduler(
    updater: PositionUpdater,
    period: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick fires immediately; initialization already ran.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if let Err(err) = updater.tick().await {
                tracing::error!("Position update tick failed: {:#}", err);
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::seed_source::{NoopSeedSource, SeedSourceError};
    use crate::application::status_balancer::StatusBalancer;
    use crate::domain::car::{Car, NewCar};
    use crate::infrastructure::memory_store::InMemoryCarStore;
    use async_trait::async_trait;

    struct RejectingSeedSource;

    #[async_trait]
    impl SeedSource for RejectingSeedSource {
        async fn list(&self) -> Result<Vec<Car>, SeedSourceError> {
            Ok(Vec::new())
        }

        async fn create(&self, _fields: &NewCar) -> Result<Option<Car>, SeedSourceError> {
            Ok(None)
        }

        async fn update(&self, _id: &str, _car: &Car) -> Result<Option<Car>, SeedSourceError> {
            Err(SeedSourceError::Status(reqwest::StatusCode::BAD_GATEWAY))
        }
    }

    fn updater(store: Arc<InMemoryCarStore>, seed: Arc<dyn SeedSource>) -> PositionUpdater {
        let balancer = StatusBalancer::new(store.clone(), seed.clone(), 15);
        let initializer = FleetInitializer::new(store.clone(), seed.clone(), balancer, 15);
        PositionUpdater::new(store, seed, initializer)
    }

    fn fields(status: CarStatus, speed: u32) -> NewCar {
        NewCar {
            name: "Car A".to_string(),
            latitude: 0.0,
            longitude: 0.0,
            speed,
            status,
            timestamp: "2025-01-01T00:00:00.000Z".to_string(),
        }
    }

    #[tokio::test]
    async fn test_tick_moves_only_moving_cars() {
        let store = Arc::new(InMemoryCarStore::new());
        let moving = store.create(fields(CarStatus::Moving, 60)).await.unwrap();
        let stopped = store.create(fields(CarStatus::Stopped, 0)).await.unwrap();

        updater(store.clone(), Arc::new(NoopSeedSource))
            .tick()
            .await
            .unwrap();

        let moved = store.find_by_id(&moving.id).await.unwrap().unwrap();
        let travelled = (moved.latitude.powi(2) + moved.longitude.powi(2)).sqrt();
        assert!((travelled - 0.006).abs() < 1e-6);
        assert_ne!(moved.timestamp, moving.timestamp);

        // The stopped car's record is bit-for-bit untouched.
        let parked = store.find_by_id(&stopped.id).await.unwrap().unwrap();
        assert_eq!(parked, stopped);
    }

    #[tokio::test]
    async fn test_tick_on_empty_store_initializes_fleet() {
        let store = Arc::new(InMemoryCarStore::new());

        updater(store.clone(), Arc::new(NoopSeedSource))
            .tick()
            .await
            .unwrap();

        assert_eq!(store.count().await.unwrap(), 15);
    }

    #[tokio::test]
    async fn test_tick_is_skipped_while_previous_tick_runs() {
        let store = Arc::new(InMemoryCarStore::new());
        let car = store.create(fields(CarStatus::Moving, 60)).await.unwrap();
        let updater = updater(store.clone(), Arc::new(NoopSeedSource));

        let _running = updater.tick_guard.lock().await;
        updater.tick().await.unwrap();

        // The overlapping tick backed off without touching the fleet.
        assert_eq!(store.find_by_id(&car.id).await.unwrap(), Some(car));
    }

    #[tokio::test]
    async fn test_mirror_failure_does_not_abort_tick() {
        let store = Arc::new(InMemoryCarStore::new());
        let first = store.create(fields(CarStatus::Moving, 40)).await.unwrap();
        let second = store.create(fields(CarStatus::Moving, 80)).await.unwrap();

        updater(store.clone(), Arc::new(RejectingSeedSource))
            .tick()
            .await
            .unwrap();

        for (id, speed) in [(first.id, 40u32), (second.id, 80u32)] {
            let car = store.find_by_id(&id).await.unwrap().unwrap();
            let travelled = (car.latitude.powi(2) + car.longitude.powi(2)).sqrt();
            let expected = f64::from(speed) / 10.0 * 0.001;
            assert!((travelled - expected).abs() < 1e-6);
        }
    }
}
