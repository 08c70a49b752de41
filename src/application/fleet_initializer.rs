// Fleet initializer - Use case for seeding the fleet to its target size
use crate::application::car_store::CarStore;
use crate::application::seed_source::SeedSource;
use crate::application::status_balancer::StatusBalancer;
use crate::domain::car::{
    fleet_letter_name, now_timestamp, roll_moving_speed, Car, CarStatus, NewCar,
};
use rand::Rng;
use std::sync::Arc;

// Spawn box for synthetic cars (Kigali area).
const BASE_LATITUDE: f64 = -1.94;
const BASE_LONGITUDE: f64 = 30.05;
const SPAWN_SPREAD: f64 = 0.1;

#[derive(Clone)]
pub struct FleetInitializer {
    store: Arc<dyn CarStore>,
    seed: Arc<dyn SeedSource>,
    balancer: StatusBalancer,
    target_car_count: usize,
}

impl FleetInitializer {
    pub fn new(
        store: Arc<dyn CarStore>,
        seed: Arc<dyn SeedSource>,
        balancer: StatusBalancer,
        target_car_count: usize,
    ) -> Self {
        Self {
            store,
            seed,
            balancer,
            target_car_count,
        }
    }

    /// Bring the store up to the target fleet size. Safe to call repeatedly.
    ///
    /// Remote records are reconciled into the local store first; when the
    /// mirror cannot be reached at all, the fleet is regenerated from
    /// scratch locally instead.
    pub async fn initialize(&self) -> anyhow::Result<()> {
        match self.seed.list().await {
            Ok(remote_cars) => {
                for car in remote_cars {
                    self.store.save(car).await?;
                }
            }
            Err(err) => {
                tracing::error!("Failed to fetch initial car data: {}", err);
                return self.regenerate_fleet().await;
            }
        }

        let count = self.store.count().await?;
        if count < self.target_car_count {
            self.generate_additional(self.target_car_count - count).await?;
        }

        tracing::info!("Initialized with {} cars", self.store.count().await?);
        self.balancer.balance().await?;
        Ok(())
    }

    /// Top the fleet up by `amount` cars, cycling statuses so the additions
    /// spread evenly.
    async fn generate_additional(&self, amount: usize) -> anyhow::Result<()> {
        tracing::info!("Generating {} additional cars", amount);

        let existing = self.store.count().await?;
        for i in 0..amount {
            let status = CarStatus::ALL[i % 3];
            let fields = synthesize_car(existing + i, status);
            self.persist_generated(fields).await?;
        }
        Ok(())
    }

    /// Discard the whole fleet and rebuild it with an exact even status
    /// split. No balancing pass is needed afterwards.
    async fn regenerate_fleet(&self) -> anyhow::Result<()> {
        tracing::info!("Generating all {} cars", self.target_car_count);

        self.store.clear().await?;
        let cars_per_status = (self.target_car_count / 3).max(1);
        for i in 0..self.target_car_count {
            let status = CarStatus::ALL[(i / cars_per_status) % 3];
            let fields = synthesize_car(i, status);
            self.persist_generated(fields).await?;
        }
        Ok(())
    }

    /// Offer a generated car to the mirror first; fall back to a locally
    /// assigned id when it is unavailable. A generated car is never dropped.
    async fn persist_generated(&self, fields: NewCar) -> anyhow::Result<Car> {
        match self.seed.create(&fields).await {
            Ok(Some(remote)) => {
                tracing::info!("Created new car in seed source: {}", remote.id);
                self.store.save(remote).await
            }
            Ok(None) => self.store.create(fields).await,
            Err(err) => {
                tracing::warn!("Failed to create car in seed source, keeping local copy: {}", err);
                self.store.create(fields).await
            }
        }
    }
}

fn synthesize_car(letter_index: usize, status: CarStatus) -> NewCar {
    let mut rng = rand::rng();
    NewCar {
        name: fleet_letter_name(letter_index),
        latitude: BASE_LATITUDE + rng.random_range(0.0..SPAWN_SPREAD),
        longitude: BASE_LONGITUDE + rng.random_range(0.0..SPAWN_SPREAD),
        speed: if status == CarStatus::Moving {
            roll_moving_speed()
        } else {
            0
        },
        status,
        timestamp: now_timestamp(),
    }
}
