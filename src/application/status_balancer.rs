// Status balancer - Use case for restoring the even status split
use crate::application::car_store::CarStore;
use crate::application::seed_source::SeedSource;
use crate::domain::car::{now_timestamp, roll_moving_speed, CarStatus};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Clone)]
pub struct StatusBalancer {
    store: Arc<dyn CarStore>,
    seed: Arc<dyn SeedSource>,
    cars_per_status: usize,
}

impl StatusBalancer {
    pub fn new(store: Arc<dyn CarStore>, seed: Arc<dyn SeedSource>, target_car_count: usize) -> Self {
        Self {
            store,
            seed,
            cars_per_status: target_car_count / 3,
        }
    }

    /// Move cars out of over-represented statuses into the first status
    /// still below target. A single pass suffices: the total count is fixed
    /// and every move strictly reduces the excess. Idempotent once no
    /// status exceeds target.
    pub async fn balance(&self) -> anyhow::Result<()> {
        let cars = self.store.find(None).await?;

        let mut counts: HashMap<CarStatus, usize> = HashMap::new();
        for car in &cars {
            *counts.entry(car.status).or_default() += 1;
        }

        for mut car in cars {
            let current = car.status;
            if counts.get(&current).copied().unwrap_or(0) <= self.cars_per_status {
                continue;
            }
            let needed = CarStatus::ALL
                .into_iter()
                .find(|status| counts.get(status).copied().unwrap_or(0) < self.cars_per_status);
            let Some(needed) = needed else {
                continue;
            };

            *counts.entry(current).or_default() -= 1;
            *counts.entry(needed).or_default() += 1;

            car.status = needed;
            car.speed = if needed == CarStatus::Moving {
                roll_moving_speed()
            } else {
                0
            };
            car.timestamp = now_timestamp();

            tracing::debug!("Rebalancing car {} from {} to {}", car.id, current, needed);

            if let Err(err) = self.store.save(car.clone()).await {
                tracing::warn!("Failed to persist rebalanced car {}: {}", car.id, err);
                continue;
            }
            if let Err(err) = self.seed.update(&car.id, &car).await {
                tracing::warn!("Failed to mirror rebalanced car {}: {}", car.id, err);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::seed_source::NoopSeedSource;
    use crate::domain::car::{Car, NewCar};
    use crate::infrastructure::memory_store::InMemoryCarStore;

    fn fields(status: CarStatus, speed: u32) -> NewCar {
        NewCar {
            name: "Car A".to_string(),
            latitude: -1.9,
            longitude: 30.1,
            speed,
            status,
            timestamp: now_timestamp(),
        }
    }

    fn balancer(store: Arc<InMemoryCarStore>) -> StatusBalancer {
        StatusBalancer::new(store, Arc::new(NoopSeedSource), 15)
    }

    async fn status_counts(store: &InMemoryCarStore) -> HashMap<CarStatus, usize> {
        let mut counts = HashMap::new();
        for car in store.find(None).await.unwrap() {
            *counts.entry(car.status).or_insert(0) += 1;
        }
        counts
    }

    #[tokio::test]
    async fn test_balance_evens_out_skewed_fleet() {
        let store = Arc::new(InMemoryCarStore::new());
        for _ in 0..15 {
            store
                .create(fields(CarStatus::Moving, roll_moving_speed()))
                .await
                .unwrap();
        }

        balancer(store.clone()).balance().await.unwrap();

        let counts = status_counts(&store).await;
        assert_eq!(counts.get(&CarStatus::Moving), Some(&5));
        assert_eq!(counts.get(&CarStatus::Stopped), Some(&5));
        assert_eq!(counts.get(&CarStatus::Idle), Some(&5));

        for car in store.find(None).await.unwrap() {
            if car.status == CarStatus::Moving {
                assert!((30..=89).contains(&car.speed));
            } else {
                assert_eq!(car.speed, 0);
            }
        }
    }

    #[tokio::test]
    async fn test_balance_is_idempotent() {
        let store = Arc::new(InMemoryCarStore::new());
        for _ in 0..10 {
            store
                .create(fields(CarStatus::Idle, 0))
                .await
                .unwrap();
        }
        for _ in 0..5 {
            store
                .create(fields(CarStatus::Moving, 42))
                .await
                .unwrap();
        }
        let balancer = balancer(store.clone());

        balancer.balance().await.unwrap();
        let first_pass: Vec<Car> = store.find(None).await.unwrap();

        balancer.balance().await.unwrap();
        let second_pass: Vec<Car> = store.find(None).await.unwrap();

        assert_eq!(first_pass, second_pass);
    }

    #[tokio::test]
    async fn test_balance_leaves_even_fleet_untouched() {
        let store = Arc::new(InMemoryCarStore::new());
        for status in CarStatus::ALL {
            for _ in 0..5 {
                let speed = if status == CarStatus::Moving { 50 } else { 0 };
                store.create(fields(status, speed)).await.unwrap();
            }
        }
        let before = store.find(None).await.unwrap();

        balancer(store.clone()).balance().await.unwrap();

        assert_eq!(store.find(None).await.unwrap(), before);
    }
}
