// In-memory car store
use crate::application::car_store::CarStore;
use crate::domain::car::{Car, CarStatus, NewCar};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// Process-wide fleet state behind a read-write lock. Ids are sequential
/// integers rendered as strings, matching what the remote mirror hands out.
pub struct InMemoryCarStore {
    cars: RwLock<Vec<Car>>,
    next_id: AtomicU64,
}

impl InMemoryCarStore {
    pub fn new() -> Self {
        Self {
            cars: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    fn claim_id(&self) -> String {
        self.next_id.fetch_add(1, Ordering::SeqCst).to_string()
    }

    /// Keep the id counter ahead of any numeric id saved from outside, so
    /// later local creates cannot collide with imported records.
    fn reserve_past(&self, id: &str) {
        if let Ok(numeric) = id.parse::<u64>() {
            self.next_id.fetch_max(numeric + 1, Ordering::SeqCst);
        }
    }
}

impl Default for InMemoryCarStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CarStore for InMemoryCarStore {
    async fn count(&self) -> anyhow::Result<usize> {
        Ok(self.cars.read().await.len())
    }

    async fn find(&self, status: Option<CarStatus>) -> anyhow::Result<Vec<Car>> {
        let cars = self.cars.read().await;
        Ok(cars
            .iter()
            .filter(|car| status.is_none_or(|wanted| car.status == wanted))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: &str) -> anyhow::Result<Option<Car>> {
        let cars = self.cars.read().await;
        Ok(cars.iter().find(|car| car.id == id).cloned())
    }

    async fn create(&self, fields: NewCar) -> anyhow::Result<Car> {
        let car = fields.into_car(self.claim_id());
        self.cars.write().await.push(car.clone());
        Ok(car)
    }

    async fn save(&self, car: Car) -> anyhow::Result<Car> {
        self.reserve_past(&car.id);
        let mut cars = self.cars.write().await;
        match cars.iter_mut().find(|existing| existing.id == car.id) {
            Some(existing) => *existing = car.clone(),
            None => cars.push(car.clone()),
        }
        Ok(car)
    }

    async fn remove(&self, id: &str) -> anyhow::Result<bool> {
        let mut cars = self.cars.write().await;
        let before = cars.len();
        cars.retain(|car| car.id != id);
        Ok(cars.len() < before)
    }

    async fn clear(&self) -> anyhow::Result<()> {
        self.cars.write().await.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::car::now_timestamp;

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

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let store = InMemoryCarStore::new();

        let first = store.create(fields(CarStatus::Idle, 0)).await.unwrap();
        let second = store.create(fields(CarStatus::Idle, 0)).await.unwrap();

        assert_eq!(first.id, "1");
        assert_eq!(second.id, "2");
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_save_upserts_and_reserves_numeric_ids() {
        let store = InMemoryCarStore::new();

        let imported = fields(CarStatus::Moving, 50).into_car("7".to_string());
        store.save(imported.clone()).await.unwrap();
        assert_eq!(store.find_by_id("7").await.unwrap(), Some(imported.clone()));

        // Saving again under the same id replaces, not duplicates.
        let mut renamed = imported;
        renamed.name = "Car B".to_string();
        store.save(renamed.clone()).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 1);
        assert_eq!(store.find_by_id("7").await.unwrap(), Some(renamed));

        // The next local create starts past the imported id.
        let created = store.create(fields(CarStatus::Idle, 0)).await.unwrap();
        assert_eq!(created.id, "8");
    }

    #[tokio::test]
    async fn test_find_filters_by_status() {
        let store = InMemoryCarStore::new();
        store.create(fields(CarStatus::Moving, 60)).await.unwrap();
        store.create(fields(CarStatus::Stopped, 0)).await.unwrap();
        store.create(fields(CarStatus::Moving, 35)).await.unwrap();

        let moving = store.find(Some(CarStatus::Moving)).await.unwrap();
        assert_eq!(moving.len(), 2);
        assert!(moving.iter().all(|car| car.status == CarStatus::Moving));

        assert_eq!(store.find(None).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_remove_and_clear() {
        let store = InMemoryCarStore::new();
        let car = store.create(fields(CarStatus::Idle, 0)).await.unwrap();
        store.create(fields(CarStatus::Idle, 0)).await.unwrap();

        assert!(store.remove(&car.id).await.unwrap());
        assert!(!store.remove(&car.id).await.unwrap());
        assert_eq!(store.count().await.unwrap(), 1);

        store.clear().await.unwrap();
        assert_eq!(store.count().await.unwrap(), 0);
    }
}
