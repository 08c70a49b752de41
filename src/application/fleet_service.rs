// Fleet service - CRUD use cases exposed to the HTTP layer
use crate::application::car_store::CarStore;
use crate::domain::car::{now_timestamp, Car, CarStatus, NewCar};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct CreateCarRequest {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub speed: u32,
    pub status: CarStatus,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Partial update; omitted fields keep their stored values.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCarRequest {
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub speed: Option<u32>,
    pub status: Option<CarStatus>,
    pub timestamp: Option<String>,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct StatusCount {
    pub status: CarStatus,
    pub count: usize,
}

#[derive(Clone)]
pub struct FleetService {
    store: Arc<dyn CarStore>,
}

impl FleetService {
    pub fn new(store: Arc<dyn CarStore>) -> Self {
        Self { store }
    }

    pub async fn get_all(&self) -> anyhow::Result<Vec<Car>> {
        self.store.find(None).await
    }

    pub async fn get_by_id(&self, id: &str) -> anyhow::Result<Option<Car>> {
        self.store.find_by_id(id).await
    }

    /// Persist a caller-supplied car. The timestamp is stamped when omitted
    /// and the speed is zeroed for non-moving statuses, so the speed
    /// invariant holds from the moment of creation.
    pub async fn create(&self, request: CreateCarRequest) -> anyhow::Result<Car> {
        let speed = if request.status == CarStatus::Moving {
            request.speed
        } else {
            0
        };
        let fields = NewCar {
            name: request.name,
            latitude: request.latitude,
            longitude: request.longitude,
            speed,
            status: request.status,
            timestamp: request.timestamp.unwrap_or_else(now_timestamp),
        };
        self.store.create(fields).await
    }

    /// Merge the provided fields over the stored record. Returns `None`
    /// when the id is absent. A car leaving the Moving state has its speed
    /// forced to zero regardless of what the caller sent.
    pub async fn update(
        &self,
        id: &str,
        request: UpdateCarRequest,
    ) -> anyhow::Result<Option<Car>> {
        let Some(mut car) = self.store.find_by_id(id).await? else {
            return Ok(None);
        };

        if let Some(name) = request.name {
            car.name = name;
        }
        if let Some(latitude) = request.latitude {
            car.latitude = latitude;
        }
        if let Some(longitude) = request.longitude {
            car.longitude = longitude;
        }
        if let Some(speed) = request.speed {
            car.speed = speed;
        }
        if let Some(status) = request.status {
            car.status = status;
        }
        if car.status != CarStatus::Moving {
            car.speed = 0;
        }
        car.timestamp = request.timestamp.unwrap_or_else(now_timestamp);

        self.store.save(car).await.map(Some)
    }

    pub async fn delete(&self, id: &str) -> anyhow::Result<bool> {
        self.store.remove(id).await
    }

    /// Car counts per status, in canonical status order.
    pub async fn status_distribution(&self) -> anyhow::Result<Vec<StatusCount>> {
        let cars = self.store.find(None).await?;
        Ok(distribution_of(&cars))
    }

    /// One-line human-readable fleet summary.
    pub async fn summary(&self) -> anyhow::Result<String> {
        let cars = self.store.find(None).await?;
        let distribution = distribution_of(&cars)
            .iter()
            .map(|entry| format!("{}: {}", entry.status, entry.count))
            .collect::<Vec<_>>()
            .join(", ");
        Ok(format!(
            "Tracking {} vehicles ({})",
            cars.len(),
            distribution
        ))
    }
}

fn distribution_of(cars: &[Car]) -> Vec<StatusCount> {
    CarStatus::ALL
        .into_iter()
        .map(|status| StatusCount {
            status,
            count: cars.iter().filter(|car| car.status == status).count(),
        })
        .collect()
}
