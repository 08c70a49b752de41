// Store trait for car record access
use crate::domain::car::{Car, CarStatus, NewCar};
use async_trait::async_trait;

/// Durable collection of car records. The store is the sole owner of local
/// identity assignment; per-record writes are atomic (last-write-wins).
#[async_trait]
pub trait CarStore: Send + Sync {
    /// Number of cars currently held.
    async fn count(&self) -> anyhow::Result<usize>;

    /// All cars, optionally filtered by status, in insertion order.
    async fn find(&self, status: Option<CarStatus>) -> anyhow::Result<Vec<Car>>;

    async fn find_by_id(&self, id: &str) -> anyhow::Result<Option<Car>>;

    /// Persist a new car, assigning it a fresh id.
    async fn create(&self, fields: NewCar) -> anyhow::Result<Car>;

    /// Upsert a full record under its existing id.
    async fn save(&self, car: Car) -> anyhow::Result<Car>;

    /// Remove a car; returns false when the id is absent.
    async fn remove(&self, id: &str) -> anyhow::Result<bool>;

    async fn clear(&self) -> anyhow::Result<()>;
}
