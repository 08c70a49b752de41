// Seed source trait for the optional remote fleet mirror
use crate::domain::car::{Car, NewCar};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeedSourceError {
    #[error("seed source request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("seed source returned status {0}")]
    Status(reqwest::StatusCode),
}

/// Remote mirror of the fleet. Selected by configuration: a real client
/// when a mirror URL is configured, [`NoopSeedSource`] otherwise, so
/// callers never branch on reachability themselves.
#[async_trait]
pub trait SeedSource: Send + Sync {
    /// Fetch the mirror's full car list.
    async fn list(&self) -> Result<Vec<Car>, SeedSourceError>;

    /// Mirror a new car. `None` means the car was not mirrored and the
    /// local store should assign its identity.
    async fn create(&self, fields: &NewCar) -> Result<Option<Car>, SeedSourceError>;

    /// Mirror an updated car. `None` means the write went nowhere.
    async fn update(&self, id: &str, car: &Car) -> Result<Option<Car>, SeedSourceError>;
}

/// Local-only stand-in used when no mirror is configured: an empty fleet
/// upstream, and writes that trivially succeed without mirroring.
pub struct NoopSeedSource;

#[async_trait]
impl SeedSource for NoopSeedSource {
    async fn list(&self) -> Result<Vec<Car>, SeedSourceError> {
        Ok(Vec::new())
    }

    async fn create(&self, _fields: &NewCar) -> Result<Option<Car>, SeedSourceError> {
        Ok(None)
    }

    async fn update(&self, _id: &str, _car: &Car) -> Result<Option<Car>, SeedSourceError> {
        Ok(None)
    }
}
