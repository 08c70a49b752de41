// Mock-API seed source implementation
use crate::application::seed_source::{SeedSource, SeedSourceError};
use crate::domain::car::{Car, NewCar};
use async_trait::async_trait;

/// Client for the remote car mirror (a mockapi.io-style REST collection:
/// GET the collection, POST to create, PUT to update).
#[derive(Debug, Clone)]
pub struct MockApiSeedSource {
    client: reqwest::Client,
    base_url: String,
}

impl MockApiSeedSource {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn car_url(&self, id: &str) -> String {
        format!("{}/{}", self.base_url, id)
    }

    fn ok_or_status(response: reqwest::Response) -> Result<reqwest::Response, SeedSourceError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(SeedSourceError::Status(status))
        }
    }
}

#[async_trait]
impl SeedSource for MockApiSeedSource {
    async fn list(&self) -> Result<Vec<Car>, SeedSourceError> {
        let response = self.client.get(&self.base_url).send().await?;
        let response = Self::ok_or_status(response)?;
        Ok(response.json::<Vec<Car>>().await?)
    }

    async fn create(&self, fields: &NewCar) -> Result<Option<Car>, SeedSourceError> {
        let response = self.client.post(&self.base_url).json(fields).send().await?;
        let response = Self::ok_or_status(response)?;
        Ok(Some(response.json::<Car>().await?))
    }

    async fn update(&self, id: &str, car: &Car) -> Result<Option<Car>, SeedSourceError> {
        let response = self.client.put(self.car_url(id)).json(car).send().await?;
        let response = Self::ok_or_status(response)?;
        Ok(Some(response.json::<Car>().await?))
    }
}
