// Public vaccination data providers
// HTTP adapters behind the VaccinationDataSource port

pub mod odcloud;
pub mod owid;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;

use crate::config::PublicDataConfig;
use crate::domain::errors::DomainResult;
use crate::domain::public_data::{
    KoreaVaccinationRecord, VaccinationDataSource, WorldVaccinationRecord,
};

pub use odcloud::OdcloudClient;
pub use owid::OwidClient;

/// Korean data from odcloud, worldwide data from Our World in Data
pub struct PublicDataClient {
    korea: OdcloudClient,
    world: OwidClient,
}

impl PublicDataClient {
    pub fn new(http: Client, config: &PublicDataConfig) -> Self {
        Self {
            korea: OdcloudClient::new(http.clone(), &config.korea_url, &config.service_key),
            world: OwidClient::new(http, &config.world_url),
        }
    }
}

#[async_trait]
impl VaccinationDataSource for PublicDataClient {
    async fn fetch_korea(&self, target_date: NaiveDate) -> DomainResult<Vec<KoreaVaccinationRecord>> {
        self.korea.fetch(target_date).await
    }

    async fn fetch_world(&self) -> DomainResult<Vec<WorldVaccinationRecord>> {
        self.world.fetch().await
    }
}
