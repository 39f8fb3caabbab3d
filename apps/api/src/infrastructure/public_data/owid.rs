use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::public_data::WorldVaccinationRecord;

const WORLD: &str = "World";

#[derive(Debug, Deserialize)]
struct CountrySeries {
    country: String,
    #[serde(default)]
    data: Vec<DailyRow>,
}

#[derive(Debug, Deserialize)]
struct DailyRow {
    date: NaiveDate,
    people_vaccinated: Option<f64>,
    people_fully_vaccinated: Option<f64>,
}

/// Client for the Our World in Data vaccination dataset
pub struct OwidClient {
    http: Client,
    url: String,
}

impl OwidClient {
    pub fn new(http: Client, url: &str) -> Self {
        Self {
            http,
            url: url.to_string(),
        }
    }

    pub async fn fetch(&self) -> DomainResult<Vec<WorldVaccinationRecord>> {
        let series = self
            .http
            .get(&self.url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| DomainError::ExternalApi(format!("owid request failed: {}", e)))?
            .json::<Vec<CountrySeries>>()
            .await
            .map_err(|e| DomainError::ExternalApi(format!("owid response invalid: {}", e)))?;

        let records = world_records(series);
        debug!(count = records.len(), "owid world series received");
        Ok(records)
    }
}

fn world_records(series: Vec<CountrySeries>) -> Vec<WorldVaccinationRecord> {
    series
        .into_iter()
        .find(|country| country.country == WORLD)
        .map(|world| {
            world
                .data
                .into_iter()
                .map(|row| WorldVaccinationRecord {
                    date: row.date,
                    people_vaccinated: row.people_vaccinated.map(|count| count as i64),
                    people_fully_vaccinated: row.people_fully_vaccinated.map(|count| count as i64),
                })
                .collect()
        })
        .unwrap_or_default()
}
