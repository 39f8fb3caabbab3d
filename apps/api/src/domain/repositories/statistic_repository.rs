use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::public_data::{RegionPopulation, VaccinationStatistic};

/// Repository trait for daily vaccination statistics
#[async_trait]
pub trait VaccinationStatisticRepository: Send + Sync {
    /// Insert rows in one transaction
    async fn save_all(&self, statistics: &[VaccinationStatistic]) -> Result<(), String>;

    /// Every row for a date, regions in canonical order
    async fn find_by_base_date(&self, base_date: NaiveDate)
        -> Result<Vec<VaccinationStatistic>, String>;

    /// Whether any of `regions` already has a row for `base_date`
    async fn exists_by_base_date(
        &self,
        base_date: NaiveDate,
        regions: &[RegionPopulation],
    ) -> Result<bool, String>;
}
