use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::errors::DomainResult;

/// One row of the Korean daily vaccination report
///
/// `accumulated_*` counts people vaccinated before `base_date`,
/// `first_cnt`/`second_cnt` those vaccinated on it and `total_*` the sum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KoreaVaccinationRecord {
    pub base_date: NaiveDate,
    pub sido: String,
    pub accumulated_first_cnt: i64,
    pub accumulated_second_cnt: i64,
    pub first_cnt: i64,
    pub second_cnt: i64,
    pub total_first_cnt: i64,
    pub total_second_cnt: i64,
}

/// One day of the worldwide cumulative vaccination series
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldVaccinationRecord {
    pub date: NaiveDate,
    pub people_vaccinated: Option<i64>,
    pub people_fully_vaccinated: Option<i64>,
}

/// External provider of public vaccination data
#[async_trait]
pub trait VaccinationDataSource: Send + Sync {
    /// Korean per-region report for `target_date`; empty when not yet published
    async fn fetch_korea(&self, target_date: NaiveDate) -> DomainResult<Vec<KoreaVaccinationRecord>>;

    /// Worldwide series, any order
    async fn fetch_world(&self) -> DomainResult<Vec<WorldVaccinationRecord>>;
}
