//! Public vaccination statistics: ingestion from the providers and lookup.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::public_data::{
    RegionPopulation, VaccinationDataSource, VaccinationStatistic, WorldVaccinationRecord,
};
use crate::domain::repositories::VaccinationStatisticRepository;

#[derive(Clone)]
pub struct PublicDataService {
    statistics: Arc<dyn VaccinationStatisticRepository>,
    source: Arc<dyn VaccinationDataSource>,
}

impl PublicDataService {
    pub fn new(
        statistics: Arc<dyn VaccinationStatisticRepository>,
        source: Arc<dyn VaccinationDataSource>,
    ) -> Self {
        Self { statistics, source }
    }

    /// Ingests the Korean per-region report for `target_date`
    ///
    /// Returns the number of stored rows. Zero means the report is not
    /// published yet.
    pub async fn save_vaccination_statistics(&self, target_date: NaiveDate) -> DomainResult<usize> {
        if self
            .statistics
            .exists_by_base_date(target_date, &RegionPopulation::KOREA)
            .await?
        {
            return Err(already_saved(target_date));
        }

        let records = self.source.fetch_korea(target_date).await?;
        let mut seen = HashSet::new();
        let mut statistics = Vec::with_capacity(records.len());
        for record in &records {
            if record.base_date != target_date {
                warn!(%target_date, base_date = %record.base_date, "skipping row for another date");
                continue;
            }
            let Some(region) = RegionPopulation::from_sido(&record.sido) else {
                warn!(sido = %record.sido, "skipping row for unknown region");
                continue;
            };
            if seen.insert(region) {
                statistics.push(VaccinationStatistic::from_korea_record(record, region));
            }
        }

        if statistics.is_empty() {
            info!(%target_date, "no vaccination statistics published yet");
            return Ok(0);
        }

        self.statistics
            .save_all(&statistics)
            .await
            .map_err(|e| map_unique_violation(e, target_date))?;
        info!(%target_date, rows = statistics.len(), "vaccination statistics saved");
        Ok(statistics.len())
    }

    /// Ingests the worldwide totals as a `WORLD` row dated `target_date`
    pub async fn save_world_vaccination_statistics(
        &self,
        target_date: NaiveDate,
    ) -> DomainResult<VaccinationStatistic> {
        let world = [RegionPopulation::World];
        if self
            .statistics
            .exists_by_base_date(target_date, &world)
            .await?
        {
            return Err(already_saved(target_date));
        }

        let records = self.source.fetch_world().await?;
        let statistic = world_statistic(records, target_date).ok_or_else(|| {
            DomainError::not_found(format!(
                "No world vaccination data on or before {}",
                target_date
            ))
        })?;

        self.statistics
            .save_all(std::slice::from_ref(&statistic))
            .await
            .map_err(|e| map_unique_violation(e, target_date))?;
        info!(%target_date, total_first_cnt = statistic.total_first_cnt, "world statistics saved");
        Ok(statistic)
    }

    /// Every row for a date, Korean regions first and `WORLD` last
    pub async fn find_vaccination_statistics(
        &self,
        target_date: NaiveDate,
    ) -> DomainResult<Vec<VaccinationStatistic>> {
        let mut statistics = self.statistics.find_by_base_date(target_date).await?;
        statistics.sort_by_key(|statistic| statistic.region);
        Ok(statistics)
    }
}

/// Builds the world row from the cumulative series
///
/// The latest day on or before `target_date` reporting `people_vaccinated`
/// supplies the totals; the previous reported day supplies the accumulated
/// counts. Missing fully-vaccinated figures carry the last known value.
fn world_statistic(
    mut records: Vec<WorldVaccinationRecord>,
    target_date: NaiveDate,
) -> Option<VaccinationStatistic> {
    records.retain(|record| record.date <= target_date);
    records.sort_by_key(|record| record.date);

    let mut previous: Option<(i64, i64)> = None;
    let mut latest: Option<(i64, i64)> = None;
    let mut fully_vaccinated = 0;
    for record in &records {
        if let Some(value) = record.people_fully_vaccinated {
            fully_vaccinated = value;
        }
        if let Some(first) = record.people_vaccinated {
            previous = latest;
            latest = Some((first, fully_vaccinated));
        }
    }

    let (total_first, total_second) = latest?;
    let (accumulated_first, accumulated_second) = previous.unwrap_or((total_first, total_second));
    Some(VaccinationStatistic::new(
        target_date,
        RegionPopulation::World,
        accumulated_first,
        accumulated_second,
        (total_first - accumulated_first).max(0),
        (total_second - accumulated_second).max(0),
        total_first,
        total_second,
    ))
}

fn already_saved(target_date: NaiveDate) -> DomainError {
    DomainError::duplicate(format!(
        "Vaccination statistics already saved for {}",
        target_date
    ))
}

fn map_unique_violation(message: String, target_date: NaiveDate) -> DomainError {
    if message.contains("duplicate") {
        already_saved(target_date)
    } else {
        DomainError::Repository(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::public_data::KoreaVaccinationRecord;
    use crate::infrastructure::repositories::InMemoryStore;
    use async_trait::async_trait;
    use rust_decimal::Decimal;

    struct FakeSource {
        korea: Vec<KoreaVaccinationRecord>,
        world: Vec<WorldVaccinationRecord>,
    }

    #[async_trait]
    impl VaccinationDataSource for FakeSource {
        async fn fetch_korea(&self, _: NaiveDate) -> DomainResult<Vec<KoreaVaccinationRecord>> {
            Ok(self.korea.clone())
        }

        async fn fetch_world(&self) -> DomainResult<Vec<WorldVaccinationRecord>> {
            Ok(self.world.clone())
        }
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 7, day).unwrap()
    }

    fn korea_row(base_date: NaiveDate, sido: &str, total_first: i64) -> KoreaVaccinationRecord {
        KoreaVaccinationRecord {
            base_date,
            sido: sido.to_string(),
            accumulated_first_cnt: total_first - 10,
            accumulated_second_cnt: 0,
            first_cnt: 10,
            second_cnt: 0,
            total_first_cnt: total_first,
            total_second_cnt: 0,
        }
    }

    fn world_row(day: u32, first: Option<i64>, fully: Option<i64>) -> WorldVaccinationRecord {
        WorldVaccinationRecord {
            date: date(day),
            people_vaccinated: first,
            people_fully_vaccinated: fully,
        }
    }

    fn service(source: FakeSource) -> PublicDataService {
        PublicDataService::new(Arc::new(InMemoryStore::new()), Arc::new(source))
    }

    #[tokio::test]
    async fn korea_ingest_filters_rows_and_rejects_second_run() {
        let target = date(14);
        let service = service(FakeSource {
            korea: vec![
                korea_row(target, "서울특별시", 3_000_000),
                korea_row(target, "서울특별시", 1),
                korea_row(target, "전국", 15_000_000),
                korea_row(target, "어딘가", 5),
                korea_row(date(13), "부산광역시", 900_000),
            ],
            world: vec![],
        });

        assert_eq!(service.save_vaccination_statistics(target).await.unwrap(), 2);

        let rows = service.find_vaccination_statistics(target).await.unwrap();
        let regions: Vec<RegionPopulation> = rows.iter().map(|row| row.region).collect();
        assert_eq!(regions, vec![RegionPopulation::Country, RegionPopulation::Seoul]);
        assert_eq!(rows[1].total_first_cnt, 3_000_000);

        let again = service.save_vaccination_statistics(target).await;
        assert!(matches!(again, Err(DomainError::Duplicate(_))));
    }

    #[tokio::test]
    async fn unpublished_report_stores_nothing() {
        let service = service(FakeSource {
            korea: vec![],
            world: vec![],
        });

        assert_eq!(service.save_vaccination_statistics(date(14)).await.unwrap(), 0);
        assert!(service.find_vaccination_statistics(date(14)).await.unwrap().is_empty());
        // nothing saved, so a retry is still allowed
        assert_eq!(service.save_vaccination_statistics(date(14)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn world_ingest_uses_latest_record_before_target() {
        let service = service(FakeSource {
            korea: vec![],
            world: vec![
                world_row(12, Some(1_000), Some(400)),
                world_row(13, Some(1_500), None),
                world_row(15, Some(9_000), Some(9_000)),
            ],
        });

        let statistic = service
            .save_world_vaccination_statistics(date(14))
            .await
            .unwrap();

        assert_eq!(statistic.base_date, date(14));
        assert_eq!(statistic.region, RegionPopulation::World);
        assert_eq!(statistic.total_first_cnt, 1_500);
        assert_eq!(statistic.accumulated_first_cnt, 1_000);
        assert_eq!(statistic.first_cnt, 500);
        assert_eq!(statistic.total_second_cnt, 400);
        assert_eq!(statistic.second_cnt, 0);

        let again = service.save_world_vaccination_statistics(date(14)).await;
        assert!(matches!(again, Err(DomainError::Duplicate(_))));
    }

    #[tokio::test]
    async fn world_ingest_without_data_is_not_found() {
        let service = service(FakeSource {
            korea: vec![],
            world: vec![world_row(20, Some(10), None)],
        });

        let result = service.save_world_vaccination_statistics(date(14)).await;
        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }

    #[tokio::test]
    async fn rates_use_region_population() {
        let target = date(14);
        let service = service(FakeSource {
            korea: vec![korea_row(target, "세종특별자치시", 180_698)],
            world: vec![],
        });

        service.save_vaccination_statistics(target).await.unwrap();
        let rows = service.find_vaccination_statistics(target).await.unwrap();

        assert_eq!(rows[0].region, RegionPopulation::Sejong);
        assert_eq!(rows[0].total_first_rate, Decimal::new(5000, 2));
    }
}
