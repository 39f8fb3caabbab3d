//! Daily ingestion of public vaccination statistics.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Offset, TimeZone, Utc};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::PublicDataService;
use crate::config::ScheduleConfig;
use crate::domain::errors::DomainError;

/// Days before today that every run re-checks for missing rows
pub const CATCH_UP_DAYS: i64 = 3;

/// Wait before retrying a run that left today's data missing
pub const RETRY_MINUTES: i64 = 60;

/// Starts the ingestion loop; `None` when scheduling is disabled
pub fn spawn(service: PublicDataService, schedule: ScheduleConfig) -> Option<JoinHandle<()>> {
    if !schedule.enabled {
        info!("public data scheduler disabled");
        return None;
    }

    Some(tokio::spawn(async move {
        let mut settled = true;
        loop {
            let now = Utc::now();
            let next = next_wake(now, &schedule, settled);
            info!(next_run = %next, "public data ingestion scheduled");
            tokio::time::sleep((next - now).to_std().unwrap_or_default()).await;

            let today = Utc::now().with_timezone(&offset(&schedule)).date_naive();
            settled = ingest_recent(&service, today).await;
        }
    }))
}

/// Ingests today and the catch-up window, oldest first
///
/// Returns whether today's data is fully stored.
pub async fn ingest_recent(service: &PublicDataService, today: NaiveDate) -> bool {
    let mut settled = false;
    for target_date in catch_up_dates(today) {
        settled = ingest(service, target_date).await;
    }
    settled
}

/// Runs both ingestions for `target_date`
///
/// Returns `true` once both datasets are stored for that date.
pub async fn ingest(service: &PublicDataService, target_date: NaiveDate) -> bool {
    let korea = match service.save_vaccination_statistics(target_date).await {
        Ok(0) => {
            info!(%target_date, "korea statistics not published yet");
            false
        }
        Ok(rows) => {
            info!(%target_date, rows, "korea statistics ingested");
            true
        }
        Err(DomainError::Duplicate(_)) => {
            info!(%target_date, "korea statistics already saved");
            true
        }
        Err(e) => {
            warn!(%target_date, error = %e, "korea statistics ingestion failed");
            false
        }
    };

    let world = match service.save_world_vaccination_statistics(target_date).await {
        Ok(_) => {
            info!(%target_date, "world statistics ingested");
            true
        }
        Err(DomainError::Duplicate(_)) => {
            info!(%target_date, "world statistics already saved");
            true
        }
        Err(e) => {
            warn!(%target_date, error = %e, "world statistics ingestion failed");
            false
        }
    };

    korea && world
}

/// `today` and the `CATCH_UP_DAYS` before it, oldest first
pub fn catch_up_dates(today: NaiveDate) -> Vec<NaiveDate> {
    (0..=CATCH_UP_DAYS)
        .rev()
        .map(|days| today - Duration::days(days))
        .collect()
}

/// When the loop wakes next: the daily slot, or sooner while today is unsettled
pub fn next_wake(now: DateTime<Utc>, schedule: &ScheduleConfig, settled: bool) -> DateTime<Utc> {
    let scheduled = next_run_after(now, schedule);
    if settled {
        scheduled
    } else {
        scheduled.min(now + Duration::minutes(RETRY_MINUTES))
    }
}

/// First scheduled instant strictly after `now`
pub fn next_run_after(now: DateTime<Utc>, schedule: &ScheduleConfig) -> DateTime<Utc> {
    let offset = offset(schedule);
    let time = NaiveTime::from_hms_opt(schedule.hour, schedule.minute, 0).unwrap_or(NaiveTime::MIN);
    let local_day = now.with_timezone(&offset).date_naive();

    let run_at = |day: NaiveDate| {
        let local = day.and_time(time);
        Utc.from_utc_datetime(&(local - Duration::seconds(i64::from(offset.local_minus_utc()))))
    };

    let today = run_at(local_day);
    if today > now {
        today
    } else {
        run_at(local_day + Duration::days(1))
    }
}

fn offset(schedule: &ScheduleConfig) -> FixedOffset {
    FixedOffset::east_opt(schedule.utc_offset_hours * 3600).unwrap_or_else(|| Utc.fix())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::domain::errors::DomainResult;
    use crate::domain::public_data::{
        KoreaVaccinationRecord, RegionPopulation, VaccinationDataSource, WorldVaccinationRecord,
    };
    use crate::infrastructure::repositories::InMemoryStore;

    fn schedule() -> ScheduleConfig {
        ScheduleConfig {
            enabled: true,
            hour: 10,
            minute: 0,
            utc_offset_hours: 9,
        }
    }

    fn utc(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 7, day, hour, minute, 0).unwrap()
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 7, day).unwrap()
    }

    /// Publishes the Korean report only for `published` days
    struct PublishedDays {
        published: Vec<NaiveDate>,
    }

    #[async_trait]
    impl VaccinationDataSource for PublishedDays {
        async fn fetch_korea(&self, target_date: NaiveDate) -> DomainResult<Vec<KoreaVaccinationRecord>> {
            if !self.published.contains(&target_date) {
                return Ok(vec![]);
            }
            Ok(vec![KoreaVaccinationRecord {
                base_date: target_date,
                sido: "전국".to_string(),
                accumulated_first_cnt: 100,
                accumulated_second_cnt: 50,
                first_cnt: 10,
                second_cnt: 5,
                total_first_cnt: 110,
                total_second_cnt: 55,
            }])
        }

        async fn fetch_world(&self) -> DomainResult<Vec<WorldVaccinationRecord>> {
            Ok(vec![WorldVaccinationRecord {
                date: date(1),
                people_vaccinated: Some(1_000),
                people_fully_vaccinated: Some(500),
            }])
        }
    }

    #[test]
    fn runs_later_the_same_local_day() {
        // 09:00 KST on the 14th
        assert_eq!(next_run_after(utc(14, 0, 0), &schedule()), utc(14, 1, 0));
    }

    #[test]
    fn rolls_over_to_the_next_local_day() {
        // 10:00 KST exactly, then 23:30 KST
        assert_eq!(next_run_after(utc(14, 1, 0), &schedule()), utc(15, 1, 0));
        assert_eq!(next_run_after(utc(14, 14, 30), &schedule()), utc(15, 1, 0));
    }

    #[test]
    fn local_day_differs_from_utc_day() {
        // 16:00 UTC on the 13th is already 01:00 KST on the 14th
        assert_eq!(next_run_after(utc(13, 16, 0), &schedule()), utc(14, 1, 0));
    }

    #[test]
    fn unsettled_run_retries_within_the_hour() {
        // 10:00 KST, nothing published yet
        assert_eq!(next_wake(utc(14, 1, 0), &schedule(), false), utc(14, 2, 0));
        assert_eq!(next_wake(utc(14, 1, 0), &schedule(), true), utc(15, 1, 0));
        // a retry never overshoots the next daily slot
        assert_eq!(next_wake(utc(15, 0, 30), &schedule(), false), utc(15, 1, 0));
    }

    #[test]
    fn catch_up_covers_previous_days_oldest_first() {
        assert_eq!(
            catch_up_dates(date(14)),
            vec![date(11), date(12), date(13), date(14)]
        );
    }

    #[tokio::test]
    async fn missed_day_is_ingested_by_a_later_run() {
        let store = Arc::new(InMemoryStore::new());
        let unpublished = PublicDataService::new(
            store.clone(),
            Arc::new(PublishedDays { published: vec![] }),
        );
        assert!(!ingest_recent(&unpublished, date(13)).await);
        let rows = unpublished.find_vaccination_statistics(date(13)).await.unwrap();
        assert_eq!(rows.len(), 1, "only the world row exists yet");

        // the report for the 13th appears; the run on the 14th picks it up
        let published = PublicDataService::new(
            store.clone(),
            Arc::new(PublishedDays {
                published: vec![date(13), date(14)],
            }),
        );
        assert!(ingest_recent(&published, date(14)).await);

        let regions: Vec<_> = published
            .find_vaccination_statistics(date(13))
            .await
            .unwrap()
            .into_iter()
            .map(|row| row.region)
            .collect();
        assert_eq!(
            regions,
            vec![RegionPopulation::Country, RegionPopulation::World]
        );
    }
}
