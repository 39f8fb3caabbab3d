use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use uuid::Uuid;

use super::region::RegionPopulation;
use super::source::KoreaVaccinationRecord;

/// Daily vaccination data point for one region, unique per `(base_date, region)`
#[derive(Debug, Clone, PartialEq)]
pub struct VaccinationStatistic {
    pub id: Uuid,
    pub base_date: NaiveDate,
    pub region: RegionPopulation,
    pub accumulated_first_cnt: i64,
    pub accumulated_second_cnt: i64,
    pub first_cnt: i64,
    pub second_cnt: i64,
    pub total_first_cnt: i64,
    pub total_second_cnt: i64,
    pub total_first_rate: Decimal,
    pub total_second_rate: Decimal,
}

impl VaccinationStatistic {
    /// Builds a row from raw counts, deriving both population rates
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        base_date: NaiveDate,
        region: RegionPopulation,
        accumulated_first_cnt: i64,
        accumulated_second_cnt: i64,
        first_cnt: i64,
        second_cnt: i64,
        total_first_cnt: i64,
        total_second_cnt: i64,
    ) -> Self {
        let population = region.population();
        Self {
            id: Uuid::new_v4(),
            base_date,
            region,
            accumulated_first_cnt,
            accumulated_second_cnt,
            first_cnt,
            second_cnt,
            total_first_cnt,
            total_second_cnt,
            total_first_rate: rate(total_first_cnt, population),
            total_second_rate: rate(total_second_cnt, population),
        }
    }

    pub fn from_korea_record(record: &KoreaVaccinationRecord, region: RegionPopulation) -> Self {
        Self::new(
            record.base_date,
            region,
            record.accumulated_first_cnt,
            record.accumulated_second_cnt,
            record.first_cnt,
            record.second_cnt,
            record.total_first_cnt,
            record.total_second_cnt,
        )
    }
}

/// Percentage of `population` covered by `count`, rounded half-up to 2 decimals
///
/// # Example
/// ```
/// use cvi_api::domain::public_data::statistic::rate;
/// use rust_decimal::Decimal;
///
/// assert_eq!(rate(1, 3), Decimal::new(3333, 2));
/// ```
pub fn rate(count: i64, population: i64) -> Decimal {
    if population <= 0 {
        return Decimal::ZERO;
    }
    (Decimal::from(count) * Decimal::ONE_HUNDRED)
        .checked_div(Decimal::from(population))
        .map(|value| value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
        .unwrap_or(Decimal::ZERO)
}
