use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::domain::public_data::{RegionPopulation, VaccinationStatistic};
use crate::domain::repositories::VaccinationStatisticRepository;

#[derive(Debug, FromRow)]
struct StatisticRow {
    id: Uuid,
    base_date: NaiveDate,
    region: String,
    accumulated_first_cnt: i64,
    accumulated_second_cnt: i64,
    first_cnt: i64,
    second_cnt: i64,
    total_first_cnt: i64,
    total_second_cnt: i64,
    total_first_rate: Decimal,
    total_second_rate: Decimal,
}

impl TryFrom<StatisticRow> for VaccinationStatistic {
    type Error = String;

    fn try_from(r: StatisticRow) -> Result<Self, Self::Error> {
        let region = r
            .region
            .parse()
            .map_err(|e| format!("Invalid statistic row {}: {}", r.id, e))?;

        Ok(VaccinationStatistic {
            id: r.id,
            base_date: r.base_date,
            region,
            accumulated_first_cnt: r.accumulated_first_cnt,
            accumulated_second_cnt: r.accumulated_second_cnt,
            first_cnt: r.first_cnt,
            second_cnt: r.second_cnt,
            total_first_cnt: r.total_first_cnt,
            total_second_cnt: r.total_second_cnt,
            total_first_rate: r.total_first_rate,
            total_second_rate: r.total_second_rate,
        })
    }
}

const SELECT_STATISTIC: &str = r#"
    SELECT id, base_date, region,
           accumulated_first_cnt, accumulated_second_cnt,
           first_cnt, second_cnt, total_first_cnt, total_second_cnt,
           total_first_rate, total_second_rate
    FROM vaccination_statistics
"#;

/// PostgreSQL implementation of VaccinationStatisticRepository
pub struct PostgresVaccinationStatisticRepository {
    pool: PgPool,
}

impl PostgresVaccinationStatisticRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VaccinationStatisticRepository for PostgresVaccinationStatisticRepository {
    async fn save_all(&self, statistics: &[VaccinationStatistic]) -> Result<(), String> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| format!("Failed to begin transaction: {}", e))?;

        for statistic in statistics {
            sqlx::query(
                r#"
                INSERT INTO vaccination_statistics (
                    id, base_date, region,
                    accumulated_first_cnt, accumulated_second_cnt,
                    first_cnt, second_cnt, total_first_cnt, total_second_cnt,
                    total_first_rate, total_second_rate
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                "#,
            )
            .bind(statistic.id)
            .bind(statistic.base_date)
            .bind(statistic.region.code())
            .bind(statistic.accumulated_first_cnt)
            .bind(statistic.accumulated_second_cnt)
            .bind(statistic.first_cnt)
            .bind(statistic.second_cnt)
            .bind(statistic.total_first_cnt)
            .bind(statistic.total_second_cnt)
            .bind(statistic.total_first_rate)
            .bind(statistic.total_second_rate)
            .execute(&mut *tx)
            .await
            .map_err(|e| format!("Failed to save vaccination statistic: {}", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| format!("Failed to commit vaccination statistics: {}", e))
    }

    async fn find_by_base_date(
        &self,
        base_date: NaiveDate,
    ) -> Result<Vec<VaccinationStatistic>, String> {
        let rows = sqlx::query_as::<_, StatisticRow>(&format!(
            "{} WHERE base_date = $1",
            SELECT_STATISTIC
        ))
        .bind(base_date)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| format!("Failed to find statistics by date: {}", e))?;

        let mut statistics = rows
            .into_iter()
            .map(VaccinationStatistic::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        statistics.sort_by_key(|statistic| statistic.region);
        Ok(statistics)
    }

    async fn exists_by_base_date(
        &self,
        base_date: NaiveDate,
        regions: &[RegionPopulation],
    ) -> Result<bool, String> {
        let codes: Vec<&str> = regions.iter().map(RegionPopulation::code).collect();
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM vaccination_statistics
                WHERE base_date = $1 AND region = ANY($2)
            )
            "#,
        )
        .bind(base_date)
        .bind(codes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| format!("Failed to check statistics: {}", e))
    }
}
