use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::middleware::JwtAuth;
use crate::domain::public_data::{RegionPopulation, VaccinationStatistic};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetDateQuery {
    pub target_date: NaiveDate,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VaccinationStatisticResponse {
    pub id: Uuid,
    pub base_date: NaiveDate,
    pub region: RegionPopulation,
    pub sido: &'static str,
    pub population: i64,
    pub accumulated_first_cnt: i64,
    pub accumulated_second_cnt: i64,
    pub first_cnt: i64,
    pub second_cnt: i64,
    pub total_first_cnt: i64,
    pub total_second_cnt: i64,
    pub total_first_rate: Decimal,
    pub total_second_rate: Decimal,
}

impl From<&VaccinationStatistic> for VaccinationStatisticResponse {
    fn from(statistic: &VaccinationStatistic) -> Self {
        Self {
            id: statistic.id,
            base_date: statistic.base_date,
            region: statistic.region,
            sido: statistic.region.sido(),
            population: statistic.region.population(),
            accumulated_first_cnt: statistic.accumulated_first_cnt,
            accumulated_second_cnt: statistic.accumulated_second_cnt,
            first_cnt: statistic.first_cnt,
            second_cnt: statistic.second_cnt,
            total_first_cnt: statistic.total_first_cnt,
            total_second_cnt: statistic.total_second_cnt,
            total_first_rate: statistic.total_first_rate,
            total_second_rate: statistic.total_second_rate,
        }
    }
}

/// Statistics for one day, Korean regions first and `WORLD` last
///
/// GET /api/v1/publicdatas/vaccinations?targetDate=YYYY-MM-DD
pub async fn find_vaccination_statistics(
    State(state): State<AppState>,
    Query(query): Query<TargetDateQuery>,
) -> Result<Json<Vec<VaccinationStatisticResponse>>, ApiError> {
    let statistics = state
        .public_data
        .find_vaccination_statistics(query.target_date)
        .await?;
    Ok(Json(
        statistics
            .iter()
            .map(VaccinationStatisticResponse::from)
            .collect(),
    ))
}

/// Manually ingest the Korean report for a day
///
/// PUT /api/v1/publicdatas/vaccinations?targetDate=YYYY-MM-DD
pub async fn save_vaccination_statistics(
    State(state): State<AppState>,
    JwtAuth(_user_id): JwtAuth,
    Query(query): Query<TargetDateQuery>,
) -> Result<StatusCode, ApiError> {
    state
        .public_data
        .save_vaccination_statistics(query.target_date)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/publicdatas/vaccinations/world?targetDate=YYYY-MM-DD
pub async fn save_world_vaccination_statistics(
    State(state): State<AppState>,
    JwtAuth(_user_id): JwtAuth,
    Query(query): Query<TargetDateQuery>,
) -> Result<StatusCode, ApiError> {
    state
        .public_data
        .save_world_vaccination_statistics(query.target_date)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
