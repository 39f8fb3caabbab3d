use chrono::{NaiveDate, NaiveDateTime};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::public_data::KoreaVaccinationRecord;

const PER_PAGE: u32 = 50;
const BASE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VaccineStatPage {
    #[serde(default)]
    current_count: i64,
    #[serde(default)]
    data: Vec<VaccineStatRow>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VaccineStatRow {
    accumulated_first_cnt: i64,
    accumulated_second_cnt: i64,
    base_date: String,
    first_cnt: i64,
    second_cnt: i64,
    sido: String,
    total_first_cnt: i64,
    total_second_cnt: i64,
}

impl VaccineStatRow {
    fn into_record(self) -> Result<KoreaVaccinationRecord, String> {
        let base_date = NaiveDateTime::parse_from_str(&self.base_date, BASE_DATE_FORMAT)
            .map(|date_time| date_time.date())
            .or_else(|_| NaiveDate::parse_from_str(&self.base_date, "%Y-%m-%d"))
            .map_err(|e| format!("Invalid baseDate {:?}: {}", self.base_date, e))?;

        Ok(KoreaVaccinationRecord {
            base_date,
            sido: self.sido,
            accumulated_first_cnt: self.accumulated_first_cnt,
            accumulated_second_cnt: self.accumulated_second_cnt,
            first_cnt: self.first_cnt,
            second_cnt: self.second_cnt,
            total_first_cnt: self.total_first_cnt,
            total_second_cnt: self.total_second_cnt,
        })
    }
}

/// Client for the odcloud "vaccine-stat" dataset
pub struct OdcloudClient {
    http: Client,
    url: String,
    service_key: String,
}

impl OdcloudClient {
    pub fn new(http: Client, url: &str, service_key: &str) -> Self {
        Self {
            http,
            url: url.to_string(),
            service_key: service_key.to_string(),
        }
    }

    pub async fn fetch(&self, target_date: NaiveDate) -> DomainResult<Vec<KoreaVaccinationRecord>> {
        let condition = format!("{} 00:00:00", target_date.format("%Y-%m-%d"));
        let page = self
            .http
            .get(&self.url)
            .query(&[
                ("page", "1".to_string()),
                ("perPage", PER_PAGE.to_string()),
                ("cond[baseDate::EQ]", condition),
                ("serviceKey", self.service_key.clone()),
            ])
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| DomainError::ExternalApi(format!("odcloud request failed: {}", e)))?
            .json::<VaccineStatPage>()
            .await
            .map_err(|e| DomainError::ExternalApi(format!("odcloud response invalid: {}", e)))?;

        debug!(%target_date, count = page.current_count, "odcloud page received");
        Ok(parse_rows(page.data))
    }
}

/// Malformed rows are dropped so one bad region cannot block the day
fn parse_rows(rows: Vec<VaccineStatRow>) -> Vec<KoreaVaccinationRecord> {
    rows.into_iter()
        .filter_map(|row| match row.into_record() {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(error = %e, "skipping odcloud row");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"{
        "currentCount": 2,
        "data": [
            {
                "accumulatedFirstCnt": 15417954,
                "accumulatedSecondCnt": 6050143,
                "baseDate": "2021-07-14 00:00:00",
                "firstCnt": 84226,
                "id": 1,
                "secondCnt": 49216,
                "sido": "전국",
                "totalFirstCnt": 15502180,
                "totalSecondCnt": 6099359
            },
            {
                "accumulatedFirstCnt": 1,
                "accumulatedSecondCnt": 1,
                "baseDate": "yesterday",
                "firstCnt": 1,
                "secondCnt": 1,
                "sido": "서울특별시",
                "totalFirstCnt": 2,
                "totalSecondCnt": 2
            }
        ],
        "matchCount": 2,
        "page": 1,
        "perPage": 50,
        "totalCount": 9000
    }"#;

    #[test]
    fn parses_page_and_drops_bad_dates() {
        let page: VaccineStatPage = serde_json::from_str(PAGE).unwrap();
        let records = parse_rows(page.data);

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.base_date, NaiveDate::from_ymd_opt(2021, 7, 14).unwrap());
        assert_eq!(record.sido, "전국");
        assert_eq!(record.total_first_cnt, 15_502_180);
        assert_eq!(record.second_cnt, 49_216);
    }

    #[test]
    fn empty_page_parses() {
        let page: VaccineStatPage =
            serde_json::from_str(r#"{ "currentCount": 0, "data": [] }"#).unwrap();
        assert!(parse_rows(page.data).is_empty());
    }
}
