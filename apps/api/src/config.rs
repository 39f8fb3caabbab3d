// Service configuration
// Loaded once at startup from the environment (after `.env`)

use std::env;
use std::fmt::Display;
use std::str::FromStr;

use thiserror::Error;
use tracing::{info, warn};

const DEV_JWT_SECRET: &str = "dev-secret-key";
const KOREA_PUBLIC_DATA_URL: &str = "https://api.odcloud.kr/api/15077756/v1/vaccine-stat";
const WORLD_PUBLIC_DATA_URL: &str =
    "https://covid.ourworldindata.org/data/vaccinations/vaccinations.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// OAuth client registration for one social provider
#[derive(Debug, Clone, Default)]
pub struct OAuthClientConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
}

/// Daily public data ingestion settings
#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    pub enabled: bool,
    pub hour: u32,
    pub minute: u32,
    /// Offset of the local day the data provider reports in
    pub utc_offset_hours: i32,
}

#[derive(Debug, Clone)]
pub struct PublicDataConfig {
    pub service_key: String,
    pub korea_url: String,
    pub world_url: String,
    pub schedule: ScheduleConfig,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// `None` runs against the in-memory store
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub server_port: u16,
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    pub kakao: OAuthClientConfig,
    pub naver: OAuthClientConfig,
    pub public_data: PublicDataConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            warn!("JWT_SECRET not set, using development secret");
            DEV_JWT_SECRET.to_string()
        });

        let schedule = ScheduleConfig {
            enabled: parse_or("PUBLIC_DATA_SCHEDULE_ENABLED", true)?,
            hour: parse_or("PUBLIC_DATA_SCHEDULE_HOUR", 10)?,
            minute: parse_or("PUBLIC_DATA_SCHEDULE_MINUTE", 0)?,
            utc_offset_hours: parse_or("PUBLIC_DATA_UTC_OFFSET_HOURS", 9)?,
        };
        if schedule.hour > 23 || schedule.minute > 59 {
            return Err(ConfigError::InvalidValue {
                key: "PUBLIC_DATA_SCHEDULE_HOUR/MINUTE".to_string(),
                message: format!("{:02}:{:02} is not a time of day", schedule.hour, schedule.minute),
            });
        }
        if !(-23..=23).contains(&schedule.utc_offset_hours) {
            return Err(ConfigError::InvalidValue {
                key: "PUBLIC_DATA_UTC_OFFSET_HOURS".to_string(),
                message: format!("{} is out of range", schedule.utc_offset_hours),
            });
        }

        Ok(Self {
            database_url: env::var("DATABASE_URL").ok(),
            database_max_connections: parse_or("DATABASE_MAX_CONNECTIONS", 5)?,
            server_port: parse_or("SERVER_PORT", 3000)?,
            jwt_secret,
            jwt_expiry_hours: parse_or("JWT_EXPIRY_HOURS", 8)?,
            kakao: OAuthClientConfig {
                client_id: string_or_empty("KAKAO_CLIENT_ID"),
                client_secret: string_or_empty("KAKAO_CLIENT_SECRET"),
                redirect_url: string_or_empty("KAKAO_REDIRECT_URL"),
            },
            naver: OAuthClientConfig {
                client_id: string_or_empty("NAVER_CLIENT_ID"),
                client_secret: string_or_empty("NAVER_CLIENT_SECRET"),
                redirect_url: string_or_empty("NAVER_REDIRECT_URL"),
            },
            public_data: PublicDataConfig {
                service_key: string_or_empty("PUBLIC_DATA_SERVICE_KEY"),
                korea_url: env::var("PUBLIC_DATA_KOREA_URL")
                    .unwrap_or_else(|_| KOREA_PUBLIC_DATA_URL.to_string()),
                world_url: env::var("PUBLIC_DATA_WORLD_URL")
                    .unwrap_or_else(|_| WORLD_PUBLIC_DATA_URL.to_string()),
                schedule,
            },
        })
    }
}

fn parse_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        }),
        Err(_) => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}

fn string_or_empty(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| {
        warn!("{key} not set");
        String::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_or_uses_default_when_missing() {
        let value: u16 = parse_or("CVI_TEST_SURELY_UNSET_PORT", 4242).unwrap();
        assert_eq!(value, 4242);
    }

    #[test]
    fn parse_or_rejects_malformed_value() {
        env::set_var("CVI_TEST_MALFORMED_HOUR", "ten");
        let result: Result<u32, _> = parse_or("CVI_TEST_MALFORMED_HOUR", 10);
        env::remove_var("CVI_TEST_MALFORMED_HOUR");

        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn parse_or_trims_value() {
        env::set_var("CVI_TEST_TRIMMED_COUNT", " 7 ");
        let result: u32 = parse_or("CVI_TEST_TRIMMED_COUNT", 1).unwrap();
        env::remove_var("CVI_TEST_TRIMMED_COUNT");

        assert_eq!(result, 7);
    }
}
