use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::errors::DomainError;

/// Region a statistic row describes, with the population used for rates
///
/// Korean regions are keyed by the `sido` name the provider reports.
/// Declaration order is the canonical display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegionPopulation {
    Country,
    Seoul,
    Busan,
    Daegu,
    Incheon,
    Gwangju,
    Daejeon,
    Ulsan,
    Sejong,
    Gyeonggi,
    Gangwon,
    Chungbuk,
    Chungnam,
    Jeonbuk,
    Jeonnam,
    Gyeongbuk,
    Gyeongnam,
    Jeju,
    World,
}

impl RegionPopulation {
    /// Every Korean region, in display order
    pub const KOREA: [RegionPopulation; 18] = [
        RegionPopulation::Country,
        RegionPopulation::Seoul,
        RegionPopulation::Busan,
        RegionPopulation::Daegu,
        RegionPopulation::Incheon,
        RegionPopulation::Gwangju,
        RegionPopulation::Daejeon,
        RegionPopulation::Ulsan,
        RegionPopulation::Sejong,
        RegionPopulation::Gyeonggi,
        RegionPopulation::Gangwon,
        RegionPopulation::Chungbuk,
        RegionPopulation::Chungnam,
        RegionPopulation::Jeonbuk,
        RegionPopulation::Jeonnam,
        RegionPopulation::Gyeongbuk,
        RegionPopulation::Gyeongnam,
        RegionPopulation::Jeju,
    ];

    /// Region name as the provider spells it
    pub fn sido(&self) -> &'static str {
        match self {
            RegionPopulation::Country => "전국",
            RegionPopulation::Seoul => "서울특별시",
            RegionPopulation::Busan => "부산광역시",
            RegionPopulation::Daegu => "대구광역시",
            RegionPopulation::Incheon => "인천광역시",
            RegionPopulation::Gwangju => "광주광역시",
            RegionPopulation::Daejeon => "대전광역시",
            RegionPopulation::Ulsan => "울산광역시",
            RegionPopulation::Sejong => "세종특별자치시",
            RegionPopulation::Gyeonggi => "경기도",
            RegionPopulation::Gangwon => "강원도",
            RegionPopulation::Chungbuk => "충청북도",
            RegionPopulation::Chungnam => "충청남도",
            RegionPopulation::Jeonbuk => "전라북도",
            RegionPopulation::Jeonnam => "전라남도",
            RegionPopulation::Gyeongbuk => "경상북도",
            RegionPopulation::Gyeongnam => "경상남도",
            RegionPopulation::Jeju => "제주특별자치도",
            RegionPopulation::World => "World",
        }
    }

    /// Registered population (mid-2021 resident registration; UN estimate for the world)
    pub fn population(&self) -> i64 {
        match self {
            RegionPopulation::Country => 51_672_400,
            RegionPopulation::Seoul => 9_565_990,
            RegionPopulation::Busan => 3_372_692,
            RegionPopulation::Daegu => 2_410_700,
            RegionPopulation::Incheon => 2_948_542,
            RegionPopulation::Gwangju => 1_445_230,
            RegionPopulation::Daejeon => 1_456_107,
            RegionPopulation::Ulsan => 1_128_168,
            RegionPopulation::Sejong => 361_396,
            RegionPopulation::Gyeonggi => 13_530_519,
            RegionPopulation::Gangwon => 1_537_717,
            RegionPopulation::Chungbuk => 1_597_097,
            RegionPopulation::Chungnam => 2_119_257,
            RegionPopulation::Jeonbuk => 1_792_476,
            RegionPopulation::Jeonnam => 1_842_017,
            RegionPopulation::Gyeongbuk => 2_635_896,
            RegionPopulation::Gyeongnam => 3_322_373,
            RegionPopulation::Jeju => 675_252,
            RegionPopulation::World => 7_874_965_825,
        }
    }

    /// Looks up a Korean region by provider `sido` name
    pub fn from_sido(sido: &str) -> Option<RegionPopulation> {
        Self::KOREA
            .iter()
            .copied()
            .find(|region| region.sido() == sido.trim())
    }

    /// Storage code, e.g. `SEOUL`
    pub fn code(&self) -> &'static str {
        match self {
            RegionPopulation::Country => "COUNTRY",
            RegionPopulation::Seoul => "SEOUL",
            RegionPopulation::Busan => "BUSAN",
            RegionPopulation::Daegu => "DAEGU",
            RegionPopulation::Incheon => "INCHEON",
            RegionPopulation::Gwangju => "GWANGJU",
            RegionPopulation::Daejeon => "DAEJEON",
            RegionPopulation::Ulsan => "ULSAN",
            RegionPopulation::Sejong => "SEJONG",
            RegionPopulation::Gyeonggi => "GYEONGGI",
            RegionPopulation::Gangwon => "GANGWON",
            RegionPopulation::Chungbuk => "CHUNGBUK",
            RegionPopulation::Chungnam => "CHUNGNAM",
            RegionPopulation::Jeonbuk => "JEONBUK",
            RegionPopulation::Jeonnam => "JEONNAM",
            RegionPopulation::Gyeongbuk => "GYEONGBUK",
            RegionPopulation::Gyeongnam => "GYEONGNAM",
            RegionPopulation::Jeju => "JEJU",
            RegionPopulation::World => "WORLD",
        }
    }
}

impl FromStr for RegionPopulation {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::KOREA
            .iter()
            .chain(std::iter::once(&RegionPopulation::World))
            .copied()
            .find(|region| region.code() == s)
            .ok_or_else(|| DomainError::invalid(format!("Unknown region: {}", s)))
    }
}

impl fmt::Display for RegionPopulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
