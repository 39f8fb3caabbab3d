// Public vaccination data domain module
// Region populations, daily statistics and the provider contract

pub mod region;
pub mod source;
pub mod statistic;

pub use region::RegionPopulation;
pub use source::{KoreaVaccinationRecord, VaccinationDataSource, WorldVaccinationRecord};
pub use statistic::VaccinationStatistic;
