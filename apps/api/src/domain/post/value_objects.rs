use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::errors::DomainError;

/// Vaccine a post talks about
///
/// `All` only exists as a list filter; posts are always stored with a
/// concrete vaccine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VaccinationType {
    #[default]
    All,
    Pfizer,
    Moderna,
    Astrazeneca,
    Janssen,
}

impl VaccinationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VaccinationType::All => "ALL",
            VaccinationType::Pfizer => "PFIZER",
            VaccinationType::Moderna => "MODERNA",
            VaccinationType::Astrazeneca => "ASTRAZENECA",
            VaccinationType::Janssen => "JANSSEN",
        }
    }

    /// Returns the concrete vaccine to filter by, or `None` for `All`
    pub fn as_filter(&self) -> Option<VaccinationType> {
        match self {
            VaccinationType::All => None,
            other => Some(*other),
        }
    }
}

impl FromStr for VaccinationType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ALL" => Ok(VaccinationType::All),
            "PFIZER" => Ok(VaccinationType::Pfizer),
            "MODERNA" => Ok(VaccinationType::Moderna),
            "ASTRAZENECA" => Ok(VaccinationType::Astrazeneca),
            "JANSSEN" => Ok(VaccinationType::Janssen),
            other => Err(DomainError::invalid(format!("Unknown vaccination type: {}", other))),
        }
    }
}

impl fmt::Display for VaccinationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which of the caller's posts the "my page" listing returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MyPostFilter {
    #[default]
    Writer,
    Liker,
    Commenter,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_has_no_filter() {
        assert_eq!(VaccinationType::All.as_filter(), None);
        assert_eq!(
            VaccinationType::Moderna.as_filter(),
            Some(VaccinationType::Moderna)
        );
    }

    #[test]
    fn parse_known_types() {
        assert_eq!("PFIZER".parse::<VaccinationType>().unwrap(), VaccinationType::Pfizer);
        assert_eq!(
            "ASTRAZENECA".parse::<VaccinationType>().unwrap(),
            VaccinationType::Astrazeneca
        );
    }

    #[test]
    fn parse_unknown_type_fails() {
        assert!("SPUTNIK".parse::<VaccinationType>().is_err());
    }

    #[test]
    fn deserialize_filter() {
        let filter: MyPostFilter = serde_json::from_str("\"COMMENTER\"").unwrap();
        assert_eq!(filter, MyPostFilter::Commenter);
    }
}
