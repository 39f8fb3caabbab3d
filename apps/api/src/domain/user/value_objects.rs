use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::errors::DomainError;

/// Nickname value object
///
/// # Invariants
/// - 1 to 20 characters
/// - Letters (any script) and digits only; no whitespace or symbols
/// - Is immutable after construction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Nickname(String);

impl Nickname {
    pub const MAX_LENGTH: usize = 20;

    /// Creates a new Nickname value object
    ///
    /// # Example
    /// ```
    /// use cvi_api::domain::user::Nickname;
    ///
    /// let nickname = Nickname::new("인비").expect("valid nickname");
    /// assert_eq!(nickname.as_str(), "인비");
    /// assert!(Nickname::new("has space").is_err());
    /// ```
    pub fn new(nickname: impl Into<String>) -> Result<Self, DomainError> {
        let nickname = nickname.into();
        if Self::is_valid(&nickname) {
            Ok(Nickname(nickname))
        } else {
            Err(DomainError::invalid(format!(
                "Nickname must be 1-{} letters or digits without spaces: {:?}",
                Self::MAX_LENGTH,
                nickname
            )))
        }
    }

    fn is_valid(nickname: &str) -> bool {
        let length = nickname.chars().count();
        (1..=Self::MAX_LENGTH).contains(&length) && nickname.chars().all(char::is_alphanumeric)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Nickname {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Nickname::new(value)
    }
}

impl From<Nickname> for String {
    fn from(nickname: Nickname) -> Self {
        nickname.0
    }
}

impl fmt::Display for Nickname {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Age bracket a user picks at signup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgeRange {
    Teens,
    Twenties,
    Thirties,
    Forties,
    Fifties,
    Sixties,
    OverSixties,
}

impl AgeRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgeRange::Teens => "TEENS",
            AgeRange::Twenties => "TWENTIES",
            AgeRange::Thirties => "THIRTIES",
            AgeRange::Forties => "FORTIES",
            AgeRange::Fifties => "FIFTIES",
            AgeRange::Sixties => "SIXTIES",
            AgeRange::OverSixties => "OVER_SIXTIES",
        }
    }
}

impl FromStr for AgeRange {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TEENS" => Ok(AgeRange::Teens),
            "TWENTIES" => Ok(AgeRange::Twenties),
            "THIRTIES" => Ok(AgeRange::Thirties),
            "FORTIES" => Ok(AgeRange::Forties),
            "FIFTIES" => Ok(AgeRange::Fifties),
            "SIXTIES" => Ok(AgeRange::Sixties),
            "OVER_SIXTIES" => Ok(AgeRange::OverSixties),
            other => Err(DomainError::invalid(format!("Unknown age range: {}", other))),
        }
    }
}

impl fmt::Display for AgeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity provider used for social login
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SocialProvider {
    Kakao,
    Naver,
}

impl SocialProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            SocialProvider::Kakao => "KAKAO",
            SocialProvider::Naver => "NAVER",
        }
    }
}

impl FromStr for SocialProvider {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "KAKAO" => Ok(SocialProvider::Kakao),
            "NAVER" => Ok(SocialProvider::Naver),
            other => Err(DomainError::invalid(format!("Unknown social provider: {}", other))),
        }
    }
}

impl fmt::Display for SocialProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
