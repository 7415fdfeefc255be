use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Travel profile understood by the external routing services.
#[derive(Debug, Deserialize, Serialize, Copy, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum TravelMode {
    Driving,
    Walking,
    Bicycling,
    Transit,
}

impl TravelMode {
    /// Lowercase form used as the `mode` query parameter on the wire.
    pub fn as_api_param(&self) -> &'static str {
        match self {
            TravelMode::Driving => "driving",
            TravelMode::Walking => "walking",
            TravelMode::Bicycling => "bicycling",
            TravelMode::Transit => "transit",
        }
    }

    pub(crate) fn cache_tag(&self) -> u8 {
        match self {
            TravelMode::Driving => 0,
            TravelMode::Walking => 1,
            TravelMode::Bicycling => 2,
            TravelMode::Transit => 3,
        }
    }
}

impl Display for TravelMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_api_param())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown travel mode: {0}")]
pub struct UnknownTravelMode(pub String);

impl FromStr for TravelMode {
    type Err = UnknownTravelMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DRIVING" => Ok(TravelMode::Driving),
            "WALKING" => Ok(TravelMode::Walking),
            "BICYCLING" => Ok(TravelMode::Bicycling),
            "TRANSIT" => Ok(TravelMode::Transit),
            other => Err(UnknownTravelMode(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_four_recognized_modes() {
        for (text, mode) in [
            ("DRIVING", TravelMode::Driving),
            ("WALKING", TravelMode::Walking),
            ("BICYCLING", TravelMode::Bicycling),
            ("TRANSIT", TravelMode::Transit),
        ] {
            assert_eq!(text.parse::<TravelMode>(), Ok(mode));
        }
    }

    #[test]
    fn rejects_unknown_modes() {
        assert_eq!(
            "FLYING".parse::<TravelMode>(),
            Err(UnknownTravelMode("FLYING".to_string()))
        );
        assert!("driving".parse::<TravelMode>().is_err());
    }
}
