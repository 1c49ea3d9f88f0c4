//! Current-conditions summary sent alongside the hourly batches.
//!
//! The watch shows a single icon picked from a fixed set of condition codes,
//! plus the temperature in Kelvin and a day/night flag.

use crate::forecast::Currently;
use serde::{Deserialize, Serialize};

/// Condition codes understood by the watch face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionCode {
    ClearSky = 0,
    FewClouds = 1,
    ScatteredClouds = 2,
    BrokenClouds = 3,
    ShowerRain = 4,
    Rain = 5,
    Thunderstorm = 6,
    Snow = 7,
    Mist = 8,
    Unknown = 1000,
}

impl ConditionCode {
    /// Map a provider icon name to a condition code.
    pub fn from_icon(icon: &str) -> Self {
        match icon {
            "clear-day" | "clear-night" => ConditionCode::ClearSky,
            "partly-cloudy-day" | "partly-cloudy-night" => ConditionCode::FewClouds,
            "cloudy" => ConditionCode::BrokenClouds,
            "rain" => ConditionCode::Rain,
            "thunderstorm" => ConditionCode::Thunderstorm,
            "snow" | "sleet" => ConditionCode::Snow,
            "fog" => ConditionCode::Mist,
            _ => ConditionCode::Unknown,
        }
    }

    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Summary of the `currently` block, ready to be sent.
#[derive(Clone, Debug, PartialEq)]
pub struct CurrentConditions {
    /// Temperature in whole Kelvin
    pub temp_k: i32,
    /// Provider's one-line summary, e.g. "Light Rain"
    pub description: String,
    /// True when the icon is a daytime variant
    pub is_day: bool,
    pub condition: ConditionCode,
}

impl CurrentConditions {
    pub fn from_currently(currently: &Currently) -> Self {
        CurrentConditions {
            temp_k: (currently.temperature + 273.15).round() as i32,
            description: currently.summary.clone(),
            // "-day" must be a suffix of some name, never the whole icon
            is_day: currently.icon.find("-day").is_some_and(|pos| pos > 0),
            condition: ConditionCode::from_icon(&currently.icon),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn currently(icon: &str, temperature: f64) -> Currently {
        Currently {
            icon: icon.to_string(),
            summary: "Partly Cloudy".to_string(),
            temperature,
        }
    }

    #[test]
    fn test_icon_mapping() {
        assert_eq!(ConditionCode::from_icon("clear-night"), ConditionCode::ClearSky);
        assert_eq!(
            ConditionCode::from_icon("partly-cloudy-day"),
            ConditionCode::FewClouds
        );
        assert_eq!(ConditionCode::from_icon("cloudy"), ConditionCode::BrokenClouds);
        assert_eq!(ConditionCode::from_icon("sleet"), ConditionCode::Snow);
        assert_eq!(ConditionCode::from_icon("fog"), ConditionCode::Mist);
        assert_eq!(ConditionCode::from_icon("wind"), ConditionCode::Unknown);
        assert_eq!(ConditionCode::Unknown.code(), 1000);
    }

    #[test]
    fn test_current_conditions() {
        let now = CurrentConditions::from_currently(&currently("partly-cloudy-day", 21.4));
        assert_eq!(now.temp_k, 295);
        assert!(now.is_day);
        assert_eq!(now.condition, ConditionCode::FewClouds);
        assert_eq!(now.description, "Partly Cloudy");

        let night = CurrentConditions::from_currently(&currently("clear-night", -3.0));
        assert_eq!(night.temp_k, 270);
        assert!(!night.is_day);
    }
}
