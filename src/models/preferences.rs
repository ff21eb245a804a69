use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::poi::Coordinates;

/// Planning request body for `POST /api/generate-itinerary`.
///
/// Echoed back verbatim in the generated plan so the client can display
/// what it asked for.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TripPreferences {
    pub num_days: i64,
    #[serde(default = "default_start_date")]
    pub start_date: NaiveDate,
    #[serde(default = "default_budget")]
    pub budget: f64,
    #[serde(default)]
    pub transport_mode: TransportMode,
    #[serde(default)]
    pub pace: TripPace,
    pub base_location: Option<Coordinates>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub must_visit: Vec<String>,
    #[serde(default)]
    pub family_trip: bool,
    #[serde(default)]
    pub accessibility_needs: bool,
}

fn default_start_date() -> NaiveDate {
    chrono::Utc::now().date_naive()
}

fn default_budget() -> f64 {
    15000.0
}

impl TripPreferences {
    /// Structural validation. Anything failing here is a client error and
    /// fails fast; everything past this point degrades inside the response.
    pub fn validate(&self) -> Result<(), String> {
        if self.num_days <= 0 {
            return Err("num_days must be a positive integer".to_string());
        }
        let (lat, lon) = match self.base_location {
            Some(coords) => coords,
            None => return Err("base_location is required".to_string()),
        };
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err("base_location is out of range".to_string());
        }
        if self.budget < 0.0 {
            return Err("budget must not be negative".to_string());
        }
        Ok(())
    }

    /// Start month as a three-letter abbreviation, used for the
    /// best-time-to-visit bonus. Derived from the requested date rather
    /// than the wall clock so identical requests score identically.
    pub fn start_month(&self) -> String {
        self.start_date.format("%b").to_string()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Car,
    Bus,
    Train,
    Bike,
    Auto,
}

impl Default for TransportMode {
    fn default() -> Self {
        TransportMode::Car
    }
}

impl TransportMode {
    pub fn all() -> [TransportMode; 5] {
        [
            TransportMode::Car,
            TransportMode::Bus,
            TransportMode::Train,
            TransportMode::Bike,
            TransportMode::Auto,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransportMode::Car => "car",
            TransportMode::Bus => "bus",
            TransportMode::Train => "train",
            TransportMode::Bike => "bike",
            TransportMode::Auto => "auto",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TripPace {
    Relaxed,
    Moderate,
    Fast,
}

impl Default for TripPace {
    fn default() -> Self {
        TripPace::Moderate
    }
}

impl TripPace {
    pub fn all() -> [TripPace; 3] {
        [TripPace::Relaxed, TripPace::Moderate, TripPace::Fast]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TripPace::Relaxed => "relaxed",
            TripPace::Moderate => "moderate",
            TripPace::Fast => "fast",
        }
    }

    /// Day window start, minutes since midnight.
    pub fn day_start(&self) -> i64 {
        match self {
            TripPace::Relaxed => 9 * 60,
            TripPace::Moderate => 8 * 60,
            TripPace::Fast => 7 * 60,
        }
    }

    /// Day window end, minutes since midnight.
    pub fn day_end(&self) -> i64 {
        match self {
            TripPace::Relaxed => 18 * 60,
            TripPace::Moderate => 20 * 60,
            TripPace::Fast => 21 * 60,
        }
    }

    /// Idle buffer inserted between consecutive visits, in minutes.
    pub fn rest_buffer_minutes(&self) -> i64 {
        match self {
            TripPace::Relaxed => 60,
            TripPace::Moderate => 45,
            TripPace::Fast => 30,
        }
    }

    /// Hard cap on visits per day for this pace.
    pub fn max_pois_per_day(&self) -> usize {
        match self {
            TripPace::Relaxed => 3,
            TripPace::Moderate => 4,
            TripPace::Fast => 6,
        }
    }

    /// Multiplier on the travel-time penalty when scoring candidates.
    /// A fast pace weighs travel more heavily to pack more stops.
    pub fn travel_weight_factor(&self) -> f64 {
        match self {
            TripPace::Relaxed => 0.6,
            TripPace::Moderate => 1.0,
            TripPace::Fast => 1.9,
        }
    }
}
