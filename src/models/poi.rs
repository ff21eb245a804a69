use serde::{Deserialize, Serialize};

/// (latitude, longitude) in decimal degrees.
pub type Coordinates = (f64, f64);

/// A visitable place with cost, duration, and opening-window constraints.
///
/// Read-only reference data: the catalog loads these once and the planner
/// never mutates them.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Poi {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub categories: Vec<String>,
    /// Visit length in minutes.
    pub duration: u32,
    /// 0.0 - 1.0
    pub popularity: f64,
    /// Minutes since midnight.
    pub open_time: u32,
    /// Minutes since midnight. Always greater than `open_time`.
    pub close_time: u32,
    /// Entry fee per person.
    pub cost: f64,
    #[serde(default)]
    pub description: String,
    /// 0.0 - 5.0
    pub rating: f64,
    pub review_count: u32,
    /// 0.0 - 1.0, higher is easier to access.
    pub accessibility_score: f64,
    pub family_friendly: bool,
    /// Month abbreviations ("Oct", "Nov", ...). Empty means year-round.
    #[serde(default)]
    pub best_time_to_visit: Vec<String>,
    /// Closest railway station, when one is practical for this place.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nearest_station_id: Option<String>,
}

impl Poi {
    pub fn coordinates(&self) -> Coordinates {
        (self.lat, self.lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_pair_is_lat_lon() {
        let poi = Poi {
            id: "x".to_string(),
            name: "X".to_string(),
            lat: 23.51,
            lon: 85.42,
            categories: vec![],
            duration: 60,
            popularity: 0.5,
            open_time: 6 * 60,
            close_time: 18 * 60,
            cost: 0.0,
            description: String::new(),
            rating: 4.0,
            review_count: 10,
            accessibility_score: 0.5,
            family_friendly: true,
            best_time_to_visit: vec![],
            nearest_station_id: None,
        };
        assert_eq!(poi.coordinates(), (23.51, 85.42));
    }
}
