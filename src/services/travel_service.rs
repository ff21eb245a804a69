//! Travel Estimator
//!
//! Computes inter-POI travel time, cost, and rider instructions for a
//! chosen transport mode. Distances come from the haversine formula and
//! per-mode speed/fare tables are static in-process lookups, so every
//! estimate is deterministic and never blocks the planner on network I/O.
//!
//! Train legs need a usable station on both endpoints; when one is
//! missing the estimator degrades to the next-fastest mode and says so in
//! the instructions instead of failing the request.

use std::env;

use serde::{Deserialize, Serialize};

use crate::models::poi::{Coordinates, Poi};
use crate::models::preferences::TransportMode;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Speed above this distance assumes highway driving (long hauls skip the
/// local traffic factors).
const HIGHWAY_DISTANCE_KM: f64 = 200.0;
const HIGHWAY_SPEED_KMH: f64 = 80.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeProfile {
    pub speed_kmh: f64,
    pub cost_per_km: f64,
    /// Fixed boarding/base fee added to every leg.
    pub base_fare: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TravelConfig {
    pub car: ModeProfile,
    pub bus: ModeProfile,
    pub train: ModeProfile,
    pub bike: ModeProfile,
    pub auto: ModeProfile,
}

impl Default for TravelConfig {
    fn default() -> Self {
        Self {
            car: ModeProfile {
                speed_kmh: 50.0,
                cost_per_km: 8.0,
                base_fare: 0.0,
            },
            bus: ModeProfile {
                speed_kmh: 35.0,
                cost_per_km: 3.0,
                base_fare: 10.0,
            },
            train: ModeProfile {
                speed_kmh: 70.0,
                cost_per_km: 2.0,
                base_fare: 20.0,
            },
            bike: ModeProfile {
                speed_kmh: 25.0,
                cost_per_km: 2.0,
                base_fare: 0.0,
            },
            auto: ModeProfile {
                speed_kmh: 30.0,
                cost_per_km: 12.0,
                base_fare: 25.0,
            },
        }
    }
}

impl TravelConfig {
    /// Read per-mode overrides from the environment, falling back to the
    /// defaults. Variables follow `TRAVEL_<MODE>_SPEED_KMH`,
    /// `TRAVEL_<MODE>_COST_PER_KM`, and `TRAVEL_<MODE>_BASE_FARE`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        for mode in TransportMode::all() {
            let key = mode.as_str().to_uppercase();
            let profile = config.profile_mut(mode);
            if let Some(speed) = env_f64(&format!("TRAVEL_{}_SPEED_KMH", key)) {
                profile.speed_kmh = speed;
            }
            if let Some(rate) = env_f64(&format!("TRAVEL_{}_COST_PER_KM", key)) {
                profile.cost_per_km = rate;
            }
            if let Some(fare) = env_f64(&format!("TRAVEL_{}_BASE_FARE", key)) {
                profile.base_fare = fare;
            }
        }
        config
    }

    pub fn profile(&self, mode: TransportMode) -> &ModeProfile {
        match mode {
            TransportMode::Car => &self.car,
            TransportMode::Bus => &self.bus,
            TransportMode::Train => &self.train,
            TransportMode::Bike => &self.bike,
            TransportMode::Auto => &self.auto,
        }
    }

    fn profile_mut(&mut self, mode: TransportMode) -> &mut ModeProfile {
        match mode {
            TransportMode::Car => &mut self.car,
            TransportMode::Bus => &mut self.bus,
            TransportMode::Train => &mut self.train,
            TransportMode::Bike => &mut self.bike,
            TransportMode::Auto => &mut self.auto,
        }
    }

    /// Fastest configured road mode, used when a train leg is not
    /// feasible.
    pub fn fallback_mode(&self) -> TransportMode {
        TransportMode::all()
            .into_iter()
            .filter(|mode| *mode != TransportMode::Train)
            .max_by(|a, b| {
                self.profile(*a)
                    .speed_kmh
                    .partial_cmp(&self.profile(*b).speed_kmh)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(TransportMode::Car)
    }
}

fn env_f64(key: &str) -> Option<f64> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}

/// One endpoint of a travel leg.
#[derive(Debug, Clone)]
pub struct Waypoint {
    pub name: String,
    pub coord: Coordinates,
    pub station_id: Option<String>,
}

impl Waypoint {
    pub fn base(coord: Coordinates) -> Self {
        Self {
            name: "Base".to_string(),
            coord,
            station_id: None,
        }
    }

    pub fn from_poi(poi: &Poi) -> Self {
        Self {
            name: poi.name.clone(),
            coord: poi.coordinates(),
            station_id: poi.nearest_station_id.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TravelEstimate {
    pub distance_km: f64,
    pub time_minutes: i64,
    pub cost: f64,
    /// The mode actually used; differs from the requested mode when a
    /// train leg degraded to the fallback.
    pub mode_used: TransportMode,
    pub instructions: Vec<String>,
}

pub struct TravelEstimator {
    config: TravelConfig,
}

impl TravelEstimator {
    pub fn new() -> Self {
        Self {
            config: TravelConfig::from_env(),
        }
    }

    pub fn with_config(config: TravelConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TravelConfig {
        &self.config
    }

    /// Estimate one leg. Train legs without a station on both ends
    /// degrade to the fallback mode with an explanatory instruction.
    pub fn estimate(&self, from: &Waypoint, to: &Waypoint, mode: TransportMode) -> TravelEstimate {
        if mode == TransportMode::Train {
            match (&from.station_id, &to.station_id) {
                (Some(board), Some(alight)) if board != alight => {
                    return self.estimate_train(from, to, board, alight);
                }
                _ => {
                    let fallback = self.config.fallback_mode();
                    let mut estimate = self.estimate_road(from, to, fallback);
                    estimate.instructions.insert(
                        0,
                        format!(
                            "No suitable train found between {} and {}; continuing by {}",
                            from.name,
                            to.name,
                            fallback.as_str()
                        ),
                    );
                    return estimate;
                }
            }
        }
        self.estimate_road(from, to, mode)
    }

    fn estimate_road(&self, from: &Waypoint, to: &Waypoint, mode: TransportMode) -> TravelEstimate {
        let profile = self.config.profile(mode);
        let distance_km = haversine_km(from.coord, to.coord);
        let time_minutes = leg_minutes(distance_km, profile.speed_kmh);
        let cost = distance_km * profile.cost_per_km + profile.base_fare;

        let instructions = if time_minutes == 0 {
            Vec::new()
        } else {
            match mode {
                TransportMode::Car => vec![format!(
                    "Drive {:.1} km from {} to {} (about {} min)",
                    distance_km, from.name, to.name, time_minutes
                )],
                TransportMode::Bus => vec![
                    format!("Board a bus near {}", from.name),
                    format!(
                        "Ride {:.1} km to {} (about {} min)",
                        distance_km, to.name, time_minutes
                    ),
                ],
                TransportMode::Bike => vec![format!(
                    "Cycle {:.1} km from {} to {} (about {} min)",
                    distance_km, from.name, to.name, time_minutes
                )],
                TransportMode::Auto => vec![
                    format!("Take an auto-rickshaw from {}", from.name),
                    format!(
                        "Ride {:.1} km to {} (about {} min)",
                        distance_km, to.name, time_minutes
                    ),
                ],
                // Train is handled before estimate_road is reached; keep a
                // sensible line in case a caller asks for it directly.
                TransportMode::Train => vec![format!(
                    "Travel {:.1} km from {} to {} (about {} min)",
                    distance_km, from.name, to.name, time_minutes
                )],
            }
        };

        TravelEstimate {
            distance_km,
            time_minutes,
            cost,
            mode_used: mode,
            instructions,
        }
    }

    fn estimate_train(
        &self,
        from: &Waypoint,
        to: &Waypoint,
        board: &str,
        alight: &str,
    ) -> TravelEstimate {
        let profile = self.config.profile(TransportMode::Train);
        let distance_km = haversine_km(from.coord, to.coord);
        let time_minutes = leg_minutes(distance_km, profile.speed_kmh);
        let cost = distance_km * profile.cost_per_km + profile.base_fare;

        let instructions = if time_minutes == 0 {
            Vec::new()
        } else {
            vec![
                format!("Board the train at {} station", board),
                format!(
                    "Alight at {} station ({:.1} km, about {} min)",
                    alight, distance_km, time_minutes
                ),
                format!("Continue locally to {}", to.name),
            ]
        };

        TravelEstimate {
            distance_km,
            time_minutes,
            cost,
            mode_used: TransportMode::Train,
            instructions,
        }
    }
}

impl Default for TravelEstimator {
    fn default() -> Self {
        Self::new()
    }
}

/// Great-circle distance between two coordinates in kilometers.
pub fn haversine_km(from: Coordinates, to: Coordinates) -> f64 {
    let lat1_rad = from.0.to_radians();
    let lat2_rad = to.0.to_radians();
    let delta_lat = (to.0 - from.0).to_radians();
    let delta_lon = (to.1 - from.1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Travel time in whole minutes with distance-tiered traffic factors.
/// Long hauls assume highway speed with no local traffic; short hops get
/// progressively lighter factors.
fn leg_minutes(distance_km: f64, mode_speed_kmh: f64) -> i64 {
    let (effective_speed, traffic_factor) = if distance_km > HIGHWAY_DISTANCE_KM {
        (HIGHWAY_SPEED_KMH, 1.0)
    } else if distance_km > 50.0 {
        (mode_speed_kmh, 1.3)
    } else if distance_km > 20.0 {
        (mode_speed_kmh, 1.2)
    } else {
        (mode_speed_kmh, 1.1)
    };

    ((distance_km / effective_speed) * 60.0 * traffic_factor) as i64
}
