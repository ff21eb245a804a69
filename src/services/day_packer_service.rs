//! Day Packer
//!
//! Selects and orders POIs within one day's time and budget envelope.
//! Greedy, locally-optimal choice per step: among candidates that are
//! reachable, open, affordable, and finish before both closing time and
//! the day window, pick the one maximizing
//! `w1*relevance + w2*rating - w3*travel_time` with a pace-dependent
//! travel penalty. Running out of eligible POIs leaves the rest of the
//! day as idle buffer, never an error.

use std::collections::HashSet;
use std::env;

use serde::{Deserialize, Serialize};

use crate::models::plan::{minutes_to_time, PoiSummary, ScheduleItem};
use crate::models::preferences::{TransportMode, TripPace};
use crate::services::catalog_service::ScoredPoi;
use crate::services::travel_service::{haversine_km, TravelEstimate, TravelEstimator, Waypoint};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackerWeights {
    /// w1: relevance score from the catalog (0-1).
    pub relevance_weight: f64,
    /// w2: rating, normalized to 0-1.
    pub rating_weight: f64,
    /// w3: travel hours penalty, scaled by the pace factor.
    pub travel_weight: f64,
}

impl Default for PackerWeights {
    fn default() -> Self {
        Self {
            relevance_weight: 1.0,
            rating_weight: 0.6,
            travel_weight: 0.8,
        }
    }
}

impl PackerWeights {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            relevance_weight: env_f64("PACKER_RELEVANCE_WEIGHT")
                .unwrap_or(defaults.relevance_weight),
            rating_weight: env_f64("PACKER_RATING_WEIGHT").unwrap_or(defaults.rating_weight),
            travel_weight: env_f64("PACKER_TRAVEL_WEIGHT").unwrap_or(defaults.travel_weight),
        }
    }
}

fn env_f64(key: &str) -> Option<f64> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}

/// How the day should end.
pub enum DayClosing<'a> {
    /// Final day: travel back to base, cost and time always accounted.
    ReturnTo(&'a Waypoint),
    /// Stay overnight wherever the day ends.
    Overnight,
}

pub struct DayRequest<'a> {
    pub start: &'a Waypoint,
    /// Relevance-ordered pool, already excluding prior days' visits.
    pub candidates: &'a [ScoredPoi],
    /// Ids to force in as early as their windows allow.
    pub must_visit: &'a HashSet<String>,
    pub remaining_budget: f64,
    pub transport_mode: TransportMode,
    pub pace: TripPace,
    pub closing: DayClosing<'a>,
}

pub struct PackedDay {
    pub items: Vec<ScheduleItem>,
    pub visited_ids: Vec<String>,
    pub total_cost: f64,
    pub total_travel_time: i64,
    pub total_visit_time: i64,
    /// Where the traveler ends up (last POI, or the start if nothing was
    /// packed, or base after a return leg).
    pub end_waypoint: Waypoint,
    /// True when any leg degraded from the requested mode (no train).
    pub degraded_leg: bool,
}

struct Candidate {
    index: usize,
    estimate: TravelEstimate,
    arrival: i64,
    visit_start: i64,
    visit_end: i64,
    score: f64,
}

pub struct DayPacker {
    estimator: TravelEstimator,
    weights: PackerWeights,
}

impl DayPacker {
    pub fn new(estimator: TravelEstimator) -> Self {
        Self {
            estimator,
            weights: PackerWeights::from_env(),
        }
    }

    pub fn with_weights(estimator: TravelEstimator, weights: PackerWeights) -> Self {
        Self { estimator, weights }
    }

    pub fn pack_day(&self, request: &DayRequest) -> PackedDay {
        let day_start = request.pace.day_start();
        let day_end = request.pace.day_end();
        let rest_buffer = request.pace.rest_buffer_minutes();
        let max_visits = request.pace.max_pois_per_day();
        let travel_factor = request.pace.travel_weight_factor();

        let mut items: Vec<ScheduleItem> = Vec::new();
        let mut visited_ids: Vec<String> = Vec::new();
        let mut used: HashSet<usize> = HashSet::new();
        let mut current_time = day_start;
        let mut current = request.start.clone();
        let mut day_spend = 0.0;
        let mut total_travel_time = 0;
        let mut total_visit_time = 0;
        let mut degraded_leg = false;

        while visited_ids.len() < max_visits {
            // Travel departs after the rest buffer, except for the first
            // leg of the day.
            let depart = if visited_ids.is_empty() {
                current_time
            } else {
                current_time + rest_buffer
            };

            let mut feasible: Vec<Candidate> = Vec::new();
            for (index, candidate) in request.candidates.iter().enumerate() {
                if used.contains(&index) {
                    continue;
                }
                let poi = &candidate.poi;
                let to = Waypoint::from_poi(poi);
                let estimate = self.estimator.estimate(&current, &to, request.transport_mode);

                if poi.cost + estimate.cost > request.remaining_budget - day_spend {
                    continue;
                }

                let arrival = depart + estimate.time_minutes;
                let visit_start = arrival.max(i64::from(poi.open_time));
                let visit_end = visit_start + i64::from(poi.duration);
                // Closes before the visit completes, or spills past the
                // day window: try the next candidate instead of aborting.
                if visit_end > i64::from(poi.close_time) || visit_end > day_end {
                    continue;
                }

                let score = self.weights.relevance_weight * candidate.score
                    + self.weights.rating_weight * (poi.rating / 5.0)
                    - self.weights.travel_weight
                        * travel_factor
                        * (estimate.time_minutes as f64 / 60.0);

                feasible.push(Candidate {
                    index,
                    estimate,
                    arrival,
                    visit_start,
                    visit_end,
                    score,
                });
            }

            // Must-visit entries take priority over anything else that is
            // feasible right now.
            let any_must = feasible.iter().any(|c| {
                request
                    .must_visit
                    .contains(&request.candidates[c.index].poi.id)
            });
            let chosen = feasible
                .into_iter()
                .filter(|c| {
                    !any_must
                        || request
                            .must_visit
                            .contains(&request.candidates[c.index].poi.id)
                })
                .max_by(|a, b| {
                    a.score
                        .partial_cmp(&b.score)
                        .unwrap_or(std::cmp::Ordering::Equal)
                        .then_with(|| {
                            // Stable tie-break: prefer the higher-ranked candidate.
                            b.index.cmp(&a.index)
                        })
                });
            let chosen = match chosen {
                Some(candidate) => candidate,
                None => break,
            };

            let poi = &request.candidates[chosen.index].poi;
            used.insert(chosen.index);
            visited_ids.push(poi.id.clone());

            if chosen.estimate.mode_used != request.transport_mode {
                degraded_leg = true;
            }

            day_spend += poi.cost + chosen.estimate.cost;
            total_travel_time += chosen.estimate.time_minutes;
            total_visit_time += i64::from(poi.duration);

            items.push(ScheduleItem::Visit {
                poi: PoiSummary::from(poi),
                arrival_time: minutes_to_time(chosen.arrival),
                start_time: minutes_to_time(chosen.visit_start),
                end_time: minutes_to_time(chosen.visit_end),
                visit_cost: poi.cost,
                travel_cost: chosen.estimate.cost,
                travel_time: chosen.estimate.time_minutes,
                travel_details: chosen.estimate.instructions,
            });

            current_time = chosen.visit_end;
            current = Waypoint::from_poi(poi);
        }

        // Closing item. A day with no visits stays empty, except that the
        // trip's final day still needs the leg home when the traveler
        // woke up away from base.
        match request.closing {
            DayClosing::ReturnTo(base) => {
                let away_from_base = haversine_km(current.coord, base.coord) > 0.1;
                if !items.is_empty() || away_from_base {
                    let estimate = self.estimator.estimate(&current, base, request.transport_mode);
                    if estimate.mode_used != request.transport_mode {
                        degraded_leg = true;
                    }
                    let arrival = current_time + estimate.time_minutes;
                    day_spend += estimate.cost;
                    total_travel_time += estimate.time_minutes;
                    items.push(ScheduleItem::Action {
                        action: "return_to_base".to_string(),
                        arrival_time: Some(minutes_to_time(arrival)),
                        travel_cost: Some(estimate.cost),
                        travel_time: Some(estimate.time_minutes),
                        details: if estimate.instructions.is_empty() {
                            None
                        } else {
                            Some(estimate.instructions)
                        },
                    });
                    current = base.clone();
                }
            }
            DayClosing::Overnight => {
                if !items.is_empty() {
                    items.push(ScheduleItem::Action {
                        action: "overnight_stay".to_string(),
                        arrival_time: None,
                        travel_cost: None,
                        travel_time: None,
                        details: Some(vec![format!("Overnight near {}", current.name)]),
                    });
                }
            }
        }

        PackedDay {
            items,
            visited_ids,
            total_cost: day_spend,
            total_travel_time,
            total_visit_time,
            end_waypoint: current,
            degraded_leg,
        }
    }
}
