//! Trip Planner
//!
//! Orchestrates one planning request end to end: validates the
//! preferences, walks the requested days feeding the day packer the
//! previous night's location and the not-yet-visited candidate pool,
//! tracks spend against the budget, and assembles the wire `TripPlan`.
//!
//! Each request owns its own budget, visited-id set, and partial plan:
//! nothing is shared or persisted between requests, so the catalog can be
//! served to any number of concurrent planners without locking.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::models::plan::{DayPlan, TripPlan};
use crate::models::preferences::{TransportMode, TripPreferences};
use crate::services::catalog_service::PoiCatalog;
use crate::services::day_packer_service::{DayClosing, DayPacker, DayRequest};
use crate::services::travel_service::{TravelEstimator, Waypoint};

pub struct TripPlanner {
    catalog: Arc<PoiCatalog>,
    packer: DayPacker,
}

impl TripPlanner {
    pub fn new(catalog: Arc<PoiCatalog>) -> Self {
        Self {
            catalog,
            packer: DayPacker::new(TravelEstimator::new()),
        }
    }

    pub fn with_packer(catalog: Arc<PoiCatalog>, packer: DayPacker) -> Self {
        Self { catalog, packer }
    }

    /// Produce a full multi-day plan. The only failure is structurally
    /// invalid input; infeasible days come back empty rather than as
    /// errors, and an exceeded budget becomes a warning, never a shorter
    /// trip.
    pub fn plan(&self, prefs: &TripPreferences) -> Result<TripPlan, Box<dyn std::error::Error>> {
        prefs.validate()?;

        let base_coord = prefs.base_location.ok_or("base_location is required")?;
        let base = Waypoint::base(base_coord);
        let num_days = prefs.num_days as u32;

        // Only ids that exist in the catalog can be forced in.
        let mut must_visit: HashSet<String> = prefs
            .must_visit
            .iter()
            .filter(|id| self.catalog.get(id).is_some())
            .cloned()
            .collect();

        let mut used_ids: HashSet<String> = HashSet::new();
        let mut days: Vec<DayPlan> = Vec::with_capacity(num_days as usize);
        let mut warnings: Vec<String> = Vec::new();
        let mut remaining_budget = prefs.budget;
        let mut current = base.clone();
        let mut degraded_leg = false;

        for day_number in 1..=num_days {
            let date = prefs.start_date + Duration::days(i64::from(day_number) - 1);
            let is_last_day = day_number == num_days;

            let candidates = self.catalog.list_candidates(prefs, &used_ids);
            let packed = self.packer.pack_day(&DayRequest {
                start: &current,
                candidates: &candidates,
                must_visit: &must_visit,
                remaining_budget: remaining_budget.max(0.0),
                transport_mode: prefs.transport_mode,
                pace: prefs.pace,
                closing: if is_last_day {
                    DayClosing::ReturnTo(&base)
                } else {
                    DayClosing::Overnight
                },
            });

            remaining_budget -= packed.total_cost;
            degraded_leg = degraded_leg || packed.degraded_leg;
            for id in &packed.visited_ids {
                used_ids.insert(id.clone());
                must_visit.remove(id);
            }

            let overnight_location = if is_last_day {
                base.name.clone()
            } else {
                packed.end_waypoint.name.clone()
            };

            days.push(DayPlan {
                day_number,
                date,
                pois: packed.items,
                total_cost: packed.total_cost,
                total_travel_time: packed.total_travel_time,
                total_visit_time: packed.total_visit_time,
                transport_mode: prefs.transport_mode,
                overnight_location,
            });

            if !is_last_day {
                current = packed.end_waypoint;
            }
        }

        if remaining_budget < 0.0 {
            warnings.push(format!(
                "Estimated cost exceeds the requested budget by {:.0}; all {} days were kept",
                -remaining_budget, num_days
            ));
        }
        if !must_visit.is_empty() {
            let mut missed: Vec<&str> = must_visit.iter().map(|s| s.as_str()).collect();
            missed.sort_unstable();
            warnings.push(format!(
                "Could not schedule must-visit places: {}",
                missed.join(", ")
            ));
        }
        if degraded_leg && prefs.transport_mode == TransportMode::Train {
            warnings.push(
                "Some legs had no suitable train and were routed by the fallback mode".to_string(),
            );
        }

        Ok(assemble(days, prefs, used_ids.len(), warnings))
    }
}

/// Pure transform from packed days to the response shape. Totals are
/// recomputed from the day plans so the trip-level invariants hold by
/// construction.
fn assemble(
    days: Vec<DayPlan>,
    prefs: &TripPreferences,
    total_pois: usize,
    warnings: Vec<String>,
) -> TripPlan {
    let total_cost = days.iter().map(|day| day.total_cost).sum();
    TripPlan {
        days,
        total_cost,
        total_pois,
        user_preferences: prefs.clone(),
        generated_at: Utc::now().to_rfc3339(),
        warnings,
    }
}
