use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;

use yatra_api::models::plan::{ScheduleItem, TripPlan};
use yatra_api::models::poi::Poi;
use yatra_api::models::preferences::{TransportMode, TripPace, TripPreferences};
use yatra_api::services::catalog_service::PoiCatalog;
use yatra_api::services::trip_planner_service::TripPlanner;

// The pace windows, packer weights, and per-mode speed/fare tables these
// tests run against are the documented defaults; overriding them through
// the environment would shift the packed schedules.

fn preferences(num_days: i64, budget: f64) -> TripPreferences {
    TripPreferences {
        num_days,
        start_date: NaiveDate::from_ymd_opt(2025, 10, 10).unwrap(),
        budget,
        transport_mode: TransportMode::Car,
        pace: TripPace::Moderate,
        base_location: Some((23.36, 85.33)),
        interests: vec!["nature".to_string(), "waterfall".to_string()],
        must_visit: vec![],
        family_trip: false,
        accessibility_needs: false,
    }
}

fn parse_time(value: &str) -> i64 {
    let (h, m) = value.split_once(':').expect("HH:MM");
    h.parse::<i64>().unwrap() * 60 + m.parse::<i64>().unwrap()
}

fn visit_ids(plan: &TripPlan) -> Vec<String> {
    plan.days
        .iter()
        .flat_map(|day| day.pois.iter())
        .filter_map(|item| item.visit_poi_id().map(|id| id.to_string()))
        .collect()
}

fn falls_catalog() -> PoiCatalog {
    // The round-trip scenario: two waterfalls near the base location.
    PoiCatalog::with_pois(vec![
        Poi {
            id: "hundru_falls".to_string(),
            name: "Hundru Falls".to_string(),
            lat: 23.51,
            lon: 85.42,
            categories: vec!["nature".to_string(), "waterfall".to_string()],
            duration: 90,
            popularity: 0.75,
            open_time: 6 * 60,
            close_time: 18 * 60,
            cost: 50.0,
            description: String::new(),
            rating: 4.0,
            review_count: 2100,
            accessibility_score: 0.6,
            family_friendly: true,
            best_time_to_visit: vec![],
            nearest_station_id: None,
        },
        Poi {
            id: "dassam_falls".to_string(),
            name: "Dassam Falls".to_string(),
            lat: 23.1464,
            lon: 85.4669,
            categories: vec!["nature".to_string(), "waterfall".to_string()],
            duration: 60,
            popularity: 0.72,
            open_time: 6 * 60,
            close_time: 18 * 60,
            cost: 30.0,
            description: String::new(),
            rating: 4.0,
            review_count: 1800,
            accessibility_score: 0.6,
            family_friendly: true,
            best_time_to_visit: vec![],
            nearest_station_id: None,
        },
    ])
}

#[test]
fn identical_requests_produce_identical_plans() {
    let planner = TripPlanner::new(Arc::new(PoiCatalog::new()));
    let prefs = preferences(3, 10000.0);
    let first = planner.plan(&prefs).unwrap();
    let second = planner.plan(&prefs).unwrap();
    // Everything except the generation timestamp must match.
    assert_eq!(
        serde_json::to_value(&first.days).unwrap(),
        serde_json::to_value(&second.days).unwrap()
    );
    assert_eq!(first.total_cost, second.total_cost);
    assert_eq!(first.total_pois, second.total_pois);
    assert_eq!(first.warnings, second.warnings);
}

#[test]
fn consecutive_items_never_overlap() {
    let planner = TripPlanner::new(Arc::new(PoiCatalog::new()));
    let plan = planner.plan(&preferences(4, 20000.0)).unwrap();
    for day in &plan.days {
        let mut previous_end = 0;
        for item in &day.pois {
            if let ScheduleItem::Visit {
                start_time,
                end_time,
                ..
            } = item
            {
                assert!(
                    parse_time(start_time) >= previous_end,
                    "day {}: item starts before the previous one ends",
                    day.day_number
                );
                previous_end = parse_time(end_time);
            }
        }
    }
}

#[test]
fn no_poi_is_visited_twice_across_the_trip() {
    let planner = TripPlanner::new(Arc::new(PoiCatalog::new()));
    let plan = planner.plan(&preferences(5, 30000.0)).unwrap();
    let ids = visit_ids(&plan);
    let unique: HashSet<&String> = ids.iter().collect();
    assert_eq!(ids.len(), unique.len(), "a POI appears on more than one day");
    assert_eq!(plan.total_pois, ids.len());
}

#[test]
fn visits_respect_opening_hours() {
    let catalog = Arc::new(PoiCatalog::new());
    let planner = TripPlanner::new(catalog.clone());
    let plan = planner.plan(&preferences(4, 20000.0)).unwrap();
    for day in &plan.days {
        for item in &day.pois {
            if let ScheduleItem::Visit {
                poi,
                start_time,
                end_time,
                ..
            } = item
            {
                let record = catalog.get(&poi.id).expect("visited POI is in the catalog");
                assert!(parse_time(start_time) >= i64::from(record.open_time));
                assert!(parse_time(end_time) <= i64::from(record.close_time));
            }
        }
    }
}

#[test]
fn cost_accounting_holds_at_day_and_trip_level() {
    let planner = TripPlanner::new(Arc::new(PoiCatalog::new()));
    let plan = planner.plan(&preferences(3, 15000.0)).unwrap();
    let mut day_sum = 0.0;
    for day in &plan.days {
        let item_sum: f64 = day.pois.iter().map(|item| item.cost()).sum();
        assert!(
            (day.total_cost - item_sum).abs() < 1e-6,
            "day {} total {} != item sum {}",
            day.day_number,
            day.total_cost,
            item_sum
        );
        day_sum += day.total_cost;
    }
    assert!((plan.total_cost - day_sum).abs() < 1e-6);
}

#[test]
fn must_visit_appears_exactly_once() {
    let planner = TripPlanner::new(Arc::new(PoiCatalog::new()));
    let mut prefs = preferences(3, 20000.0);
    prefs.must_visit = vec!["palamu_fort".to_string()];
    prefs.interests = vec![];
    let plan = planner.plan(&prefs).unwrap();
    let count = visit_ids(&plan)
        .iter()
        .filter(|id| id.as_str() == "palamu_fort")
        .count();
    assert_eq!(count, 1);
}

#[test]
fn day_count_survives_budget_exhaustion() {
    let planner = TripPlanner::new(Arc::new(PoiCatalog::new()));
    // Far too little money for five days of entry fees and travel: the
    // trip length is a hard request, so all days must still be present.
    let plan = planner.plan(&preferences(5, 300.0)).unwrap();
    assert_eq!(plan.days.len(), 5);
    for (offset, day) in plan.days.iter().enumerate() {
        assert_eq!(day.day_number as usize, offset + 1);
    }
}

#[test]
fn long_trips_keep_every_requested_day() {
    let planner = TripPlanner::new(Arc::new(PoiCatalog::new()));
    // Well past the catalog's capacity: the later days come back empty,
    // but the requested length is never rejected or shortened.
    let plan = planner.plan(&preferences(31, 50000.0)).unwrap();
    assert_eq!(plan.days.len(), 31);
    for (offset, day) in plan.days.iter().enumerate() {
        assert_eq!(day.day_number as usize, offset + 1);
    }
}

#[test]
fn time_accounting_holds_per_day() {
    let planner = TripPlanner::new(Arc::new(PoiCatalog::new()));
    let plan = planner.plan(&preferences(3, 15000.0)).unwrap();
    for day in &plan.days {
        let mut travel_sum = 0;
        let mut visit_sum = 0;
        for item in &day.pois {
            match item {
                ScheduleItem::Visit {
                    poi, travel_time, ..
                } => {
                    travel_sum += travel_time;
                    visit_sum += i64::from(poi.duration);
                }
                ScheduleItem::Action { travel_time, .. } => {
                    travel_sum += travel_time.unwrap_or(0);
                }
            }
        }
        assert_eq!(
            day.total_travel_time, travel_sum,
            "day {}: travel total disagrees with its items",
            day.day_number
        );
        assert_eq!(
            day.total_visit_time, visit_sum,
            "day {}: visit total disagrees with its items",
            day.day_number
        );
    }
}

#[test]
fn round_trip_scenario_visits_both_falls() {
    let planner = TripPlanner::new(Arc::new(falls_catalog()));
    let mut prefs = preferences(2, 5000.0);
    prefs.interests = vec!["nature".to_string(), "waterfall".to_string()];
    let plan = planner.plan(&prefs).unwrap();

    assert_eq!(plan.days.len(), 2);
    assert_eq!(plan.total_pois, 2);

    let ids = visit_ids(&plan);
    assert_eq!(ids.iter().filter(|id| *id == "hundru_falls").count(), 1);
    assert_eq!(ids.iter().filter(|id| *id == "dassam_falls").count(), 1);

    // 80 in entry fees plus whatever the legs cost.
    let visit_costs: f64 = plan
        .days
        .iter()
        .flat_map(|day| day.pois.iter())
        .filter_map(|item| match item {
            ScheduleItem::Visit { visit_cost, .. } => Some(*visit_cost),
            _ => None,
        })
        .sum();
    assert!((visit_costs - 80.0).abs() < 1e-9);
    assert!(plan.total_cost > 80.0);

    // The final day closes with the return leg to base.
    let last_day = plan.days.last().unwrap();
    match last_day
        .pois
        .last()
        .expect("final day ends with a closing item")
    {
        ScheduleItem::Action { action, .. } => assert_eq!(action, "return_to_base"),
        other => panic!("expected the return leg, got {:?}", other),
    }
}

#[test]
fn empty_catalog_yields_renderable_empty_days() {
    let planner = TripPlanner::new(Arc::new(PoiCatalog::with_pois(vec![])));
    let plan = planner.plan(&preferences(3, 5000.0)).unwrap();
    assert_eq!(plan.days.len(), 3);
    assert_eq!(plan.total_cost, 0.0);
    assert_eq!(plan.total_pois, 0);
    for day in &plan.days {
        assert!(day.pois.is_empty());
        assert_eq!(day.total_cost, 0.0);
    }
}

#[test]
fn train_mode_warns_when_legs_degrade() {
    // Neither fall carries a station id, so every train leg must fall
    // back to road travel and the plan should say so.
    let planner = TripPlanner::new(Arc::new(falls_catalog()));
    let mut prefs = preferences(1, 5000.0);
    prefs.transport_mode = TransportMode::Train;
    let plan = planner.plan(&prefs).unwrap();
    assert!(!visit_ids(&plan).is_empty());
    assert!(plan
        .warnings
        .iter()
        .any(|warning| warning.contains("no suitable train")
            || warning.contains("No suitable train")));
}
