use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::poi::Poi;
use crate::models::preferences::{TransportMode, TripPreferences};

/// Slimmed-down POI record embedded in schedule items, matching what the
/// display layer consumes.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PoiSummary {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub categories: Vec<String>,
    pub duration: u32,
    pub cost: f64,
    pub description: String,
    pub rating: f64,
    pub review_count: u32,
}

impl From<&Poi> for PoiSummary {
    fn from(poi: &Poi) -> Self {
        Self {
            id: poi.id.clone(),
            name: poi.name.clone(),
            lat: poi.lat,
            lon: poi.lon,
            categories: poi.categories.clone(),
            duration: poi.duration,
            cost: poi.cost,
            description: poi.description.clone(),
            rating: poi.rating,
            review_count: poi.review_count,
        }
    }
}

/// One row in a day's plan: either a POI visit or a named action such as
/// the return leg to base.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(tag = "type")]
pub enum ScheduleItem {
    #[serde(rename = "visit")]
    Visit {
        poi: PoiSummary,
        arrival_time: String,
        start_time: String,
        end_time: String,
        visit_cost: f64,
        travel_cost: f64,
        /// Minutes spent on the approach leg.
        travel_time: i64,
        /// Human-readable description of the leg just completed.
        travel_details: Vec<String>,
    },
    #[serde(rename = "action")]
    Action {
        action: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        arrival_time: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        travel_cost: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        travel_time: Option<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        details: Option<Vec<String>>,
    },
}

impl ScheduleItem {
    pub fn visit_poi_id(&self) -> Option<&str> {
        match self {
            ScheduleItem::Visit { poi, .. } => Some(poi.id.as_str()),
            ScheduleItem::Action { .. } => None,
        }
    }

    pub fn cost(&self) -> f64 {
        match self {
            ScheduleItem::Visit {
                visit_cost,
                travel_cost,
                ..
            } => visit_cost + travel_cost,
            ScheduleItem::Action { travel_cost, .. } => travel_cost.unwrap_or(0.0),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DayPlan {
    /// 1-based, contiguous.
    pub day_number: u32,
    pub date: NaiveDate,
    pub pois: Vec<ScheduleItem>,
    pub total_cost: f64,
    /// Minutes.
    pub total_travel_time: i64,
    /// Minutes.
    pub total_visit_time: i64,
    pub transport_mode: TransportMode,
    /// Place name for that night.
    pub overnight_location: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TripPlan {
    pub days: Vec<DayPlan>,
    pub total_cost: f64,
    /// Count of distinct visits across all days.
    pub total_pois: usize,
    pub user_preferences: TripPreferences,
    /// RFC 3339 timestamp.
    pub generated_at: String,
    /// Advisory notes, e.g. the budget was exceeded. The day count is
    /// never reduced to stay under budget.
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// Format minutes-since-midnight as "HH:MM". Negative values render as
/// the display layer's placeholder.
pub fn minutes_to_time(minutes: i64) -> String {
    if minutes < 0 {
        return "--:--".to_string();
    }
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_as_clock_time() {
        assert_eq!(minutes_to_time(0), "00:00");
        assert_eq!(minutes_to_time(9 * 60 + 5), "09:05");
        assert_eq!(minutes_to_time(23 * 60 + 59), "23:59");
        assert_eq!(minutes_to_time(-10), "--:--");
    }

    #[test]
    fn schedule_item_serializes_with_type_tag() {
        let item = ScheduleItem::Action {
            action: "return_to_base".to_string(),
            arrival_time: Some("18:30".to_string()),
            travel_cost: Some(120.0),
            travel_time: Some(45),
            details: None,
        };
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["type"], "action");
        assert_eq!(value["action"], "return_to_base");
        assert!(value.get("details").is_none());
    }

    #[test]
    fn item_cost_covers_both_variants() {
        let action = ScheduleItem::Action {
            action: "overnight_stay".to_string(),
            arrival_time: None,
            travel_cost: None,
            travel_time: None,
            details: None,
        };
        assert_eq!(action.cost(), 0.0);
    }
}
