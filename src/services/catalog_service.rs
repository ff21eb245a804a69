//! POI Catalog
//!
//! In-memory, read-only reference data plus the relevance scoring that
//! orders candidates for the day packer. The catalog is loaded once and
//! shared immutably across requests; `list_candidates` owns all the
//! personalization math (interest overlap, popularity, accessibility,
//! family fit, seasonal bonus, distance decay, budget fit).

use std::collections::HashSet;
use std::env;

use serde::{Deserialize, Serialize};

use crate::models::poi::Poi;
use crate::models::preferences::TripPreferences;
use crate::services::travel_service::haversine_km;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogWeights {
    /// Weight of interest-tag overlap inside the personalization score.
    pub interest_weight: f64,
    /// Weight of popularity + rating.
    pub popularity_weight: f64,
    /// Weight of the accessibility score when the traveler asked for it.
    pub accessibility_weight: f64,
    /// Weight of family friendliness on family trips.
    pub family_weight: f64,
    /// Bonus weight when the start month is in the POI's best season.
    pub season_weight: f64,
    /// Blend weights for the final score.
    pub personalization_weight: f64,
    pub distance_weight: f64,
    pub budget_weight: f64,
}

impl Default for CatalogWeights {
    fn default() -> Self {
        Self {
            interest_weight: 0.4,
            popularity_weight: 0.25,
            accessibility_weight: 0.15,
            family_weight: 0.10,
            season_weight: 0.10,
            personalization_weight: 0.6,
            distance_weight: 0.2,
            budget_weight: 0.2,
        }
    }
}

impl CatalogWeights {
    /// Create weights from environment variables or use defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            interest_weight: env_f64("CATALOG_INTEREST_WEIGHT").unwrap_or(defaults.interest_weight),
            popularity_weight: env_f64("CATALOG_POPULARITY_WEIGHT")
                .unwrap_or(defaults.popularity_weight),
            accessibility_weight: env_f64("CATALOG_ACCESSIBILITY_WEIGHT")
                .unwrap_or(defaults.accessibility_weight),
            family_weight: env_f64("CATALOG_FAMILY_WEIGHT").unwrap_or(defaults.family_weight),
            season_weight: env_f64("CATALOG_SEASON_WEIGHT").unwrap_or(defaults.season_weight),
            personalization_weight: env_f64("CATALOG_PERSONALIZATION_WEIGHT")
                .unwrap_or(defaults.personalization_weight),
            distance_weight: env_f64("CATALOG_DISTANCE_WEIGHT").unwrap_or(defaults.distance_weight),
            budget_weight: env_f64("CATALOG_BUDGET_WEIGHT").unwrap_or(defaults.budget_weight),
        }
    }
}

fn env_f64(key: &str) -> Option<f64> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}

/// How much each category contributes to interest matching.
fn category_weight(category: &str) -> f64 {
    match category {
        "nature" | "culture" | "unesco" => 1.0,
        "history" | "temple" | "pilgrimage" => 0.9,
        "adventure" | "wildlife" => 0.8,
        "waterfall" => 0.7,
        "viewpoint" => 0.6,
        _ => 0.5,
    }
}

/// A catalog entry paired with its relevance score for the request.
#[derive(Debug, Clone)]
pub struct ScoredPoi {
    /// 0.0 - 1.0, higher first.
    pub score: f64,
    pub poi: Poi,
}

pub struct PoiCatalog {
    pois: Vec<Poi>,
    weights: CatalogWeights,
}

impl PoiCatalog {
    pub fn new() -> Self {
        Self::with_pois(default_pois())
    }

    pub fn with_pois(pois: Vec<Poi>) -> Self {
        Self {
            pois,
            weights: CatalogWeights::from_env(),
        }
    }

    pub fn all(&self) -> &[Poi] {
        &self.pois
    }

    pub fn len(&self) -> usize {
        self.pois.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pois.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Poi> {
        self.pois.iter().find(|poi| poi.id == id)
    }

    /// Candidates for one planning request, best first. `must_visit`
    /// entries are force-ranked to the front regardless of score, and
    /// anything in `exclude_ids` (already visited on earlier days) is
    /// dropped. Ties break on id so identical requests order identically.
    pub fn list_candidates(
        &self,
        prefs: &TripPreferences,
        exclude_ids: &HashSet<String>,
    ) -> Vec<ScoredPoi> {
        let base = match prefs.base_location {
            Some(coords) => coords,
            None => return Vec::new(),
        };
        let must_visit: HashSet<&str> = prefs.must_visit.iter().map(|s| s.as_str()).collect();
        let start_month = prefs.start_month();

        let mut scored: Vec<ScoredPoi> = self
            .pois
            .iter()
            .filter(|poi| !exclude_ids.contains(&poi.id))
            .filter(|poi| must_visit.contains(poi.id.as_str()) || self.passes_filters(poi, prefs))
            .map(|poi| {
                let personalization = self.personalization_score(poi, prefs, &start_month);
                let distance = haversine_km(base, poi.coordinates());
                let distance_score = 1.0 / (1.0 + distance / 100.0);
                let budget_score = self.budget_score(poi, prefs.budget);

                let score = self.weights.personalization_weight * personalization
                    + self.weights.distance_weight * distance_score
                    + self.weights.budget_weight * budget_score;

                ScoredPoi {
                    score,
                    poi: poi.clone(),
                }
            })
            .collect();

        scored.sort_by(|a, b| {
            let a_must = must_visit.contains(a.poi.id.as_str());
            let b_must = must_visit.contains(b.poi.id.as_str());
            b_must
                .cmp(&a_must)
                .then(
                    b.score
                        .partial_cmp(&a.score)
                        .unwrap_or(std::cmp::Ordering::Equal),
                )
                .then_with(|| a.poi.id.cmp(&b.poi.id))
        });

        scored
    }

    /// Hard filters: a POI priced above 40% of the whole budget or longer
    /// than half the daily window never makes the candidate list.
    fn passes_filters(&self, poi: &Poi, prefs: &TripPreferences) -> bool {
        if prefs.budget > 0.0 && poi.cost > prefs.budget * 0.4 {
            return false;
        }
        let window = prefs.pace.day_end() - prefs.pace.day_start();
        if i64::from(poi.duration) > window / 2 {
            return false;
        }
        true
    }

    fn personalization_score(&self, poi: &Poi, prefs: &TripPreferences, start_month: &str) -> f64 {
        let mut score = 0.0;

        score += self.weights.interest_weight * interest_score(poi, &prefs.interests);

        let popularity = (poi.popularity + poi.rating / 5.0) / 2.0;
        score += self.weights.popularity_weight * popularity;

        if prefs.accessibility_needs {
            score += self.weights.accessibility_weight * poi.accessibility_score;
        } else {
            score += self.weights.accessibility_weight * 0.8;
        }

        if prefs.family_trip {
            score += self.weights.family_weight * if poi.family_friendly { 1.0 } else { 0.3 };
        } else {
            score += self.weights.family_weight * 0.8;
        }

        if poi
            .best_time_to_visit
            .iter()
            .any(|month| month == start_month)
        {
            score += self.weights.season_weight;
        } else {
            score += self.weights.season_weight * 0.5;
        }

        score.min(1.0)
    }

    fn budget_score(&self, poi: &Poi, budget: f64) -> f64 {
        if budget <= 0.0 {
            return 1.0;
        }
        if poi.cost > budget * 0.3 {
            0.3
        } else if poi.cost > budget * 0.15 {
            0.7
        } else {
            1.0
        }
    }
}

impl Default for PoiCatalog {
    fn default() -> Self {
        Self::new()
    }
}

fn interest_score(poi: &Poi, interests: &[String]) -> f64 {
    if interests.is_empty() {
        return 0.5;
    }
    let score: f64 = poi
        .categories
        .iter()
        .filter(|category| interests.iter().any(|i| i == *category))
        .map(|category| category_weight(category))
        .sum();
    (score / interests.len() as f64).min(1.0)
}

#[allow(clippy::too_many_arguments)]
fn poi(
    id: &str,
    name: &str,
    lat: f64,
    lon: f64,
    categories: &[&str],
    duration: u32,
    popularity: f64,
    open_time: u32,
    close_time: u32,
    cost: f64,
    description: &str,
    rating: f64,
    review_count: u32,
    accessibility_score: f64,
    family_friendly: bool,
    best_time_to_visit: &[&str],
    nearest_station_id: Option<&str>,
) -> Poi {
    Poi {
        id: id.to_string(),
        name: name.to_string(),
        lat,
        lon,
        categories: categories.iter().map(|c| c.to_string()).collect(),
        duration,
        popularity,
        open_time,
        close_time,
        cost,
        description: description.to_string(),
        rating,
        review_count,
        accessibility_score,
        family_friendly,
        best_time_to_visit: best_time_to_visit.iter().map(|m| m.to_string()).collect(),
        nearest_station_id: nearest_station_id.map(|s| s.to_string()),
    }
}

/// Seed dataset covering Jharkhand and the Bihar pilgrimage circuit.
pub fn default_pois() -> Vec<Poi> {
    vec![
        poi(
            "betla_np",
            "Betla National Park",
            23.8500,
            84.2100,
            &["nature", "wildlife", "adventure"],
            240,
            0.9,
            6 * 60,
            17 * 60 + 30,
            1500.0,
            "Famous tiger reserve with diverse wildlife",
            4.3,
            1250,
            0.7,
            true,
            &["Oct", "Nov", "Dec", "Jan", "Feb"],
            Some("daltonganj"),
        ),
        poi(
            "netarhat",
            "Netarhat Hills",
            23.4800,
            84.2700,
            &["nature", "viewpoint", "hill_station"],
            180,
            0.85,
            5 * 60 + 30,
            19 * 60,
            800.0,
            "Queen of Chotanagpur with stunning sunrise views",
            4.1,
            890,
            0.8,
            true,
            &["Oct", "Nov", "Dec", "Jan", "Feb", "Mar"],
            None,
        ),
        poi(
            "hundru_falls",
            "Hundru Falls",
            23.5100,
            85.4200,
            &["nature", "waterfall", "adventure"],
            120,
            0.75,
            6 * 60,
            18 * 60,
            200.0,
            "98m high waterfall, spectacular during monsoons",
            4.0,
            2100,
            0.6,
            true,
            &["Jul", "Aug", "Sep", "Oct"],
            Some("ranchi_jn"),
        ),
        poi(
            "jonha_falls",
            "Jonha Falls",
            23.3600,
            85.2500,
            &["nature", "waterfall"],
            100,
            0.7,
            7 * 60,
            17 * 60,
            150.0,
            "Beautiful waterfall with natural pool",
            3.8,
            1500,
            0.7,
            true,
            &["Jul", "Aug", "Sep", "Oct"],
            Some("ranchi_jn"),
        ),
        poi(
            "dassam_falls",
            "Dassam Falls",
            23.1464,
            85.4669,
            &["nature", "waterfall"],
            60,
            0.72,
            6 * 60,
            18 * 60,
            30.0,
            "44m waterfall on the Kanchi river",
            4.0,
            1800,
            0.6,
            true,
            &["Jul", "Aug", "Sep", "Oct"],
            Some("ranchi_jn"),
        ),
        poi(
            "patratu_valley",
            "Patratu Valley",
            23.6300,
            85.2700,
            &["nature", "scenic_drive", "lake"],
            90,
            0.65,
            6 * 60,
            19 * 60,
            100.0,
            "Scenic valley with beautiful lake views",
            3.9,
            950,
            0.8,
            true,
            &[],
            Some("patratu"),
        ),
        poi(
            "deoghar_temple",
            "Baidyanath Temple Deoghar",
            24.4800,
            86.7000,
            &["culture", "temple", "pilgrimage"],
            150,
            0.9,
            4 * 60,
            22 * 60,
            50.0,
            "One of 12 Jyotirlingas, major pilgrimage site",
            4.5,
            5000,
            0.5,
            true,
            &[],
            Some("jasidih_jn"),
        ),
        poi(
            "rajrappa_temple",
            "Rajrappa Temple & Falls",
            23.6300,
            85.6000,
            &["culture", "waterfall", "temple"],
            120,
            0.72,
            6 * 60,
            20 * 60,
            100.0,
            "Temple with scenic waterfall",
            4.0,
            800,
            0.6,
            true,
            &[],
            None,
        ),
        poi(
            "palamu_fort",
            "Palamu Fort",
            24.1200,
            83.5200,
            &["history", "fort", "architecture"],
            150,
            0.6,
            9 * 60,
            17 * 60,
            200.0,
            "Historic fort with Mughal architecture",
            3.7,
            400,
            0.5,
            true,
            &["Oct", "Nov", "Dec", "Jan", "Feb"],
            None,
        ),
        poi(
            "hazaribagh_np",
            "Hazaribagh National Park",
            23.9800,
            85.3600,
            &["nature", "wildlife"],
            180,
            0.75,
            6 * 60,
            17 * 60,
            1200.0,
            "Wildlife sanctuary with tigers and leopards",
            4.0,
            600,
            0.6,
            true,
            &["Nov", "Dec", "Jan", "Feb", "Mar"],
            None,
        ),
        poi(
            "mccluskieganj",
            "McCluskieganj",
            23.6167,
            84.9333,
            &["history", "culture", "heritage"],
            120,
            0.55,
            8 * 60,
            18 * 60,
            300.0,
            "Anglo-Indian heritage town",
            3.5,
            200,
            0.7,
            true,
            &[],
            Some("mccluskieganj"),
        ),
        poi(
            "bodh_gaya",
            "Bodh Gaya",
            24.6958,
            84.9914,
            &["culture", "temple", "pilgrimage", "unesco"],
            240,
            0.95,
            5 * 60,
            20 * 60,
            200.0,
            "UNESCO World Heritage Site, place of Buddha's enlightenment",
            4.7,
            8000,
            0.8,
            true,
            &[],
            Some("gaya_jn"),
        ),
        poi(
            "nalanda_ruins",
            "Nalanda University Ruins",
            25.1358,
            85.4436,
            &["history", "unesco", "education"],
            180,
            0.8,
            8 * 60,
            17 * 60,
            300.0,
            "Ancient university ruins, UNESCO World Heritage Site",
            4.2,
            1200,
            0.7,
            true,
            &[],
            Some("rajgir"),
        ),
        poi(
            "vaishali",
            "Vaishali",
            25.9981,
            85.1356,
            &["history", "culture", "buddhist"],
            150,
            0.65,
            8 * 60,
            17 * 60,
            150.0,
            "Ancient city, birthplace of democracy",
            3.8,
            400,
            0.8,
            true,
            &[],
            Some("hajipur_jn"),
        ),
        poi(
            "rajgir",
            "Rajgir",
            25.0258,
            85.4203,
            &["history", "culture", "hot_springs", "buddhist"],
            200,
            0.8,
            6 * 60,
            19 * 60,
            400.0,
            "Ancient capital with hot springs and Buddhist sites",
            4.1,
            1500,
            0.6,
            true,
            &[],
            Some("rajgir"),
        ),
    ]
}
