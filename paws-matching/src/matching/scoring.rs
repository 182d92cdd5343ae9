use std::str::FromStr;

use paws_shared::types::geo::{distance_km, GeoPoint};

// -- Weights -- energy compatibility dominates because it is the best
// predictor of a playdate actually working out; distance matters but
// owners will travel for a good match.
const W_ENERGY: f64 = 0.25;
const W_SIZE: f64 = 0.20;
const W_AGE: f64 = 0.15;
const W_PLAY: f64 = 0.20;
const W_DISTANCE: f64 = 0.20;

/// Dog-distance decay constant in km: e^(-km/25), so ~0.67 at 10 km
/// and ~0.14 at 50 km.
const DISTANCE_DECAY_KM: f64 = 25.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnergyLevel {
    Low,
    Medium,
    High,
}

impl EnergyLevel {
    fn rank(self) -> i32 {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
        }
    }
}

impl FromStr for EnergyLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!("unknown energy level: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DogSize {
    Small,
    Medium,
    Large,
    Giant,
}

impl DogSize {
    fn rank(self) -> i32 {
        match self {
            Self::Small => 0,
            Self::Medium => 1,
            Self::Large => 2,
            Self::Giant => 3,
        }
    }
}

impl FromStr for DogSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "small" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "large" => Ok(Self::Large),
            "giant" => Ok(Self::Giant),
            other => Err(format!("unknown dog size: {other}")),
        }
    }
}

/// The attributes scoring needs, extracted from a dog card.
#[derive(Debug, Clone)]
pub struct ScoringProfile {
    pub energy_level: EnergyLevel,
    pub size: DogSize,
    pub age_months: i32,
    pub play_styles: Vec<String>,
    pub owner_location: Option<GeoPoint>,
}

#[derive(Debug, Clone, Copy)]
pub struct Compatibility {
    pub score: f64,
    pub distance_km: Option<f64>,
}

/// Energy closeness: same level 1.0, adjacent 0.5, opposite ends 0.1.
fn energy_score(a: EnergyLevel, b: EnergyLevel) -> f64 {
    match (a.rank() - b.rank()).abs() {
        0 => 1.0,
        1 => 0.5,
        _ => 0.1,
    }
}

/// Size adjacency: identical sizes play best, one step apart is fine,
/// small-meets-giant rarely works.
fn size_score(a: DogSize, b: DogSize) -> f64 {
    match (a.rank() - b.rank()).abs() {
        0 => 1.0,
        1 => 0.7,
        2 => 0.3,
        _ => 0.1,
    }
}

/// Age proximity: same age 1.0, 5 years apart ~0.17, floored at 0.05.
fn age_score(a_months: i32, b_months: i32) -> f64 {
    let diff = (a_months - b_months).abs() as f64;
    (1.0 - diff / 72.0).max(0.05)
}

/// Play-style overlap: intersection over the larger list. Neutral 0.5
/// when neither dog lists any styles.
fn play_style_score(a: &[String], b: &[String]) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 0.5;
    }
    let intersection = a.iter().filter(|s| b.contains(s)).count();
    let max_len = a.len().max(b.len()).max(1);
    intersection as f64 / max_len as f64
}

/// Distance score: exponential decay, clamped to [0.05, 1.0].
/// Neutral 0.5 when either owner has no coordinates.
fn distance_score(km: Option<f64>) -> f64 {
    match km {
        Some(km) => (-km / DISTANCE_DECAY_KM).exp().max(0.05),
        None => 0.5,
    }
}

pub fn owner_distance(a: &ScoringProfile, b: &ScoringProfile) -> Option<f64> {
    match (a.owner_location, b.owner_location) {
        (Some(pa), Some(pb)) => Some(distance_km(pa, pb)),
        _ => None,
    }
}

/// Weighted compatibility score in [0, 1] between two dogs.
pub fn compatibility(a: &ScoringProfile, b: &ScoringProfile) -> Compatibility {
    let km = owner_distance(a, b);

    let score = W_ENERGY * energy_score(a.energy_level, b.energy_level)
        + W_SIZE * size_score(a.size, b.size)
        + W_AGE * age_score(a.age_months, b.age_months)
        + W_PLAY * play_style_score(&a.play_styles, &b.play_styles)
        + W_DISTANCE * distance_score(km);

    Compatibility { score, distance_km: km }
}

// -- Match tiers -- fixed thresholds, each tier with its own expiry
// window before a pending match lapses.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchType {
    Perfect,
    Great,
    Good,
    Exploratory,
}

impl MatchType {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.90 {
            Self::Perfect
        } else if score >= 0.75 {
            Self::Great
        } else if score >= 0.55 {
            Self::Good
        } else {
            Self::Exploratory
        }
    }

    pub fn expiry_hours(self) -> i64 {
        match self {
            Self::Perfect => 168,
            Self::Great => 120,
            Self::Good => 72,
            Self::Exploratory => 48,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Perfect => "perfect",
            Self::Great => "great",
            Self::Good => "good",
            Self::Exploratory => "exploratory",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(
        energy: EnergyLevel,
        size: DogSize,
        age_months: i32,
        play_styles: &[&str],
        location: Option<(f64, f64)>,
    ) -> ScoringProfile {
        ScoringProfile {
            energy_level: energy,
            size,
            age_months,
            play_styles: play_styles.iter().map(|s| s.to_string()).collect(),
            owner_location: location.map(|(lat, lng)| GeoPoint { latitude: lat, longitude: lng }),
        }
    }

    #[test]
    fn weights_sum_to_one() {
        let sum = W_ENERGY + W_SIZE + W_AGE + W_PLAY + W_DISTANCE;
        assert!((sum - 1.0).abs() < 1e-9, "weights sum to {sum}");
    }

    #[test]
    fn identical_neighbors_score_near_perfect() {
        let a = profile(
            EnergyLevel::High,
            DogSize::Medium,
            24,
            &["fetch", "chase"],
            Some((48.8566, 2.3522)),
        );
        let b = a.clone();
        let result = compatibility(&a, &b);
        assert!(result.score > 0.95, "got {}", result.score);
        assert_eq!(result.distance_km, Some(0.0));
    }

    #[test]
    fn opposites_score_low() {
        let a = profile(EnergyLevel::High, DogSize::Giant, 12, &["wrestle"], Some((48.85, 2.35)));
        let b = profile(EnergyLevel::Low, DogSize::Small, 150, &["cuddle"], Some((51.50, -0.12)));
        let result = compatibility(&a, &b);
        assert!(result.score < 0.25, "got {}", result.score);
    }

    #[test]
    fn score_is_symmetric() {
        let a = profile(EnergyLevel::Medium, DogSize::Large, 36, &["fetch"], Some((48.85, 2.35)));
        let b = profile(EnergyLevel::High, DogSize::Medium, 60, &["fetch", "swim"], Some((48.95, 2.40)));
        let ab = compatibility(&a, &b);
        let ba = compatibility(&b, &a);
        assert!((ab.score - ba.score).abs() < 1e-9);
        assert_eq!(ab.distance_km, ba.distance_km);
    }

    #[test]
    fn components_stay_in_unit_interval() {
        assert!(energy_score(EnergyLevel::Low, EnergyLevel::High) >= 0.0);
        assert!(energy_score(EnergyLevel::Low, EnergyLevel::Low) <= 1.0);
        assert!(size_score(DogSize::Small, DogSize::Giant) >= 0.0);
        assert!(age_score(0, 360) >= 0.05);
        assert!(age_score(24, 24) <= 1.0);
        assert!(play_style_score(&[], &[]) == 0.5);
        assert!(distance_score(Some(10_000.0)) >= 0.05);
        assert!(distance_score(Some(0.0)) <= 1.0);
    }

    #[test]
    fn missing_coordinates_give_neutral_distance() {
        let a = profile(EnergyLevel::Medium, DogSize::Medium, 24, &[], None);
        let b = profile(EnergyLevel::Medium, DogSize::Medium, 24, &[], Some((48.85, 2.35)));
        let result = compatibility(&a, &b);
        assert_eq!(result.distance_km, None);
        assert!((distance_score(None) - 0.5).abs() < 1e-9);
        // Full marks on everything but distance, which is neutral
        let expected = W_ENERGY + W_SIZE + W_AGE + W_PLAY * 0.5 + W_DISTANCE * 0.5;
        assert!((result.score - expected).abs() < 1e-9);
    }

    #[test]
    fn play_style_overlap_is_intersection_over_larger_list() {
        let a: Vec<String> = vec!["fetch".into(), "chase".into(), "swim".into()];
        let b: Vec<String> = vec!["fetch".into()];
        assert!((play_style_score(&a, &b) - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(play_style_score(&a, &[]), 0.0);
    }

    #[test]
    fn tier_thresholds() {
        assert_eq!(MatchType::from_score(0.95), MatchType::Perfect);
        assert_eq!(MatchType::from_score(0.90), MatchType::Perfect);
        assert_eq!(MatchType::from_score(0.89), MatchType::Great);
        assert_eq!(MatchType::from_score(0.75), MatchType::Great);
        assert_eq!(MatchType::from_score(0.60), MatchType::Good);
        assert_eq!(MatchType::from_score(0.55), MatchType::Good);
        assert_eq!(MatchType::from_score(0.54), MatchType::Exploratory);
        assert_eq!(MatchType::from_score(0.0), MatchType::Exploratory);
    }

    #[test]
    fn expiry_table() {
        assert_eq!(MatchType::Perfect.expiry_hours(), 168);
        assert_eq!(MatchType::Great.expiry_hours(), 120);
        assert_eq!(MatchType::Good.expiry_hours(), 72);
        assert_eq!(MatchType::Exploratory.expiry_hours(), 48);
    }
}
