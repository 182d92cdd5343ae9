//! Venue classification and amenity inference.
//!
//! The Places API has no notion of dog-friendliness, so amenities are
//! guessed from type membership and name substrings. Heuristic, not
//! authoritative: a "dog park" is assumed fenced and off-leash because
//! most are, not because anyone verified this one.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VenueType {
    Park,
    Cafe,
    Restaurant,
    Bar,
    PetStore,
    Trail,
    Beach,
    Other,
}

impl VenueType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Park => "park",
            Self::Cafe => "cafe",
            Self::Restaurant => "restaurant",
            Self::Bar => "bar",
            Self::PetStore => "pet_store",
            Self::Trail => "trail",
            Self::Beach => "beach",
            Self::Other => "other",
        }
    }
}

impl std::str::FromStr for VenueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "park" => Ok(Self::Park),
            "cafe" => Ok(Self::Cafe),
            "restaurant" => Ok(Self::Restaurant),
            "bar" => Ok(Self::Bar),
            "pet_store" => Ok(Self::PetStore),
            "trail" => Ok(Self::Trail),
            "beach" => Ok(Self::Beach),
            "other" => Ok(Self::Other),
            other => Err(format!("unknown venue type: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amenities {
    pub fenced: bool,
    pub off_leash: bool,
    pub water_station: bool,
    pub indoor_friendly: bool,
    pub serves_food: bool,
    pub outdoor_seating: bool,
}

/// Classify a place from its API types, falling back to name keywords.
/// Type membership wins over names: a bar called "The Dog Park" is
/// still a bar.
pub fn classify_venue(types: &[String], name: &str) -> VenueType {
    let has = |t: &str| types.iter().any(|x| x == t);

    if has("pet_store") {
        return VenueType::PetStore;
    }
    if has("cafe") || has("coffee_shop") {
        return VenueType::Cafe;
    }
    if has("bar") || has("pub") {
        return VenueType::Bar;
    }
    if has("restaurant") || has("meal_takeaway") {
        return VenueType::Restaurant;
    }
    if has("park") || has("dog_park") {
        return VenueType::Park;
    }
    if has("hiking_area") || has("natural_feature") {
        return VenueType::Trail;
    }

    let name = name.to_lowercase();
    if name.contains("beach") {
        VenueType::Beach
    } else if name.contains("trail") || name.contains("hike") {
        VenueType::Trail
    } else if name.contains("park") {
        VenueType::Park
    } else {
        VenueType::Other
    }
}

pub fn infer_amenities(venue: VenueType, types: &[String], name: &str) -> Amenities {
    let name = name.to_lowercase();
    let is_dog_park = types.iter().any(|t| t == "dog_park")
        || name.contains("dog park")
        || name.contains("dog run");

    let mut amenities = Amenities::default();

    // Dedicated dog parks are almost always fenced and off-leash
    if is_dog_park {
        amenities.fenced = true;
        amenities.off_leash = true;
        amenities.water_station = true;
    }
    if name.contains("off leash") || name.contains("off-leash") {
        amenities.off_leash = true;
    }
    if name.contains("fenced") {
        amenities.fenced = true;
    }
    if name.contains("fountain") || name.contains("water station") {
        amenities.water_station = true;
    }

    match venue {
        VenueType::Cafe | VenueType::Restaurant | VenueType::Bar => {
            amenities.serves_food = true;
            amenities.indoor_friendly = true;
            if name.contains("terrace")
                || name.contains("patio")
                || name.contains("garden")
                || name.contains("rooftop")
            {
                amenities.outdoor_seating = true;
            }
        }
        VenueType::PetStore => {
            amenities.indoor_friendly = true;
        }
        VenueType::Park | VenueType::Trail | VenueType::Beach => {
            amenities.outdoor_seating = false;
        }
        VenueType::Other => {}
    }

    amenities
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn type_membership_wins_over_name() {
        assert_eq!(classify_venue(&types(&["bar"]), "The Dog Park"), VenueType::Bar);
        assert_eq!(classify_venue(&types(&["cafe"]), "Beach House Coffee"), VenueType::Cafe);
        assert_eq!(classify_venue(&types(&["park"]), "Central Park"), VenueType::Park);
        assert_eq!(classify_venue(&types(&["pet_store"]), "Pets & Co"), VenueType::PetStore);
    }

    #[test]
    fn name_keywords_fill_in_for_generic_types() {
        let generic = types(&["point_of_interest", "establishment"]);
        assert_eq!(classify_venue(&generic, "Sunset Dog Beach"), VenueType::Beach);
        assert_eq!(classify_venue(&generic, "Ridge Trail"), VenueType::Trail);
        assert_eq!(classify_venue(&generic, "Riverside Park"), VenueType::Park);
        assert_eq!(classify_venue(&generic, "Some Building"), VenueType::Other);
    }

    #[test]
    fn venue_types_round_trip() {
        use std::str::FromStr;
        for venue in [
            VenueType::Park,
            VenueType::Cafe,
            VenueType::Restaurant,
            VenueType::Bar,
            VenueType::PetStore,
            VenueType::Trail,
            VenueType::Beach,
            VenueType::Other,
        ] {
            assert_eq!(VenueType::from_str(venue.as_str()).unwrap(), venue);
        }
        assert!(VenueType::from_str("kennel").is_err());
    }

    #[test]
    fn dog_parks_get_the_full_outdoor_package() {
        let amenities = infer_amenities(
            VenueType::Park,
            &types(&["park", "dog_park"]),
            "Happy Tails Dog Park",
        );
        assert!(amenities.fenced);
        assert!(amenities.off_leash);
        assert!(amenities.water_station);
        assert!(!amenities.serves_food);
    }

    #[test]
    fn off_leash_name_is_detected_with_and_without_hyphen() {
        let generic = types(&["park"]);
        assert!(infer_amenities(VenueType::Park, &generic, "Off-Leash Meadow").off_leash);
        assert!(infer_amenities(VenueType::Park, &generic, "Off Leash Meadow").off_leash);
        assert!(!infer_amenities(VenueType::Park, &generic, "Quiet Meadow").off_leash);
    }

    #[test]
    fn cafes_serve_food_and_terrace_means_outdoor_seating() {
        let cafe_types = types(&["cafe"]);
        let plain = infer_amenities(VenueType::Cafe, &cafe_types, "Bean Counter");
        assert!(plain.serves_food);
        assert!(plain.indoor_friendly);
        assert!(!plain.outdoor_seating);

        let terrace = infer_amenities(VenueType::Cafe, &cafe_types, "Bean Counter Terrace");
        assert!(terrace.outdoor_seating);
    }
}
