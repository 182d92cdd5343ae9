use serde::{Deserialize, Serialize};

/// A validated WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return None;
        }
        if latitude.abs() > 90.0 || longitude.abs() > 180.0 {
            return None;
        }
        Some(Self { latitude, longitude })
    }
}

/// Haversine distance in km between two points.
pub fn distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    const R: f64 = 6371.0; // Earth radius in km
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lng = (b.longitude - a.longitude).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos() * b.latitude.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().asin();
    R * c
}

/// Round a coordinate to a fixed number of decimal places.
/// Two decimals gives a grid of roughly 1.1 km, which is what the
/// location cache keys use so nearby queries land on the same bucket.
pub fn round_coord(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_coordinates() {
        assert!(GeoPoint::new(91.0, 0.0).is_none());
        assert!(GeoPoint::new(-91.0, 0.0).is_none());
        assert!(GeoPoint::new(0.0, 181.0).is_none());
        assert!(GeoPoint::new(0.0, -181.0).is_none());
        assert!(GeoPoint::new(f64::NAN, 0.0).is_none());
        assert!(GeoPoint::new(45.0, 90.0).is_some());
    }

    #[test]
    fn distance_is_zero_for_identical_points() {
        let p = GeoPoint { latitude: 48.8566, longitude: 2.3522 };
        assert!(distance_km(p, p).abs() < 1e-9);
    }

    #[test]
    fn distance_is_symmetric() {
        let paris = GeoPoint { latitude: 48.8566, longitude: 2.3522 };
        let london = GeoPoint { latitude: 51.5074, longitude: -0.1278 };
        let ab = distance_km(paris, london);
        let ba = distance_km(london, paris);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn distance_matches_known_city_pair() {
        // Paris <-> London is ~344 km great-circle
        let paris = GeoPoint { latitude: 48.8566, longitude: 2.3522 };
        let london = GeoPoint { latitude: 51.5074, longitude: -0.1278 };
        let d = distance_km(paris, london);
        assert!((d - 344.0).abs() < 3.0, "got {d}");
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let a = GeoPoint { latitude: 10.0, longitude: 20.0 };
        let b = GeoPoint { latitude: 11.0, longitude: 20.0 };
        let d = distance_km(a, b);
        assert!((d - 111.19).abs() < 0.5, "got {d}");
    }

    #[test]
    fn rounds_coordinates_to_grid() {
        assert_eq!(round_coord(48.85661, 2), 48.86);
        assert_eq!(round_coord(48.854, 2), 48.85);
        assert_eq!(round_coord(-0.12789, 2), -0.13);
        assert_eq!(round_coord(2.3522, 0), 2.0);
    }
}
