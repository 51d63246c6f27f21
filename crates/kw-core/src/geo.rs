//! Haversine proximity check between a requester and a property.
//!
//! Advisory only: the result is stamped onto the request as metadata and is
//! never a gate on disclosure.

/// Earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Default radius inside which a requester counts as on-site.
pub const DEFAULT_PROXIMITY_RADIUS_M: f64 = 100.0;

/// Great-circle distance in meters between two WGS84 coordinates.
pub fn haversine_distance_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_M * c
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityCheck {
    pub distance_m: f64,
    pub within_radius: bool,
}

pub fn check_proximity(
    requester: (f64, f64),
    property: (f64, f64),
    radius_m: f64,
) -> ProximityCheck {
    let distance_m = haversine_distance_m(requester.0, requester.1, property.0, property.1);
    ProximityCheck {
        distance_m,
        within_radius: distance_m <= radius_m,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_distance_for_same_point() {
        let d = haversine_distance_m(51.5074, -0.1278, 51.5074, -0.1278);
        assert!(d.abs() < 1e-6);
    }

    #[test]
    fn london_to_paris_is_about_344_km() {
        let d = haversine_distance_m(51.5074, -0.1278, 48.8566, 2.3522);
        assert!((d - 343_500.0).abs() < 2_000.0, "got {d}");
    }

    #[test]
    fn proximity_within_default_radius() {
        // ~44 m apart
        let check = check_proximity(
            (51.50740, -0.12780),
            (51.50780, -0.12780),
            DEFAULT_PROXIMITY_RADIUS_M,
        );
        assert!(check.within_radius);
        assert!(check.distance_m > 0.0 && check.distance_m < 100.0);
    }

    #[test]
    fn proximity_outside_radius() {
        let check = check_proximity((51.5074, -0.1278), (51.5174, -0.1278), 100.0);
        assert!(!check.within_radius);
    }
}
