//! Geodetic primitives shared by the directory, the map and the editor.

mod point;

pub use point::GeoPoint;

/// Mean Earth radius in meters used by [`haversine_distance`].
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance in meters between two points.
pub fn haversine_distance(a: GeoPoint, b: GeoPoint) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let d_phi = (b.lat - a.lat).to_radians();
    let d_lam = (b.lng - a.lng).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lam / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_M * c
}

/// Total length in meters of the path through `points` in order.
///
/// Paths with fewer than two points have zero length.
pub fn path_length(points: &[GeoPoint]) -> f64 {
    points
        .windows(2)
        .map(|w| haversine_distance(w[0], w[1]))
        .sum()
}

/// Builds a `geo_types` line string (x = longitude, y = latitude).
pub fn to_line_string(points: &[GeoPoint]) -> geo_types::LineString<f64> {
    points
        .iter()
        .map(|p| geo_types::Coord { x: p.lng, y: p.lat })
        .collect::<Vec<_>>()
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_degree_of_latitude() {
        let d = haversine_distance(GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 0.0));
        assert!((d - 111_195.0).abs() < 1.0, "got {d}");
    }

    #[test]
    fn zero_distance_for_same_point() {
        let p = GeoPoint::new(40.7128, -74.006);
        assert_eq!(haversine_distance(p, p), 0.0);
    }

    #[test]
    fn short_paths_have_no_length() {
        assert_eq!(path_length(&[]), 0.0);
        assert_eq!(path_length(&[GeoPoint::new(1.0, 1.0)]), 0.0);
    }

    #[test]
    fn path_length_reversal() {
        let pts = vec![
            GeoPoint::new(40.7128, -74.006),
            GeoPoint::new(40.7150, -74.002),
            GeoPoint::new(40.7201, -73.999),
            GeoPoint::new(40.7190, -74.010),
        ];
        let mut rev = pts.clone();
        rev.reverse();
        let fwd = path_length(&pts);
        assert!(fwd > 0.0);
        assert!((fwd - path_length(&rev)).abs() < 1e-6);
    }

    #[test]
    fn line_string_uses_lng_lat_order() {
        let ls = to_line_string(&[GeoPoint::new(1.0, 2.0), GeoPoint::new(3.0, 4.0)]);
        let first = ls.0[0];
        assert_eq!((first.x, first.y), (2.0, 1.0));
        assert_eq!(ls.0.len(), 2);
    }
}
