//! Latitude/longitude point type used throughout the crate.

use std::fmt;
use std::str::FromStr;

/// A position on the globe in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<(f64, f64)> for GeoPoint {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}

impl From<GeoPoint> for geo_types::Point<f64> {
    fn from(p: GeoPoint) -> Self {
        geo_types::Point::new(p.lng, p.lat)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lng)
    }
}

/// Parses `"lat,lng"`.
impl FromStr for GeoPoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lng) = s
            .split_once(',')
            .ok_or_else(|| format!("expected lat,lng but got {s:?}"))?;
        let lat: f64 = lat.trim().parse().map_err(|e| format!("latitude: {e}"))?;
        let lng: f64 = lng.trim().parse().map_err(|e| format!("longitude: {e}"))?;
        if !(-90.0..=90.0).contains(&lat) {
            return Err(format!("latitude {lat} out of range"));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(format!("longitude {lng} out of range"));
        }
        Ok(Self::new(lat, lng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_lat_lng() {
        let p: GeoPoint = " 12.5, -3.25 ".parse().unwrap();
        assert_eq!(p, GeoPoint::new(12.5, -3.25));
        assert!("91,0".parse::<GeoPoint>().is_err());
        assert!("abc".parse::<GeoPoint>().is_err());
    }

    #[test]
    fn display_six_decimals() {
        assert_eq!(GeoPoint::new(1.0, 2.5).to_string(), "1.000000, 2.500000");
    }
}
