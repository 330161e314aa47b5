// Location model representing WGS84 coordinates

use serde::{Deserialize, Serialize};

use crate::utils::distance::haversine_km;

/// Represents a geographic location with (latitude, longitude) coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    /// Creates a new location with the given coordinates
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns false for the (0.0, 0.0) placeholder that directories use
    /// for stores without a geocoded address
    pub fn is_set(&self) -> bool {
        self.latitude != 0.0 || self.longitude != 0.0
    }

    /// Great-circle distance to another location, in kilometers
    pub fn distance_to(&self, other: &Location) -> f64 {
        haversine_km(self, other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_set() {
        assert!(Location::new(47.37, 8.54).is_set());
        assert!(Location::new(0.0, 8.54).is_set());
        assert!(!Location::new(0.0, 0.0).is_set());
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        let loc = Location::new(47.37, 8.54);
        assert!(loc.distance_to(&loc) < 1e-9);
    }
}
