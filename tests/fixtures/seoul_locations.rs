//! Seoul points of interest for realistic test fixtures.
//!
//! Coordinates are approximate building entrances taken from OpenStreetMap.

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }
}

// ============================================================================
// Jongno / Jung-gu sights
// ============================================================================

pub const PALACES: &[Location] = &[
    Location::new("Gyeongbokgung", 37.5796, 126.9770),
    Location::new("Changdeokgung", 37.5794, 126.9910),
    Location::new("Deoksugung", 37.5658, 126.9752),
];

pub const MARKETS: &[Location] = &[
    Location::new("Gwangjang Market", 37.5701, 126.9996),
    Location::new("Namdaemun Market", 37.5592, 126.9777),
];

pub const CAFES: &[Location] = &[
    Location::new("Ikseon-dong Hanok Cafe", 37.5741, 126.9898),
    Location::new("Bukchon Tea House", 37.5826, 126.9836),
];

pub const VIEWPOINTS: &[Location] = &[
    Location::new("N Seoul Tower", 37.5512, 126.9882),
    Location::new("Naksan Park", 37.5807, 127.0073),
];

pub fn all_locations() -> Vec<Location> {
    PALACES
        .iter()
        .chain(MARKETS)
        .chain(CAFES)
        .chain(VIEWPOINTS)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_in_central_seoul() {
        for loc in all_locations() {
            assert!(loc.lat > 37.50 && loc.lat < 37.62, "{} lat out of range: {}", loc.name, loc.lat);
            assert!(loc.lng > 126.90 && loc.lng < 127.05, "{} lng out of range: {}", loc.name, loc.lng);
        }
    }
}
