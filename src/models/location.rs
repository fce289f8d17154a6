//! Place model for resolved city coordinates

use serde::{Deserialize, Serialize};

/// A city name resolved to coordinates
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Place {
    /// The name the user asked for; used as the city label
    pub query: String,
    /// Name reported by the geocoder
    pub name: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Country name, when the geocoder reports one
    pub country: Option<String>,
    /// IANA timezone, when the geocoder reports one
    pub timezone: Option<String>,
}

impl Place {
    /// Create a new place
    #[must_use]
    pub fn new(
        query: impl Into<String>,
        name: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            query: query.into(),
            name: name.into(),
            latitude,
            longitude,
            country: None,
            timezone: None,
        }
    }

    /// Whether the coordinates are within WGS84 bounds
    #[must_use]
    pub fn has_valid_coordinates(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Whether both places sit on exactly the same point
    #[must_use]
    pub fn same_coordinates(&self, other: &Place) -> bool {
        self.latitude == other.latitude && self.longitude == other.longitude
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }

    /// "Name, Country" when the country is known
    #[must_use]
    pub fn display_name(&self) -> String {
        match &self.country {
            Some(country) if !country.is_empty() => format!("{}, {}", self.name, country),
            _ => self.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(51.5085, -0.1257, true)]
    #[case(90.0, 180.0, true)]
    #[case(-90.0, -180.0, true)]
    #[case(90.1, 0.0, false)]
    #[case(0.0, -180.5, false)]
    #[case(f64::NAN, 0.0, false)]
    fn test_coordinate_bounds(#[case] lat: f64, #[case] lon: f64, #[case] valid: bool) {
        let place = Place::new("q", "n", lat, lon);
        assert_eq!(place.has_valid_coordinates(), valid);
    }

    #[test]
    fn test_display_name() {
        let mut place = Place::new("london", "London", 51.5085, -0.1257);
        assert_eq!(place.display_name(), "London");
        place.country = Some("United Kingdom".to_string());
        assert_eq!(place.display_name(), "London, United Kingdom");
        assert_eq!(place.format_coordinates(), "51.5085, -0.1257");
    }

    #[test]
    fn test_same_coordinates_ignores_names() {
        let a = Place::new("NYC", "New York", 40.71427, -74.00597);
        let b = Place::new("New York", "New York", 40.71427, -74.00597);
        let c = Place::new("Newark", "Newark", 40.73566, -74.17237);
        assert!(a.same_coordinates(&b));
        assert!(!a.same_coordinates(&c));
    }
}
