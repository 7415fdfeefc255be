use serde::{Deserialize, Serialize};

/// A stop to visit. Identity within one optimization call is the point's
/// position in the input sequence; the point itself is never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub label: String,
}

impl Point {
    pub fn new(latitude: f64, longitude: f64, label: impl Into<String>) -> Self {
        Self {
            latitude,
            longitude,
            label: label.into(),
        }
    }
}

impl From<&Point> for geo_types::Point {
    fn from(point: &Point) -> Self {
        geo_types::Point::new(point.longitude, point.latitude)
    }
}
