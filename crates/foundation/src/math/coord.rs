use serde::{Deserialize, Serialize};

/// Geographic coordinate in degrees.
///
/// Serialized as a `[lat, lng]` pair, which is how both the member dataset and
/// the country reference table store positions.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const ORIGIN: Self = Self { lat: 0.0, lng: 0.0 };

    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Placeholder for a coordinate that could not be read.
    ///
    /// Arithmetic on it yields NaN, which keeps averages honest about the
    /// missing input instead of silently pulling them towards `[0, 0]`.
    pub const fn missing() -> Self {
        Self {
            lat: f64::NAN,
            lng: f64::NAN,
        }
    }

    pub fn as_array(self) -> [f64; 2] {
        [self.lat, self.lng]
    }
}

impl From<[f64; 2]> for LatLng {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<LatLng> for [f64; 2] {
    fn from(p: LatLng) -> Self {
        p.as_array()
    }
}

#[cfg(test)]
mod tests {
    use super::LatLng;

    #[test]
    fn serializes_as_lat_lng_pair() {
        let p = LatLng::new(48.85, 2.35);
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "[48.85,2.35]");

        let back: LatLng = serde_json::from_str("[-22.27, 166.45]").unwrap();
        assert_eq!(back, LatLng::new(-22.27, 166.45));
    }

    #[test]
    fn missing_is_nan() {
        let m = LatLng::missing();
        assert!(m.lat.is_nan() && m.lng.is_nan());
    }
}
