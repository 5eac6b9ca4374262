use super::LatLng;

/// Mean Earth radius (kilometers) used for great-circle distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;
/// Valid latitude range (degrees).
pub const LAT_RANGE: (f64, f64) = (-90.0, 90.0);
/// Valid longitude range (degrees).
pub const LNG_RANGE: (f64, f64) = (-180.0, 180.0);

pub fn to_radians(degrees: f64) -> f64 {
    degrees * (std::f64::consts::PI / 180.0)
}

pub fn to_degrees(radians: f64) -> f64 {
    radians * (180.0 / std::f64::consts::PI)
}

/// Great-circle distance in kilometers (Haversine).
pub fn distance_km(a: LatLng, b: LatLng) -> f64 {
    let d_lat = to_radians(b.lat - a.lat);
    let d_lng = to_radians(b.lng - a.lng);

    let h = (d_lat / 2.0).sin() * (d_lat / 2.0).sin()
        + to_radians(a.lat).cos()
            * to_radians(b.lat).cos()
            * (d_lng / 2.0).sin()
            * (d_lng / 2.0).sin();

    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// True iff both values are finite and inside their geographic ranges.
pub fn is_valid_coordinate(lat: f64, lng: f64) -> bool {
    lat.is_finite()
        && lng.is_finite()
        && (LAT_RANGE.0..=LAT_RANGE.1).contains(&lat)
        && (LNG_RANGE.0..=LNG_RANGE.1).contains(&lng)
}

pub fn is_valid_latlng(p: LatLng) -> bool {
    is_valid_coordinate(p.lat, p.lng)
}

/// Returns a coordinate usable by a map host, falling back to `[0, 0]`.
pub fn normalize_coordinates(p: Option<LatLng>) -> LatLng {
    match p {
        Some(p) if is_valid_latlng(p) => p,
        other => {
            tracing::warn!(?other, "invalid coordinates, falling back to origin");
            LatLng::ORIGIN
        }
    }
}

/// Arithmetic mean of `points`. No validity filtering is applied.
pub fn centroid<I>(points: I) -> Option<LatLng>
where
    I: IntoIterator<Item = LatLng>,
{
    let mut n = 0usize;
    let mut sum_lat = 0.0;
    let mut sum_lng = 0.0;
    for p in points {
        sum_lat += p.lat;
        sum_lng += p.lng;
        n += 1;
    }
    if n == 0 {
        return None;
    }
    Some(LatLng::new(sum_lat / n as f64, sum_lng / n as f64))
}

#[cfg(test)]
mod tests {
    use super::{
        EARTH_RADIUS_KM, centroid, distance_km, is_valid_coordinate, normalize_coordinates,
        to_degrees, to_radians,
    };
    use crate::math::LatLng;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn one_degree_of_longitude_on_the_equator() {
        let d = distance_km(LatLng::new(0.0, 0.0), LatLng::new(0.0, 1.0));
        assert_close(d, EARTH_RADIUS_KM * std::f64::consts::PI / 180.0, 1e-9);
    }

    #[test]
    fn paris_to_london() {
        let paris = LatLng::new(48.8566, 2.3522);
        let london = LatLng::new(51.5074, -0.1278);
        let d = distance_km(paris, london);
        assert_close(d, 343.5, 1.0);
        assert_close(distance_km(london, paris), d, 1e-9);
    }

    #[test]
    fn distance_to_self_is_zero() {
        let p = LatLng::new(-22.27, 166.45);
        assert_close(distance_km(p, p), 0.0, 1e-12);
    }

    #[test]
    fn degree_radian_round_trip() {
        assert_close(to_radians(180.0), std::f64::consts::PI, 1e-12);
        assert_close(to_degrees(to_radians(37.5)), 37.5, 1e-12);
    }

    #[test]
    fn validates_ranges_and_finiteness() {
        assert!(is_valid_coordinate(90.0, -180.0));
        assert!(is_valid_coordinate(-90.0, 180.0));
        assert!(!is_valid_coordinate(90.5, 0.0));
        assert!(!is_valid_coordinate(0.0, -180.1));
        assert!(!is_valid_coordinate(f64::NAN, 0.0));
        assert!(!is_valid_coordinate(0.0, f64::INFINITY));
    }

    #[test]
    fn normalize_falls_back_to_origin() {
        let p = LatLng::new(45.0, 4.0);
        assert_eq!(normalize_coordinates(Some(p)), p);
        assert_eq!(normalize_coordinates(None), LatLng::ORIGIN);
        assert_eq!(
            normalize_coordinates(Some(LatLng::new(120.0, 0.0))),
            LatLng::ORIGIN
        );
    }

    #[test]
    fn centroid_is_arithmetic_mean() {
        assert_eq!(centroid(Vec::<LatLng>::new()), None);
        let c = centroid([LatLng::new(10.0, 20.0), LatLng::new(20.0, 40.0)]).unwrap();
        assert_close(c.lat, 15.0, 1e-9);
        assert_close(c.lng, 30.0, 1e-9);
    }
}
