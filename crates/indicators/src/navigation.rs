use std::borrow::Borrow;
use std::time::Duration;

use foundation::camera::CameraTarget;
use foundation::math::{LatLng, centroid};
use members::Member;
use serde::{Deserialize, Serialize};

use crate::viewport_index::Direction;

/// Where a click on a directional bubble takes the camera.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct NavigationTarget {
    pub direction: Direction,
    pub center: LatLng,
    pub zoom: u8,
    pub member_count: usize,
}

impl NavigationTarget {
    pub fn camera_target(&self) -> CameraTarget {
        CameraTarget::new(self.center, self.zoom)
    }
}

/// Animation parameters for `MapHost::fly_to`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlyToOptions {
    #[serde(with = "millis")]
    pub duration: Duration,
    pub ease_linearity: f64,
}

impl Default for FlyToOptions {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(1500),
            ease_linearity: 0.25,
        }
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

/// Zoom that roughly fits `count` members spread in one direction.
pub fn zoom_for_count(count: usize) -> u8 {
    match count {
        0 | 1 => 8,
        2..=3 => 6,
        4..=10 => 4,
        _ => 3,
    }
}

/// Heuristic camera target for the members of one bucket: their mean
/// position, zoomed out further the more members there are. `None` when the
/// bucket is empty.
pub fn plan_target<M: Borrow<Member>>(
    direction: Direction,
    members: &[M],
) -> Option<NavigationTarget> {
    let center = centroid(
        members
            .iter()
            .map(|m| Borrow::<Member>::borrow(m).raw_position()),
    )?;
    Some(NavigationTarget {
        direction,
        center,
        zoom: zoom_for_count(members.len()),
        member_count: members.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::{FlyToOptions, plan_target, zoom_for_count};
    use crate::viewport_index::Direction;
    use foundation::ids::MemberId;
    use foundation::math::LatLng;
    use members::Member;
    use std::time::Duration;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn at(id: u64, lat: f64, lng: f64) -> Member {
        Member::new(MemberId(id)).with_coordinates(lat, lng)
    }

    #[test]
    fn single_member_target_is_close_up() {
        let ms = vec![at(1, 60.17, 24.94)];
        let t = plan_target(Direction::North, &ms).unwrap();
        assert_eq!(t.center, LatLng::new(60.17, 24.94));
        assert_eq!(t.zoom, 8);
        assert_eq!(t.member_count, 1);
        assert_eq!(t.camera_target().zoom, 8);
    }

    #[test]
    fn empty_bucket_has_no_target() {
        let none: Vec<Member> = Vec::new();
        assert!(plan_target(Direction::South, &none).is_none());
    }

    #[test]
    fn center_is_mean_and_zoom_steps_down() {
        let ms = vec![at(1, 10.0, 20.0), at(2, 20.0, 40.0)];
        let refs: Vec<&Member> = ms.iter().collect();
        let t = plan_target(Direction::East, &refs).unwrap();
        assert_close(t.center.lat, 15.0, 1e-12);
        assert_close(t.center.lng, 30.0, 1e-12);
        assert_eq!(t.zoom, 6);

        assert_eq!(zoom_for_count(3), 6);
        assert_eq!(zoom_for_count(4), 4);
        assert_eq!(zoom_for_count(10), 4);
        assert_eq!(zoom_for_count(11), 3);
    }

    #[test]
    fn fly_to_defaults_and_json() {
        let d = FlyToOptions::default();
        assert_eq!(d.duration, Duration::from_millis(1500));
        assert_eq!(d.ease_linearity, 0.25);
        let parsed: FlyToOptions = serde_json::from_str(r#"{"duration": 800}"#).unwrap();
        assert_eq!(parsed.duration, Duration::from_millis(800));
        assert_eq!(parsed.ease_linearity, 0.25);
    }
}
