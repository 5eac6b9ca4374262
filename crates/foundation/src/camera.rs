use serde::{Deserialize, Serialize};

use crate::math::LatLng;

/// Where to move the map camera: a center and an integral zoom level.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraTarget {
    pub center: LatLng,
    pub zoom: u8,
}

impl CameraTarget {
    pub fn new(center: LatLng, zoom: u8) -> Self {
        Self { center, zoom }
    }
}
