use serde::{Deserialize, Serialize};

use crate::math::LatLng;

/// Geographic viewport rectangle, edges in degrees.
///
/// `west > east` (a viewport crossing the antimeridian) is accepted but not
/// unwrapped: containment tests treat the edges literally.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl Viewport {
    pub fn new(north: f64, south: f64, east: f64, west: f64) -> Self {
        Viewport {
            north,
            south,
            east,
            west,
        }
    }

    /// Build from the south-west and north-east corners.
    pub fn from_corners(south_west: LatLng, north_east: LatLng) -> Self {
        Self::new(north_east.lat, south_west.lat, north_east.lng, south_west.lng)
    }

    /// Finite edges with `south <= north`.
    pub fn is_valid(&self) -> bool {
        self.north.is_finite()
            && self.south.is_finite()
            && self.east.is_finite()
            && self.west.is_finite()
            && self.south <= self.north
    }

    /// Inclusive containment on all four edges.
    pub fn contains(&self, p: LatLng) -> bool {
        p.lat >= self.south && p.lat <= self.north && p.lng >= self.west && p.lng <= self.east
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.north + self.south) / 2.0,
            (self.east + self.west) / 2.0,
        )
    }
}

impl From<[LatLng; 2]> for Viewport {
    fn from([south_west, north_east]: [LatLng; 2]) -> Self {
        Self::from_corners(south_west, north_east)
    }
}
