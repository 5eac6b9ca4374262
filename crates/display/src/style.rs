use serde::Serialize;

use crate::aggregate::GroupKind;

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_css(self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// Marker box in pixels.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct MarkerSize {
    pub width: u32,
    pub height: u32,
}

impl MarkerSize {
    pub const fn square(side: u32) -> Self {
        Self {
            width: side,
            height: side,
        }
    }
}

/// Individual member card; anchored at its bottom center.
pub const INDIVIDUAL_CARD_SIZE: MarkerSize = MarkerSize {
    width: 120,
    height: 150,
};
pub const INDIVIDUAL_CARD_ANCHOR: (u32, u32) = (60, 150);

/// Counts at or above this render at full intensity.
pub const FULL_INTENSITY_COUNT: usize = 20;

pub fn marker_size(count: usize) -> MarkerSize {
    match count {
        0 | 1 => MarkerSize::square(40),
        2..=5 => MarkerSize::square(50),
        6..=10 => MarkerSize::square(60),
        11..=20 => MarkerSize::square(70),
        _ => MarkerSize::square(80),
    }
}

/// Cluster colour as a CSS hex string.
pub fn cluster_color(count: usize) -> &'static str {
    match count {
        0 | 1 => "#667eea",
        2..=5 => "#4CAF50",
        6..=10 => "#FF9800",
        11..=20 => "#F44336",
        _ => "#9C27B0",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerStyle {
    pub size: MarkerSize,
    pub anchor: (u32, u32),
    pub z_index: i64,
    pub z_offset: i64,
    /// `0..=1`, saturating at [`FULL_INTENSITY_COUNT`].
    pub intensity: f64,
    pub font_size_px: f64,
    pub fill: Rgba,
    pub edge: Rgba,
}

impl MarkerStyle {
    /// Counter style. Larger groups are bigger, more opaque and stacked
    /// above smaller ones. Countries are purple, regions blue.
    pub fn for_group(kind: GroupKind, count: usize) -> Self {
        let size = marker_size(count);
        let intensity = (count as f64 / FULL_INTENSITY_COUNT as f64).min(1.0);
        let (light, dark) = match kind {
            GroupKind::Country => ((155, 89, 182), (106, 32, 140)),
            GroupKind::Region => ((52, 152, 219), (41, 128, 185)),
        };
        let count = i64::try_from(count).unwrap_or(i64::MAX / 100);
        Self {
            size,
            anchor: (size.width / 2, size.height / 2),
            z_index: 1000 + count,
            z_offset: count * 100,
            intensity,
            font_size_px: (f64::from(size.width) * 0.35).max(14.0),
            fill: Rgba::new(light.0, light.1, light.2, 0.7 + intensity * 0.3),
            edge: Rgba::new(dark.0, dark.1, dark.2, 0.8 + intensity * 0.2),
        }
    }
}
