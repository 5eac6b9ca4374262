use std::collections::BTreeMap;

use foundation::bounds::Viewport;
use foundation::math::LatLng;
use serde::{Deserialize, Serialize};

/// Reference data for one country: where to draw its aggregate marker and how
/// far to zoom when focusing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryReference {
    pub center: LatLng,
    /// `[south_west, north_east]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<[LatLng; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom_level: Option<u8>,
}

impl CountryReference {
    pub fn new(center: LatLng) -> Self {
        Self {
            center,
            bounds: None,
            zoom_level: None,
        }
    }

    pub fn bounds_viewport(&self) -> Option<Viewport> {
        self.bounds.map(Viewport::from)
    }
}

/// Read-only country name → reference lookup.
///
/// Backed by a `BTreeMap` so iteration order is stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountryTable {
    entries: BTreeMap<String, CountryReference>,
}

impl CountryTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, reference: CountryReference) {
        self.entries.insert(name.into(), reference);
    }

    pub fn get(&self, name: &str) -> Option<&CountryReference> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CountryReference)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, CountryReference)> for CountryTable {
    fn from_iter<I: IntoIterator<Item = (String, CountryReference)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
