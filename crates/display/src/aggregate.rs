use std::collections::HashMap;

use foundation::bounds::Viewport;
use foundation::camera::CameraTarget;
use foundation::math::{LatLng, centroid};
use members::{CountryTable, Member};
use serde::Serialize;
use tracing::debug;

use crate::mode::DisplayMode;
use crate::region::RegionRules;

/// Zoom hint for a country missing a reference `zoomLevel`.
pub const DEFAULT_COUNTRY_ZOOM: u8 = 6;
/// Zoom used when drilling from a country counter into its regions.
pub const REGION_ZOOM: u8 = 6;
/// Zoom at which individual member cards are shown.
pub const INDIVIDUAL_ZOOM: u8 = 8;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKind {
    Country,
    Region,
}

/// Members sharing a country or region key.
///
/// Groups borrow their members from the caller's slice and are rebuilt on
/// every render cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group<'a> {
    pub kind: GroupKind,
    pub key: String,
    pub country: String,
    /// Country name, or the first city seen for a region.
    pub label: String,
    pub count: usize,
    pub members: Vec<&'a Member>,
    pub centroid: LatLng,
    pub zoom_hint: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Viewport>,
}

impl<'a> Group<'a> {
    fn push(&mut self, member: &'a Member) {
        self.members.push(member);
        self.count += 1;
    }

    /// Camera target for a click on this group's counter.
    ///
    /// A single-member country jumps straight to the member; other countries
    /// open at region level; regions open at individual level.
    pub fn drill_down(&self) -> CameraTarget {
        match self.kind {
            GroupKind::Country if self.count == 1 => {
                let center = self
                    .members
                    .first()
                    .and_then(|m| m.position())
                    .unwrap_or(self.centroid);
                CameraTarget::new(center, INDIVIDUAL_ZOOM)
            }
            GroupKind::Country => CameraTarget::new(self.centroid, REGION_ZOOM),
            GroupKind::Region => CameraTarget::new(self.centroid, INDIVIDUAL_ZOOM),
        }
    }
}

/// Group by `country`, ascending by count.
///
/// Centroids and zoom hints come from `countries`; unknown countries sit at
/// `[0, 0]`.
pub fn group_by_country<'a>(members: &'a [Member], countries: &CountryTable) -> Vec<Group<'a>> {
    let mut groups: Vec<Group<'a>> = Vec::new();
    let mut index: HashMap<&'a str, usize> = HashMap::new();

    for member in members {
        let slot = *index.entry(member.country.as_str()).or_insert_with(|| {
            let reference = countries.get(&member.country);
            if reference.is_none() {
                debug!(country = %member.country, "no country reference, using origin");
            }
            groups.push(Group {
                kind: GroupKind::Country,
                key: member.country.clone(),
                country: member.country.clone(),
                label: member.country.clone(),
                count: 0,
                members: Vec::new(),
                centroid: reference.map(|r| r.center).unwrap_or(LatLng::ORIGIN),
                zoom_hint: reference
                    .and_then(|r| r.zoom_level)
                    .unwrap_or(DEFAULT_COUNTRY_ZOOM),
                bounds: reference.and_then(|r| r.bounds_viewport()),
            });
            groups.len() - 1
        });
        groups[slot].push(member);
    }

    sort_for_rendering(&mut groups);
    groups
}

/// Group by region key, ascending by count.
///
/// A single-member region sits on that member; larger regions on the mean of
/// their members' coordinates. Coordinates are averaged as stored, so a
/// member with a missing or out-of-range position skews (or NaNs) the mean.
pub fn group_by_region<'a>(members: &'a [Member], rules: &RegionRules) -> Vec<Group<'a>> {
    let mut groups: Vec<Group<'a>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for member in members {
        let key = rules.region_key(member);
        let slot = match index.get(&key) {
            Some(&slot) => slot,
            None => {
                groups.push(Group {
                    kind: GroupKind::Region,
                    key: key.clone(),
                    country: member.country.clone(),
                    label: member.city.clone(),
                    count: 0,
                    members: Vec::new(),
                    centroid: LatLng::ORIGIN,
                    zoom_hint: INDIVIDUAL_ZOOM,
                    bounds: None,
                });
                index.insert(key, groups.len() - 1);
                groups.len() - 1
            }
        };
        groups[slot].push(member);
    }

    for group in &mut groups {
        group.centroid = match group.members.as_slice() {
            [only] => only.raw_position(),
            many => centroid(many.iter().map(|m| m.raw_position())).unwrap_or(LatLng::ORIGIN),
        };
    }

    sort_for_rendering(&mut groups);
    groups
}

/// Groups for `mode`. `Individual` renders members directly, so it yields no
/// groups.
pub fn aggregate<'a>(
    mode: DisplayMode,
    members: &'a [Member],
    countries: &CountryTable,
    rules: &RegionRules,
) -> Vec<Group<'a>> {
    match mode {
        DisplayMode::AggregateCountry => group_by_country(members, countries),
        DisplayMode::AggregateRegion => group_by_region(members, rules),
        DisplayMode::Individual => Vec::new(),
    }
}

// Low counts first so the largest groups are drawn last, on top. The sort is
// stable: ties keep first-appearance order.
fn sort_for_rendering(groups: &mut [Group<'_>]) {
    groups.sort_by_key(|g| g.count);
}

#[cfg(test)]
mod tests {
    use super::{
        DEFAULT_COUNTRY_ZOOM, GroupKind, INDIVIDUAL_ZOOM, REGION_ZOOM, aggregate,
        group_by_country, group_by_region,
    };
    use crate::mode::DisplayMode;
    use crate::region::RegionRules;
    use foundation::camera::CameraTarget;
    use foundation::ids::MemberId;
    use foundation::math::LatLng;
    use members::{CountryReference, CountryTable, Member};
    use pretty_assertions::assert_eq;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn member(id: u64, country: &str, city: &str, lat: f64, lng: f64) -> Member {
        Member::new(MemberId(id))
            .with_place(country, city)
            .with_coordinates(lat, lng)
    }

    fn countries() -> CountryTable {
        let mut t = CountryTable::new();
        let mut fr = CountryReference::new(LatLng::new(46.6, 2.2));
        fr.zoom_level = Some(5);
        t.insert("France", fr);
        t.insert("Japan", CountryReference::new(LatLng::new(36.2, 138.25)));
        t
    }

    fn keys(groups: &[super::Group<'_>]) -> Vec<(String, usize)> {
        groups.iter().map(|g| (g.key.clone(), g.count)).collect()
    }

    #[test]
    fn country_grouping_of_nothing_is_empty() {
        assert!(group_by_country(&[], &countries()).is_empty());
        assert!(group_by_region(&[], &RegionRules::default()).is_empty());
    }

    #[test]
    fn single_country_uses_reference_centroid() {
        let ms = vec![
            member(1, "France", "Paris", 48.85, 2.35),
            member(2, "France", "Lyon", 45.76, 4.84),
            member(3, "France", "Brest", 48.39, -4.49),
        ];
        let groups = group_by_country(&ms, &countries());
        assert_eq!(groups.len(), 1);
        let g = &groups[0];
        assert_eq!(g.kind, GroupKind::Country);
        assert_eq!(g.count, 3);
        assert_eq!(g.members.len(), 3);
        assert_eq!(g.centroid, LatLng::new(46.6, 2.2));
        assert_eq!(g.zoom_hint, 5);
    }

    #[test]
    fn unknown_country_falls_back_to_origin() {
        let ms = vec![member(1, "Peru", "Lima", -12.05, -77.04)];
        let groups = group_by_country(&ms, &countries());
        assert_eq!(groups[0].centroid, LatLng::ORIGIN);
        assert_eq!(groups[0].zoom_hint, DEFAULT_COUNTRY_ZOOM);
        assert_eq!(groups[0].bounds, None);
    }

    #[test]
    fn groups_are_ordered_by_ascending_count() {
        let ms = vec![
            member(1, "France", "Paris", 48.85, 2.35),
            member(2, "Japan", "Tokyo", 35.68, 139.69),
            member(3, "France", "Lyon", 45.76, 4.84),
            member(4, "Peru", "Lima", -12.05, -77.04),
        ];
        let groups = group_by_country(&ms, &countries());
        assert_eq!(
            keys(&groups),
            vec![
                ("Japan".to_string(), 1),
                ("Peru".to_string(), 1),
                ("France".to_string(), 2),
            ]
        );
    }

    #[test]
    fn two_member_region_centroid_is_exact_mean() {
        let ms = vec![
            member(1, "France", "Paris 11e", 48.8575, 2.3800),
            member(2, "France", "Paris 15e", 48.8412, 2.3003),
        ];
        let groups = group_by_region(&ms, &RegionRules::default());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key, "France_IleDeFrance");
        assert_close(groups[0].centroid.lat, (48.8575 + 48.8412) / 2.0, 1e-9);
        assert_close(groups[0].centroid.lng, (2.3800 + 2.3003) / 2.0, 1e-9);
    }

    #[test]
    fn single_member_region_sits_on_the_member() {
        let ms = vec![member(1, "Japan", "Osaka", 34.69, 135.50)];
        let groups = group_by_region(&ms, &RegionRules::default());
        assert_eq!(groups[0].key, "Japan_Osaka");
        assert_eq!(groups[0].label, "Osaka");
        assert_eq!(groups[0].centroid, LatLng::new(34.69, 135.50));
        assert_eq!(groups[0].zoom_hint, INDIVIDUAL_ZOOM);
    }

    #[test]
    fn invalid_coordinates_are_counted_and_averaged_as_is() {
        let mut missing = Member::new(MemberId(3)).with_place("Japan", "Kyoto");
        missing.coordinates = None;
        let ms = vec![
            member(1, "Japan", "Kyoto", 35.0, 135.7),
            member(2, "Japan", "Kyoto", 120.0, 135.7),
            missing,
        ];
        let groups = group_by_region(&ms, &RegionRules::default());
        assert_eq!(groups[0].count, 3);
        assert!(groups[0].centroid.lat.is_nan());

        let groups = group_by_region(&ms[..2], &RegionRules::default());
        assert_close(groups[0].centroid.lat, 77.5, 1e-9);
    }

    #[test]
    fn aggregate_dispatches_on_mode_and_is_idempotent() {
        let ms = vec![
            member(1, "France", "Paris", 48.85, 2.35),
            member(2, "France", "Lyon", 45.76, 4.84),
            member(3, "Japan", "Tokyo", 35.68, 139.69),
        ];
        let t = countries();
        let rules = RegionRules::default();

        let a = aggregate(DisplayMode::AggregateRegion, &ms, &t, &rules);
        let b = aggregate(DisplayMode::AggregateRegion, &ms, &t, &rules);
        assert_eq!(a, b);
        assert_eq!(a.len(), 3);

        let c = aggregate(DisplayMode::AggregateCountry, &ms, &t, &rules);
        assert_eq!(keys(&c), keys(&aggregate(DisplayMode::AggregateCountry, &ms, &t, &rules)));
        assert_eq!(c.len(), 2);

        assert!(aggregate(DisplayMode::Individual, &ms, &t, &rules).is_empty());
    }

    #[test]
    fn drill_down_targets() {
        let ms = vec![
            member(1, "Japan", "Tokyo", 35.68, 139.69),
            member(2, "France", "Paris", 48.85, 2.35),
            member(3, "France", "Lyon", 45.76, 4.84),
        ];
        let groups = group_by_country(&ms, &countries());
        assert_eq!(
            groups[0].drill_down(),
            CameraTarget::new(LatLng::new(35.68, 139.69), INDIVIDUAL_ZOOM)
        );
        assert_eq!(
            groups[1].drill_down(),
            CameraTarget::new(LatLng::new(46.6, 2.2), REGION_ZOOM)
        );

        let regions = group_by_region(&ms, &RegionRules::default());
        let lyon = regions.iter().find(|g| g.key == "France_RhoneAlpes").unwrap();
        assert_eq!(
            lyon.drill_down(),
            CameraTarget::new(LatLng::new(45.76, 4.84), INDIVIDUAL_ZOOM)
        );
    }
}
