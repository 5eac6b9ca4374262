use foundation::math::{LatLng, centroid, distance_km};
use members::Member;
use serde::Serialize;

use crate::mode::{DisplayMode, select_display_mode};

/// Maximum seed distance for members sharing a cluster at `mode`.
pub fn cluster_threshold_km(mode: DisplayMode) -> f64 {
    match mode {
        DisplayMode::AggregateCountry => 500.0,
        DisplayMode::AggregateRegion => 50.0,
        DisplayMode::Individual => 5.0,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProximityCluster<'a> {
    pub id: String,
    pub members: Vec<&'a Member>,
    pub centroid: LatLng,
}

impl ProximityCluster<'_> {
    pub fn count(&self) -> usize {
        self.members.len()
    }
}

/// Greedy single-pass clustering.
///
/// Each unclaimed member seeds a cluster and claims every later unclaimed
/// member within the threshold of the seed (not of the growing centroid).
/// Members without a valid position are left out.
pub fn cluster_by_proximity(members: &[Member], zoom: f64) -> Vec<ProximityCluster<'_>> {
    let threshold = cluster_threshold_km(select_display_mode(zoom));
    let located: Vec<(&Member, LatLng)> = members
        .iter()
        .filter_map(|m| m.position().map(|p| (m, p)))
        .collect();

    let mut claimed = vec![false; located.len()];
    let mut clusters = Vec::new();

    for (i, &(seed, seed_pos)) in located.iter().enumerate() {
        if claimed[i] {
            continue;
        }
        claimed[i] = true;
        let mut cluster = vec![seed];
        let mut positions = vec![seed_pos];

        for (j, &(other, pos)) in located.iter().enumerate().skip(i + 1) {
            if !claimed[j] && distance_km(seed_pos, pos) <= threshold {
                claimed[j] = true;
                cluster.push(other);
                positions.push(pos);
            }
        }

        clusters.push(ProximityCluster {
            id: format!("cluster_{}", clusters.len()),
            members: cluster,
            centroid: centroid(positions).unwrap_or(seed_pos),
        });
    }
    clusters
}
