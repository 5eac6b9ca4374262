use std::collections::BTreeMap;

use foundation::ids::MemberId;
use foundation::math::{LatLng, normalize_coordinates};
use members::Member;
use tracing::debug;

use crate::aggregate::Group;
use crate::mode::DisplayMode;
use crate::style::MarkerStyle;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarkerId(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub enum MarkerKind {
    Group {
        key: String,
        count: usize,
        style: MarkerStyle,
    },
    Member {
        member: MemberId,
    },
}

/// A placed marker. Member markers own a nested rendering context `C`
/// (e.g. a small embedded map inside the card).
#[derive(Debug)]
pub struct Marker<C> {
    pub id: MarkerId,
    pub position: LatLng,
    pub kind: MarkerKind,
    context: Option<C>,
}

impl<C> Marker<C> {
    pub fn context(&self) -> Option<&C> {
        self.context.as_ref()
    }
}

/// Markers currently on the map.
///
/// Removing a member marker does not drop its context inline: the context is
/// queued and handed out by [`MarkerLayer::flush_releases`] on a later turn,
/// exactly once. Hosts whose contexts must outlive the current render pass
/// (animations, pending tile loads) release them there.
#[derive(Debug)]
pub struct MarkerLayer<C> {
    markers: BTreeMap<MarkerId, Marker<C>>,
    next_id: u64,
    pending_release: Vec<C>,
}

impl<C> Default for MarkerLayer<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> MarkerLayer<C> {
    pub fn new() -> Self {
        Self {
            markers: BTreeMap::new(),
            next_id: 1,
            pending_release: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn get(&self, id: MarkerId) -> Option<&Marker<C>> {
        self.markers.get(&id)
    }

    /// Markers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Marker<C>> {
        self.markers.values()
    }

    pub fn context_mut(&mut self, id: MarkerId) -> Option<&mut C> {
        self.markers.get_mut(&id).and_then(|m| m.context.as_mut())
    }

    pub fn add_group(&mut self, group: &Group<'_>) -> MarkerId {
        let kind = MarkerKind::Group {
            key: group.key.clone(),
            count: group.count,
            style: MarkerStyle::for_group(group.kind, group.count),
        };
        self.insert(normalize_coordinates(Some(group.centroid)), kind, None)
    }

    pub fn add_member(&mut self, member: &Member, context: C) -> MarkerId {
        let kind = MarkerKind::Member { member: member.id };
        self.insert(normalize_coordinates(member.coordinates), kind, Some(context))
    }

    fn insert(&mut self, position: LatLng, kind: MarkerKind, context: Option<C>) -> MarkerId {
        let id = MarkerId(self.next_id);
        self.next_id += 1;
        self.markers.insert(
            id,
            Marker {
                id,
                position,
                kind,
                context,
            },
        );
        id
    }

    pub fn remove(&mut self, id: MarkerId) -> bool {
        match self.markers.remove(&id) {
            Some(marker) => {
                self.pending_release.extend(marker.context);
                true
            }
            None => false,
        }
    }

    /// Removes every marker, queueing member contexts for release.
    pub fn clear(&mut self) {
        let markers = std::mem::take(&mut self.markers);
        self.pending_release
            .extend(markers.into_values().filter_map(|m| m.context));
    }

    /// Replaces the layer contents for `mode`: group counters when
    /// aggregating, one card per member otherwise.
    pub fn rebuild<F>(
        &mut self,
        mode: DisplayMode,
        members: &[Member],
        groups: &[Group<'_>],
        mut make_context: F,
    ) where
        F: FnMut(&Member) -> C,
    {
        self.clear();
        if mode.is_aggregate() {
            for group in groups {
                self.add_group(group);
            }
        } else {
            for member in members {
                let context = make_context(member);
                self.add_member(member, context);
            }
        }
        debug!(
            %mode,
            markers = self.markers.len(),
            queued = self.pending_release.len(),
            "markers rebuilt"
        );
    }

    pub fn pending_releases(&self) -> usize {
        self.pending_release.len()
    }

    /// Hands every queued context to `release`. Returns how many were
    /// released.
    pub fn flush_releases<F>(&mut self, mut release: F) -> usize
    where
        F: FnMut(C),
    {
        let queued = std::mem::take(&mut self.pending_release);
        let n = queued.len();
        for context in queued {
            release(context);
        }
        n
    }

    /// Tears the layer down, releasing every context still owned.
    pub fn dispose<F>(mut self, release: F) -> usize
    where
        F: FnMut(C),
    {
        self.clear();
        self.flush_releases(release)
    }
}
