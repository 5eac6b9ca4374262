//! Report builders behind the `member-map` subcommands. Each returns a
//! serializable value for `--json` and renders a plain-text view otherwise.

use std::fmt::Write as _;
use std::time::Duration;

use display::{
    DisplayMode, MarkerStyle, RegionRules, aggregate, cluster_by_proximity, cluster_color,
    select_display_mode,
};
use foundation::bounds::Viewport;
use foundation::camera::CameraTarget;
use foundation::math::LatLng;
use foundation::time::Timestamp;
use indicators::{
    Direction, DirectionCounts, DirectionalIndicatorEngine, IndicatorConfig, NavigationTarget,
};
use members::{CountryTable, Member, MemberFilter, filter_members, search_members};
use serde::Serialize;

use crate::host::StaticMap;

/// Members matching `filter`, then `search` if given.
pub fn select_members(
    members: &[Member],
    filter: &MemberFilter,
    search: Option<&str>,
) -> Vec<Member> {
    let filtered = filter_members(members, filter);
    match search {
        Some(query) => search_members(&filtered, query),
        None => filtered,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupRow {
    pub key: String,
    pub label: String,
    pub count: usize,
    pub centroid: LatLng,
    pub zoom_hint: u8,
    pub drill_down: CameraTarget,
    pub style: MarkerStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterRow {
    pub id: String,
    pub count: usize,
    pub centroid: LatLng,
    pub color: &'static str,
}

/// What the map shows at one zoom level. Aggregate modes fill `groups`;
/// individual mode fills `clusters`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupsReport {
    pub zoom: f64,
    pub mode: DisplayMode,
    pub groups: Vec<GroupRow>,
    pub clusters: Vec<ClusterRow>,
}

pub fn groups_report(
    members: &[Member],
    countries: &CountryTable,
    rules: &RegionRules,
    zoom: f64,
) -> GroupsReport {
    let mode = select_display_mode(zoom);
    let groups = aggregate(mode, members, countries, rules)
        .iter()
        .map(|g| GroupRow {
            key: g.key.clone(),
            label: g.label.clone(),
            count: g.count,
            centroid: g.centroid,
            zoom_hint: g.zoom_hint,
            drill_down: g.drill_down(),
            style: MarkerStyle::for_group(g.kind, g.count),
        })
        .collect();
    let clusters = if mode.is_aggregate() {
        Vec::new()
    } else {
        cluster_by_proximity(members, zoom)
            .into_iter()
            .map(|c| ClusterRow {
                count: c.count(),
                color: cluster_color(c.count()),
                id: c.id,
                centroid: c.centroid,
            })
            .collect()
    };
    GroupsReport {
        zoom,
        mode,
        groups,
        clusters,
    }
}

impl GroupsReport {
    pub fn render_text(&self) -> String {
        let mut out = format!("zoom {} -> {} mode\n", self.zoom, self.mode);
        for g in &self.groups {
            let _ = writeln!(
                out,
                "{:>5}  {:<28} [{:.4}, {:.4}]  click -> zoom {}",
                g.count, g.key, g.centroid.lat, g.centroid.lng, g.drill_down.zoom
            );
        }
        for c in &self.clusters {
            let _ = writeln!(
                out,
                "{:>5}  {:<28} [{:.4}, {:.4}]  {}",
                c.count, c.id, c.centroid.lat, c.centroid.lng, c.color
            );
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BubbleRow {
    pub direction: Direction,
    pub count: usize,
    pub active: bool,
    pub tooltip: String,
}

/// Directional indicator state once the display delay has passed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HiddenReport {
    pub viewport: Viewport,
    pub zoom: f64,
    pub counts: DirectionCounts,
    pub is_active: bool,
    pub is_visible: bool,
    pub bubbles: Vec<BubbleRow>,
}

fn settled_engine(
    members: Vec<Member>,
    config: &IndicatorConfig,
    host: &mut StaticMap,
) -> (DirectionalIndicatorEngine, Timestamp) {
    let mut engine = DirectionalIndicatorEngine::new(config.clone()).with_members(members);
    engine.attach(Timestamp::ZERO, host);
    let settled = Timestamp::ZERO.after(Duration::from_millis(config.display_delay_ms));
    engine.tick(settled, &*host);
    (engine, settled)
}

pub fn hidden_report(
    members: Vec<Member>,
    config: &IndicatorConfig,
    viewport: Viewport,
    zoom: f64,
) -> HiddenReport {
    let mut host = StaticMap::new(viewport, zoom);
    let (engine, _) = settled_engine(members, config, &mut host);
    let snapshot = engine.snapshot();
    let bubbles = Direction::ALL
        .into_iter()
        .map(|d| {
            let info = engine.bubble_info(d);
            BubbleRow {
                direction: d,
                count: info.count,
                active: engine.is_direction_active(d),
                tooltip: info.tooltip(),
            }
        })
        .collect();
    HiddenReport {
        viewport,
        zoom,
        counts: snapshot.counts,
        is_active: snapshot.is_active,
        is_visible: snapshot.is_visible,
        bubbles,
    }
}

impl HiddenReport {
    pub fn render_text(&self) -> String {
        let state = match (self.is_active, self.is_visible) {
            (true, true) => "visible",
            (true, false) => "pending",
            (false, _) => "inactive",
        };
        let mut out = format!("indicators {state} at zoom {}\n", self.zoom);
        for b in self.bubbles.iter().filter(|b| b.count > 0) {
            let _ = writeln!(out, "{}", b.tooltip);
        }
        out
    }
}

/// Camera target a click on the `direction` bubble would fly to.
pub fn navigate_report(
    members: Vec<Member>,
    config: &IndicatorConfig,
    viewport: Viewport,
    zoom: f64,
    direction: Direction,
) -> Option<NavigationTarget> {
    let mut host = StaticMap::new(viewport, zoom);
    let (mut engine, settled) = settled_engine(members, config, &mut host);
    if !engine.navigate(settled, direction, &mut host) {
        return None;
    }
    host.flights().last().map(|(target, _)| *target)
}

pub fn render_target(target: &NavigationTarget) -> String {
    format!(
        "fly {} to [{:.4}, {:.4}] at zoom {} ({} members)\n",
        target.direction, target.center.lat, target.center.lng, target.zoom, target.member_count
    )
}
