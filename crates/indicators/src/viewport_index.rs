use foundation::bounds::Viewport;
use foundation::math::LatLng;
use members::Member;
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Fixed iteration order, which is also the bucketing priority.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
        }
    }

    /// Direction of a point outside `viewport`, `None` when inside.
    ///
    /// Latitude wins over longitude: a point both north and east of the
    /// viewport is north.
    pub fn of(viewport: &Viewport, p: LatLng) -> Option<Direction> {
        if p.lat > viewport.north {
            Some(Direction::North)
        } else if p.lat < viewport.south {
            Some(Direction::South)
        } else if p.lng > viewport.east {
            Some(Direction::East)
        } else if p.lng < viewport.west {
            Some(Direction::West)
        } else {
            None
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDirectionError(pub String);

impl std::fmt::Display for ParseDirectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown direction {:?} (expected north, south, east or west)", self.0)
    }
}

impl std::error::Error for ParseDirectionError {}

impl std::str::FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "north" | "n" => Ok(Direction::North),
            "south" | "s" => Ok(Direction::South),
            "east" | "e" => Ok(Direction::East),
            "west" | "w" => Ok(Direction::West),
            _ => Err(ParseDirectionError(s.to_string())),
        }
    }
}

pub fn contains(viewport: &Viewport, p: LatLng) -> bool {
    viewport.contains(p)
}

/// Members split against a viewport. Members without a valid position are
/// only counted in `skipped`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition<'a> {
    pub visible: Vec<&'a Member>,
    pub hidden: Vec<&'a Member>,
    pub skipped: usize,
}

pub fn partition<'a>(viewport: &Viewport, members: &'a [Member]) -> Partition<'a> {
    let mut out = Partition::default();
    for member in members {
        match member.position() {
            Some(p) if viewport.contains(p) => out.visible.push(member),
            Some(_) => out.hidden.push(member),
            None => out.skipped += 1,
        }
    }
    out
}

/// Off-screen members per direction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectionalBuckets<T> {
    pub north: Vec<T>,
    pub south: Vec<T>,
    pub east: Vec<T>,
    pub west: Vec<T>,
}

impl<T> Default for DirectionalBuckets<T> {
    fn default() -> Self {
        Self {
            north: Vec::new(),
            south: Vec::new(),
            east: Vec::new(),
            west: Vec::new(),
        }
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DirectionCounts {
    pub north: usize,
    pub south: usize,
    pub east: usize,
    pub west: usize,
}

impl DirectionCounts {
    pub fn get(&self, direction: Direction) -> usize {
        match direction {
            Direction::North => self.north,
            Direction::South => self.south,
            Direction::East => self.east,
            Direction::West => self.west,
        }
    }
}

impl<T> DirectionalBuckets<T> {
    pub fn get(&self, direction: Direction) -> &[T] {
        match direction {
            Direction::North => &self.north,
            Direction::South => &self.south,
            Direction::East => &self.east,
            Direction::West => &self.west,
        }
    }

    fn get_mut(&mut self, direction: Direction) -> &mut Vec<T> {
        match direction {
            Direction::North => &mut self.north,
            Direction::South => &mut self.south,
            Direction::East => &mut self.east,
            Direction::West => &mut self.west,
        }
    }

    pub fn counts(&self) -> DirectionCounts {
        DirectionCounts {
            north: self.north.len(),
            south: self.south.len(),
            east: self.east.len(),
            west: self.west.len(),
        }
    }

    pub fn total(&self) -> usize {
        self.north.len() + self.south.len() + self.east.len() + self.west.len()
    }

    pub fn has_any(&self) -> bool {
        self.total() > 0
    }

    /// Buckets in N, S, E, W order.
    pub fn iter(&self) -> impl Iterator<Item = (Direction, &[T])> {
        Direction::ALL.into_iter().map(move |d| (d, self.get(d)))
    }
}

impl<T: Clone> DirectionalBuckets<&T> {
    pub fn cloned(&self) -> DirectionalBuckets<T> {
        let own = |v: &[&T]| -> Vec<T> { v.iter().map(|m| (*m).clone()).collect() };
        DirectionalBuckets {
            north: own(&self.north),
            south: own(&self.south),
            east: own(&self.east),
            west: own(&self.west),
        }
    }
}

/// Assigns each hidden member to exactly one direction. Members that turn out
/// to be inside the viewport, or have no valid position, are dropped.
pub fn bucketize<'a, I>(viewport: &Viewport, hidden: I) -> DirectionalBuckets<&'a Member>
where
    I: IntoIterator<Item = &'a Member>,
{
    let mut buckets = DirectionalBuckets::default();
    for member in hidden {
        if let Some(p) = member.position()
            && let Some(direction) = Direction::of(viewport, p)
        {
            buckets.get_mut(direction).push(member);
        }
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::{Direction, DirectionCounts, bucketize, contains, partition};
    use foundation::bounds::Viewport;
    use foundation::ids::MemberId;
    use foundation::math::LatLng;
    use members::Member;
    use pretty_assertions::assert_eq;

    fn at(id: u64, lat: f64, lng: f64) -> Member {
        Member::new(MemberId(id)).with_coordinates(lat, lng)
    }

    fn ids(ms: &[&Member]) -> Vec<u64> {
        ms.iter().map(|m| m.id.0).collect()
    }

    fn square() -> Viewport {
        Viewport::new(10.0, 0.0, 10.0, 0.0)
    }

    #[test]
    fn containment_is_inclusive() {
        let vp = square();
        assert!(contains(&vp, LatLng::new(10.0, 10.0)));
        assert!(contains(&vp, LatLng::new(0.0, 0.0)));
        assert!(!contains(&vp, LatLng::new(10.000001, 5.0)));
    }

    #[test]
    fn partition_covers_valid_members_without_overlap() {
        let mut missing = Member::new(MemberId(4));
        missing.coordinates = None;
        let ms = vec![
            at(1, 5.0, 5.0),
            at(2, 20.0, 5.0),
            at(3, 91.0, 5.0),
            missing,
            at(5, -3.0, -3.0),
        ];
        let p = partition(&square(), &ms);
        assert_eq!(ids(&p.visible), vec![1]);
        assert_eq!(ids(&p.hidden), vec![2, 5]);
        assert_eq!(p.skipped, 2);
        assert_eq!(p.visible.len() + p.hidden.len() + p.skipped, ms.len());
    }

    #[test]
    fn latitude_takes_priority_over_longitude() {
        let ms = vec![at(1, 15.0, 15.0)];
        let buckets = bucketize(&square(), &ms);
        assert_eq!(ids(&buckets.north), vec![1]);
        assert_eq!(buckets.total(), 1);

        let ms = vec![at(2, -5.0, 20.0), at(3, 5.0, 20.0), at(4, 5.0, -20.0)];
        let buckets = bucketize(&square(), &ms);
        assert_eq!(
            buckets.counts(),
            DirectionCounts {
                north: 0,
                south: 1,
                east: 1,
                west: 1,
            }
        );
    }

    #[test]
    fn members_inside_are_dropped_from_buckets() {
        let ms = vec![at(1, 5.0, 5.0)];
        let buckets = bucketize(&square(), &ms);
        assert!(!buckets.has_any());
    }

    #[test]
    fn iteration_order_is_fixed() {
        let ms = vec![at(1, -5.0, 5.0), at(2, 50.0, 5.0)];
        let buckets = bucketize(&square(), &ms);
        let order: Vec<(Direction, usize)> = buckets.iter().map(|(d, v)| (d, v.len())).collect();
        assert_eq!(
            order,
            vec![
                (Direction::North, 1),
                (Direction::South, 1),
                (Direction::East, 0),
                (Direction::West, 0),
            ]
        );
        let owned = buckets.cloned();
        assert_eq!(owned.get(Direction::North)[0].id, MemberId(2));
    }

    #[test]
    fn directions_parse_and_print() {
        assert_eq!("North".parse::<Direction>(), Ok(Direction::North));
        assert_eq!("w".parse::<Direction>(), Ok(Direction::West));
        assert!("up".parse::<Direction>().is_err());
        assert_eq!(Direction::East.to_string(), "east");
    }
}
