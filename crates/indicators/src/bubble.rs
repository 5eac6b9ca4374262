use std::borrow::Borrow;
use std::collections::BTreeMap;

use members::Member;
use serde::Serialize;

use crate::viewport_index::Direction;

/// Details behind one directional bubble.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BubbleInfo<'a> {
    pub direction: Direction,
    pub count: usize,
    pub members: Vec<&'a Member>,
    /// Members per country, sorted by country name.
    pub countries: BTreeMap<&'a str, usize>,
}

impl<'a> BubbleInfo<'a> {
    pub fn new<M: Borrow<Member>>(direction: Direction, members: &'a [M]) -> Self {
        let members: Vec<&'a Member> = members.iter().map(Borrow::<Member>::borrow).collect();
        let mut countries = BTreeMap::new();
        for &m in &members {
            *countries.entry(m.country.as_str()).or_insert(0) += 1;
        }
        Self {
            direction,
            count: members.len(),
            members,
            countries,
        }
    }

    pub fn has_members(&self) -> bool {
        self.count > 0
    }

    /// `"<n> members to the <direction>"`, then a `"Country (k), ..."` line
    /// when there is anyone to list.
    pub fn tooltip(&self) -> String {
        let mut text = format!("{} members to the {}", self.count, self.direction);
        if !self.countries.is_empty() {
            let breakdown: Vec<String> = self
                .countries
                .iter()
                .map(|(country, n)| format!("{country} ({n})"))
                .collect();
            text.push('\n');
            text.push_str(&breakdown.join(", "));
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::BubbleInfo;
    use crate::viewport_index::Direction;
    use foundation::ids::MemberId;
    use members::Member;
    use pretty_assertions::assert_eq;

    fn from(id: u64, country: &str) -> Member {
        Member::new(MemberId(id)).with_place(country, "")
    }

    #[test]
    fn tooltip_lists_countries_alphabetically() {
        let ms = vec![from(1, "Norway"), from(2, "Finland"), from(3, "Norway")];
        let info = BubbleInfo::new(Direction::North, &ms);
        assert_eq!(info.count, 3);
        assert_eq!(info.countries.get("Norway"), Some(&2));
        assert_eq!(info.tooltip(), "3 members to the north\nFinland (1), Norway (2)");
    }

    #[test]
    fn empty_bubble_has_a_single_line() {
        let none: Vec<Member> = Vec::new();
        let info = BubbleInfo::new(Direction::West, &none);
        assert!(!info.has_members());
        assert_eq!(info.tooltip(), "0 members to the west");
    }
}
