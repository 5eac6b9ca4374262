use std::collections::BTreeSet;

use foundation::ids::MemberId;
use serde::{Deserialize, Serialize};

use crate::member::Member;

/// Criteria from the filter panel. Unset or empty criteria match everything.
///
/// All criteria are intersected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MemberFilter {
    pub graduation_year: Option<i32>,
    pub country: Option<String>,
    pub promotion_type: Option<String>,
}

impl MemberFilter {
    pub fn is_empty(&self) -> bool {
        self.graduation_year.is_none()
            && non_empty(&self.country).is_none()
            && non_empty(&self.promotion_type).is_none()
    }

    pub fn matches(&self, member: &Member) -> bool {
        if let Some(year) = self.graduation_year
            && member.graduation_year != Some(year)
        {
            return false;
        }
        if let Some(country) = non_empty(&self.country)
            && member.country != country
        {
            return false;
        }
        if let Some(kind) = non_empty(&self.promotion_type)
            && member.promotion_type != kind
        {
            return false;
        }
        true
    }
}

fn non_empty(v: &Option<String>) -> Option<&str> {
    v.as_deref().filter(|s| !s.is_empty())
}

pub fn filter_members(members: &[Member], filter: &MemberFilter) -> Vec<Member> {
    if filter.is_empty() {
        return members.to_vec();
    }
    members
        .iter()
        .filter(|m| filter.matches(m))
        .cloned()
        .collect()
}

/// Case-insensitive substring search over the descriptive fields.
///
/// A blank query returns every member.
pub fn search_members(members: &[Member], query: &str) -> Vec<Member> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return members.to_vec();
    }
    members
        .iter()
        .filter(|m| {
            [
                &m.name,
                &m.firstname,
                &m.location,
                &m.company,
                &m.position,
                &m.country,
                &m.city,
            ]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}

pub fn find_by_id(members: &[Member], id: MemberId) -> Option<&Member> {
    members.iter().find(|m| m.id == id)
}

/// Distinct graduation years, most recent first.
pub fn graduation_years(members: &[Member]) -> Vec<i32> {
    let years: BTreeSet<i32> = members.iter().filter_map(|m| m.graduation_year).collect();
    years.into_iter().rev().collect()
}

pub fn countries(members: &[Member]) -> Vec<String> {
    distinct_sorted(members, |m| &m.country)
}

pub fn companies(members: &[Member]) -> Vec<String> {
    distinct_sorted(members, |m| &m.company)
}

pub fn promotion_types(members: &[Member]) -> Vec<String> {
    distinct_sorted(members, |m| &m.promotion_type)
}

fn distinct_sorted(members: &[Member], field: impl Fn(&Member) -> &String) -> Vec<String> {
    let set: BTreeSet<&String> = members.iter().map(field).filter(|s| !s.is_empty()).collect();
    set.into_iter().cloned().collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub total_members: usize,
    pub countries_count: usize,
    pub companies_count: usize,
    /// `(min, max)`; `None` when no member has a graduation year.
    pub graduation_years_range: Option<(i32, i32)>,
}

pub fn statistics(members: &[Member]) -> Statistics {
    let years = members.iter().filter_map(|m| m.graduation_year);
    let range = years.fold(None, |acc: Option<(i32, i32)>, y| match acc {
        None => Some((y, y)),
        Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
    });
    Statistics {
        total_members: members.len(),
        countries_count: countries(members).len(),
        companies_count: companies(members).len(),
        graduation_years_range: range,
    }
}
