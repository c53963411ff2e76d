use serde::Deserialize;
use std::collections::BTreeMap;

/// Preference scores for every person over every candidate group.
///
/// Lower scores are better. `people` and `groups` keep file order, which is
/// the canonical order used when rendering results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Preferences {
    pub people: Vec<String>,
    pub groups: Vec<String>,
    pub scores: BTreeMap<String, BTreeMap<String, u32>>,
}

impl Preferences {
    pub fn score(&self, person: &str, group: &str) -> Option<u32> {
        self.scores.get(person)?.get(group).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Division {
    /// `average = N / k` truncated towards zero.
    #[default]
    Integer,
    /// `average = N / k` as a real number.
    Real,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub groups_to_choose: usize,
    pub division: Division,
    pub time_limit_seconds: Option<u32>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            groups_to_choose: 3,
            division: Division::Integer,
            time_limit_seconds: None,
        }
    }
}

impl Settings {
    /// Lower bound on the size of a chosen group; the upper bound is one more.
    pub fn average(&self, people: usize) -> f64 {
        match self.division {
            Division::Integer => (people / self.groups_to_choose) as f64,
            Division::Real => people as f64 / self.groups_to_choose as f64,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupAssignment {
    pub label: String,
    pub chosen: bool,
    pub members: Vec<String>,
}

/// Solved assignment, one entry per candidate group in canonical order.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub groups: Vec<GroupAssignment>,
    pub cost: u64,
}

impl Assignment {
    /// Groups with at least one member, in canonical order.
    pub fn occupied(&self) -> impl Iterator<Item = &GroupAssignment> {
        self.groups.iter().filter(|group| !group.members.is_empty())
    }

    pub fn group_of(&self, person: &str) -> Option<&str> {
        self.groups
            .iter()
            .find(|group| group.members.iter().any(|member| member == person))
            .map(|group| group.label.as_str())
    }
}
